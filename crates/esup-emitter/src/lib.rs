//! Whitespace-preserving printer for the esup modernizer.
//!
//! This crate provides:
//! - `print` - render a (possibly rewritten) `SyntaxTree` back to text
//! - `Printer` - the gap-copying emitter behind `print`
//! - `SourceWriter` - output buffer with indentation tracking
//!
//! Untouched subtrees are copied from the original text byte for byte;
//! only nodes rewritten by a transform are serialized from their data.

pub mod printer;
pub mod source_writer;

pub use printer::Printer;
pub use source_writer::SourceWriter;

use esup_parser::SyntaxTree;

/// Print `tree` against the text it was parsed from.
pub fn print(tree: &SyntaxTree, original: &str) -> String {
    Printer::new(tree, original).print()
}
