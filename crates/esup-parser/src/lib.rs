//! JavaScript parser and syntax tree for the esup modernizer.
//!
//! This crate provides:
//! - `SyntaxTree` - arena of span-carrying nodes, mutated in place by transforms
//! - `NodeData` - the node variants, with `children` in source order
//! - `ParserState` - recursive-descent parser producing a `SyntaxTree`
//! - `ParseError` - first syntax error with its byte offset
//! - `syntax::transform_utils` - shared queries used by the transforms

pub mod error;
pub mod node;
pub mod parser;
pub mod syntax;
pub mod tree;

pub use error::ParseError;
pub use node::{
    Class, DeclarationKind, Function, Literal, LiteralKind, Method, MethodKind, Node, NodeData,
    NodeIndex, Origin,
};
pub use parser::{ParserState, parse_document};
pub use tree::SyntaxTree;
