//! The printer.
//!
//! Three ways to print a node, decided by identity alone:
//! - original and clean: copy its span from the source, re-indented when
//!   the surrounding output sits at a different depth (`original.rs`)
//! - original with a rewritten descendant: copy the source text between its
//!   children and recurse into them (`original.rs`)
//! - synthesized: serialize from `NodeData` (`statements.rs`,
//!   `expressions.rs`)

mod expressions;
mod helpers;
mod original;
mod statements;

use esup_common::indent::infer_indent_unit;
use esup_parser::{NodeData, NodeIndex, SyntaxTree};
use tracing::debug;

use crate::source_writer::SourceWriter;

pub struct Printer<'a> {
    pub(super) tree: &'a SyntaxTree,
    pub(super) source: &'a str,
    pub(super) writer: SourceWriter,
    /// Memoized "this subtree holds a synthesized node".
    dirty: Vec<Option<bool>>,
}

impl<'a> Printer<'a> {
    pub fn new(tree: &'a SyntaxTree, source: &'a str) -> Printer<'a> {
        let indent_unit = infer_indent_unit(source);
        Printer {
            tree,
            source,
            writer: SourceWriter::new(source.len() + source.len() / 8, indent_unit),
            dirty: vec![None; tree.len()],
        }
    }

    pub fn print(mut self) -> String {
        let root = self.tree.root();
        if self.tree.is_empty() {
            return self.source.to_string();
        }
        self.emit(root);
        debug!(
            input = self.source.len(),
            output = self.writer.len(),
            "printed document"
        );
        self.writer.into_string()
    }

    /// Print any node.
    pub(super) fn emit(&mut self, idx: NodeIndex) {
        let node = self.tree.get(idx);
        if !node.is_original() {
            self.emit_synthesized(idx);
        } else if self.is_dirty(idx) {
            self.emit_gap_copied(idx);
        } else {
            self.emit_verbatim(idx);
        }
    }

    pub(super) fn is_dirty(&mut self, idx: NodeIndex) -> bool {
        if let Some(dirty) = self.dirty.get(idx.index()).copied().flatten() {
            return dirty;
        }
        let tree = self.tree;
        let dirty = !tree.get(idx).is_original()
            || tree
                .children(idx)
                .into_iter()
                .any(|child| self.is_dirty(child));
        if let Some(slot) = self.dirty.get_mut(idx.index()) {
            *slot = Some(dirty);
        }
        dirty
    }

    fn emit_synthesized(&mut self, idx: NodeIndex) {
        let tree = self.tree;
        let data = tree.data(idx);
        match data {
            NodeData::Removed => {}
            NodeData::Program { .. }
            | NodeData::VariableDeclaration { .. }
            | NodeData::Block { .. }
            | NodeData::Empty
            | NodeData::ExpressionStatement { .. }
            | NodeData::If { .. }
            | NodeData::For { .. }
            | NodeData::ForIn { .. }
            | NodeData::While { .. }
            | NodeData::DoWhile { .. }
            | NodeData::Return { .. }
            | NodeData::Throw { .. }
            | NodeData::Break { .. }
            | NodeData::Continue { .. }
            | NodeData::Try { .. }
            | NodeData::CatchClause { .. }
            | NodeData::Switch { .. }
            | NodeData::SwitchCase { .. }
            | NodeData::Labeled { .. }
            | NodeData::Debugger
            | NodeData::With { .. }
            | NodeData::Import { .. }
            | NodeData::ImportDefault { .. }
            | NodeData::ImportNamespace { .. }
            | NodeData::ImportSpecifier { .. }
            | NodeData::ExportNamed { .. }
            | NodeData::ExportSpecifier { .. }
            | NodeData::ExportDefault { .. }
            | NodeData::ExportAll { .. }
            | NodeData::Class(_)
            | NodeData::Method(_) => self.emit_statement_data(data),
            _ => self.emit_expression_data(data),
        }
    }
}
