use esup_common::Span;
use esup_common::indent::{line_indent, reindent};
use esup_parser::{NodeData, NodeIndex};

use super::Printer;

impl<'a> Printer<'a> {
    // =========================================================================
    // Output Helpers (delegate to SourceWriter)
    // =========================================================================

    pub(super) fn write(&mut self, text: &str) {
        self.writer.write(text);
    }

    pub(super) fn write_char(&mut self, ch: char) {
        self.writer.write_char(ch);
    }

    pub(super) fn write_line(&mut self) {
        self.writer.write_line();
    }

    pub(super) fn write_space(&mut self) {
        self.writer.write_space();
    }

    pub(super) fn write_semicolon(&mut self) {
        self.writer.write_char(';');
    }

    pub(super) fn increase_indent(&mut self) {
        self.writer.increase_indent();
    }

    pub(super) fn decrease_indent(&mut self) {
        self.writer.decrease_indent();
    }

    // =========================================================================
    // Lists and bodies
    // =========================================================================

    pub(super) fn emit_comma_separated(&mut self, nodes: &[NodeIndex]) {
        let mut first = true;
        for &idx in nodes {
            if self.tree.is_removed(idx) {
                continue;
            }
            if !first {
                self.write(", ");
            }
            first = false;
            self.emit(idx);
        }
    }

    /// `{`, one statement per line one level deeper, `}`. Levels are
    /// relative to the line the brace opens on.
    pub(super) fn emit_braced_statements(&mut self, statements: &[NodeIndex]) {
        let live: Vec<NodeIndex> = statements
            .iter()
            .copied()
            .filter(|s| !self.tree.is_removed(*s))
            .collect();
        if live.is_empty() {
            self.write("{}");
            return;
        }

        let saved = self.writer.sync_indent();
        self.write("{");
        self.increase_indent();
        for stmt in live {
            self.write_line();
            self.emit(stmt);
        }
        self.decrease_indent();
        self.write_line();
        self.write("}");
        self.writer.restore_indent(saved);
    }

    /// Class bodies: members separated by a blank line.
    pub(super) fn emit_class_members(&mut self, members: &[NodeIndex]) {
        let live: Vec<NodeIndex> = members
            .iter()
            .copied()
            .filter(|m| !self.tree.is_removed(*m))
            .collect();
        if live.is_empty() {
            self.write("{}");
            return;
        }

        let saved = self.writer.sync_indent();
        self.write("{");
        self.increase_indent();
        for (i, member) in live.into_iter().enumerate() {
            if i > 0 {
                self.writer.write_raw_line();
            }
            self.write_line();
            self.emit(member);
        }
        self.decrease_indent();
        self.write_line();
        self.write("}");
        self.writer.restore_indent(saved);
    }

    /// Comments moved along with a node, followed by a line break at the
    /// current indentation.
    pub(super) fn emit_moved_comments(&mut self, span: Span) {
        let source = self.source;
        let text = span.text(source).trim_end();
        if text.is_empty() {
            return;
        }
        let from = line_indent(source, span.start as usize);
        let to = self.writer.current_line_indent();
        self.write(&reindent(text, from, &to));
        self.write_line();
    }

    /// The init of a `for` or the left side of `for-in`/`for-of`: a
    /// declaration here takes no semicolon.
    pub(super) fn emit_for_head_part(&mut self, idx: NodeIndex) {
        let tree = self.tree;
        match tree.data(idx) {
            NodeData::VariableDeclaration {
                keyword,
                declarators,
            } if !tree.get(idx).is_original() => {
                self.emit_declaration_list(*keyword, declarators);
            }
            _ => self.emit(idx),
        }
    }

    /// Body of an `if`/loop/label: blocks stay on the header line.
    pub(super) fn emit_embedded_statement(&mut self, idx: NodeIndex) {
        self.write_space();
        self.emit(idx);
    }
}
