use esup_common::indent::{indent_before, reindent, reindent_gap};
use esup_parser::{NodeData, NodeIndex};

use super::Printer;

impl<'a> Printer<'a> {
    // =========================================================================
    // Original text
    // =========================================================================

    /// Copy a clean original node. Continuation lines move from the
    /// indentation before the node on its source line to that of the output
    /// line, unless a template literal makes the line breaks part of a value.
    pub(super) fn emit_verbatim(&mut self, idx: NodeIndex) {
        let source = self.source;
        let span = self.tree.span(idx);
        let text = span.text(source);
        let from = indent_before(source, span.start as usize);
        let to = self.writer.current_line_indent();
        if from != to && text.contains('`') {
            // Line breaks inside a template literal are part of its value.
            if matches!(self.tree.data(idx), NodeData::Template { .. }) {
                self.write(text);
            } else {
                self.emit_gap_copied(idx);
            }
            return;
        }
        if from == to {
            self.write(text);
        } else {
            self.write(&reindent(text, from, &to));
        }
    }

    /// Print an original node with rewritten descendants: the source text
    /// between its children is copied, the children are printed recursively.
    pub(super) fn emit_gap_copied(&mut self, idx: NodeIndex) {
        let tree = self.tree;
        let source = self.source;
        let span = tree.span(idx);
        let data = tree.data(idx);
        let from = indent_before(source, span.start as usize);
        let to = if matches!(data, NodeData::Template { .. }) {
            from.to_string()
        } else {
            self.writer.current_line_indent()
        };
        let limit = span.end as usize;
        let mut pos = span.start as usize;

        for child in data.children() {
            let child_span = tree.span(child);
            let start = child_span.start as usize;
            let end = child_span.end as usize;
            if start < pos {
                self.emit_child(data, child);
                pos = pos.max(end);
                continue;
            }

            if tree.is_removed(child) {
                pos = self.skip_removed(pos, start, end.min(limit), limit, from, &to);
                continue;
            }

            self.write_gap(&source[pos..start], from, &to);
            self.emit_child(data, child);
            pos = end;
        }

        if pos < limit {
            self.write_gap(&source[pos..limit], from, &to);
        }
    }

    fn write_gap(&mut self, gap: &str, from: &str, to: &str) {
        if from == to {
            self.write(gap);
        } else {
            self.write(&reindent_gap(gap, from, to));
        }
    }

    /// A child of an original node, with the context its slot needs.
    fn emit_child(&mut self, parent: &NodeData, child: NodeIndex) {
        let in_for_head = match parent {
            NodeData::For { init, .. } => *init == Some(child),
            NodeData::ForIn { left, .. } => *left == child,
            _ => false,
        };
        if in_for_head {
            self.emit_for_head_part(child);
        } else {
            self.emit(child);
        }
    }

    /// Skip a removed child spanning `start..end`. When it sat alone on its
    /// line the whole line goes with it. Returns the new source position.
    fn skip_removed(
        &mut self,
        pos: usize,
        start: usize,
        end: usize,
        limit: usize,
        from: &str,
        to: &str,
    ) -> usize {
        let source = self.source;
        let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
        let before_is_blank = source[line_start..start].trim().is_empty();
        let rest = &source[end..limit];
        let line_end = rest.find('\n').map(|i| end + i);
        let after_is_blank = source[end..line_end.unwrap_or(limit)].trim().is_empty();

        if !(before_is_blank && after_is_blank) {
            self.write_gap(&source[pos..start], from, to);
            return end + rest.len() - rest.trim_start_matches([' ', '\t']).len();
        }

        match line_end {
            // Drop the line including its newline.
            Some(newline) => {
                if line_start > pos {
                    self.write_gap(&source[pos..line_start], from, to);
                } else {
                    self.writer.trim_trailing_blanks();
                }
                newline + 1
            }
            // Last line of the parent: drop the newline that precedes it.
            None => {
                let keep_end = line_start.saturating_sub(1);
                if keep_end > pos {
                    self.write_gap(&source[pos..keep_end], from, to);
                } else {
                    self.writer.trim_trailing_blanks();
                    if line_start <= pos && self.writer.ends_with("\n") {
                        self.writer.trim_trailing_newline();
                    }
                }
                limit
            }
        }
    }
}
