//! Indentation helpers.
//!
//! Synthesized code never hard-codes indentation: the printer takes the
//! indentation of the line it is writing on, the unit inferred from the
//! source, and re-indents original text that moves to a different depth.

use crate::limits::DEFAULT_INDENT_UNIT;

/// Leading whitespace of the line containing byte offset `pos`.
pub fn line_indent(text: &str, pos: usize) -> &str {
    let pos = pos.min(text.len());
    let line_start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    let line = &text[line_start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

/// Leading whitespace of the line containing `pos`, up to `pos` only.
///
/// A node that starts inside the leading whitespace of its line (the
/// document root, at offset 0) carries the rest of that whitespace in its
/// own text, so only what precedes it counts as context.
pub fn indent_before(text: &str, pos: usize) -> &str {
    let pos = pos.min(text.len());
    line_indent(&text[..pos], pos)
}

/// Leading whitespace of the last line of `text`, when that line holds
/// nothing else yet. Used to learn the indentation the printer is currently
/// writing at.
pub fn trailing_line_indent(text: &str) -> &str {
    let line_start = text.rfind('\n').map_or(0, |i| i + 1);
    let line = &text[line_start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

/// Infer the indentation unit of a document: the smallest non-empty leading
/// whitespace of any code line. Tabs win when the first indented line uses a
/// tab. Continuation lines of block comments (` * ...`) are ignored.
pub fn infer_indent_unit(text: &str) -> String {
    let mut smallest: Option<&str> = None;

    for line in text.lines() {
        let rest = line.trim_start_matches([' ', '\t']);
        if rest.is_empty() || rest.starts_with('*') {
            continue;
        }
        let indent = &line[..line.len() - rest.len()];
        if indent.is_empty() {
            continue;
        }
        if indent.starts_with('\t') {
            return "\t".to_string();
        }
        if smallest.is_none_or(|s| indent.len() < s.len()) {
            smallest = Some(indent);
        }
    }

    smallest.unwrap_or(DEFAULT_INDENT_UNIT).to_string()
}

/// Move every line after the first from indentation `from` to `to`.
///
/// Lines that do not start with `from` (blank lines, or lines less indented
/// than the original context) are left untouched.
pub fn reindent(text: &str, from: &str, to: &str) -> String {
    if from == to || !text.contains('\n') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + 16);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.trim().is_empty() {
                if let Some(rest) = line.strip_prefix(from) {
                    out.push_str(to);
                    out.push_str(rest);
                    continue;
                }
            }
        }
        out.push_str(line);
    }
    out
}

/// Shift the text found between two nodes from indentation `from` to `to`.
///
/// Unlike [`reindent`], the last line is shifted even when it holds only
/// whitespace: it is the indentation of whatever is printed next.
pub fn reindent_gap(text: &str, from: &str, to: &str) -> String {
    if from == to || !text.contains('\n') {
        return text.to_string();
    }

    let last = text.matches('\n').count();
    let mut out = String::with_capacity(text.len() + 16);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            if i == last || !line.trim().is_empty() {
                if let Some(rest) = line.strip_prefix(from) {
                    out.push_str(to);
                    out.push_str(rest);
                    continue;
                }
            }
        }
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_indent_of_nested_line() {
        let text = "if (a) {\n    b();\n}";
        let pos = text.find("b()").unwrap();
        assert_eq!(line_indent(text, pos), "    ");
        assert_eq!(line_indent(text, 0), "");
    }

    #[test]
    fn indent_before_stops_at_position() {
        let text = "  a;\n  b;";
        assert_eq!(indent_before(text, 0), "");
        assert_eq!(indent_before(text, 1), " ");
        assert_eq!(indent_before(text, 2), "  ");
        let pos = text.find('b').unwrap();
        assert_eq!(indent_before(text, pos), "  ");
    }

    #[test]
    fn trailing_indent_of_output() {
        assert_eq!(trailing_line_indent("x\n  "), "  ");
        assert_eq!(trailing_line_indent("x\n  foo"), "  ");
        assert_eq!(trailing_line_indent(""), "");
    }

    #[test]
    fn infer_unit_from_smallest_indent() {
        assert_eq!(infer_indent_unit("a {\n    b {\n        c\n    }\n}"), "    ");
        assert_eq!(infer_indent_unit("a {\n\tb\n}"), "\t");
        assert_eq!(infer_indent_unit("/**\n * doc\n */\nx"), "  ");
    }

    #[test]
    fn reindent_shifts_continuation_lines() {
        let body = "{\n  this.a = a;\n\n  this.b = b;\n}";
        assert_eq!(
            reindent(body, "", "  "),
            "{\n    this.a = a;\n\n    this.b = b;\n  }"
        );
        assert_eq!(reindent(body, "  ", "  "), body);
    }

    #[test]
    fn reindent_dedents() {
        let body = "{\n      x();\n    }";
        assert_eq!(reindent(body, "    ", "  "), "{\n    x();\n  }");
    }

    #[test]
    fn reindent_gap_shifts_trailing_indentation() {
        assert_eq!(reindent_gap(" {\n", "", "  "), " {\n  ");
        assert_eq!(reindent_gap(";\n\n  ", "  ", "    "), ";\n\n    ");
        assert_eq!(reindent_gap("\n}", "", "  "), "\n  }");
        assert_eq!(reindent_gap(", ", "", "  "), ", ");
    }
}
