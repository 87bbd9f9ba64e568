//! Output buffer for the printer.
//!
//! Copied source text brings its own newlines and indentation, so the
//! writer does not indent lazily: `write_line` emits the newline and the
//! current indentation at once, and `sync_indent` re-reads the indentation
//! from whatever line the output is on.

use esup_common::indent::trailing_line_indent;

pub struct SourceWriter {
    output: String,
    indent: String,
    indent_unit: String,
}

impl SourceWriter {
    pub fn new(capacity: usize, indent_unit: impl Into<String>) -> SourceWriter {
        SourceWriter {
            output: String::with_capacity(capacity),
            indent: String::new(),
            indent_unit: indent_unit.into(),
        }
    }

    pub fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub fn write_char(&mut self, ch: char) {
        self.output.push(ch);
    }

    pub fn write_space(&mut self) {
        self.output.push(' ');
    }

    /// Newline followed by the current indentation.
    pub fn write_line(&mut self) {
        self.output.push('\n');
        self.output.push_str(&self.indent);
    }

    /// Newline without indentation (blank separator lines).
    pub fn write_raw_line(&mut self) {
        self.output.push('\n');
    }

    pub fn increase_indent(&mut self) {
        self.indent.push_str(&self.indent_unit);
    }

    pub fn decrease_indent(&mut self) {
        let len = self.indent.len().saturating_sub(self.indent_unit.len());
        self.indent.truncate(len);
    }

    /// Adopt the indentation of the line being written. Returns the previous
    /// indentation for `restore_indent`.
    pub fn sync_indent(&mut self) -> String {
        let current = self.current_line_indent();
        std::mem::replace(&mut self.indent, current)
    }

    pub fn restore_indent(&mut self, indent: String) {
        self.indent = indent;
    }

    /// Leading whitespace of the line the output currently ends on.
    pub fn current_line_indent(&self) -> String {
        trailing_line_indent(&self.output).to_string()
    }

    /// Drop spaces and tabs at the end of the output.
    pub fn trim_trailing_blanks(&mut self) {
        let len = self.output.trim_end_matches([' ', '\t']).len();
        self.output.truncate(len);
    }

    pub fn trim_trailing_newline(&mut self) {
        if self.output.ends_with("\r\n") {
            self.output.truncate(self.output.len() - 2);
        } else if self.output.ends_with('\n') {
            self.output.pop();
        }
    }

    pub fn ends_with(&self, text: &str) -> bool {
        self.output.ends_with(text)
    }

    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn get_output(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_line_uses_current_indent() {
        let mut writer = SourceWriter::new(16, "  ");
        writer.write("{");
        writer.increase_indent();
        writer.write_line();
        writer.write("a;");
        writer.decrease_indent();
        writer.write_line();
        writer.write("}");
        assert_eq!(writer.get_output(), "{\n  a;\n}");
    }

    #[test]
    fn sync_indent_follows_copied_text() {
        let mut writer = SourceWriter::new(16, "\t");
        writer.write("if (a) {\n\t\tfoo ");
        let saved = writer.sync_indent();
        writer.increase_indent();
        writer.write_line();
        writer.write("x");
        writer.restore_indent(saved);
        assert_eq!(writer.get_output(), "if (a) {\n\t\tfoo \n\t\t\tx");
    }
}
