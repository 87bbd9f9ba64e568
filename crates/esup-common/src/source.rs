//! Source documents and interpreter directive (`#!`) detection.
//!
//! A directive line is recognised when it is literally the first line of the
//! document, or the first line after a single leading blank line. It is never
//! handed to the parser; because the program node spans the whole document,
//! the printer re-emits it verbatim as part of the leading trivia.

use serde::Serialize;

use crate::span::Span;

/// The location of a leading `#!` line (without its line terminator).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct InterpreterDirective {
    pub span: Span,
}

/// Original input text plus its detected interpreter directive.
#[derive(Clone, Debug)]
pub struct SourceDocument {
    text: String,
    directive: Option<InterpreterDirective>,
}

impl SourceDocument {
    pub fn new(text: impl Into<String>) -> SourceDocument {
        let text = text.into();
        let directive = detect_interpreter_directive(&text);
        SourceDocument { text, directive }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn directive(&self) -> Option<InterpreterDirective> {
        self.directive
    }

    /// Byte offset where syntax begins: just past the directive line when one
    /// exists, otherwise zero.
    pub fn parse_start(&self) -> u32 {
        self.directive.map_or(0, |d| d.span.end)
    }
}

/// Detect a `#!` line at the very start or right after one leading newline.
pub fn detect_interpreter_directive(text: &str) -> Option<InterpreterDirective> {
    let offset = if text.starts_with("#!") {
        0
    } else if text.starts_with("\n#!") {
        1
    } else if text.starts_with("\r\n#!") {
        2
    } else {
        return None;
    };

    let rest = &text[offset..];
    let len = memchr::memchr2(b'\n', b'\r', rest.as_bytes()).unwrap_or(rest.len());
    Some(InterpreterDirective {
        span: Span::new(offset as u32, (offset + len) as u32),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_on_first_line() {
        let doc = SourceDocument::new("#!/usr/bin/env node\nvar x = 42;");
        let directive = doc.directive().expect("directive");
        assert_eq!(directive.span.text(doc.text()), "#!/usr/bin/env node");
        assert_eq!(doc.parse_start(), 19);
    }

    #[test]
    fn directive_after_one_blank_line() {
        let doc = SourceDocument::new("\n#!/usr/local/bin/node\nif (true) {}");
        let directive = doc.directive().expect("directive");
        assert_eq!(directive.span.text(doc.text()), "#!/usr/local/bin/node");
    }

    #[test]
    fn directive_after_two_blank_lines_is_not_recognised() {
        assert!(SourceDocument::new("\n\n#!/bin/node\n").directive().is_none());
    }

    #[test]
    fn directive_without_trailing_newline() {
        let doc = SourceDocument::new("#!/bin/node");
        assert_eq!(doc.parse_start(), doc.text().len() as u32);
    }

    #[test]
    fn no_directive() {
        let doc = SourceDocument::new("var a;");
        assert_eq!(doc.parse_start(), 0);
        assert!(doc.directive().is_none());
    }
}
