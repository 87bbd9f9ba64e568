use esup_common::LineMap;
use thiserror::Error;

/// The first syntax error found in a document.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message} ({line}:{column})")]
pub struct ParseError {
    pub message: String,
    /// Byte offset of the offending token.
    pub pos: u32,
    /// 1-based line of `pos`.
    pub line: u32,
    /// 1-based column of `pos`, in UTF-16 code units.
    pub column: u32,
}

impl ParseError {
    pub fn new(message: impl Into<String>, pos: u32, source: &str) -> ParseError {
        let position = LineMap::build(source).offset_to_position(pos, source);
        ParseError {
            message: message.into(),
            pos,
            line: position.line + 1,
            column: position.character + 1,
        }
    }
}
