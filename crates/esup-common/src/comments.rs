//! Comment Preservation
//!
//! Comments are not part of the syntax tree. The scanner records their
//! ranges while skipping trivia, and the printer copies them as part of the
//! original text between nodes. Transforms that move a statement use these
//! ranges to carry its leading comments along.

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// A range representing a comment in the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRange {
    /// Start position (byte offset)
    pub pos: u32,
    /// End position (byte offset)
    pub end: u32,
    /// Whether this is a multi-line comment
    pub is_multi_line: bool,
    /// Whether this comment has a trailing newline
    pub has_trailing_new_line: bool,
}

impl CommentRange {
    pub fn new(pos: u32, end: u32, is_multi_line: bool, has_trailing_new_line: bool) -> Self {
        CommentRange {
            pos,
            end,
            is_multi_line,
            has_trailing_new_line,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.pos, self.end)
    }

    /// Get the comment text from source.
    pub fn get_text<'a>(&self, source: &'a str) -> &'a str {
        self.span().text(source)
    }
}

/// Check if a comment is a JSDoc comment.
pub fn is_jsdoc_comment(comment: &CommentRange, source: &str) -> bool {
    let text = comment.get_text(source);
    text.starts_with("/**") && !text.starts_with("/***")
}

/// Find where the comments leading up to `pos` begin.
///
/// Walks backwards over comments that are separated from `pos` (and from
/// each other) by whitespace only, never crossing `floor`. A comment that
/// shares its line with earlier code is a trailing comment of that code and
/// stops the walk. Returns `pos` when there are no leading comments.
///
/// `comments` must be sorted by position, as the scanner produces them.
pub fn leading_comment_start(source: &str, comments: &[CommentRange], floor: u32, pos: u32) -> u32 {
    let idx = comments.partition_point(|c| c.end <= pos);
    let mut start = pos;

    for comment in comments[..idx].iter().rev() {
        if comment.pos < floor {
            break;
        }
        let between = Span::new(comment.end, start).text(source);
        if !between.chars().all(char::is_whitespace) {
            break;
        }
        let line_start = source[..comment.pos as usize]
            .rfind('\n')
            .map_or(0, |i| i + 1);
        let before = &source[line_start..comment.pos as usize];
        if (line_start as u32) < floor || !before.trim().is_empty() {
            break;
        }
        start = comment.pos;
    }

    start
}

#[cfg(test)]
#[path = "tests/comments.rs"]
mod tests;
