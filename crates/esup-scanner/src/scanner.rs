//! Scanner state machine.
//!
//! The scanner is driven by the parser one token at a time. Tokens whose
//! meaning depends on syntactic context are re-scanned on request:
//! `/` and `/=` become a regular expression literal via
//! [`ScannerState::re_scan_slash_token`], and a `}` that closes a template
//! substitution continues the template via
//! [`ScannerState::re_scan_template_token`].

use esup_common::CommentRange;

use crate::char_codes::{
    is_identifier_part, is_identifier_start, is_line_break, is_white_space_single_line,
};
use crate::syntax_kind::SyntaxKind;

/// Flags describing the current token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum TokenFlags {
    None = 0,
    PrecedingLineBreak = 1 << 0,
    Unterminated = 1 << 1,
}

/// Everything needed to rewind the scanner for look-ahead.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    full_start: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: u32,
}

/// Tokenizer over an owned source text.
pub struct ScannerState {
    source: String,
    pos: usize,
    end: usize,
    full_start: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: u32,
    skip_trivia: bool,
    comments: Vec<CommentRange>,
}

impl ScannerState {
    pub fn new(source: String, skip_trivia: bool) -> ScannerState {
        let end = source.len();
        ScannerState {
            source,
            pos: 0,
            end,
            full_start: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: 0,
            skip_trivia,
            comments: Vec::new(),
        }
    }

    /// Start scanning at `pos` (used to step over an interpreter directive).
    pub fn set_text_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.end);
        self.full_start = self.pos;
        self.token_start = self.pos;
    }

    pub fn source_text(&self) -> &str {
        &self.source
    }

    pub fn into_source(self) -> String {
        self.source
    }

    pub fn get_token(&self) -> SyntaxKind {
        self.token
    }

    /// Start of the current token, excluding leading trivia.
    pub fn get_token_start(&self) -> u32 {
        self.token_start as u32
    }

    /// Start of the current token, including leading trivia.
    pub fn get_token_full_start(&self) -> u32 {
        self.full_start as u32
    }

    pub fn get_token_end(&self) -> u32 {
        self.pos as u32
    }

    /// Cooked value: identifier name, string contents with escapes resolved,
    /// or the raw text of template parts and other literals.
    pub fn get_token_value(&self) -> &str {
        &self.token_value
    }

    /// Raw source text of the current token.
    pub fn get_token_text(&self) -> &str {
        &self.source[self.token_start..self.pos]
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags & TokenFlags::PrecedingLineBreak as u32 != 0
    }

    pub fn is_unterminated(&self) -> bool {
        self.token_flags & TokenFlags::Unterminated as u32 != 0
    }

    /// Comments collected so far, sorted by position.
    pub fn comments(&self) -> &[CommentRange] {
        &self.comments
    }

    pub fn take_comments(&mut self) -> Vec<CommentRange> {
        std::mem::take(&mut self.comments)
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            full_start: self.full_start,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.full_start = snapshot.full_start;
        self.token_start = snapshot.token_start;
        self.token = snapshot.token;
        self.token_value = snapshot.token_value;
        self.token_flags = snapshot.token_flags;
    }

    #[inline]
    fn char_at(&self, pos: usize) -> Option<char> {
        self.source.get(pos..).and_then(|s| s.chars().next())
    }

    #[inline]
    fn byte_at(&self, pos: usize) -> u8 {
        self.source.as_bytes().get(pos).copied().unwrap_or(0)
    }

    fn record_comment(&mut self, start: usize, end: usize, is_multi_line: bool) {
        // Look-ahead re-scans trivia; keep each comment once.
        if self.comments.last().is_some_and(|c| c.pos as usize >= start) {
            return;
        }
        let has_trailing_new_line = self.char_at(end).is_some_and(is_line_break);
        self.comments.push(CommentRange::new(
            start as u32,
            end as u32,
            is_multi_line,
            has_trailing_new_line,
        ));
    }

    fn finish(&mut self, kind: SyntaxKind, len: usize) -> SyntaxKind {
        self.pos += len;
        self.token = kind;
        kind
    }

    /// Scan the next token.
    pub fn scan(&mut self) -> SyntaxKind {
        self.full_start = self.pos;
        self.token_flags = 0;
        self.token_value.clear();

        loop {
            self.token_start = self.pos;
            let Some(ch) = self.char_at(self.pos) else {
                self.token = SyntaxKind::EndOfFileToken;
                return self.token;
            };

            if is_line_break(ch) {
                self.token_flags |= TokenFlags::PrecedingLineBreak as u32;
                self.pos += ch.len_utf8();
                continue;
            }
            if is_white_space_single_line(ch) {
                self.pos += ch.len_utf8();
                continue;
            }

            if ch == '/' {
                match self.byte_at(self.pos + 1) {
                    b'/' => {
                        let start = self.pos;
                        self.pos += 2;
                        while let Some(c) = self.char_at(self.pos) {
                            if is_line_break(c) {
                                break;
                            }
                            self.pos += c.len_utf8();
                        }
                        if self.skip_trivia {
                            self.record_comment(start, self.pos, false);
                            continue;
                        }
                        self.token = SyntaxKind::Unknown;
                        return self.token;
                    }
                    b'*' => {
                        let start = self.pos;
                        self.pos += 2;
                        let mut closed = false;
                        while let Some(c) = self.char_at(self.pos) {
                            if c == '*' && self.byte_at(self.pos + 1) == b'/' {
                                self.pos += 2;
                                closed = true;
                                break;
                            }
                            if is_line_break(c) {
                                self.token_flags |= TokenFlags::PrecedingLineBreak as u32;
                            }
                            self.pos += c.len_utf8();
                        }
                        if !closed {
                            self.token_flags |= TokenFlags::Unterminated as u32;
                        }
                        if self.skip_trivia {
                            self.record_comment(start, self.pos, true);
                            continue;
                        }
                        self.token = SyntaxKind::Unknown;
                        return self.token;
                    }
                    _ => {}
                }
            }

            return self.scan_token(ch);
        }
    }

    fn scan_token(&mut self, ch: char) -> SyntaxKind {
        let b1 = self.byte_at(self.pos + 1);
        let b2 = self.byte_at(self.pos + 2);
        let b3 = self.byte_at(self.pos + 3);

        match ch {
            '{' => self.finish(SyntaxKind::OpenBraceToken, 1),
            '}' => self.finish(SyntaxKind::CloseBraceToken, 1),
            '(' => self.finish(SyntaxKind::OpenParenToken, 1),
            ')' => self.finish(SyntaxKind::CloseParenToken, 1),
            '[' => self.finish(SyntaxKind::OpenBracketToken, 1),
            ']' => self.finish(SyntaxKind::CloseBracketToken, 1),
            ';' => self.finish(SyntaxKind::SemicolonToken, 1),
            ',' => self.finish(SyntaxKind::CommaToken, 1),
            ':' => self.finish(SyntaxKind::ColonToken, 1),
            '~' => self.finish(SyntaxKind::TildeToken, 1),
            '@' => self.finish(SyntaxKind::AtToken, 1),
            '.' => {
                if b1.is_ascii_digit() {
                    self.scan_number()
                } else if b1 == b'.' && b2 == b'.' {
                    self.finish(SyntaxKind::DotDotDotToken, 3)
                } else {
                    self.finish(SyntaxKind::DotToken, 1)
                }
            }
            '?' => match (b1, b2) {
                (b'?', b'=') => self.finish(SyntaxKind::QuestionQuestionEqualsToken, 3),
                (b'?', _) => self.finish(SyntaxKind::QuestionQuestionToken, 2),
                (b'.', d) if !d.is_ascii_digit() => self.finish(SyntaxKind::QuestionDotToken, 2),
                _ => self.finish(SyntaxKind::QuestionToken, 1),
            },
            '=' => match (b1, b2) {
                (b'=', b'=') => self.finish(SyntaxKind::EqualsEqualsEqualsToken, 3),
                (b'=', _) => self.finish(SyntaxKind::EqualsEqualsToken, 2),
                (b'>', _) => self.finish(SyntaxKind::EqualsGreaterThanToken, 2),
                _ => self.finish(SyntaxKind::EqualsToken, 1),
            },
            '!' => match (b1, b2) {
                (b'=', b'=') => self.finish(SyntaxKind::ExclamationEqualsEqualsToken, 3),
                (b'=', _) => self.finish(SyntaxKind::ExclamationEqualsToken, 2),
                _ => self.finish(SyntaxKind::ExclamationToken, 1),
            },
            '+' => match b1 {
                b'+' => self.finish(SyntaxKind::PlusPlusToken, 2),
                b'=' => self.finish(SyntaxKind::PlusEqualsToken, 2),
                _ => self.finish(SyntaxKind::PlusToken, 1),
            },
            '-' => match b1 {
                b'-' => self.finish(SyntaxKind::MinusMinusToken, 2),
                b'=' => self.finish(SyntaxKind::MinusEqualsToken, 2),
                _ => self.finish(SyntaxKind::MinusToken, 1),
            },
            '*' => match (b1, b2) {
                (b'*', b'=') => self.finish(SyntaxKind::AsteriskAsteriskEqualsToken, 3),
                (b'*', _) => self.finish(SyntaxKind::AsteriskAsteriskToken, 2),
                (b'=', _) => self.finish(SyntaxKind::AsteriskEqualsToken, 2),
                _ => self.finish(SyntaxKind::AsteriskToken, 1),
            },
            '/' => match b1 {
                b'=' => self.finish(SyntaxKind::SlashEqualsToken, 2),
                _ => self.finish(SyntaxKind::SlashToken, 1),
            },
            '%' => match b1 {
                b'=' => self.finish(SyntaxKind::PercentEqualsToken, 2),
                _ => self.finish(SyntaxKind::PercentToken, 1),
            },
            '<' => match (b1, b2) {
                (b'<', b'=') => self.finish(SyntaxKind::LessThanLessThanEqualsToken, 3),
                (b'<', _) => self.finish(SyntaxKind::LessThanLessThanToken, 2),
                (b'=', _) => self.finish(SyntaxKind::LessThanEqualsToken, 2),
                _ => self.finish(SyntaxKind::LessThanToken, 1),
            },
            '>' => match (b1, b2, b3) {
                (b'>', b'>', b'=') => {
                    self.finish(SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken, 4)
                }
                (b'>', b'>', _) => self.finish(SyntaxKind::GreaterThanGreaterThanGreaterThanToken, 3),
                (b'>', b'=', _) => self.finish(SyntaxKind::GreaterThanGreaterThanEqualsToken, 3),
                (b'>', _, _) => self.finish(SyntaxKind::GreaterThanGreaterThanToken, 2),
                (b'=', _, _) => self.finish(SyntaxKind::GreaterThanEqualsToken, 2),
                _ => self.finish(SyntaxKind::GreaterThanToken, 1),
            },
            '&' => match (b1, b2) {
                (b'&', b'=') => self.finish(SyntaxKind::AmpersandAmpersandEqualsToken, 3),
                (b'&', _) => self.finish(SyntaxKind::AmpersandAmpersandToken, 2),
                (b'=', _) => self.finish(SyntaxKind::AmpersandEqualsToken, 2),
                _ => self.finish(SyntaxKind::AmpersandToken, 1),
            },
            '|' => match (b1, b2) {
                (b'|', b'=') => self.finish(SyntaxKind::BarBarEqualsToken, 3),
                (b'|', _) => self.finish(SyntaxKind::BarBarToken, 2),
                (b'=', _) => self.finish(SyntaxKind::BarEqualsToken, 2),
                _ => self.finish(SyntaxKind::BarToken, 1),
            },
            '^' => match b1 {
                b'=' => self.finish(SyntaxKind::CaretEqualsToken, 2),
                _ => self.finish(SyntaxKind::CaretToken, 1),
            },
            '"' | '\'' => self.scan_string(ch),
            '`' => {
                self.pos += 1;
                self.scan_template(true)
            }
            '0'..='9' => self.scan_number(),
            _ if is_identifier_start(ch) || ch == '\\' => self.scan_identifier(),
            _ => self.finish(SyntaxKind::Unknown, ch.len_utf8()),
        }
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        let mut escaped = false;
        while let Some(c) = self.char_at(self.pos) {
            if c == '\\' && self.byte_at(self.pos + 1) == b'u' {
                escaped = true;
                self.pos += 2;
                if self.byte_at(self.pos) == b'{' {
                    while self.pos < self.end && self.byte_at(self.pos) != b'}' {
                        self.pos += 1;
                    }
                    self.pos += 1;
                } else {
                    self.pos += 4;
                }
                continue;
            }
            if !is_identifier_part(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        if self.pos == start {
            return self.finish(SyntaxKind::Unknown, 1);
        }
        self.pos = self.pos.min(self.end);
        self.token_value = self.source[start..self.pos].to_string();
        self.token = if escaped {
            SyntaxKind::Identifier
        } else {
            SyntaxKind::keyword_from_str(&self.token_value).unwrap_or(SyntaxKind::Identifier)
        };
        self.token
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let radix_prefix = self.byte_at(self.pos) == b'0'
            && matches!(
                self.byte_at(self.pos + 1),
                b'x' | b'X' | b'o' | b'O' | b'b' | b'B'
            );

        if radix_prefix {
            self.pos += 2;
            while self.byte_at(self.pos).is_ascii_hexdigit() || self.byte_at(self.pos) == b'_' {
                self.pos += 1;
            }
        } else {
            while self.byte_at(self.pos).is_ascii_digit() || self.byte_at(self.pos) == b'_' {
                self.pos += 1;
            }
            if self.byte_at(self.pos) == b'.' {
                self.pos += 1;
                while self.byte_at(self.pos).is_ascii_digit() || self.byte_at(self.pos) == b'_' {
                    self.pos += 1;
                }
            }
            if matches!(self.byte_at(self.pos), b'e' | b'E') {
                let mut p = self.pos + 1;
                if matches!(self.byte_at(p), b'+' | b'-') {
                    p += 1;
                }
                if self.byte_at(p).is_ascii_digit() {
                    self.pos = p;
                    while self.byte_at(self.pos).is_ascii_digit() {
                        self.pos += 1;
                    }
                }
            }
        }

        let kind = if self.byte_at(self.pos) == b'n' {
            self.pos += 1;
            SyntaxKind::BigIntLiteral
        } else {
            SyntaxKind::NumericLiteral
        };
        self.token_value = self.source[start..self.pos].to_string();
        self.token = kind;
        kind
    }

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        self.pos += 1;
        let mut value = String::new();
        loop {
            let Some(c) = self.char_at(self.pos) else {
                self.token_flags |= TokenFlags::Unterminated as u32;
                break;
            };
            if c == quote {
                self.pos += 1;
                break;
            }
            if is_line_break(c) && c != '\u{2028}' && c != '\u{2029}' {
                self.token_flags |= TokenFlags::Unterminated as u32;
                break;
            }
            if c == '\\' {
                self.pos += 1;
                self.scan_escape(&mut value);
                continue;
            }
            value.push(c);
            self.pos += c.len_utf8();
        }
        self.token_value = value;
        self.token = SyntaxKind::StringLiteral;
        self.token
    }

    /// Decode one escape sequence (the backslash is already consumed).
    fn scan_escape(&mut self, out: &mut String) {
        let Some(c) = self.char_at(self.pos) else {
            return;
        };
        self.pos += c.len_utf8();
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            '0' if !self.byte_at(self.pos).is_ascii_digit() => out.push('\0'),
            'x' => {
                let hex = self.source.get(self.pos..self.pos + 2).unwrap_or("");
                if let Some(ch) = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
                    out.push(ch);
                    self.pos += 2;
                }
            }
            'u' => {
                let (hex, len) = if self.byte_at(self.pos) == b'{' {
                    let close = self.source[self.pos..].find('}').unwrap_or(0);
                    (self.source.get(self.pos + 1..self.pos + close).unwrap_or(""), close + 1)
                } else {
                    (self.source.get(self.pos..self.pos + 4).unwrap_or(""), 4)
                };
                if let Some(ch) = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
                    out.push(ch);
                    self.pos += len;
                }
            }
            '\r' => {
                if self.byte_at(self.pos) == b'\n' {
                    self.pos += 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }

    /// Scan template characters up to the next `${` or closing backtick.
    /// `self.pos` is just past the opening backtick or closing brace.
    fn scan_template(&mut self, starts_with_backtick: bool) -> SyntaxKind {
        let content_start = self.pos;
        let kind = loop {
            let Some(c) = self.char_at(self.pos) else {
                self.token_flags |= TokenFlags::Unterminated as u32;
                break if starts_with_backtick {
                    SyntaxKind::NoSubstitutionTemplateLiteral
                } else {
                    SyntaxKind::TemplateTail
                };
            };
            if c == '`' {
                self.token_value = self.source[content_start..self.pos].to_string();
                self.pos += 1;
                break if starts_with_backtick {
                    SyntaxKind::NoSubstitutionTemplateLiteral
                } else {
                    SyntaxKind::TemplateTail
                };
            }
            if c == '$' && self.byte_at(self.pos + 1) == b'{' {
                self.token_value = self.source[content_start..self.pos].to_string();
                self.pos += 2;
                break if starts_with_backtick {
                    SyntaxKind::TemplateHead
                } else {
                    SyntaxKind::TemplateMiddle
                };
            }
            if c == '\\' {
                self.pos += 1;
                if let Some(next) = self.char_at(self.pos) {
                    self.pos += next.len_utf8();
                }
                continue;
            }
            self.pos += c.len_utf8();
        };
        if self.is_unterminated() {
            self.token_value = self.source[content_start..self.pos].to_string();
        }
        self.token = kind;
        kind
    }

    /// Re-scan the current `}` token as the continuation of a template.
    pub fn re_scan_template_token(&mut self) -> SyntaxKind {
        self.pos = self.token_start + 1;
        self.token_value.clear();
        self.scan_template(false)
    }

    /// Re-scan the current `/` or `/=` token as a regular expression literal.
    pub fn re_scan_slash_token(&mut self) -> SyntaxKind {
        if !matches!(self.token, SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken) {
            return self.token;
        }
        let mut p = self.token_start + 1;
        let mut in_class = false;
        loop {
            let Some(c) = self.char_at(p) else {
                self.token_flags |= TokenFlags::Unterminated as u32;
                break;
            };
            if is_line_break(c) {
                self.token_flags |= TokenFlags::Unterminated as u32;
                break;
            }
            p += c.len_utf8();
            match c {
                '\\' => {
                    if let Some(next) = self.char_at(p) {
                        p += next.len_utf8();
                    }
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
        }
        while let Some(c) = self.char_at(p) {
            if !is_identifier_part(c) {
                break;
            }
            p += c.len_utf8();
        }
        self.pos = p;
        self.token_value = self.source[self.token_start..p].to_string();
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod tests;
