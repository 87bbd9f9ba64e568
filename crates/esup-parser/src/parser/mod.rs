//! Recursive-descent JavaScript parser.
//!
//! `ParserState` drives a [`ScannerState`] one token at a time and pushes
//! nodes into a [`SyntaxTree`]. Parsing stops at the first syntax error.
//! Statement forms live in `statements.rs`, expressions in `expressions.rs`.

mod expressions;
mod statements;

use esup_common::limits::MAX_AST_DEPTH;
use esup_common::{SourceDocument, Span};
use esup_scanner::{ScannerSnapshot, ScannerState, SyntaxKind};
use tracing::debug;

use crate::error::ParseError;
use crate::node::{NodeData, NodeIndex};
use crate::tree::SyntaxTree;

pub type ParseResult<T> = Result<T, ParseError>;

pub(crate) const CONTEXT_FLAG_GENERATOR: u8 = 1 << 0;
pub(crate) const CONTEXT_FLAG_ASYNC: u8 = 1 << 1;
/// `in` is not a binary operator (the init clause of a `for` head).
pub(crate) const CONTEXT_FLAG_DISALLOW_IN: u8 = 1 << 2;

/// Parse a whole document. Parsing starts after the interpreter directive;
/// the program node still spans the entire text.
pub fn parse_document(document: &SourceDocument) -> Result<SyntaxTree, ParseError> {
    let mut parser = ParserState::new(document.text(), document.parse_start());
    parser.parse_program()?;
    let tree = parser.into_tree();
    debug!(nodes = tree.len(), comments = tree.comments().len(), "parsed document");
    Ok(tree)
}

/// Everything a speculative parse has to rewind.
struct ParserSnapshot {
    scanner: ScannerSnapshot,
    current_token: SyntaxKind,
    prev_token_end: u32,
    context_flags: u8,
    depth: u32,
    tree_len: usize,
}

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) current_token: SyntaxKind,
    /// End of the last consumed token; closes node spans.
    pub(crate) prev_token_end: u32,
    pub(crate) context_flags: u8,
    depth: u32,
    tree: SyntaxTree,
}

impl ParserState {
    pub fn new(text: &str, start: u32) -> ParserState {
        let mut scanner = ScannerState::new(text.to_string(), true);
        scanner.set_text_pos(start as usize);
        ParserState {
            scanner,
            current_token: SyntaxKind::Unknown,
            prev_token_end: start,
            context_flags: 0,
            depth: 0,
            tree: SyntaxTree::new(text.to_string()),
        }
    }

    pub fn into_tree(mut self) -> SyntaxTree {
        let comments = self.scanner.take_comments();
        self.tree.set_comments(comments);
        self.tree
    }

    /// Parse the program body. The program node spans the whole text so
    /// leading and trailing trivia print as part of it.
    pub fn parse_program(&mut self) -> ParseResult<NodeIndex> {
        self.next_token();
        let mut body = Vec::new();
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            body.push(self.parse_statement()?);
        }
        let end = self.tree.source().len() as u32;
        let root = self
            .tree
            .push_original(NodeData::Program { body }, Span::new(0, end));
        self.tree.set_root(root);
        Ok(root)
    }

    // =========================================================================
    // Token access
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.current_token
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    pub(crate) fn token_start(&self) -> u32 {
        self.scanner.get_token_start()
    }

    pub(crate) fn token_value(&self) -> &str {
        self.scanner.get_token_value()
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_token_end = self.scanner.get_token_end();
        self.current_token = self.scanner.scan();
        self.current_token
    }

    /// Current token is the contextual word `word` (`let`, `of`, `async`, ...).
    pub(crate) fn is_contextual(&self, word: &str) -> bool {
        self.current_token == SyntaxKind::Identifier && self.scanner.get_token_text() == word
    }

    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> ParseResult<()> {
        if self.parse_optional(kind) {
            Ok(())
        } else {
            Err(self.error(format!("'{}' expected.", kind.text())))
        }
    }

    /// Automatic semicolon insertion: a statement may end before `}`, at the
    /// end of input, or before a token on a new line.
    pub(crate) fn can_parse_semicolon(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.has_preceding_line_break()
    }

    pub(crate) fn parse_semicolon(&mut self) -> ParseResult<()> {
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return Ok(());
        }
        if self.can_parse_semicolon() {
            return Ok(());
        }
        Err(self.error("';' expected."))
    }

    // =========================================================================
    // Errors, nodes, and depth
    // =========================================================================

    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.token_start(), self.scanner.source_text())
    }

    pub(crate) fn unexpected_token(&self) -> ParseError {
        if self.is_token(SyntaxKind::EndOfFileToken) {
            return self.error("Unexpected end of input.");
        }
        if self.scanner.is_unterminated() {
            return self.error("Unterminated literal.");
        }
        self.error(format!("Unexpected token '{}'.", self.scanner.get_token_text()))
    }

    /// Push an original node spanning from `start` to the last consumed token.
    pub(crate) fn finish_node(&mut self, data: NodeData, start: u32) -> NodeIndex {
        let span = Span::new(start, self.prev_token_end.max(start));
        self.tree.push_original(data, span)
    }

    pub(crate) fn node_data(&self, idx: NodeIndex) -> &NodeData {
        self.tree.data(idx)
    }

    pub(crate) fn enter(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_AST_DEPTH {
            return Err(self.error("Maximum nesting depth exceeded."));
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }

    pub(crate) fn in_context(&self, flag: u8) -> bool {
        self.context_flags & flag != 0
    }

    /// Run `f` with the context flags replaced by `flags`.
    pub(crate) fn with_context<T>(
        &mut self,
        flags: u8,
        f: impl FnOnce(&mut ParserState) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved = self.context_flags;
        self.context_flags = flags;
        let result = f(self);
        self.context_flags = saved;
        result
    }

    /// Run `f` with `in` allowed as an operator again (inside brackets).
    pub(crate) fn allow_in<T>(
        &mut self,
        f: impl FnOnce(&mut ParserState) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let flags = self.context_flags & !CONTEXT_FLAG_DISALLOW_IN;
        self.with_context(flags, f)
    }

    // =========================================================================
    // Look-ahead
    // =========================================================================

    fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot {
            scanner: self.scanner.save_state(),
            current_token: self.current_token,
            prev_token_end: self.prev_token_end,
            context_flags: self.context_flags,
            depth: self.depth,
            tree_len: self.tree.len(),
        }
    }

    fn rewind(&mut self, snapshot: ParserSnapshot) {
        self.scanner.restore_state(snapshot.scanner);
        self.current_token = snapshot.current_token;
        self.prev_token_end = snapshot.prev_token_end;
        self.context_flags = snapshot.context_flags;
        self.depth = snapshot.depth;
        self.tree.truncate(snapshot.tree_len);
    }

    /// Run `f` and rewind to the current token afterwards.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut ParserState) -> T) -> T {
        let snapshot = self.snapshot();
        let result = f(self);
        self.rewind(snapshot);
        result
    }

    /// Run `f`; keep its result if it returns `Some`, otherwise rewind.
    pub(crate) fn try_parse<T>(
        &mut self,
        f: impl FnOnce(&mut ParserState) -> Option<T>,
    ) -> Option<T> {
        let snapshot = self.snapshot();
        let result = f(self);
        if result.is_none() {
            self.rewind(snapshot);
        }
        result
    }

    /// Look ahead to see if the next token is on the same line and is `kind`.
    pub(crate) fn look_ahead_next_is_on_same_line(&mut self, kind: SyntaxKind) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            p.is_token(kind) && !p.has_preceding_line_break()
        })
    }

    /// Look ahead to see if we have "identifier :" (labeled statement)
    pub(crate) fn look_ahead_is_labeled_statement(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            p.is_token(SyntaxKind::ColonToken)
        })
    }
}
