//! The syntax tree arena.
//!
//! Transforms mutate the tree in place through a small API: `replace`
//! rewrites a slot (the node keeps its index and span but becomes
//! synthesized), `alloc` creates new synthesized nodes, `detach` moves an
//! original node to a fresh index so its old slot can be rewritten, and
//! `remove` deletes a statement.

use esup_common::{CommentRange, Span};

use crate::node::{Literal, LiteralKind, Node, NodeData, NodeIndex, Origin};

#[derive(Clone, Debug)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: NodeIndex,
    source: String,
    comments: Vec<CommentRange>,
}

impl SyntaxTree {
    pub(crate) fn new(source: String) -> SyntaxTree {
        SyntaxTree {
            nodes: Vec::new(),
            root: NodeIndex(0),
            source,
            comments: Vec::new(),
        }
    }

    pub(crate) fn push_original(&mut self, data: NodeData, span: Span) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node {
            span,
            origin: Origin::Original,
            data,
        });
        idx
    }

    /// Drop nodes pushed after a speculative parse was abandoned.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    pub(crate) fn set_root(&mut self, root: NodeIndex) {
        self.root = root;
    }

    pub(crate) fn set_comments(&mut self, comments: Vec<CommentRange>) {
        self.comments = comments;
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// The original source text the tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn comments(&self) -> &[CommentRange] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: NodeIndex) -> &Node {
        &self.nodes[idx.index()]
    }

    #[inline]
    pub fn data(&self, idx: NodeIndex) -> &NodeData {
        &self.nodes[idx.index()].data
    }

    #[inline]
    pub fn span(&self, idx: NodeIndex) -> Span {
        self.nodes[idx.index()].span
    }

    /// Original source text of a node's slot.
    pub fn text(&self, idx: NodeIndex) -> &str {
        self.span(idx).text(&self.source)
    }

    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.data(idx).children()
    }

    /// Whether the node is original and nothing below it was rewritten.
    pub fn is_pristine(&self, idx: NodeIndex) -> bool {
        self.get(idx).is_original() && self.children(idx).into_iter().all(|c| self.is_pristine(c))
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Create a synthesized node occupying `span`.
    pub fn alloc(&mut self, data: NodeData, span: Span) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node {
            span,
            origin: Origin::Synthesized,
            data,
        });
        idx
    }

    /// Rewrite the node in slot `idx`. The slot keeps its span.
    pub fn replace(&mut self, idx: NodeIndex, data: NodeData) {
        let node = &mut self.nodes[idx.index()];
        node.data = data;
        node.origin = Origin::Synthesized;
    }

    /// Move the node in slot `idx` to a fresh index, keeping its origin, and
    /// return the new index. The old slot still holds a copy until it is
    /// replaced.
    pub fn detach(&mut self, idx: NodeIndex) -> NodeIndex {
        let node = self.nodes[idx.index()].clone();
        let new_idx = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(node);
        new_idx
    }

    /// Delete a node: it prints nothing.
    pub fn remove(&mut self, idx: NodeIndex) {
        self.replace(idx, NodeData::Removed);
    }

    /// Delete a statement together with the text starting at `from` (its
    /// leading comments, typically).
    pub fn remove_from(&mut self, idx: NodeIndex, from: u32) {
        let node = &mut self.nodes[idx.index()];
        node.span = Span::new(from.min(node.span.start), node.span.end);
        node.data = NodeData::Removed;
        node.origin = Origin::Synthesized;
    }

    pub fn is_removed(&self, idx: NodeIndex) -> bool {
        matches!(self.data(idx), NodeData::Removed)
    }

    // =========================================================================
    // Builders for synthesized leaves
    // =========================================================================

    pub fn alloc_identifier(&mut self, name: &str, span: Span) -> NodeIndex {
        self.alloc(
            NodeData::Identifier {
                name: name.to_string(),
            },
            span,
        )
    }

    /// A single-quoted string literal.
    pub fn alloc_string(&mut self, value: &str, span: Span) -> NodeIndex {
        let mut raw = String::with_capacity(value.len() + 2);
        raw.push('\'');
        for ch in value.chars() {
            match ch {
                '\'' => raw.push_str("\\'"),
                '\\' => raw.push_str("\\\\"),
                '\n' => raw.push_str("\\n"),
                '\r' => raw.push_str("\\r"),
                _ => raw.push(ch),
            }
        }
        raw.push('\'');
        self.alloc(
            NodeData::Literal(Literal {
                kind: LiteralKind::String,
                value: value.to_string(),
                raw,
            }),
            span,
        )
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn identifier_name(&self, idx: NodeIndex) -> Option<&str> {
        match self.data(idx) {
            NodeData::Identifier { name } => Some(name),
            _ => None,
        }
    }

    pub fn is_identifier(&self, idx: NodeIndex, expected: &str) -> bool {
        self.identifier_name(idx) == Some(expected)
    }

    /// Cooked value of a string literal.
    pub fn string_value(&self, idx: NodeIndex) -> Option<&str> {
        match self.data(idx) {
            NodeData::Literal(Literal {
                kind: LiteralKind::String,
                value,
                ..
            }) => Some(value),
            _ => None,
        }
    }

    /// Name of a non-computed property key: identifier name, or the value
    /// of a string/number literal key.
    pub fn property_key_name(&self, key: NodeIndex) -> Option<&str> {
        match self.data(key) {
            NodeData::Identifier { name } => Some(name),
            NodeData::Literal(Literal {
                kind: LiteralKind::String | LiteralKind::Number,
                value,
                ..
            }) => Some(value),
            _ => None,
        }
    }

    /// `object.name` (non-computed) → `(object, name)`.
    pub fn as_member(&self, idx: NodeIndex) -> Option<(NodeIndex, &str)> {
        match self.data(idx) {
            NodeData::Member {
                object,
                property,
                computed: false,
                optional: false,
            } => self.identifier_name(*property).map(|name| (*object, name)),
            _ => None,
        }
    }

    /// Skip any number of wrapping parentheses.
    pub fn skip_parens(&self, mut idx: NodeIndex) -> NodeIndex {
        while let NodeData::Paren { expression } = self.data(idx) {
            idx = *expression;
        }
        idx
    }

    /// Statements of a block-like node (program, block), skipping removed ones.
    pub fn live_statements(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        match self.data(idx) {
            NodeData::Program { body } | NodeData::Block { body } => body
                .iter()
                .copied()
                .filter(|s| !self.is_removed(*s))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// All nodes reachable from `from`, parents before children.
    pub fn preorder(&self, from: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(idx) = stack.pop() {
            out.push(idx);
            let mut children = self.children(idx);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Parent links for every node reachable from the root.
    pub fn parents(&self) -> Vec<Option<NodeIndex>> {
        let mut parents = vec![None; self.nodes.len()];
        for idx in self.preorder(self.root) {
            for child in self.children(idx) {
                parents[child.index()] = Some(idx);
            }
        }
        parents
    }
}

#[cfg(test)]
#[path = "tests/tree_tests.rs"]
mod tests;
