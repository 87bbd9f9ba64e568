//! The rewrite passes, one module per catalog entry.
//!
//! Every pass has the same shape: `run(tree) -> usize` finds the sites it
//! can rewrite, rewrites them in place through the tree's mutation API and
//! returns how many it rewrote. A pass that cannot prove a rewrite safe
//! leaves the site alone.

pub mod arrow_functions;
pub mod classes;
pub mod default_arguments;
pub mod export_commonjs;
pub mod import_commonjs;
pub mod let_declarations;
pub mod no_strict;
pub mod object_methods;
pub mod object_shorthands;
pub mod string_templates;

use esup_common::comments::leading_comment_start;
use esup_parser::{NodeData, NodeIndex, SyntaxTree};

use crate::catalog::TransformerName;

/// Run one transformer over `tree`.
pub fn run(name: TransformerName, tree: &mut SyntaxTree) -> usize {
    match name {
        TransformerName::Classes => classes::run(tree),
        TransformerName::StringTemplates => string_templates::run(tree),
        TransformerName::ArrowFunctions => arrow_functions::run(tree),
        TransformerName::Let => let_declarations::run(tree),
        TransformerName::DefaultArguments => default_arguments::run(tree),
        TransformerName::ObjectMethods => object_methods::run(tree),
        TransformerName::ObjectShorthands => object_shorthands::run(tree),
        TransformerName::NoStrict => no_strict::run(tree),
        TransformerName::ImportCommonjs => import_commonjs::run(tree),
        TransformerName::ExportCommonjs => export_commonjs::run(tree),
    }
}

/// All nodes matching `pred`, parents first.
pub(crate) fn find_all(tree: &SyntaxTree, pred: impl Fn(&NodeData) -> bool) -> Vec<NodeIndex> {
    tree.preorder(tree.root())
        .into_iter()
        .filter(|idx| pred(tree.data(*idx)))
        .collect()
}

/// Where the comments leading `stmt` begin, without crossing the end of the
/// previous statement in `list` (or the start of the list node).
pub(crate) fn statement_comment_start(tree: &SyntaxTree, list: NodeIndex, stmt: NodeIndex) -> u32 {
    let body = match tree.data(list) {
        NodeData::Program { body } | NodeData::Block { body } => body.as_slice(),
        _ => &[],
    };
    let stmt_start = tree.span(stmt).start;
    let floor = body
        .iter()
        .map(|s| tree.span(*s))
        .filter(|span| span.end <= stmt_start)
        .map(|span| span.end)
        .max()
        .unwrap_or(tree.span(list).start);
    leading_comment_start(tree.source(), tree.comments(), floor, stmt_start)
}

/// `expr;` → `expr`.
pub(crate) fn statement_expression(tree: &SyntaxTree, stmt: NodeIndex) -> Option<NodeIndex> {
    match tree.data(stmt) {
        NodeData::ExpressionStatement { expression } => Some(*expression),
        _ => None,
    }
}

/// `left = right` with a plain `=`.
pub(crate) fn simple_assignment(tree: &SyntaxTree, idx: NodeIndex) -> Option<(NodeIndex, NodeIndex)> {
    match tree.data(idx) {
        NodeData::Assignment {
            operator: esup_scanner::SyntaxKind::EqualsToken,
            left,
            right,
        } => Some((*left, *right)),
        _ => None,
    }
}
