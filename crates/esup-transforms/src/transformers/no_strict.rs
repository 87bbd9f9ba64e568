//! `noStrict`: drop `"use strict"` directives.
//!
//! Module and class code is strict already. Only directive prologues are
//! searched: the leading string-literal statements of the program and of
//! function bodies.

use esup_parser::{LiteralKind, NodeData, NodeIndex, SyntaxTree};

use super::find_all;

pub fn run(tree: &mut SyntaxTree) -> usize {
    let mut bodies = vec![tree.root()];
    for idx in find_all(tree, |data| {
        matches!(
            data,
            NodeData::Function(_) | NodeData::Method(_) | NodeData::Arrow { .. }
        )
    }) {
        let body = match tree.data(idx) {
            NodeData::Function(function) => function.body,
            NodeData::Method(method) => method.body,
            NodeData::Arrow { body, .. } => *body,
            _ => continue,
        };
        if matches!(tree.data(body), NodeData::Block { .. }) {
            bodies.push(body);
        }
    }

    let mut removed = 0;
    for body in bodies {
        for stmt in tree.live_statements(body) {
            let Some(raw) = directive_text(tree, stmt) else {
                break;
            };
            if raw == "use strict" {
                tracing::trace!(pos = tree.span(stmt).start, "removing strict mode directive");
                tree.remove(stmt);
                removed += 1;
            }
        }
    }
    removed
}

/// The text of a directive statement between its quotes.
fn directive_text(tree: &SyntaxTree, stmt: NodeIndex) -> Option<&str> {
    let NodeData::ExpressionStatement { expression } = tree.data(stmt) else {
        return None;
    };
    match tree.data(*expression) {
        NodeData::Literal(literal) if literal.kind == LiteralKind::String => {
            literal.raw.get(1..literal.raw.len().saturating_sub(1))
        }
        _ => None,
    }
}
