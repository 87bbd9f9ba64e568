//! `defaultArguments`: leading `a = a || D;` statements become parameter
//! defaults.
//!
//! ```javascript
//! function f(a, b) {
//!   a = a || 1;
//!   b = b || {};
//! }
//! ```
//!
//! becomes `function f(a = 1, b = {}) {}`. Only the statements at the top of
//! the body are considered, and a default may not mention the parameter
//! itself or any parameter after it.

use esup_parser::syntax::transform_utils::{collect_binding_names, contains_arguments_reference};
use esup_parser::{NodeData, NodeIndex, SyntaxTree};
use esup_scanner::SyntaxKind;

use super::{find_all, simple_assignment, statement_expression};

pub fn run(tree: &mut SyntaxTree) -> usize {
    let functions = find_all(tree, |data| {
        matches!(
            data,
            NodeData::Function(_) | NodeData::Method(_) | NodeData::Arrow { .. }
        )
    });

    let mut rewritten = 0;
    for function in functions {
        let (params, body) = match tree.data(function) {
            NodeData::Function(f) => (f.params.clone(), f.body),
            NodeData::Method(m) => (m.params.clone(), m.body),
            NodeData::Arrow { params, body, .. } => {
                // `a => ...` has nowhere to put a default.
                if tree.get(function).is_original()
                    && let Some(first) = params.first()
                    && !tree.source()[..tree.span(*first).start as usize]
                        .trim_end()
                        .ends_with('(')
                {
                    continue;
                }
                (params.clone(), *body)
            }
            _ => continue,
        };
        if !matches!(tree.data(body), NodeData::Block { .. })
            || contains_arguments_reference(tree, body)
        {
            continue;
        }
        rewritten += rewrite_function(tree, &params, body);
    }
    rewritten
}

fn rewrite_function(tree: &mut SyntaxTree, params: &[NodeIndex], body: NodeIndex) -> usize {
    let mut defaulted = vec![false; params.len()];
    let mut rewritten = 0;

    for stmt in tree.live_statements(body) {
        let Some((position, default)) = match_default(tree, params, stmt) else {
            break;
        };
        if defaulted[position] {
            break;
        }
        defaulted[position] = true;

        let param = params[position];
        let left = tree.detach(param);
        tree.replace(
            param,
            NodeData::AssignmentPattern {
                left,
                right: default,
            },
        );
        tree.remove(stmt);
        tracing::trace!(pos = tree.span(param).start, "default parameter");
        rewritten += 1;
    }
    rewritten
}

/// `a = a || D;` where `a` is a plain parameter. Returns the parameter's
/// position and `D`.
fn match_default(tree: &SyntaxTree, params: &[NodeIndex], stmt: NodeIndex) -> Option<(usize, NodeIndex)> {
    let expression = statement_expression(tree, stmt)?;
    let (target, value) = simple_assignment(tree, expression)?;
    let name = tree.identifier_name(target)?;
    let NodeData::Binary {
        operator: SyntaxKind::BarBarToken,
        left,
        right,
    } = *tree.data(value)
    else {
        return None;
    };
    if !tree.is_identifier(left, name) {
        return None;
    }

    let position = params
        .iter()
        .position(|param| tree.is_identifier(*param, name))?;
    let mut bindings = Vec::new();
    for param in &params[position..] {
        collect_binding_names(tree, *param, &mut bindings);
    }
    let later: Vec<&str> = bindings
        .iter()
        .filter_map(|ident| tree.identifier_name(*ident))
        .collect();
    let mentions_later = tree
        .preorder(right)
        .into_iter()
        .filter_map(|idx| tree.identifier_name(idx))
        .any(|ident| later.contains(&ident));
    if mentions_later {
        return None;
    }
    Some((position, right))
}
