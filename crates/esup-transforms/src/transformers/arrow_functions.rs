//! `arrowFunctions`: anonymous function expressions → arrow functions.
//!
//! A function converts when it is anonymous, not a generator, and does not
//! use `this`, `super` or `arguments`. `function () {...}.bind(this)`
//! converts too, `this` included, since the arrow captures the same `this`.
//! A body that is a single `return expr;` becomes the expression body.

use esup_parser::syntax::transform_utils::{contains_arguments_reference, contains_this_reference};
use esup_parser::{Function, NodeData, NodeIndex, SyntaxTree};

use super::find_all;

pub fn run(tree: &mut SyntaxTree) -> usize {
    let parents = tree.parents();
    let functions = find_all(tree, |data| {
        matches!(data, NodeData::Function(f) if f.is_expression && f.id.is_none() && !f.is_generator)
    });

    let mut rewritten = 0;
    for function_idx in functions {
        let NodeData::Function(function) = tree.data(function_idx).clone() else {
            continue;
        };
        if contains_arguments_reference(tree, function.body)
            || function
                .params
                .iter()
                .any(|param| contains_arguments_reference(tree, *param))
        {
            continue;
        }

        let slot = match bound_to_this(tree, &parents, function_idx) {
            Some(call) => call,
            None if uses_this(tree, &function) => continue,
            None => function_idx,
        };
        let slot_parent = parents[slot.index()];
        if slot_parent.is_some_and(|p| is_constructed(tree, p, slot)) {
            continue;
        }

        let body = expression_body(tree, function.body).unwrap_or(function.body);
        let arrow = NodeData::Arrow {
            is_async: function.is_async,
            params: function.params.clone(),
            body,
        };

        if slot_parent.is_some_and(|p| needs_parens(tree, p, slot)) {
            let span = tree.span(slot);
            let inner = tree.alloc(arrow, span);
            tree.replace(slot, NodeData::Paren { expression: inner });
        } else {
            tree.replace(slot, arrow);
        }
        tracing::trace!(pos = tree.span(slot).start, "arrow function");
        rewritten += 1;
    }
    rewritten
}

fn uses_this(tree: &SyntaxTree, function: &Function) -> bool {
    contains_this_reference(tree, function.body)
        || function
            .params
            .iter()
            .any(|param| contains_this_reference(tree, *param))
}

/// `function () {...}.bind(this)` (optionally parenthesized) → the call.
fn bound_to_this(
    tree: &SyntaxTree,
    parents: &[Option<NodeIndex>],
    function: NodeIndex,
) -> Option<NodeIndex> {
    let mut object = function;
    let mut member = parents[function.index()]?;
    while let NodeData::Paren { .. } = tree.data(member) {
        object = member;
        member = parents[member.index()]?;
    }
    let (member_object, property) = tree.as_member(member)?;
    if member_object != object || property != "bind" {
        return None;
    }
    let call = parents[member.index()]?;
    match tree.data(call) {
        NodeData::Call {
            callee,
            arguments,
            optional: false,
        } if *callee == member
            && arguments.len() == 1
            && matches!(tree.data(arguments[0]), NodeData::This) =>
        {
            Some(call)
        }
        _ => None,
    }
}

/// `new function () {}` needs a constructor.
fn is_constructed(tree: &SyntaxTree, parent: NodeIndex, slot: NodeIndex) -> bool {
    matches!(tree.data(parent), NodeData::New { callee, .. } if *callee == slot)
}

/// `{ return expr; }` → `expr`.
fn expression_body(tree: &SyntaxTree, body: NodeIndex) -> Option<NodeIndex> {
    let statements = tree.live_statements(body);
    let [only] = statements.as_slice() else {
        return None;
    };
    let NodeData::Return {
        argument: Some(argument),
    } = tree.data(*only)
    else {
        return None;
    };
    // Comments inside the body would be lost.
    let span = tree.span(body);
    let has_comments = tree
        .comments()
        .iter()
        .any(|comment| span.contains(comment.span()));
    (!has_comments).then_some(*argument)
}

/// Arrow functions bind looser than any operator; only list-like and
/// assignment-like positions take one unparenthesized.
fn needs_parens(tree: &SyntaxTree, parent: NodeIndex, slot: NodeIndex) -> bool {
    match tree.data(parent) {
        NodeData::Paren { .. }
        | NodeData::Array { .. }
        | NodeData::Property { .. }
        | NodeData::VariableDeclarator { .. }
        | NodeData::Assignment { .. }
        | NodeData::AssignmentPattern { .. }
        | NodeData::Return { .. }
        | NodeData::Sequence { .. }
        | NodeData::Spread { .. }
        | NodeData::Yield { .. }
        | NodeData::Template { .. }
        | NodeData::ExportDefault { .. }
        | NodeData::ExpressionStatement { .. }
        | NodeData::Arrow { .. } => false,
        NodeData::Call {
            callee, arguments, ..
        } => *callee == slot || !arguments.contains(&slot),
        NodeData::New { arguments, .. } => !arguments.as_ref().is_some_and(|a| a.contains(&slot)),
        NodeData::Conditional { test, .. } => *test == slot,
        _ => true,
    }
}
