//! Transform utilities for syntax analysis.
//!
//! Common functions used by the rewriting passes.

use crate::node::{Method, NodeData, NodeIndex};
use crate::tree::SyntaxTree;

#[derive(Clone, Copy)]
enum ReferenceTarget {
    Arguments,
    This,
}

impl ReferenceTarget {
    const fn identifier_name(self) -> &'static str {
        match self {
            Self::Arguments => "arguments",
            Self::This => "this",
        }
    }

    const fn include_keyword_check(self) -> bool {
        matches!(self, Self::This)
    }
}

/// Check if a node contains a reference to `this` or `super`.
///
/// Nested functions, methods, and classes bind their own `this`, so they
/// are not searched; arrow functions are.
#[must_use]
pub fn contains_this_reference(tree: &SyntaxTree, node_idx: NodeIndex) -> bool {
    contains_target_reference(tree, node_idx, ReferenceTarget::This)
}

/// Check if a node contains a reference to `arguments`.
///
/// Regular functions have their own `arguments`, so we don't recurse into
/// them. Only arrow functions inherit the parent's `arguments`.
#[must_use]
pub fn contains_arguments_reference(tree: &SyntaxTree, node_idx: NodeIndex) -> bool {
    contains_target_reference(tree, node_idx, ReferenceTarget::Arguments)
}

fn contains_target_reference(tree: &SyntaxTree, node_idx: NodeIndex, target: ReferenceTarget) -> bool {
    let data = tree.data(node_idx);

    if target.include_keyword_check() && matches!(data, NodeData::This | NodeData::Super) {
        return true;
    }

    if let NodeData::Identifier { name } = data {
        return name == target.identifier_name();
    }

    target_reference_children(tree, node_idx)
        .into_iter()
        .any(|child_idx| contains_target_reference(tree, child_idx, target))
}

/// Children that can hold a reference in the current function's scope.
/// Non-computed property names are not references.
fn target_reference_children(tree: &SyntaxTree, node_idx: NodeIndex) -> Vec<NodeIndex> {
    match tree.data(node_idx) {
        NodeData::Function(_) => Vec::new(),
        NodeData::Method(Method { computed, key, .. }) => {
            if *computed {
                vec![*key]
            } else {
                Vec::new()
            }
        }
        NodeData::Class(class) => {
            let mut children: Vec<NodeIndex> = class.super_class.into_iter().collect();
            children.extend(class.members.iter().copied());
            children
        }
        NodeData::Member {
            object,
            property,
            computed,
            ..
        } => {
            if *computed {
                vec![*object, *property]
            } else {
                vec![*object]
            }
        }
        NodeData::Property {
            key,
            value,
            computed,
            ..
        } => {
            if *computed {
                vec![*key, *value]
            } else {
                vec![*value]
            }
        }
        NodeData::Labeled { body, .. } => vec![*body],
        NodeData::Break { .. } | NodeData::Continue { .. } => Vec::new(),
        data => data.children(),
    }
}

/// Names bound by a binding target: identifiers, patterns, defaults, rest.
pub fn collect_binding_names(tree: &SyntaxTree, target: NodeIndex, out: &mut Vec<NodeIndex>) {
    match tree.data(target) {
        NodeData::Identifier { .. } => out.push(target),
        NodeData::AssignmentPattern { left, .. } => collect_binding_names(tree, *left, out),
        NodeData::Spread { argument } => collect_binding_names(tree, *argument, out),
        NodeData::Array { elements } => {
            for element in elements.iter().flatten() {
                collect_binding_names(tree, *element, out);
            }
        }
        NodeData::Object { properties } => {
            for property in properties {
                match tree.data(*property) {
                    NodeData::Property { value, .. } => collect_binding_names(tree, *value, out),
                    NodeData::Spread { argument } => collect_binding_names(tree, *argument, out),
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

/// `callee(args)` where callee is the plain identifier `name`.
#[must_use]
pub fn is_call_to(tree: &SyntaxTree, node_idx: NodeIndex, name: &str) -> bool {
    match tree.data(node_idx) {
        NodeData::Call {
            callee,
            optional: false,
            ..
        } => tree.is_identifier(*callee, name),
        _ => false,
    }
}

/// The string argument of `require('module')`.
#[must_use]
pub fn require_source(tree: &SyntaxTree, node_idx: NodeIndex) -> Option<NodeIndex> {
    match tree.data(node_idx) {
        NodeData::Call {
            callee,
            arguments,
            optional: false,
        } if tree.is_identifier(*callee, "require") && arguments.len() == 1 => {
            tree.string_value(arguments[0]).map(|_| arguments[0])
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/transform_utils_tests.rs"]
mod tests;
