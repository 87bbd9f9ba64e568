//! `objectMethods`: `{key: function () {}}` → `{key() {}}`.
//!
//! Named function values are left alone when the body refers to the name,
//! since a method has no such binding.

use esup_parser::{Method, MethodKind, NodeData, NodeIndex, SyntaxTree};

use super::find_all;

pub fn run(tree: &mut SyntaxTree) -> usize {
    let properties: Vec<NodeIndex> = find_all(tree, |data| matches!(data, NodeData::Object { .. }))
        .into_iter()
        .flat_map(|object| match tree.data(object) {
            NodeData::Object { properties } => properties.clone(),
            _ => Vec::new(),
        })
        .collect();

    let mut rewritten = 0;
    for property in properties {
        let NodeData::Property {
            key,
            value,
            computed,
            shorthand: false,
        } = *tree.data(property)
        else {
            continue;
        };
        let NodeData::Function(function) = tree.data(value) else {
            continue;
        };
        if let Some(id) = function.id
            && refers_to_own_name(tree, value, id)
        {
            continue;
        }

        let method = Method {
            kind: MethodKind::Method,
            is_static: false,
            is_async: function.is_async,
            is_generator: function.is_generator,
            computed,
            key,
            params: function.params.clone(),
            body: function.body,
            leading_comments: None,
        };
        tracing::trace!(pos = tree.span(property).start, "object method");
        tree.replace(property, NodeData::Method(method));
        rewritten += 1;
    }
    rewritten
}

/// Whether a named function expression uses its own name inside.
pub(crate) fn refers_to_own_name(tree: &SyntaxTree, function: NodeIndex, id: NodeIndex) -> bool {
    let Some(name) = tree.identifier_name(id) else {
        return false;
    };
    tree.preorder(function)
        .into_iter()
        .any(|idx| idx != id && tree.is_identifier(idx, name))
}
