//! `objectShorthands`: `{a: a}` → `{a}`.

use esup_parser::{NodeData, NodeIndex, SyntaxTree};

use super::find_all;

pub fn run(tree: &mut SyntaxTree) -> usize {
    let candidates: Vec<NodeIndex> = find_all(tree, |data| matches!(data, NodeData::Object { .. }))
        .into_iter()
        .flat_map(|object| match tree.data(object) {
            NodeData::Object { properties } => properties.clone(),
            _ => Vec::new(),
        })
        .collect();

    let mut rewritten = 0;
    for property in candidates {
        let NodeData::Property {
            key,
            value,
            computed: false,
            shorthand: false,
        } = *tree.data(property)
        else {
            continue;
        };
        let (Some(key_name), Some(value_name)) = (tree.identifier_name(key), tree.identifier_name(value))
        else {
            continue;
        };
        if key_name != value_name {
            continue;
        }
        tree.replace(
            property,
            NodeData::Property {
                key,
                value,
                computed: false,
                shorthand: true,
            },
        );
        rewritten += 1;
    }
    rewritten
}
