use super::*;
use crate::parse_document;
use esup_common::SourceDocument;

fn parse(source: &str) -> SyntaxTree {
    parse_document(&SourceDocument::new(source)).expect("source should parse")
}

/// Body of the first function expression in the program.
fn first_function_body(tree: &SyntaxTree) -> NodeIndex {
    tree.preorder(tree.root())
        .into_iter()
        .find_map(|idx| match tree.data(idx) {
            NodeData::Function(function) => Some(function.body),
            _ => None,
        })
        .expect("function")
}

#[test]
fn test_this_found_directly_and_through_arrows() {
    let tree = parse("f(function () { return this.x; });");
    assert!(contains_this_reference(&tree, first_function_body(&tree)));

    let tree = parse("f(function () { return () => this.x; });");
    assert!(contains_this_reference(&tree, first_function_body(&tree)));
}

#[test]
fn test_this_in_nested_function_is_ignored() {
    let tree = parse("f(function () { return function () { return this; }; });");
    assert!(!contains_this_reference(&tree, first_function_body(&tree)));
}

#[test]
fn test_super_counts_as_this() {
    let tree = parse("f(function () { super.x(); });");
    assert!(contains_this_reference(&tree, first_function_body(&tree)));
}

#[test]
fn test_arguments_reference_ignores_property_names() {
    let tree = parse("f(function () { return obj.arguments + {arguments: 1}.x; });");
    assert!(!contains_arguments_reference(&tree, first_function_body(&tree)));

    let tree = parse("f(function () { return arguments[0]; });");
    assert!(contains_arguments_reference(&tree, first_function_body(&tree)));
}

#[test]
fn test_collect_binding_names_in_patterns() {
    let tree = parse("var {a, b: [c, , d = 1], ...e} = x;");
    let declarator = tree
        .preorder(tree.root())
        .into_iter()
        .find(|idx| matches!(tree.data(*idx), NodeData::VariableDeclarator { .. }))
        .expect("declarator");
    let NodeData::VariableDeclarator { id, .. } = tree.data(declarator) else {
        unreachable!();
    };
    let mut names = Vec::new();
    collect_binding_names(&tree, *id, &mut names);
    let names: Vec<&str> = names
        .iter()
        .filter_map(|idx| tree.identifier_name(*idx))
        .collect();
    assert_eq!(names, vec!["a", "c", "d", "e"]);
}

#[test]
fn test_require_source() {
    let tree = parse("require('fs');\nrequire(name);");
    let statements = tree.live_statements(tree.root());
    let expression = |stmt: NodeIndex| match tree.data(stmt) {
        NodeData::ExpressionStatement { expression } => *expression,
        _ => panic!("expected expression statement"),
    };
    let source = require_source(&tree, expression(statements[0])).expect("require");
    assert_eq!(tree.string_value(source), Some("fs"));
    assert!(require_source(&tree, expression(statements[1])).is_none());
    assert!(is_call_to(&tree, expression(statements[1]), "require"));
}
