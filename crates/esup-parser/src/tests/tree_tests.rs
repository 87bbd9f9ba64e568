use super::*;
use crate::parse_document;
use esup_common::SourceDocument;

fn parse(source: &str) -> SyntaxTree {
    parse_document(&SourceDocument::new(source)).expect("source should parse")
}

fn first_statement(tree: &SyntaxTree) -> NodeIndex {
    tree.live_statements(tree.root())[0]
}

#[test]
fn test_fresh_tree_is_pristine() {
    let tree = parse("var a = 1;\nfoo(a);\n");
    assert!(tree.is_pristine(tree.root()));
    assert_eq!(tree.text(first_statement(&tree)), "var a = 1;");
}

#[test]
fn test_replace_marks_slot_synthesized_and_keeps_span() {
    let mut tree = parse("foo(a);");
    let stmt = first_statement(&tree);
    let span = tree.span(stmt);
    tree.replace(stmt, NodeData::Empty);
    assert!(!tree.get(stmt).is_original());
    assert_eq!(tree.span(stmt), span);
    assert!(!tree.is_pristine(tree.root()));
}

#[test]
fn test_detach_keeps_origin() {
    let mut tree = parse("foo(a);");
    let stmt = first_statement(&tree);
    let moved = tree.detach(stmt);
    assert_ne!(moved, stmt);
    assert!(tree.get(moved).is_original());
    assert_eq!(tree.text(moved), "foo(a);");
}

#[test]
fn test_remove_from_extends_span_backwards() {
    let mut tree = parse("// note\nfoo();\n");
    let stmt = first_statement(&tree);
    tree.remove_from(stmt, 0);
    assert!(tree.is_removed(stmt));
    assert_eq!(tree.span(stmt).start, 0);
    assert!(tree.live_statements(tree.root()).is_empty());
}

#[test]
fn test_alloc_string_quotes_and_escapes() {
    let mut tree = parse("");
    let idx = tree.alloc_string("it's", Span::at(0));
    match tree.data(idx) {
        NodeData::Literal(literal) => assert_eq!(literal.raw, "'it\\'s'"),
        other => panic!("expected literal, got {other:?}"),
    }
    assert_eq!(tree.string_value(idx), Some("it's"));
}

#[test]
fn test_parents_and_preorder() {
    let tree = parse("a.b = c;");
    let stmt = first_statement(&tree);
    let parents = tree.parents();
    assert_eq!(parents[stmt.index()], Some(tree.root()));
    let order = tree.preorder(tree.root());
    assert_eq!(order[0], tree.root());
    assert_eq!(order[1], stmt);
    let names: Vec<&str> = order
        .iter()
        .filter_map(|idx| tree.identifier_name(*idx))
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_as_member_and_skip_parens() {
    let tree = parse("(Foo.prototype);");
    let NodeData::ExpressionStatement { expression } = tree.data(first_statement(&tree)) else {
        panic!("expected expression statement");
    };
    let inner = tree.skip_parens(*expression);
    let (object, name) = tree.as_member(inner).expect("member");
    assert_eq!(name, "prototype");
    assert!(tree.is_identifier(object, "Foo"));
}
