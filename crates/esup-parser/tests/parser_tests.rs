//! Parser integration tests: statement and expression coverage, spans,
//! interpreter directives, and error reporting.

use esup_common::SourceDocument;
use esup_parser::{DeclarationKind, MethodKind, NodeData, NodeIndex, SyntaxTree, parse_document};

fn parse(source: &str) -> SyntaxTree {
    match parse_document(&SourceDocument::new(source)) {
        Ok(tree) => tree,
        Err(err) => panic!("failed to parse {source:?}: {err}"),
    }
}

fn statements(tree: &SyntaxTree) -> Vec<NodeIndex> {
    tree.live_statements(tree.root())
}

fn expression_of(tree: &SyntaxTree, stmt: NodeIndex) -> NodeIndex {
    match tree.data(stmt) {
        NodeData::ExpressionStatement { expression } => *expression,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

#[test]
fn test_program_spans_entire_document() {
    let source = "\n\nvar x = 42;\n\n";
    let tree = parse(source);
    let root = tree.get(tree.root());
    assert_eq!(root.span.start, 0);
    assert_eq!(root.span.end as usize, source.len());
    let stmt = statements(&tree)[0];
    assert_eq!(tree.text(stmt), "var x = 42;");
}

#[test]
fn test_interpreter_directive_is_not_parsed() {
    let tree = parse("#!/usr/bin/env node\nvar x = 42;");
    let stmts = statements(&tree);
    assert_eq!(stmts.len(), 1);
    assert_eq!(tree.text(stmts[0]), "var x = 42;");

    let tree = parse("\n#!/usr/local/bin/node\nif (true) {\n  var foo = 42;\n}");
    assert_eq!(statements(&tree).len(), 1);
}

#[test]
fn test_variable_declarations() {
    let tree = parse("var a = 1, b;\nlet c = 2;\nconst d = 3;\n");
    let kinds: Vec<DeclarationKind> = statements(&tree)
        .into_iter()
        .map(|stmt| match tree.data(stmt) {
            NodeData::VariableDeclaration { keyword, .. } => match tree.data(*keyword) {
                NodeData::DeclarationKeyword(kind) => *kind,
                other => panic!("expected keyword, got {other:?}"),
            },
            other => panic!("expected declaration, got {other:?}"),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![DeclarationKind::Var, DeclarationKind::Let, DeclarationKind::Const]
    );
}

#[test]
fn test_let_as_identifier() {
    let tree = parse("let = 5;\nlet;\n");
    let stmts = statements(&tree);
    assert!(matches!(tree.data(stmts[0]), NodeData::ExpressionStatement { .. }));
    assert!(matches!(tree.data(stmts[1]), NodeData::ExpressionStatement { .. }));
}

#[test]
fn test_automatic_semicolon_insertion() {
    let tree = parse("var a = 1\nvar b = 2\nfoo()\n");
    let stmts = statements(&tree);
    assert_eq!(stmts.len(), 3);
    assert_eq!(tree.text(stmts[0]), "var a = 1");
    assert_eq!(tree.text(stmts[2]), "foo()");
}

#[test]
fn test_return_with_line_break_has_no_argument() {
    let tree = parse("function f() {\n  return\n  42;\n}");
    let found = tree
        .preorder(tree.root())
        .into_iter()
        .any(|idx| matches!(tree.data(idx), NodeData::Return { argument: None }));
    assert!(found);
}

#[test]
fn test_control_flow_statements() {
    let source = r#"
if (a) { b(); } else c();
for (var i = 0; i < n; i++) {}
for (var k in obj) {}
for (const v of list) {}
while (x) x--;
do { y(); } while (y)
switch (z) { case 1: break; default: z = 0; }
try { t(); } catch (e) { } finally { }
outer: for (;;) { continue outer; }
with (scope) {}
debugger;
throw new Error('x');
"#;
    let tree = parse(source);
    assert_eq!(statements(&tree).len(), 12);
    let for_of = tree
        .preorder(tree.root())
        .into_iter()
        .any(|idx| matches!(tree.data(idx), NodeData::ForIn { is_of: true, .. }));
    assert!(for_of);
}

#[test]
fn test_for_in_head_with_in_operator_inside_parens() {
    let tree = parse("for (var x = ('a' in o); x;) {}");
    assert!(matches!(tree.data(statements(&tree)[0]), NodeData::For { .. }));
}

#[test]
fn test_functions_and_arrows() {
    let tree = parse("var f = function (a, b = 2, ...rest) { return a; };\nvar g = (x, y) => x + y;\nvar h = x => ({x});\nvar i = async () => { await j(); };");
    let arrows = tree
        .preorder(tree.root())
        .into_iter()
        .filter(|idx| matches!(tree.data(*idx), NodeData::Arrow { .. }))
        .count();
    assert_eq!(arrows, 3);
    let function = tree
        .preorder(tree.root())
        .into_iter()
        .find_map(|idx| match tree.data(idx) {
            NodeData::Function(function) => Some(function.clone()),
            _ => None,
        })
        .expect("function");
    assert!(function.is_expression);
    assert_eq!(function.params.len(), 3);
    assert!(matches!(
        tree.data(function.params[1]),
        NodeData::AssignmentPattern { .. }
    ));
    assert!(matches!(tree.data(function.params[2]), NodeData::Spread { .. }));
}

#[test]
fn test_parenthesized_expression_is_not_an_arrow() {
    let tree = parse("var a = (b, c);\nvar d = (e)\n(f);");
    let arrows = tree
        .preorder(tree.root())
        .into_iter()
        .filter(|idx| matches!(tree.data(*idx), NodeData::Arrow { .. }))
        .count();
    assert_eq!(arrows, 0);
}

#[test]
fn test_classes() {
    let source = "class A extends B {\n  constructor(x) { super(x); }\n  static create() {}\n  get size() { return 1; }\n  set size(v) {}\n  *items() {}\n}";
    let tree = parse(source);
    let NodeData::Class(class) = tree.data(statements(&tree)[0]) else {
        panic!("expected class");
    };
    assert!(class.super_class.is_some());
    let kinds: Vec<(MethodKind, bool)> = class
        .members
        .iter()
        .map(|member| match tree.data(*member) {
            NodeData::Method(method) => (method.kind, method.is_static),
            other => panic!("expected method, got {other:?}"),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            (MethodKind::Constructor, false),
            (MethodKind::Method, true),
            (MethodKind::Get, false),
            (MethodKind::Set, false),
            (MethodKind::Method, false),
        ]
    );
}

#[test]
fn test_object_literal_members() {
    let tree = parse("x = {a: 1, b, c() {}, get d() { return 1; }, 'e': 2, [f]: 3, ...g, get: 4, set};");
    let NodeData::Assignment { right, .. } = tree.data(expression_of(&tree, statements(&tree)[0])) else {
        panic!("expected assignment");
    };
    let NodeData::Object { properties } = tree.data(*right) else {
        panic!("expected object");
    };
    assert_eq!(properties.len(), 9);
    assert!(matches!(
        tree.data(properties[1]),
        NodeData::Property { shorthand: true, .. }
    ));
    assert!(matches!(tree.data(properties[2]), NodeData::Method(_)));
    assert!(matches!(tree.data(properties[3]), NodeData::Method(m) if m.kind == MethodKind::Get));
    assert!(matches!(
        tree.data(properties[5]),
        NodeData::Property { computed: true, .. }
    ));
    assert!(matches!(tree.data(properties[6]), NodeData::Spread { .. }));
    assert!(matches!(
        tree.data(properties[7]),
        NodeData::Property { shorthand: false, .. }
    ));
    assert!(matches!(
        tree.data(properties[8]),
        NodeData::Property { shorthand: true, .. }
    ));
}

#[test]
fn test_template_literals() {
    let tree = parse("var s = `a${b}c${ {d: 1}.d }e`;\nvar t = tag`x`;");
    let template = tree
        .preorder(tree.root())
        .into_iter()
        .find_map(|idx| match tree.data(idx) {
            NodeData::Template {
                quasis,
                expressions,
            } => Some((quasis.clone(), expressions.len())),
            _ => None,
        })
        .expect("template");
    assert_eq!(template.0, vec!["a", "c", "e"]);
    assert_eq!(template.1, 2);
    let tagged = tree
        .preorder(tree.root())
        .into_iter()
        .any(|idx| matches!(tree.data(idx), NodeData::TaggedTemplate { .. }));
    assert!(tagged);
}

#[test]
fn test_regular_expressions_and_division() {
    let tree = parse("var r = /ab+c/gi.test(s) ? a / b / c : /=/;");
    let regexes: Vec<String> = tree
        .preorder(tree.root())
        .into_iter()
        .filter_map(|idx| match tree.data(idx) {
            NodeData::Literal(literal) if literal.kind == esup_parser::LiteralKind::RegExp => {
                Some(literal.raw.clone())
            }
            _ => None,
        })
        .collect();
    assert_eq!(regexes, vec!["/ab+c/gi".to_string(), "/=/".to_string()]);
}

#[test]
fn test_binary_precedence() {
    let tree = parse("a + b * c;");
    let NodeData::Binary { right, .. } = tree.data(expression_of(&tree, statements(&tree)[0])) else {
        panic!("expected binary");
    };
    assert!(matches!(tree.data(*right), NodeData::Binary { .. }));
    assert_eq!(tree.text(*right), "b * c");
}

#[test]
fn test_modules() {
    let source = "import a, {b as c, d} from 'm';\nimport * as ns from 'n';\nimport 'side';\nexport default function () {}\nexport const x = 1;\nexport {x as y};\nexport * from 'o';";
    let tree = parse(source);
    let stmts = statements(&tree);
    assert_eq!(stmts.len(), 7);
    let NodeData::Import { specifiers, .. } = tree.data(stmts[0]) else {
        panic!("expected import");
    };
    assert_eq!(specifiers.len(), 3);
    assert!(matches!(tree.data(stmts[3]), NodeData::ExportDefault { .. }));
    assert!(matches!(tree.data(stmts[6]), NodeData::ExportAll { .. }));
}

#[test]
fn test_comments_are_collected() {
    let tree = parse("// one\nvar a; /* two */\n/** three */\nfoo();");
    assert_eq!(tree.comments().len(), 3);
    assert!(!tree.comments()[0].is_multi_line);
    assert!(tree.comments()[1].is_multi_line);
}

#[test]
fn test_children_follow_source_order() {
    let tree = parse("var o = {a: f(1, 2), b: [x, , y]};");
    let mut last_start = 0;
    for idx in tree.preorder(tree.root()).into_iter().skip(1) {
        let children = tree.children(idx);
        for pair in children.windows(2) {
            assert!(tree.span(pair[0]).end <= tree.span(pair[1]).start);
        }
        last_start = last_start.max(tree.span(idx).start);
    }
    assert!(last_start > 0);
}

#[test]
fn test_syntax_error_reports_position() {
    let err = parse_document(&SourceDocument::new("var a = ;")).expect_err("should fail");
    assert_eq!(err.pos, 8);
    assert_eq!(err.line, 1);
    assert_eq!(err.column, 9);

    let err = parse_document(&SourceDocument::new("foo(\n")).expect_err("should fail");
    assert!(err.message.contains("end of input"), "{}", err.message);
}

#[test]
fn test_unterminated_string_is_an_error() {
    assert!(parse_document(&SourceDocument::new("var s = 'abc\n';")).is_err());
}

#[test]
fn test_excessive_nesting_is_an_error() {
    // Unoptimized frames are large; give the parser room to reach the limit.
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let source = format!("{}1{}", "(".repeat(2000), ")".repeat(2000));
            parse_document(&SourceDocument::new(source)).expect_err("should fail")
        })
        .expect("spawn parser thread");
    let err = handle.join().expect("parser thread");
    assert!(err.message.contains("nesting"), "{}", err.message);
}
