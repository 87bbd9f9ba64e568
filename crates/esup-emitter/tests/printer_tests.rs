//! Printer tests: byte-identical copies of untouched text, removed lines,
//! and synthesized nodes placed into original context.

use esup_common::{SourceDocument, Span};
use esup_emitter::print;
use esup_parser::{
    Class, DeclarationKind, Function, Method, MethodKind, NodeData, NodeIndex, SyntaxTree,
    parse_document,
};

fn parse(source: &str) -> SyntaxTree {
    match parse_document(&SourceDocument::new(source)) {
        Ok(tree) => tree,
        Err(err) => panic!("failed to parse {source:?}: {err}"),
    }
}

fn find(tree: &SyntaxTree, pred: impl Fn(&NodeData) -> bool) -> NodeIndex {
    tree.preorder(tree.root())
        .into_iter()
        .find(|idx| pred(tree.data(*idx)))
        .expect("node not found")
}

fn find_function(tree: &SyntaxTree) -> (NodeIndex, Function) {
    let idx = find(tree, |data| matches!(data, NodeData::Function(_)));
    match tree.data(idx) {
        NodeData::Function(function) => (idx, function.clone()),
        _ => unreachable!(),
    }
}

/// Rewrite every `var` keyword to `kind`.
fn retag_declarations(tree: &mut SyntaxTree, kind: DeclarationKind) {
    let keywords: Vec<NodeIndex> = tree
        .preorder(tree.root())
        .into_iter()
        .filter(|idx| matches!(tree.data(*idx), NodeData::DeclarationKeyword(DeclarationKind::Var)))
        .collect();
    for keyword in keywords {
        tree.replace(keyword, NodeData::DeclarationKeyword(kind));
    }
}

/// Turn the first function declaration into a class with a constructor.
fn function_to_class(tree: &mut SyntaxTree) {
    let (idx, function) = find_function(tree);
    let span = tree.span(idx);
    let key = tree.alloc_identifier("constructor", Span::at(span.start));
    let constructor = tree.alloc(
        NodeData::Method(Method {
            kind: MethodKind::Constructor,
            is_static: false,
            is_async: false,
            is_generator: false,
            computed: false,
            key,
            params: function.params.clone(),
            body: function.body,
            leading_comments: None,
        }),
        span,
    );
    tree.replace(
        idx,
        NodeData::Class(Class {
            is_expression: false,
            id: function.id,
            super_class: None,
            members: vec![constructor],
        }),
    );
}

#[test]
fn test_untouched_documents_print_identically() {
    let sources = [
        "",
        "\n\n",
        "var x = 42;",
        "\n\nvar x = 42;\n\n",
        "#!/usr/bin/env node\nvar x = 42;",
        "\n#!/usr/local/bin/node\nif (true) {\n  var foo = 42;\n}",
        "// leading\n/* block */ foo(1,2) ;  // trailing\r\n\r\nbar()\n",
        "function  f ( a,b ) {\n\treturn a+b\n}\n\n\n",
        "var s = `a${ b }c`, r = /x/g;\nclass A extends B { m() { super.m(); } }\n",
        "  a;\n  b;",
        "\tf();\n\tg();",
        "  if (x) {\n    y();\n  }",
        "    var a = 1;\n  b();\nc();\n",
    ];
    for source in sources {
        let tree = parse(source);
        assert_eq!(print(&tree, source), source);
    }
}

#[test]
fn test_rewritten_keyword_keeps_surrounding_text() {
    let source = "\n\n/* keep */ var  x = 42 ;  // note\n\n";
    let mut tree = parse(source);
    retag_declarations(&mut tree, DeclarationKind::Const);
    assert_eq!(print(&tree, source), "\n\n/* keep */ const  x = 42 ;  // note\n\n");
}

#[test]
fn test_indented_document_keeps_indentation_after_rewrite() {
    let source = "  var a = 1;\n  if (x) {\n    var b = 2;\n  }\n";
    let mut tree = parse(source);
    retag_declarations(&mut tree, DeclarationKind::Const);
    assert_eq!(
        print(&tree, source),
        "  const a = 1;\n  if (x) {\n    const b = 2;\n  }\n"
    );
}

#[test]
fn test_interpreter_directive_survives_rewrite() {
    let source = "#!/usr/bin/env node\nvar x = 42;";
    let mut tree = parse(source);
    retag_declarations(&mut tree, DeclarationKind::Const);
    assert_eq!(print(&tree, source), "#!/usr/bin/env node\nconst x = 42;");

    let source = "\n#!/usr/local/bin/node\nif (true) {\n  var foo = 42;\n}";
    let mut tree = parse(source);
    retag_declarations(&mut tree, DeclarationKind::Const);
    assert_eq!(
        print(&tree, source),
        "\n#!/usr/local/bin/node\nif (true) {\n  const foo = 42;\n}"
    );
}

#[test]
fn test_removed_statement_takes_its_line() {
    let source = "a();\n'use strict';\nb();\n";
    let mut tree = parse(source);
    let stmt = tree.live_statements(tree.root())[1];
    tree.remove(stmt);
    assert_eq!(print(&tree, source), "a();\nb();\n");
}

#[test]
fn test_removed_last_statement_drops_preceding_newline() {
    let source = "a();\nb();";
    let mut tree = parse(source);
    let stmt = tree.live_statements(tree.root())[1];
    tree.remove(stmt);
    assert_eq!(print(&tree, source), "a();");

    let source = "function f() {\n  'use strict';\n}";
    let mut tree = parse(source);
    let directive = find(&tree, |data| matches!(data, NodeData::ExpressionStatement { .. }));
    tree.remove(directive);
    assert_eq!(print(&tree, source), "function f() {\n}");
}

#[test]
fn test_removed_inline_statement() {
    let source = "a(); b(); c();";
    let mut tree = parse(source);
    let stmt = tree.live_statements(tree.root())[1];
    tree.remove(stmt);
    assert_eq!(print(&tree, source), "a(); c();");
}

#[test]
fn test_removed_statement_with_leading_comment() {
    let source = "a();\n// about b\nb();\nc();\n";
    let mut tree = parse(source);
    let stmt = tree.live_statements(tree.root())[1];
    let comment_start = source.find("// about").expect("comment") as u32;
    tree.remove_from(stmt, comment_start);
    assert_eq!(print(&tree, source), "a();\nc();\n");
}

#[test]
fn test_synthesized_class_reindents_moved_body() {
    let source = "function Foo(a) {\n  this.a = a;\n}\n";
    let mut tree = parse(source);
    function_to_class(&mut tree);
    assert_eq!(
        print(&tree, source),
        "class Foo {\n  constructor(a) {\n    this.a = a;\n  }\n}\n"
    );
}

#[test]
fn test_dirty_body_inside_synthesized_class() {
    let source = "function Foo() {\n  var x = 1;\n\n  this.x = x;\n}\n";
    let mut tree = parse(source);
    retag_declarations(&mut tree, DeclarationKind::Let);
    function_to_class(&mut tree);
    assert_eq!(
        print(&tree, source),
        "class Foo {\n  constructor() {\n    let x = 1;\n\n    this.x = x;\n  }\n}\n"
    );
}

#[test]
fn test_indent_unit_comes_from_source() {
    let source = "if (a) {\n\tfunction Foo() {\n\t\tthis.a = 1;\n\t}\n}";
    let mut tree = parse(source);
    function_to_class(&mut tree);
    assert_eq!(
        print(&tree, source),
        "if (a) {\n\tclass Foo {\n\t\tconstructor() {\n\t\t\tthis.a = 1;\n\t\t}\n\t}\n}"
    );
}

#[test]
fn test_moved_comments_print_before_member() {
    let source = "// Builds a Foo.\nfunction Foo() {}\n";
    let mut tree = parse(source);
    function_to_class(&mut tree);
    let method = find(&tree, |data| matches!(data, NodeData::Method(_)));
    if let NodeData::Method(mut data) = tree.data(method).clone() {
        data.leading_comments = Some(Span::new(0, 16));
        tree.replace(method, NodeData::Method(data));
    }
    assert_eq!(
        print(&tree, source),
        "// Builds a Foo.\nclass Foo {\n  // Builds a Foo.\n  constructor() {}\n}\n"
    );
}

#[test]
fn test_arrow_with_expression_body() {
    let source = "f(function (x) { return x; });";
    let mut tree = parse(source);
    let (idx, function) = find_function(&tree);
    let ret = find(&tree, |data| matches!(data, NodeData::Return { .. }));
    let NodeData::Return {
        argument: Some(argument),
    } = tree.data(ret).clone()
    else {
        panic!("expected return");
    };
    tree.replace(
        idx,
        NodeData::Arrow {
            is_async: false,
            params: function.params,
            body: argument,
        },
    );
    assert_eq!(print(&tree, source), "f(x => x);");
}

#[test]
fn test_arrow_object_body_is_parenthesized() {
    let source = "f(function () { return {a: 1}; });";
    let mut tree = parse(source);
    let (idx, function) = find_function(&tree);
    let object = find(&tree, |data| matches!(data, NodeData::Object { .. }));
    tree.replace(
        idx,
        NodeData::Arrow {
            is_async: false,
            params: function.params,
            body: object,
        },
    );
    assert_eq!(print(&tree, source), "f(() => ({a: 1}));");
}

#[test]
fn test_template_literal_from_parts() {
    let source = "var s = 'a' + b;";
    let mut tree = parse(source);
    let binary = find(&tree, |data| matches!(data, NodeData::Binary { .. }));
    let NodeData::Binary { right, .. } = tree.data(binary).clone() else {
        panic!("expected binary");
    };
    tree.replace(
        binary,
        NodeData::Template {
            quasis: vec!["a".to_string(), String::new()],
            expressions: vec![right],
        },
    );
    assert_eq!(print(&tree, source), "var s = `a${b}`;");
}
