use super::*;
use esup_common::SourceDocument;
use esup_parser::parse_document;

fn analyze(source: &str) -> (SyntaxTree, ScopeAnalysis) {
    let tree = parse_document(&SourceDocument::new(source)).expect("parse");
    let analysis = ScopeAnalysis::analyze(&tree);
    (tree, analysis)
}

#[test]
fn test_program_scope_collects_var_and_function() {
    let (_, analysis) = analyze("var a = 1;\nfunction f(b) { return a + b; }\n");
    let program = ScopeId(0);
    assert_eq!(analysis.bindings(program, "a").len(), 1);
    assert_eq!(analysis.bindings(program, "a")[0].kind, BindingKind::Var);
    assert_eq!(analysis.bindings(program, "f")[0].kind, BindingKind::Function);
    assert!(analysis.bindings(program, "b").is_empty());
    assert_eq!(analysis.scopes.len(), 2);
    assert_eq!(analysis.scopes[1].kind, ContainerKind::FunctionDeclaration);
    assert_eq!(analysis.bindings(ScopeId(1), "b")[0].kind, BindingKind::Param);
}

#[test]
fn test_references_resolve_through_the_chain() {
    let (_, analysis) = analyze("var a = 1;\nfunction f() { return a; }\n");
    let refs: Vec<_> = analysis.references_to(ScopeId(0), "a").collect();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].scope, ScopeId(1));
    assert!(!refs[0].is_write);
}

#[test]
fn test_shadowed_names_resolve_to_the_inner_scope() {
    let (_, analysis) = analyze("var a = 1;\nfunction f(a) { return a; }\n");
    assert_eq!(analysis.references_to(ScopeId(0), "a").count(), 0);
    assert_eq!(analysis.references_to(ScopeId(1), "a").count(), 1);
}

#[test]
fn test_writes_are_recorded() {
    let (_, analysis) = analyze("var a, b, c;\na = 1;\nb++;\n[c] = [2];\nfor (a in {}) {}\n");
    let writes = |name| {
        analysis
            .references_to(ScopeId(0), name)
            .filter(|r| r.is_write)
            .count()
    };
    assert_eq!(writes("a"), 2);
    assert_eq!(writes("b"), 1);
    assert_eq!(writes("c"), 1);
}

#[test]
fn test_property_names_are_not_references() {
    let (_, analysis) = analyze("var o = { a: 1 };\no.a = o.b;\nlabel: for (;;) { break label; }\n");
    assert!(analysis.references.iter().all(|r| r.name == "o"));
    // `o.a = ...` reads `o`, it does not write it.
    assert!(analysis.references.iter().all(|r| !r.is_write));
}

#[test]
fn test_eval_marks_scopes_dynamic() {
    let (_, analysis) = analyze("function f() { function g() { eval('x'); } }\nfunction h() {}\n");
    assert!(analysis.scopes[0].dynamic);
    assert!(analysis.scopes[1].dynamic);
    assert!(analysis.scopes[2].dynamic);
    assert!(!analysis.scopes[3].dynamic);
}

#[test]
fn test_block_declarations_belong_to_the_function_scope() {
    let (tree, analysis) = analyze("function f() { if (x) { var a = 1; let b = 2; } }\n");
    let function = tree.live_statements(tree.root())[0];
    let scope = analysis.scope_of_node(function).expect("function scope");
    assert_eq!(analysis.bindings(scope, "a")[0].kind, BindingKind::Var);
    assert_eq!(analysis.bindings(scope, "b")[0].kind, BindingKind::Let);
    assert_eq!(analysis.declaration_scopes.len(), 2);
    assert!(analysis.declaration_scopes.values().all(|s| *s == scope));
}

#[test]
fn test_scopes_between() {
    let (_, analysis) = analyze("function f() { return function () { return () => 1; }; }\n");
    assert_eq!(analysis.scopes.len(), 4);
    assert_eq!(
        analysis.scopes_between(ScopeId(3), ScopeId(1)),
        vec![ScopeId(3), ScopeId(2)]
    );
    assert!(analysis.is_within(ScopeId(3), ScopeId(0)));
    assert!(!analysis.is_within(ScopeId(1), ScopeId(3)));
}
