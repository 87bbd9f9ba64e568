//! Function-level scope analysis.
//!
//! Used by the `let` and `classes` transforms to answer "who declares this
//! name, and where is it read or written". Scopes are created by the
//! program and by every function-like node (function, arrow, method).
//! Block-level declarations are recorded in the enclosing function scope,
//! which is the conservative view: a `let` in a block and a `var` of the
//! same name in the same function count as two declarations.
//!
//! References are resolved lazily against the complete scope chain, so
//! hoisted declarations resolve the same way they do at run time.

use esup_common::limits::MAX_VISIT_DEPTH;
use esup_parser::syntax::transform_utils::is_call_to;
use esup_parser::{NodeData, NodeIndex, SyntaxTree};
use rustc_hash::FxHashMap;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    Program,
    /// Function declaration: hoisted, callable before its position.
    FunctionDeclaration,
    FunctionExpression,
    Arrow,
    Method,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    Param,
    Catch,
    Import,
    /// The name of a named function expression, visible only inside it.
    FunctionName,
}

#[derive(Clone, Debug)]
pub struct Binding {
    pub kind: BindingKind,
    /// The identifier node that introduces the name.
    pub ident: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct Scope {
    pub kind: ContainerKind,
    pub node: NodeIndex,
    pub parent: Option<ScopeId>,
    pub bindings: FxHashMap<String, Vec<Binding>>,
    /// Contains `eval(...)` or `with`, here or in a nested scope. Names
    /// here cannot be tracked.
    pub dynamic: bool,
}

#[derive(Clone, Debug)]
pub struct Reference {
    pub name: String,
    pub ident: NodeIndex,
    pub pos: u32,
    pub is_write: bool,
    /// Scope the reference occurs in.
    pub scope: ScopeId,
}

#[derive(Clone, Debug, Default)]
pub struct ScopeAnalysis {
    pub scopes: Vec<Scope>,
    pub references: Vec<Reference>,
    /// Scope created by each function-like node.
    pub node_scope_ids: FxHashMap<NodeIndex, ScopeId>,
    /// Function scope enclosing each variable declaration.
    pub declaration_scopes: FxHashMap<NodeIndex, ScopeId>,
    /// Analysis was cut short by the depth limit; nothing can be trusted.
    pub incomplete: bool,
}

#[derive(Clone, Copy)]
enum PatternMode {
    Declare(BindingKind),
    Write,
}

impl ScopeAnalysis {
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn analyze(tree: &SyntaxTree) -> ScopeAnalysis {
        let mut builder = ScopeBuilder {
            tree,
            analysis: ScopeAnalysis::default(),
            current: None,
        };
        let root = tree.root();
        builder.enter_scope(ContainerKind::Program, root);
        builder.visit_children(root, 0);
        builder.exit_scope();
        let analysis = builder.analysis;
        trace!(
            scopes = analysis.scopes.len(),
            references = analysis.references.len(),
            "scope analysis"
        );
        analysis
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn scope_of_node(&self, node: NodeIndex) -> Option<ScopeId> {
        self.node_scope_ids.get(&node).copied()
    }

    pub fn bindings(&self, scope: ScopeId, name: &str) -> &[Binding] {
        self.scope(scope)
            .bindings
            .get(name)
            .map_or(&[], |bindings| bindings.as_slice())
    }

    /// The scope declaring `name` as seen from `from`.
    pub fn resolve(&self, from: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(from);
        while let Some(id) = current {
            let scope = self.scope(id);
            if scope.bindings.contains_key(name) {
                return Some(id);
            }
            current = scope.parent;
        }
        None
    }

    /// Every reference that resolves to `name` declared in `scope`.
    pub fn references_to<'a>(
        &'a self,
        scope: ScopeId,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Reference> + 'a {
        self.references
            .iter()
            .filter(move |r| r.name == name && self.resolve(r.scope, name) == Some(scope))
    }

    /// Whether `inner` is `outer` or nested inside it.
    pub fn is_within(&self, inner: ScopeId, outer: ScopeId) -> bool {
        let mut current = Some(inner);
        while let Some(id) = current {
            if id == outer {
                return true;
            }
            current = self.scope(id).parent;
        }
        false
    }

    /// Scopes from `inner` up to, but not including, `outer`.
    pub fn scopes_between(&self, inner: ScopeId, outer: ScopeId) -> Vec<ScopeId> {
        let mut out = Vec::new();
        let mut current = Some(inner);
        while let Some(id) = current
            && id != outer
        {
            out.push(id);
            current = self.scope(id).parent;
        }
        out
    }
}

struct ScopeBuilder<'a> {
    tree: &'a SyntaxTree,
    analysis: ScopeAnalysis,
    current: Option<ScopeId>,
}

impl ScopeBuilder<'_> {
    fn enter_scope(&mut self, kind: ContainerKind, node: NodeIndex) -> ScopeId {
        let id = ScopeId(self.analysis.scopes.len() as u32);
        self.analysis.scopes.push(Scope {
            kind,
            node,
            parent: self.current,
            bindings: FxHashMap::default(),
            dynamic: false,
        });
        self.analysis.node_scope_ids.insert(node, id);
        self.current = Some(id);
        id
    }

    fn exit_scope(&mut self) {
        if let Some(id) = self.current {
            self.current = self.analysis.scopes[id.0 as usize].parent;
        }
    }

    fn current_scope(&self) -> ScopeId {
        self.current.unwrap_or(ScopeId(0))
    }

    fn declare(&mut self, ident: NodeIndex, kind: BindingKind) {
        let Some(name) = self.tree.identifier_name(ident) else {
            return;
        };
        let scope = self.current_scope();
        self.analysis.scopes[scope.0 as usize]
            .bindings
            .entry(name.to_string())
            .or_default()
            .push(Binding { kind, ident });
    }

    fn reference(&mut self, ident: NodeIndex, is_write: bool) {
        let Some(name) = self.tree.identifier_name(ident) else {
            return;
        };
        self.analysis.references.push(Reference {
            name: name.to_string(),
            ident,
            pos: self.tree.span(ident).start,
            is_write,
            scope: self.current_scope(),
        });
    }

    /// Mark the current scope and all its ancestors dynamic.
    fn mark_dynamic(&mut self) {
        let mut current = self.current;
        while let Some(id) = current {
            let scope = &mut self.analysis.scopes[id.0 as usize];
            scope.dynamic = true;
            current = scope.parent;
        }
    }

    fn visit_children(&mut self, idx: NodeIndex, depth: u32) {
        for child in self.tree.children(idx) {
            self.visit(child, depth + 1);
        }
    }

    fn visit(&mut self, idx: NodeIndex, depth: u32) {
        if depth > MAX_VISIT_DEPTH {
            self.analysis.incomplete = true;
            return;
        }
        let tree = self.tree;
        match tree.data(idx) {
            NodeData::Identifier { .. } => self.reference(idx, false),
            NodeData::VariableDeclaration {
                keyword,
                declarators,
            } => {
                let kind = match tree.data(*keyword) {
                    NodeData::DeclarationKeyword(esup_parser::DeclarationKind::Let) => BindingKind::Let,
                    NodeData::DeclarationKeyword(esup_parser::DeclarationKind::Const) => {
                        BindingKind::Const
                    }
                    _ => BindingKind::Var,
                };
                let scope = self.current_scope();
                self.analysis.declaration_scopes.insert(idx, scope);
                for declarator in declarators {
                    if let NodeData::VariableDeclarator { id, init } = tree.data(*declarator) {
                        self.visit_pattern(*id, PatternMode::Declare(kind), depth + 1);
                        if let Some(init) = init {
                            self.visit(*init, depth + 1);
                        }
                    }
                }
            }
            NodeData::Function(function) => {
                let container = if function.is_expression {
                    ContainerKind::FunctionExpression
                } else {
                    if let Some(id) = function.id {
                        self.declare(id, BindingKind::Function);
                    }
                    ContainerKind::FunctionDeclaration
                };
                self.enter_scope(container, idx);
                if function.is_expression
                    && let Some(id) = function.id
                {
                    self.declare(id, BindingKind::FunctionName);
                }
                for param in &function.params {
                    self.visit_pattern(*param, PatternMode::Declare(BindingKind::Param), depth + 1);
                }
                self.visit(function.body, depth + 1);
                self.exit_scope();
            }
            NodeData::Arrow { params, body, .. } => {
                self.enter_scope(ContainerKind::Arrow, idx);
                for param in params {
                    self.visit_pattern(*param, PatternMode::Declare(BindingKind::Param), depth + 1);
                }
                self.visit(*body, depth + 1);
                self.exit_scope();
            }
            NodeData::Method(method) => {
                if method.computed {
                    self.visit(method.key, depth + 1);
                }
                self.enter_scope(ContainerKind::Method, idx);
                for param in &method.params {
                    self.visit_pattern(*param, PatternMode::Declare(BindingKind::Param), depth + 1);
                }
                self.visit(method.body, depth + 1);
                self.exit_scope();
            }
            NodeData::Class(class) => {
                if let Some(id) = class.id
                    && !class.is_expression
                {
                    self.declare(id, BindingKind::Class);
                }
                if let Some(super_class) = class.super_class {
                    self.visit(super_class, depth + 1);
                }
                for member in &class.members {
                    self.visit(*member, depth + 1);
                }
            }
            NodeData::CatchClause { param, body } => {
                if let Some(param) = param {
                    self.visit_pattern(*param, PatternMode::Declare(BindingKind::Catch), depth + 1);
                }
                self.visit(*body, depth + 1);
            }
            NodeData::ImportDefault { local } | NodeData::ImportNamespace { local } => {
                self.declare(*local, BindingKind::Import);
            }
            NodeData::ImportSpecifier { imported, local } => {
                self.declare(local.unwrap_or(*imported), BindingKind::Import);
            }
            NodeData::ExportSpecifier { local, .. } => self.reference(*local, false),
            NodeData::ExportNamed {
                declaration,
                specifiers,
                source,
            } => {
                if let Some(declaration) = declaration {
                    self.visit(*declaration, depth + 1);
                }
                // Re-exports name another module's bindings.
                if source.is_none() {
                    for specifier in specifiers {
                        self.visit(*specifier, depth + 1);
                    }
                }
            }
            NodeData::ExportAll { .. } => {}
            NodeData::Assignment { left, right, .. } => {
                self.visit_pattern(*left, PatternMode::Write, depth + 1);
                self.visit(*right, depth + 1);
            }
            NodeData::Update { argument, .. } => {
                let target = tree.skip_parens(*argument);
                if tree.identifier_name(target).is_some() {
                    self.reference(target, true);
                } else {
                    self.visit(*argument, depth + 1);
                }
            }
            NodeData::ForIn {
                left, right, body, ..
            } => {
                if matches!(tree.data(*left), NodeData::VariableDeclaration { .. }) {
                    self.visit(*left, depth + 1);
                } else {
                    self.visit_pattern(*left, PatternMode::Write, depth + 1);
                }
                self.visit(*right, depth + 1);
                self.visit(*body, depth + 1);
            }
            NodeData::With { object, body } => {
                self.mark_dynamic();
                self.visit(*object, depth + 1);
                self.visit(*body, depth + 1);
            }
            NodeData::Call { .. } if is_call_to(tree, idx, "eval") => {
                self.mark_dynamic();
                self.visit_children(idx, depth);
            }
            NodeData::Member {
                object,
                property,
                computed,
                ..
            } => {
                self.visit(*object, depth + 1);
                if *computed {
                    self.visit(*property, depth + 1);
                }
            }
            NodeData::Property {
                key,
                value,
                computed,
                ..
            } => {
                if *computed {
                    self.visit(*key, depth + 1);
                }
                self.visit(*value, depth + 1);
            }
            NodeData::Labeled { body, .. } => self.visit(*body, depth + 1),
            NodeData::Break { .. } | NodeData::Continue { .. } => {}
            _ => self.visit_children(idx, depth),
        }
    }

    /// A binding or assignment target: identifiers are declared or written,
    /// defaults and computed keys are ordinary expressions.
    fn visit_pattern(&mut self, idx: NodeIndex, mode: PatternMode, depth: u32) {
        if depth > MAX_VISIT_DEPTH {
            self.analysis.incomplete = true;
            return;
        }
        let tree = self.tree;
        match tree.data(idx) {
            NodeData::Identifier { .. } => match mode {
                PatternMode::Declare(kind) => self.declare(idx, kind),
                PatternMode::Write => self.reference(idx, true),
            },
            NodeData::Paren { expression } => self.visit_pattern(*expression, mode, depth + 1),
            NodeData::AssignmentPattern { left, right } => {
                self.visit_pattern(*left, mode, depth + 1);
                self.visit(*right, depth + 1);
            }
            NodeData::Spread { argument } => self.visit_pattern(*argument, mode, depth + 1),
            NodeData::Array { elements } => {
                for element in elements.iter().flatten() {
                    self.visit_pattern(*element, mode, depth + 1);
                }
            }
            NodeData::Object { properties } => {
                for property in properties {
                    match tree.data(*property) {
                        NodeData::Property {
                            key,
                            value,
                            computed,
                            ..
                        } => {
                            if *computed {
                                self.visit(*key, depth + 1);
                            }
                            self.visit_pattern(*value, mode, depth + 1);
                        }
                        NodeData::Spread { argument } => {
                            self.visit_pattern(*argument, mode, depth + 1)
                        }
                        _ => {}
                    }
                }
            }
            // `a.b = ...`, `a[i] = ...`: the object is only read.
            _ => match mode {
                PatternMode::Write => self.visit(idx, depth + 1),
                PatternMode::Declare(_) => {}
            },
        }
    }
}

#[cfg(test)]
#[path = "tests/scope_tests.rs"]
mod tests;
