//! `let`: `var` → `let` / `const`.
//!
//! A `var` declaration is block-scoped safely when every binding it
//! introduces is declared once in its function, is only referenced inside
//! the enclosing block (or loop, for loop heads), and is never used before
//! its declarator runs. It becomes `const` when none of its bindings is
//! ever written after initialization, `let` otherwise.

use esup_parser::syntax::transform_utils::collect_binding_names;
use esup_parser::{DeclarationKind, NodeData, NodeIndex, SyntaxTree};

use crate::scope::{BindingKind, ContainerKind, Reference, ScopeAnalysis, ScopeId};

pub fn run(tree: &mut SyntaxTree) -> usize {
    let analysis = ScopeAnalysis::analyze(tree);
    if analysis.incomplete {
        tracing::debug!("scope analysis incomplete, leaving declarations alone");
        return 0;
    }
    let parents = tree.parents();

    let declarations: Vec<(NodeIndex, ScopeId)> = {
        let mut found: Vec<_> = analysis
            .declaration_scopes
            .iter()
            .map(|(decl, scope)| (*decl, *scope))
            .collect();
        found.sort();
        found
    };

    let mut rewrites = Vec::new();
    for (declaration, scope) in declarations {
        let NodeData::VariableDeclaration {
            keyword,
            declarators,
        } = tree.data(declaration)
        else {
            continue;
        };
        if !matches!(
            tree.data(*keyword),
            NodeData::DeclarationKeyword(DeclarationKind::Var)
        ) {
            continue;
        }
        let checker = DeclarationChecker {
            tree,
            analysis: &analysis,
            parents: &parents,
            declaration,
            scope,
        };
        if let Some(kind) = checker.block_scoped_kind(declarators) {
            rewrites.push((*keyword, kind));
        }
    }

    let rewritten = rewrites.len();
    for (keyword, kind) in rewrites {
        tracing::trace!(pos = tree.span(keyword).start, kind = kind.as_str(), "block-scoped declaration");
        tree.replace(keyword, NodeData::DeclarationKeyword(kind));
    }
    rewritten
}

struct DeclarationChecker<'a> {
    tree: &'a SyntaxTree,
    analysis: &'a ScopeAnalysis,
    parents: &'a [Option<NodeIndex>],
    declaration: NodeIndex,
    /// Function scope the `var` belongs to.
    scope: ScopeId,
}

/// Where a declaration sits.
struct Placement {
    /// The block, switch case or loop the binding would be scoped to.
    container: NodeIndex,
    /// Declaration in a `for (var ...;;)` / `for (var x in ...)` head.
    loop_head: bool,
    /// `for (var x in/of ...)`: assigned on every iteration.
    for_in_left: bool,
    /// Somewhere inside a loop body of the same function.
    in_loop: bool,
}

impl DeclarationChecker<'_> {
    fn block_scoped_kind(&self, declarators: &[NodeIndex]) -> Option<DeclarationKind> {
        if self.analysis.scope(self.scope).dynamic {
            return None;
        }
        let placement = self.placement()?;

        let mut all_initialized = true;
        let mut any_written = false;
        for declarator in declarators {
            let NodeData::VariableDeclarator { id, init } = self.tree.data(*declarator) else {
                return None;
            };
            if init.is_none() {
                all_initialized = false;
                if placement.in_loop && !placement.loop_head {
                    // Would be reset to `undefined` on every iteration.
                    return None;
                }
            }
            let mut names = Vec::new();
            collect_binding_names(self.tree, *id, &mut names);
            for ident in names {
                let name = self.tree.identifier_name(ident)?;
                let written = self.check_binding(name, *declarator, *init, &placement)?;
                any_written |= written;
            }
        }

        if !any_written && (all_initialized || placement.for_in_left) {
            Some(DeclarationKind::Const)
        } else {
            Some(DeclarationKind::Let)
        }
    }

    fn placement(&self) -> Option<Placement> {
        let parent = self.parents[self.declaration.index()]?;
        let (container, loop_head, for_in_left) = match self.tree.data(parent) {
            NodeData::Program { .. } | NodeData::Block { .. } | NodeData::SwitchCase { .. } => {
                (parent, false, false)
            }
            NodeData::ExportNamed { .. } => (self.parents[parent.index()]?, false, false),
            NodeData::For { init, .. } if *init == Some(self.declaration) => (parent, true, false),
            NodeData::ForIn { left, .. } if *left == self.declaration => (parent, true, true),
            // `if (x) var a;` and friends: `let` is not allowed there.
            _ => return None,
        };

        // Loops between the declaration and its function.
        let scope_node = self.analysis.scope(self.scope).node;
        let mut in_loop = loop_head;
        let mut current = Some(container);
        while let Some(idx) = current
            && idx != scope_node
        {
            if matches!(
                self.tree.data(idx),
                NodeData::For { .. }
                    | NodeData::ForIn { .. }
                    | NodeData::While { .. }
                    | NodeData::DoWhile { .. }
            ) {
                in_loop = true;
            }
            current = self.parents[idx.index()];
        }

        Some(Placement {
            container,
            loop_head,
            for_in_left,
            in_loop,
        })
    }

    /// Check one binding; returns whether it is written after declaration.
    fn check_binding(
        &self,
        name: &str,
        declarator: NodeIndex,
        init: Option<NodeIndex>,
        placement: &Placement,
    ) -> Option<bool> {
        let bindings = self.analysis.bindings(self.scope, name);
        if bindings.len() != 1 || bindings[0].kind != BindingKind::Var {
            return None;
        }

        let container_span = self.tree.span(placement.container);
        let declarator_end = self.tree.span(declarator).end;
        let init_span = init.map(|init| self.tree.span(init));
        let mut written = false;

        for reference in self.analysis.references_to(self.scope, name) {
            if !container_span.contains_pos(reference.pos) {
                return None;
            }
            let closure = reference.scope != self.scope;
            if closure && placement.in_loop {
                // Each iteration would capture a fresh binding.
                return None;
            }
            if reference.pos < declarator_end {
                let in_own_initializer = init_span.is_some_and(|span| span.contains_pos(reference.pos));
                if !(in_own_initializer && closure && self.is_deferred(reference)) {
                    return None;
                }
            }
            if closure && !self.hoisting_is_safe(reference, declarator_end) {
                return None;
            }
            written |= reference.is_write;
        }
        Some(written)
    }

    /// A closure in an initializer that is not called on the spot.
    fn is_deferred(&self, reference: &Reference) -> bool {
        self.analysis
            .scopes_between(reference.scope, self.scope)
            .into_iter()
            .all(|scope| !self.is_immediately_invoked(self.analysis.scope(scope).node))
    }

    fn is_immediately_invoked(&self, function: NodeIndex) -> bool {
        let mut callee = function;
        let mut parent = self.parents[function.index()];
        while let Some(idx) = parent {
            match self.tree.data(idx) {
                NodeData::Paren { .. } => {
                    callee = idx;
                    parent = self.parents[idx.index()];
                }
                NodeData::Call { callee: c, .. } | NodeData::New { callee: c, .. } => {
                    return *c == callee;
                }
                NodeData::Member { object, .. } => {
                    // `function () {}.call(...)`
                    return *object == callee;
                }
                _ => return false,
            }
        }
        false
    }

    /// A reference from inside a hoisted function declaration only runs
    /// when the function is called. That is safe if the function is only
    /// mentioned after the declarator.
    fn hoisting_is_safe(&self, reference: &Reference, declarator_end: u32) -> bool {
        for scope in self.analysis.scopes_between(reference.scope, self.scope) {
            let scope_data = self.analysis.scope(scope);
            if scope_data.kind != ContainerKind::FunctionDeclaration {
                continue;
            }
            let Some(parent_scope) = scope_data.parent else {
                return false;
            };
            if parent_scope != self.scope {
                return false;
            }
            let NodeData::Function(function) = self.tree.data(scope_data.node) else {
                return false;
            };
            let Some(name) = function.id.and_then(|id| self.tree.identifier_name(id)) else {
                return false;
            };
            if self
                .analysis
                .references_to(self.scope, name)
                .any(|r| r.pos < declarator_end)
            {
                return false;
            }
        }
        true
    }
}
