//! `exportCommonjs`: top-level `module.exports` / `exports` assignments →
//! `export` declarations.
//!
//! - `module.exports = x;` → `export default x;`
//! - `exports.f = function () {};` → `export function f() {}`
//! - `exports.a = a;` → `export {a};`, `exports.b = a;` → `export {a as b};`
//! - `exports.c = expr;` → `export const c = expr;`
//!
//! `module.exports.name = ...` is the same as `exports.name = ...`. There is
//! no `exports` object in a module, so nothing is rewritten unless every use
//! of `module` and `exports` in the file is one of these statements.

use esup_parser::{DeclarationKind, Function, NodeData, NodeIndex, SyntaxTree};
use rustc_hash::FxHashMap;

use super::{simple_assignment, statement_expression};
use crate::scope::{ScopeAnalysis, ScopeId};

pub fn run(tree: &mut SyntaxTree) -> usize {
    let analysis = ScopeAnalysis::analyze(tree);
    if analysis.incomplete {
        return 0;
    }
    let Some(plans) = plan_exports(tree, &analysis) else {
        return 0;
    };

    let rewritten = plans.len();
    for (stmt, plan) in plans {
        let data = match plan {
            ExportPlan::Default { value } => NodeData::ExportDefault { declaration: value },
            ExportPlan::Function { name, function } => {
                let declaration = function_declaration(tree, name, function);
                NodeData::ExportNamed {
                    declaration: Some(declaration),
                    specifiers: Vec::new(),
                    source: None,
                }
            }
            ExportPlan::Binding { local, exported } => {
                let span = tree.span(local);
                let specifier = tree.alloc(NodeData::ExportSpecifier { local, exported }, span);
                NodeData::ExportNamed {
                    declaration: None,
                    specifiers: vec![specifier],
                    source: None,
                }
            }
            ExportPlan::Const { name, value } => {
                let span = tree.span(stmt);
                let keyword = tree.alloc(NodeData::DeclarationKeyword(DeclarationKind::Const), span);
                let declarator = tree.alloc(
                    NodeData::VariableDeclarator {
                        id: name,
                        init: Some(value),
                    },
                    span,
                );
                let declaration = tree.alloc(
                    NodeData::VariableDeclaration {
                        keyword,
                        declarators: vec![declarator],
                    },
                    span,
                );
                NodeData::ExportNamed {
                    declaration: Some(declaration),
                    specifiers: Vec::new(),
                    source: None,
                }
            }
        };
        tracing::trace!(pos = tree.span(stmt).start, "export declaration");
        tree.replace(stmt, data);
    }
    rewritten
}

enum ExportPlan {
    Default { value: NodeIndex },
    /// `name` is the property node of `exports.name`.
    Function { name: NodeIndex, function: NodeIndex },
    Binding {
        local: NodeIndex,
        exported: Option<NodeIndex>,
    },
    Const { name: NodeIndex, value: NodeIndex },
}

/// An export assignment: `module.exports = value` (no name) or
/// `exports.name = value`.
struct Assignment {
    stmt: NodeIndex,
    /// Property node holding the exported name.
    name: Option<NodeIndex>,
    value: NodeIndex,
    /// The `module` / `exports` identifiers used on the left.
    roots: Vec<NodeIndex>,
}

fn plan_exports(tree: &SyntaxTree, analysis: &ScopeAnalysis) -> Option<Vec<(NodeIndex, ExportPlan)>> {
    let program = ScopeId(0);
    // A local `module` or `exports` is not the CommonJS one.
    if !analysis.bindings(program, "module").is_empty() || !analysis.bindings(program, "exports").is_empty() {
        return None;
    }

    let assignments: Vec<Assignment> = tree
        .live_statements(tree.root())
        .into_iter()
        .filter_map(|stmt| match_assignment(tree, stmt))
        .collect();
    if assignments.is_empty() {
        return None;
    }

    let mut counts: FxHashMap<Option<&str>, usize> = FxHashMap::default();
    for assignment in &assignments {
        let key = assignment.name.and_then(|name| tree.identifier_name(name));
        *counts.entry(key).or_default() += 1;
    }
    if counts.values().any(|count| *count > 1) {
        return None;
    }
    // `module.exports = x` together with named exports: `x` replaces the
    // exports object, which a module cannot express.
    if counts.contains_key(&None) && counts.len() > 1 {
        return None;
    }

    let mut handled: Vec<NodeIndex> = assignments
        .iter()
        .flat_map(|assignment| assignment.roots.iter().copied())
        .collect();
    handled.sort();
    let stray = analysis.references.iter().any(|reference| {
        matches!(reference.name.as_str(), "module" | "exports")
            && analysis.resolve(reference.scope, &reference.name).is_none()
            && handled.binary_search(&reference.ident).is_err()
    });
    if stray {
        return None;
    }

    assignments
        .into_iter()
        .map(|assignment| {
            let plan = plan_assignment(tree, analysis, &assignment)?;
            Some((assignment.stmt, plan))
        })
        .collect()
}

fn match_assignment(tree: &SyntaxTree, stmt: NodeIndex) -> Option<Assignment> {
    let expression = statement_expression(tree, stmt)?;
    let (left, value) = simple_assignment(tree, expression)?;

    // module.exports = value
    if let Some(root) = module_exports(tree, left) {
        return Some(Assignment {
            stmt,
            name: None,
            value,
            roots: vec![root],
        });
    }

    let NodeData::Member {
        object,
        property,
        computed: false,
        optional: false,
    } = *tree.data(left)
    else {
        return None;
    };
    tree.identifier_name(property)?;
    let root = if tree.is_identifier(object, "exports") {
        object
    } else {
        module_exports(tree, object)?
    };
    Some(Assignment {
        stmt,
        name: Some(property),
        value,
        roots: vec![root],
    })
}

/// `module.exports` → the `module` identifier.
fn module_exports(tree: &SyntaxTree, idx: NodeIndex) -> Option<NodeIndex> {
    let (object, property) = tree.as_member(idx)?;
    (property == "exports" && tree.is_identifier(object, "module")).then_some(object)
}

fn plan_assignment(tree: &SyntaxTree, analysis: &ScopeAnalysis, assignment: &Assignment) -> Option<ExportPlan> {
    let value = assignment.value;
    let Some(name_node) = assignment.name else {
        return Some(ExportPlan::Default { value });
    };
    let name = tree.identifier_name(name_node)?;
    if name == "default" {
        return Some(ExportPlan::Default { value });
    }

    let program = ScopeId(0);
    // exports.a = a / exports.b = a
    if let Some(local) = tree.identifier_name(value) {
        let bindings = analysis.bindings(program, local);
        let reassigned = analysis.references_to(program, local).any(|r| r.is_write);
        if bindings.len() != 1 || reassigned {
            return None;
        }
        return Some(ExportPlan::Binding {
            local: value,
            exported: (local != name).then_some(name_node),
        });
    }

    // The other forms introduce `name` as a module binding.
    let name_is_free = analysis.bindings(program, name).is_empty()
        && !analysis.references.iter().any(|r| r.name == name);
    if !name_is_free {
        return None;
    }
    match tree.data(value) {
        NodeData::Function(function)
            if function.id.is_none_or(|id| tree.is_identifier(id, name)) =>
        {
            Some(ExportPlan::Function {
                name: name_node,
                function: value,
            })
        }
        _ => Some(ExportPlan::Const {
            name: name_node,
            value,
        }),
    }
}

/// Rewrite a function expression in place into a declaration named `name`.
fn function_declaration(tree: &mut SyntaxTree, name: NodeIndex, function: NodeIndex) -> NodeIndex {
    let NodeData::Function(expression) = tree.data(function).clone() else {
        return function;
    };
    tree.replace(
        function,
        NodeData::Function(Function {
            is_expression: false,
            id: Some(expression.id.unwrap_or(name)),
            ..expression
        }),
    );
    function
}
