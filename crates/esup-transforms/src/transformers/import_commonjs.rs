//! `importCommonjs`: top-level `require` calls → `import` declarations.
//!
//! | CommonJS                          | ES module                        |
//! |-----------------------------------|----------------------------------|
//! | `var x = require('m');`           | `import x from 'm';`             |
//! | `var {a, b: c} = require('m');`   | `import {a, b as c} from 'm';`   |
//! | `var x = require('m').y;`         | `import {y as x} from 'm';`      |
//! | `var x = require('m').default;`   | `import x from 'm';`             |
//! | `require('m');`                   | `import 'm';`                    |
//!
//! Imported bindings are read-only, so a binding that is assigned anywhere
//! keeps its `require`.

use esup_parser::syntax::transform_utils::{collect_binding_names, require_source};
use esup_parser::{NodeData, NodeIndex, SyntaxTree};

use super::statement_expression;
use crate::scope::{ScopeAnalysis, ScopeId};

pub fn run(tree: &mut SyntaxTree) -> usize {
    let analysis = ScopeAnalysis::analyze(tree);
    if analysis.incomplete {
        return 0;
    }

    let mut rewritten = 0;
    for stmt in tree.live_statements(tree.root()) {
        let Some(plan) = match_statement(tree, &analysis, stmt) else {
            continue;
        };
        let specifiers = plan
            .specifiers
            .into_iter()
            .map(|specifier| {
                let span = tree.span(specifier.node());
                tree.alloc(specifier.into_data(), span)
            })
            .collect();
        tracing::trace!(pos = tree.span(stmt).start, "import declaration");
        tree.replace(
            stmt,
            NodeData::Import {
                specifiers,
                source: plan.source,
            },
        );
        rewritten += 1;
    }
    rewritten
}

struct ImportPlan {
    source: NodeIndex,
    specifiers: Vec<Specifier>,
}

enum Specifier {
    Default { local: NodeIndex },
    Named { imported: NodeIndex, local: Option<NodeIndex> },
}

impl Specifier {
    fn node(&self) -> NodeIndex {
        match self {
            Specifier::Default { local } => *local,
            Specifier::Named { imported, .. } => *imported,
        }
    }

    fn into_data(self) -> NodeData {
        match self {
            Specifier::Default { local } => NodeData::ImportDefault { local },
            Specifier::Named { imported, local } => NodeData::ImportSpecifier { imported, local },
        }
    }
}

fn match_statement(tree: &SyntaxTree, analysis: &ScopeAnalysis, stmt: NodeIndex) -> Option<ImportPlan> {
    if let Some(expression) = statement_expression(tree, stmt) {
        let source = require_source(tree, expression)?;
        return Some(ImportPlan {
            source,
            specifiers: Vec::new(),
        });
    }

    let NodeData::VariableDeclaration { declarators, .. } = tree.data(stmt) else {
        return None;
    };
    let [declarator] = declarators.as_slice() else {
        return None;
    };
    let NodeData::VariableDeclarator {
        id,
        init: Some(init),
    } = tree.data(*declarator)
    else {
        return None;
    };

    let plan = if let Some(source) = require_source(tree, *init) {
        match tree.data(*id) {
            NodeData::Identifier { .. } => ImportPlan {
                source,
                specifiers: vec![Specifier::Default { local: *id }],
            },
            NodeData::Object { properties } => ImportPlan {
                source,
                specifiers: named_specifiers(tree, properties)?,
            },
            _ => return None,
        }
    } else {
        // require('m').name
        let NodeData::Member {
            object, property, ..
        } = *tree.data(*init)
        else {
            return None;
        };
        let (_, name) = tree.as_member(*init)?;
        let source = require_source(tree, object)?;
        let local_name = tree.identifier_name(*id)?;
        let specifier = if name == "default" {
            Specifier::Default { local: *id }
        } else {
            Specifier::Named {
                imported: property,
                local: (local_name != name).then_some(*id),
            }
        };
        ImportPlan {
            source,
            specifiers: vec![specifier],
        }
    };

    let program = ScopeId(0);
    let mut locals = Vec::new();
    collect_binding_names(tree, *id, &mut locals);
    let reassigned = locals.iter().any(|local| {
        tree.identifier_name(*local).is_some_and(|name| {
            analysis.bindings(program, name).len() != 1
                || analysis.references_to(program, name).any(|r| r.is_write)
        })
    });
    (!reassigned).then_some(plan)
}

/// `{a, b: c}` → `a, b as c`. Defaults, rest and nested patterns have no
/// import form.
fn named_specifiers(tree: &SyntaxTree, properties: &[NodeIndex]) -> Option<Vec<Specifier>> {
    properties
        .iter()
        .map(|property| {
            let NodeData::Property {
                key,
                value,
                computed: false,
                ..
            } = *tree.data(*property)
            else {
                return None;
            };
            let imported = tree.identifier_name(key)?;
            let local = tree.identifier_name(value)?;
            Some(Specifier::Named {
                imported: key,
                local: (imported != local).then_some(value),
            })
        })
        .collect()
}
