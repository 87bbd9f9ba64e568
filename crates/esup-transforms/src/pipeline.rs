//! The transform pipeline.
//!
//! Enabled transformers run one after another over the same tree, always in
//! `PIPELINE_ORDER` regardless of the order they were named on the command
//! line. Each sees the output of the ones before it.

use esup_parser::SyntaxTree;

use crate::catalog::TransformerName;
use crate::config::TransformConfig;
use crate::transformers;

/// Application order.
///
/// Structural rewrites that consume function expressions come first
/// (`classes` turns prototype functions into methods, `objectMethods` turns
/// property functions into methods) so `arrowFunctions` only sees what is
/// left. `defaultArguments` runs before `arrowFunctions` so converted bodies
/// can still shrink to expression bodies. `let` runs last: it needs every
/// declaration the module transforms leave behind.
pub const PIPELINE_ORDER: [TransformerName; TransformerName::COUNT] = [
    TransformerName::Classes,
    TransformerName::ObjectMethods,
    TransformerName::ObjectShorthands,
    TransformerName::DefaultArguments,
    TransformerName::ArrowFunctions,
    TransformerName::StringTemplates,
    TransformerName::NoStrict,
    TransformerName::ImportCommonjs,
    TransformerName::ExportCommonjs,
    TransformerName::Let,
];

/// Sites rewritten by each transformer that ran.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub rewrites: Vec<(TransformerName, usize)>,
}

impl PipelineReport {
    pub fn total(&self) -> usize {
        self.rewrites.iter().map(|(_, count)| count).sum()
    }
}

/// Apply every enabled transformer to `tree` and hand it back.
pub fn apply(mut tree: SyntaxTree, config: &TransformConfig) -> SyntaxTree {
    apply_in_place(&mut tree, config);
    tree
}

/// Apply every enabled transformer to `tree` in place.
#[tracing::instrument(level = "debug", skip_all, fields(enabled = config.enabled_count()))]
pub fn apply_in_place(tree: &mut SyntaxTree, config: &TransformConfig) -> PipelineReport {
    let mut report = PipelineReport::default();
    for name in PIPELINE_ORDER {
        if !config.is_enabled(name) {
            continue;
        }
        let rewritten = transformers::run(name, tree);
        tracing::debug!(transformer = name.as_str(), rewritten, "applied transformer");
        report.rewrites.push((name, rewritten));
    }
    report
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
