//! Document-level entry points for the esup modernizer.
//!
//! This crate ties the stages together:
//! - `transform_source` - parse, run the enabled transformers, print
//! - `transform_document` - the same, keeping the per-transformer report
//! - `transform_many` - several independent documents on the rayon pool
//! - `TransformError` - configuration or parse failure
//!
//! The stage crates are re-exported for callers that need a single
//! dependency.

pub mod error;

pub use error::TransformError;
pub use esup_common::SourceDocument;
pub use esup_parser::ParseError;
pub use esup_transforms::{
    CATALOG, ConfigError, PIPELINE_ORDER, PipelineReport, TransformConfig, TransformerName, resolve,
};

use rayon::prelude::*;

/// A printed document and what the pipeline did to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformOutput {
    pub code: String,
    pub report: PipelineReport,
}

/// Transform one document.
///
/// An empty configuration still parses: invalid input is an error either
/// way, but valid input comes back byte for byte.
#[tracing::instrument(level = "debug", skip_all, fields(len = document.text().len()))]
pub fn transform_document(
    document: &SourceDocument,
    config: &TransformConfig,
) -> Result<TransformOutput, TransformError> {
    let mut tree = esup_parser::parse_document(document)?;
    let report = esup_transforms::apply_in_place(&mut tree, config);
    let code = esup_emitter::print(&tree, document.text());
    tracing::debug!(rewrites = report.total(), "transformed document");
    Ok(TransformOutput { code, report })
}

/// Transform `source` and return the printed text.
pub fn transform_source(source: &str, config: &TransformConfig) -> Result<String, TransformError> {
    let document = SourceDocument::new(source);
    transform_document(&document, config).map(|output| output.code)
}

/// Resolve command-line style selections, then transform `source`.
///
/// Configuration errors are reported before the source is looked at.
pub fn transform_with_options<S: AsRef<str>>(
    source: &str,
    selected: Option<&[S]>,
    disabled: Option<&[S]>,
    module_mode: Option<&str>,
) -> Result<String, TransformError> {
    let config = resolve(selected, disabled, module_mode)?;
    transform_source(source, &config)
}

/// Transform several documents in parallel. Results are in input order.
pub fn transform_many<S>(sources: &[S], config: &TransformConfig) -> Vec<Result<String, TransformError>>
where
    S: AsRef<str> + Sync,
{
    sources
        .par_iter()
        .map(|source| transform_source(source.as_ref(), config))
        .collect()
}
