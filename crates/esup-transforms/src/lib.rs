//! Transformer catalog, configuration and rewrite passes for the esup
//! modernizer.
//!
//! This crate provides:
//! - `TransformerName` / `CATALOG` - the closed set of transformers and their defaults
//! - `resolve` - command-line selections → `TransformConfig`, or a `ConfigError`
//! - `apply` - run the enabled transformers over a `SyntaxTree` in `PIPELINE_ORDER`
//! - `scope` - the scope analysis the `let`, `classes` and module passes share
//! - `transformers` - one module per catalog entry

pub mod catalog;
pub mod config;
pub mod pipeline;
pub mod scope;
pub mod transformers;

pub use catalog::{CATALOG, CatalogEntry, TransformerName};
pub use config::{ConfigError, TransformConfig, resolve};
pub use pipeline::{PIPELINE_ORDER, PipelineReport, apply, apply_in_place};
