//! Common types and utilities for the esup JavaScript modernizer.
//!
//! This crate provides foundational types used across all esup crates:
//! - Source spans (`Span`)
//! - Comment ranges collected by the scanner
//! - Source documents and interpreter directive detection
//! - Indentation helpers used by the printer
//! - Line/column positions for diagnostics
//! - Centralized limits

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Comment parsing utilities
pub mod comments;
pub use comments::CommentRange;

// Source documents (`#!` directive handling)
pub mod source;
pub use source::{InterpreterDirective, SourceDocument};

// Indentation inference and re-indentation
pub mod indent;

// Line/column positions
pub mod position;
pub use position::{LineMap, Position};

// Centralized limits and thresholds
pub mod limits;
