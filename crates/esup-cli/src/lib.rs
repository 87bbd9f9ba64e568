//! The `esup` command line.
//!
//! - `args` - clap definition of the options
//! - `driver` - validation, I/O and the transform call
//! - `tracing_config` - opt-in log subscriber

pub mod args;
pub mod driver;
pub mod tracing_config;
