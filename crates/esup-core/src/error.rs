use esup_parser::ParseError;
use esup_transforms::ConfigError;
use thiserror::Error;

/// Why a document could not be transformed. Messages pass through from the
/// underlying error unchanged.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl TransformError {
    pub fn is_config(&self) -> bool {
        matches!(self, TransformError::Config(_))
    }
}
