//! Error types.
//!
//! Rule violations are NOT errors: they come back from the validator as
//! data. Only a section the assembler cannot run at all, or a settings file
//! that can't be read, surfaces as `Err`.

use thiserror::Error;

/// The section can't be assembled into any geometry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("section has no components; at least one is required to solve")]
    EmptySection,
}

/// Loading validation/geometry settings failed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
