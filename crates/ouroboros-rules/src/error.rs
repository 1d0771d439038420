//! Validator error types

use ouroboros_rules_engine::EngineError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the validator and the rule set catalog
///
/// Failed rules are not errors: they are collected in the outcome's
/// error bag. These variants cover misuse and unreadable rule sets.
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// Result queried before any `validate()` call
    #[error("No validation performed: call validate() before querying results")]
    NoValidationPerformed,

    /// Engine could not evaluate the rules
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Rule set file could not be read
    #[error("Failed to read rule set file {}: {source}", .path.display())]
    RuleSetIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rule set file could not be parsed
    #[error("Failed to parse rule set file {}: {reason}", .path.display())]
    RuleSetParse { path: PathBuf, reason: String },

    /// File extension is not json, yaml or yml
    #[error("Unsupported rule set format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A rule set with this name is already in the catalog
    #[error("Rule set already registered: {0}")]
    DuplicateRuleSet(String),

    /// No rule set with this name in the catalog
    #[error("Unknown rule set: {0}")]
    UnknownRuleSet(String),

    /// Directory traversal failed
    #[error("Failed to walk rule set directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for validator operations
pub type Result<T> = std::result::Result<T, ValidatorError>;
