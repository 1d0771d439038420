//! Engine contract
//!
//! Anything that can turn `(data, rules, messages)` into a
//! [`ValidationOutcome`] is a [`ValidationEngine`]. The standard engine in
//! [`crate::standard`] is one implementation; tests and applications can
//! provide their own.

use crate::errors::{EngineResult, ErrorBag};
use crate::messages::Messages;
use crate::rules::Rules;
use crate::types::Data;

// ============================================================================
// Engine Trait
// ============================================================================

/// Evaluates rules against a data payload
pub trait ValidationEngine: Send + Sync {
    /// Run every rule in `rules` against `data`
    ///
    /// # Returns
    /// * `Ok(ValidationOutcome)` - evaluation finished; the outcome may still hold failures
    /// * `Err(EngineError)` - a rule could not be evaluated (unknown name, bad parameters)
    fn make(&self, data: &Data, rules: &Rules, messages: &Messages)
        -> EngineResult<ValidationOutcome>;
}

// ============================================================================
// Validation Outcome
// ============================================================================

/// Result of one engine run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    errors: ErrorBag,
    validated: Data,
}

impl ValidationOutcome {
    /// Create an outcome from collected errors and the validated subset of the data
    pub fn new(errors: ErrorBag, validated: Data) -> Self {
        Self { errors, validated }
    }

    /// Whether any field has an error
    pub fn fails(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether every field passed
    pub fn passes(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error messages grouped by field
    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    /// Record a failure found outside the engine
    ///
    /// The attribute no longer counts as validated.
    pub fn add_error(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        let attribute = attribute.into();
        self.validated.remove(&attribute);
        self.errors.add(attribute, message);
    }

    /// Payload entries whose rules all passed
    pub fn validated(&self) -> &Data {
        &self.validated
    }
}
