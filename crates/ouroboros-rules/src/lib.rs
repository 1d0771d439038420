//! Ouroboros Rules
//!
//! Reusable validation rule sets and a stateful validator on top of
//! `ouroboros-rules-engine`.
//!
//! - [`RuleSet`]: a named bundle of rules and messages, written in code
//!   or loaded from JSON/YAML into a [`RuleSetCatalog`]
//! - [`Validator`]: holds the current rules and messages, adjusts them per
//!   field, runs the engine and answers pass/fail and error queries
//!
//! The validator never evaluates rules itself; it forwards
//! `(data, rules, messages)` to a [`ValidationEngine`] chosen at
//! construction time.
//!
//! # Example
//!
//! ```rust
//! use ouroboros_rules::{data_from_json, DeclaredRuleSet, Validator};
//!
//! let signup = DeclaredRuleSet::new("signup")
//!     .rule("email", "required|email")
//!     .message("email.email", "That does not look like an email address.");
//!
//! let mut validator = Validator::default();
//! let data = data_from_json(serde_json::json!({ "email": "not-an-email" }));
//! validator.validate(&data, Some(&signup))?;
//!
//! assert!(validator.fails()?);
//! assert_eq!(
//!     validator.first_error("email")?,
//!     Some("That does not look like an email address.")
//! );
//! # Ok::<(), ouroboros_rules::ValidatorError>(())
//! ```

// Public modules
pub mod catalog;
pub mod error;
pub mod rule_set;
pub mod validator;

// Re-export commonly used types
pub use catalog::{read_rule_set, RuleSetCatalog, SharedRuleSet};
pub use error::{Result, ValidatorError};
pub use rule_set::{DeclaredRuleSet, RuleSet};
pub use validator::Validator;

// Re-export the engine surface callers need alongside the validator
pub use ouroboros_rules_engine::{
    data_from_json, BoxedCustomRule, CustomRule, Data, EngineConfig, EngineError, ErrorBag,
    FnRule, Messages, RuleSpec, RuleToken, Rules, StandardEngine, ValidationEngine,
    ValidationOutcome, Value,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
