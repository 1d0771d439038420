//! Ouroboros Rules Engine
//!
//! Rule evaluation engine behind `ouroboros-rules`.
//!
//! Rules are written per field as pipe-delimited strings (`"required|email"`),
//! single tokens, or ordered token sequences. The engine evaluates them
//! against a data payload and produces a [`ValidationOutcome`] holding an
//! [`ErrorBag`] of messages per field.
//!
//! # Example
//!
//! ```rust
//! use ouroboros_rules_engine::{Data, Messages, RuleSpec, Rules, StandardEngine, ValidationEngine, Value};
//!
//! let mut data = Data::new();
//! data.insert("email".to_string(), Value::from("not-an-email"));
//!
//! let mut rules = Rules::new();
//! rules.insert("email".to_string(), RuleSpec::from("required|email"));
//!
//! let outcome = StandardEngine::new()
//!     .make(&data, &rules, &Messages::new())
//!     .unwrap();
//! assert!(outcome.fails());
//! assert_eq!(
//!     outcome.errors().first(Some("email")),
//!     Some("The email must be a valid email address.")
//! );
//! ```

// Public modules
pub mod config;
pub mod engine;
pub mod errors;
pub mod formats;
pub mod messages;
pub mod rules;
pub mod standard;
pub mod types;

// Re-export commonly used types
pub use config::EngineConfig;
pub use engine::{ValidationEngine, ValidationOutcome};
pub use errors::{EngineError, EngineResult, ErrorBag};
pub use messages::Messages;
pub use rules::{BoxedCustomRule, CustomRule, FnRule, ParsedRule, RuleSpec, RuleToken, Rules};
pub use standard::StandardEngine;
pub use types::{data_from_json, Data, Value};

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
