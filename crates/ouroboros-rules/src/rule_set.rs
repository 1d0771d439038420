//! Rule sets: named bundles of rules and messages
//!
//! Application code describes a form or payload once and hands the bundle to
//! a [`Validator`](crate::Validator):
//!
//! ```rust
//! use ouroboros_rules::{Messages, RuleSet, RuleSpec, Rules};
//!
//! struct SignupRules;
//!
//! impl RuleSet for SignupRules {
//!     fn rules(&self) -> Rules {
//!         Rules::from([
//!             ("email".to_string(), RuleSpec::from("required|email")),
//!             ("password".to_string(), RuleSpec::from("required|min:8|confirmed")),
//!         ])
//!     }
//!
//!     fn messages(&self) -> Messages {
//!         Messages::from([("email.required".to_string(), "We need your email.".to_string())])
//!     }
//! }
//!
//! assert_eq!(SignupRules.rules().len(), 2);
//! ```

use ouroboros_rules_engine::{Messages, RuleSpec, Rules};
use serde::{Deserialize, Serialize};

// ============================================================================
// RuleSet Trait
// ============================================================================

/// A reusable pair of rules and messages
///
/// Implementations must be deterministic: the same instance returns the
/// same rules and messages on every call.
pub trait RuleSet {
    /// Field name → rule spec
    fn rules(&self) -> Rules;

    /// `"<field>.<rule>"` or `"<rule>"` → message template
    fn messages(&self) -> Messages;

    /// Display name of the bundle
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

// ============================================================================
// Declared Rule Set
// ============================================================================

/// Rule set authored as data (code, JSON or YAML)
///
/// ```yaml
/// name: signup
/// rules:
///   email: required|email
///   password: [required, "min:8"]
/// messages:
///   email.required: We need your email.
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclaredRuleSet {
    /// Catalog name
    pub name: String,
    /// Field name → rule spec
    #[serde(default)]
    pub rules: Rules,
    /// Custom message templates
    #[serde(default)]
    pub messages: Messages,
}

impl DeclaredRuleSet {
    /// Create an empty rule set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the rules for a field
    pub fn rule(mut self, attribute: impl Into<String>, spec: impl Into<RuleSpec>) -> Self {
        self.rules.insert(attribute.into(), spec.into());
        self
    }

    /// Set a message template
    pub fn message(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages.insert(key.into(), template.into());
        self
    }
}

impl RuleSet for DeclaredRuleSet {
    fn rules(&self) -> Rules {
        self.rules.clone()
    }

    fn messages(&self) -> Messages {
        self.messages.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
