//! Stateful validator
//!
//! [`Validator`] holds the current rules and messages, lets callers adjust
//! them field by field, and keeps the outcome of the most recent
//! [`Validator::validate`] call for pass/fail and error queries.
//!
//! Rule evaluation itself happens in the injected [`ValidationEngine`].
//!
//! Every query on the outcome (`fails`, `passes`, `errors`, `add_error`, ...)
//! returns [`ValidatorError::NoValidationPerformed`] until `validate` has run.

use crate::error::{Result, ValidatorError};
use crate::rule_set::RuleSet;
use ouroboros_rules_engine::{
    Data, ErrorBag, Messages, RuleSpec, RuleToken, Rules, StandardEngine, ValidationEngine,
    ValidationOutcome,
};
use std::fmt;
use std::sync::Arc;

/// Rules, messages and the latest validation outcome for one validation flow
pub struct Validator {
    engine: Arc<dyn ValidationEngine>,
    rules: Rules,
    messages: Messages,
    result: Option<ValidationOutcome>,
}

impl Validator {
    /// Create a validator backed by the given engine
    pub fn new(engine: Arc<dyn ValidationEngine>) -> Self {
        Self {
            engine,
            rules: Rules::new(),
            messages: Messages::new(),
            result: None,
        }
    }

    /// Create a validator that owns its engine
    pub fn with_engine(engine: impl ValidationEngine + 'static) -> Self {
        Self::new(Arc::new(engine))
    }

    /// Create a validator on the standard engine, preloaded with a rule set
    pub fn for_set<S: RuleSet + ?Sized>(rule_set: &S) -> Self {
        let mut validator = Self::default();
        validator.apply_set(rule_set);
        validator
    }

    /// Engine used by [`Validator::validate`]
    pub fn engine(&self) -> &Arc<dyn ValidationEngine> {
        &self.engine
    }

    // ========================================================================
    // Rules and messages
    // ========================================================================

    /// Replace the current rules and messages with those of `rule_set`
    pub fn apply_set<S: RuleSet + ?Sized>(&mut self, rule_set: &S) {
        self.rules = rule_set.rules();
        self.messages = rule_set.messages();
        tracing::debug!(
            "Applied rule set '{}' ({} attribute(s), {} message(s))",
            rule_set.name(),
            self.rules.len(),
            self.messages.len()
        );
    }

    /// Current rules
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Current messages
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Merge messages into the current ones; later values win per key
    pub fn add_or_replace_messages<I, K, V>(&mut self, messages: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.messages
            .extend(messages.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Append one rule to `attribute`
    ///
    /// A pipe-delimited spec is split into its tokens and a single token is
    /// wrapped, so the field ends up with an ordered sequence either way.
    pub fn add_rule(&mut self, attribute: impl Into<String>, rule: impl Into<RuleToken>) {
        self.rules.entry(attribute.into()).or_default().push(rule);
    }

    /// Overwrite every rule of `attribute`
    pub fn replace_rule(&mut self, attribute: impl Into<String>, rule: impl Into<RuleSpec>) {
        self.rules.insert(attribute.into(), rule.into());
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate `data`, applying `rule_set` first when given
    ///
    /// The outcome replaces any previous one. When the engine fails the
    /// previous outcome is dropped as well and the error is returned as is.
    pub fn validate(
        &mut self,
        data: &Data,
        rule_set: Option<&dyn RuleSet>,
    ) -> Result<&ValidationOutcome> {
        if let Some(rule_set) = rule_set {
            self.apply_set(rule_set);
        }

        self.result = None;
        let outcome = self.engine.make(data, &self.rules, &self.messages)?;

        tracing::debug!(
            "Validation {} ({} error(s) across {} attribute(s))",
            if outcome.passes() { "passed" } else { "failed" },
            outcome.errors().count(),
            self.rules.len()
        );

        Ok(&*self.result.insert(outcome))
    }

    /// Outcome of the latest `validate` call, if any
    pub fn result(&self) -> Option<&ValidationOutcome> {
        self.result.as_ref()
    }

    fn outcome(&self) -> Result<&ValidationOutcome> {
        self.result.as_ref().ok_or_else(no_validation_performed)
    }

    fn outcome_mut(&mut self) -> Result<&mut ValidationOutcome> {
        self.result.as_mut().ok_or_else(no_validation_performed)
    }

    // ========================================================================
    // Outcome queries
    // ========================================================================

    /// Whether the latest validation has errors
    pub fn fails(&self) -> Result<bool> {
        Ok(self.outcome()?.fails())
    }

    /// Whether the latest validation has no errors
    pub fn passes(&self) -> Result<bool> {
        Ok(self.outcome()?.passes())
    }

    /// Add an error outside the engine's rules (e.g. a business check)
    ///
    /// The attribute is dropped from [`Validator::validated`].
    pub fn add_error(
        &mut self,
        attribute: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<()> {
        self.outcome_mut()?.add_error(attribute, message);
        Ok(())
    }

    /// All errors, grouped by field
    pub fn errors(&self) -> Result<&ErrorBag> {
        Ok(self.outcome()?.errors())
    }

    /// Errors of one field, in order; empty when the field passed
    pub fn errors_for(&self, attribute: &str) -> Result<&[String]> {
        Ok(self.outcome()?.errors().get(attribute))
    }

    /// First error of one field
    pub fn first_error(&self, attribute: &str) -> Result<Option<&str>> {
        Ok(self.outcome()?.errors().first(Some(attribute)))
    }

    /// Whether one field has errors
    pub fn has_errors(&self, attribute: &str) -> Result<bool> {
        Ok(self.outcome()?.errors().has(attribute))
    }

    /// Data entries that carry rules and passed them
    pub fn validated(&self) -> Result<&Data> {
        Ok(self.outcome()?.validated())
    }
}

fn no_validation_performed() -> ValidatorError {
    tracing::warn!("Validation result queried before validate() was called");
    ValidatorError::NoValidationPerformed
}

impl Default for Validator {
    fn default() -> Self {
        Self::with_engine(StandardEngine::new())
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rules)
            .field("messages", &self.messages)
            .field("result", &self.result)
            .finish()
    }
}
