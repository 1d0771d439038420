//! Rule tokens and per-field rule specs
//!
//! A field's rules can be written three ways, mirroring how rule sets are
//! usually authored by hand:
//!
//! - a pipe-delimited string: `"required|email|max:255"`
//! - a single token: one named rule or one custom rule object
//! - an ordered sequence of tokens
//!
//! [`RuleSpec::push`] converts any of those shapes into a sequence before
//! appending, so callers can grow a field's rules incrementally.

use crate::errors::{EngineError, EngineResult};
use crate::types::{Data, Value};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Rules mapping: field name → rule spec
pub type Rules = BTreeMap<String, RuleSpec>;

// ============================================================================
// Custom Rules
// ============================================================================

/// Caller-supplied rule evaluated by the engine alongside the named rules
///
/// Return `Err(message)` to reject the value. The message is used as-is
/// unless the messages mapping has an entry for `"<field>.<name>"` or
/// `"<name>"`.
pub trait CustomRule: Send + Sync {
    /// Name used for message lookup (`"<field>.<name>"`)
    fn name(&self) -> &str;

    /// Whether the rule also runs when the field is missing or blank
    fn implicit(&self) -> bool {
        false
    }

    /// Check the value of `attribute`; `value` is `None` when the field is absent
    fn check(&self, attribute: &str, value: Option<&Value>, data: &Data) -> Result<(), String>;
}

/// Boxed custom rule for dynamic dispatch
pub type BoxedCustomRule = Arc<dyn CustomRule>;

/// Create a custom rule from a closure
pub struct FnRule<F>
where
    F: Fn(&str, Option<&Value>, &Data) -> Result<(), String> + Send + Sync,
{
    name: String,
    implicit: bool,
    check_fn: F,
}

impl<F> FnRule<F>
where
    F: Fn(&str, Option<&Value>, &Data) -> Result<(), String> + Send + Sync,
{
    /// Create a new closure-backed rule
    pub fn new(name: impl Into<String>, check_fn: F) -> Self {
        Self {
            name: name.into(),
            implicit: false,
            check_fn,
        }
    }

    /// Run the rule even when the field is missing or blank
    pub fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }
}

impl<F> CustomRule for FnRule<F>
where
    F: Fn(&str, Option<&Value>, &Data) -> Result<(), String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn implicit(&self) -> bool {
        self.implicit
    }

    fn check(&self, attribute: &str, value: Option<&Value>, data: &Data) -> Result<(), String> {
        (self.check_fn)(attribute, value, data)
    }
}

// ============================================================================
// Rule Token
// ============================================================================

/// One atomic rule applied to a field
#[derive(Clone)]
pub enum RuleToken {
    /// Named rule with optional parameters, e.g. `"required"` or `"min:3"`
    Named(String),
    /// Caller-supplied rule object
    Custom(BoxedCustomRule),
}

impl RuleToken {
    /// Wrap a custom rule into a token
    pub fn custom(rule: impl CustomRule + 'static) -> Self {
        Self::Custom(Arc::new(rule))
    }

    /// Whether the token is an empty name (e.g. from `"required||email"`)
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Named(name) if name.trim().is_empty())
    }
}

impl PartialEq for RuleToken {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Named(a), Self::Named(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for RuleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Custom(rule) => f.debug_tuple("Custom").field(&rule.name()).finish(),
        }
    }
}

impl fmt::Display for RuleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Custom(rule) => f.write_str(rule.name()),
        }
    }
}

impl From<&str> for RuleToken {
    fn from(value: &str) -> Self {
        Self::Named(value.to_string())
    }
}

impl From<String> for RuleToken {
    fn from(value: String) -> Self {
        Self::Named(value)
    }
}

impl From<BoxedCustomRule> for RuleToken {
    fn from(value: BoxedCustomRule) -> Self {
        Self::Custom(value)
    }
}

// ============================================================================
// Rule Spec
// ============================================================================

/// All rules for one field
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSpec {
    /// Pipe-delimited rule string, e.g. `"required|email"`
    Delimited(String),
    /// A single rule token
    Single(RuleToken),
    /// Ordered sequence of rule tokens
    Sequence(Vec<RuleToken>),
}

impl RuleSpec {
    /// Whether the spec holds no rules at all
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Delimited(s) => s.is_empty(),
            Self::Single(_) => false,
            Self::Sequence(tokens) => tokens.is_empty(),
        }
    }

    /// Convert to an ordered sequence of tokens
    ///
    /// Delimited strings are split on `|` keeping every piece, including
    /// empty ones, in order. A single token becomes a one-element sequence.
    pub fn into_tokens(self) -> Vec<RuleToken> {
        match self {
            Self::Delimited(s) => s.split('|').map(RuleToken::from).collect(),
            Self::Single(token) => vec![token],
            Self::Sequence(tokens) => tokens,
        }
    }

    /// Tokens of this spec without consuming it
    pub fn tokens(&self) -> Vec<RuleToken> {
        self.clone().into_tokens()
    }

    /// Append one token, normalizing the spec into a sequence first
    ///
    /// An empty spec restarts from an empty sequence rather than keeping a
    /// blank delimited piece around.
    pub fn push(&mut self, token: impl Into<RuleToken>) {
        let mut tokens = if self.is_empty() {
            Vec::new()
        } else {
            std::mem::replace(self, Self::Sequence(Vec::new())).into_tokens()
        };
        tokens.push(token.into());
        *self = Self::Sequence(tokens);
    }

    /// Whether any named token in the spec has the given rule name
    pub fn has_rule(&self, rule: &str) -> bool {
        self.tokens().iter().any(|token| match token {
            RuleToken::Named(raw) => ParsedRule::parse(raw)
                .map(|parsed| parsed.name == rule)
                .unwrap_or(false),
            RuleToken::Custom(custom) => custom.name() == rule,
        })
    }
}

impl Default for RuleSpec {
    fn default() -> Self {
        Self::Sequence(Vec::new())
    }
}

impl From<&str> for RuleSpec {
    fn from(value: &str) -> Self {
        Self::Delimited(value.to_string())
    }
}

impl From<String> for RuleSpec {
    fn from(value: String) -> Self {
        Self::Delimited(value)
    }
}

impl From<RuleToken> for RuleSpec {
    fn from(value: RuleToken) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<RuleToken>> for RuleSpec {
    fn from(value: Vec<RuleToken>) -> Self {
        Self::Sequence(value)
    }
}

impl From<Vec<&str>> for RuleSpec {
    fn from(value: Vec<&str>) -> Self {
        Self::Sequence(value.into_iter().map(RuleToken::from).collect())
    }
}

impl Serialize for RuleSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Delimited(s) => serializer.serialize_str(s),
            Self::Single(token) => serializer.serialize_str(&token.to_string()),
            Self::Sequence(tokens) => {
                serializer.collect_seq(tokens.iter().map(ToString::to_string))
            }
        }
    }
}

impl<'de> Deserialize<'de> for RuleSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Delimited(String),
            Sequence(Vec<String>),
        }

        match Raw::deserialize(deserializer) {
            Ok(Raw::Delimited(s)) => Ok(Self::Delimited(s)),
            Ok(Raw::Sequence(items)) => Ok(Self::Sequence(
                items.into_iter().map(RuleToken::Named).collect(),
            )),
            Err(_) => Err(de::Error::custom(
                "rule spec must be a pipe-delimited string or a list of rule strings",
            )),
        }
    }
}

// ============================================================================
// Parsed Named Rule
// ============================================================================

/// A named token split into rule name and parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule {
    /// Lowercased rule name (`"min"`)
    pub name: String,
    /// Parameters after the colon (`["3"]`)
    pub params: Vec<String>,
}

impl ParsedRule {
    /// Parse `"name"` or `"name:p1,p2"`
    ///
    /// `regex` and `not_regex` keep their whole parameter, commas included.
    pub fn parse(raw: &str) -> EngineResult<Self> {
        let raw = raw.trim();
        let (name, params) = match raw.split_once(':') {
            Some((name, params)) => (name.trim().to_lowercase(), Some(params)),
            None => (raw.to_lowercase(), None),
        };

        if name.is_empty() {
            return Err(EngineError::MalformedRule {
                rule: raw.to_string(),
                reason: "missing rule name".to_string(),
            });
        }

        let params = match params {
            None => Vec::new(),
            Some(p) if name == "regex" || name == "not_regex" => vec![p.to_string()],
            Some(p) => p.split(',').map(|s| s.trim().to_string()).collect(),
        };

        Ok(Self { name, params })
    }

    /// Parameter at `idx`, or a malformed-rule error
    pub fn param(&self, idx: usize) -> EngineResult<&str> {
        self.params
            .get(idx)
            .map(String::as_str)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| EngineError::MalformedRule {
                rule: self.name.clone(),
                reason: format!("expected at least {} parameter(s)", idx + 1),
            })
    }

    /// Numeric parameter at `idx`
    pub fn numeric_param(&self, idx: usize) -> EngineResult<f64> {
        let raw = self.param(idx)?;
        raw.parse::<f64>().map_err(|_| EngineError::MalformedRule {
            rule: self.name.clone(),
            reason: format!("parameter '{}' is not a number", raw),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(tokens: &[&str]) -> Vec<RuleToken> {
        tokens.iter().map(|t| RuleToken::from(*t)).collect()
    }

    #[test]
    fn test_push_onto_empty_spec() {
        let mut spec = RuleSpec::default();
        spec.push("required");
        assert_eq!(spec, RuleSpec::Sequence(named(&["required"])));

        let mut blank = RuleSpec::from("");
        blank.push("email");
        assert_eq!(blank, RuleSpec::Sequence(named(&["email"])));
    }

    #[test]
    fn test_push_splits_delimited() {
        let mut spec = RuleSpec::from("required|email");
        spec.push("max:10");
        assert_eq!(
            spec,
            RuleSpec::Sequence(named(&["required", "email", "max:10"]))
        );
    }

    #[test]
    fn test_push_keeps_empty_pieces() {
        let mut spec = RuleSpec::from("required||email");
        spec.push("max:10");
        assert_eq!(
            spec,
            RuleSpec::Sequence(named(&["required", "", "email", "max:10"]))
        );
    }

    #[test]
    fn test_push_wraps_single_token() {
        let rule = RuleToken::custom(FnRule::new("even", |_, _, _| Ok(())));
        let mut spec = RuleSpec::Single(rule.clone());
        spec.push("required");
        assert_eq!(
            spec,
            RuleSpec::Sequence(vec![rule, RuleToken::from("required")])
        );
    }

    #[test]
    fn test_parse_rule() {
        let parsed = ParsedRule::parse("between:1,10").unwrap();
        assert_eq!(parsed.name, "between");
        assert_eq!(parsed.params, vec!["1", "10"]);

        let parsed = ParsedRule::parse("Required").unwrap();
        assert_eq!(parsed.name, "required");
        assert!(parsed.params.is_empty());

        let parsed = ParsedRule::parse(r"regex:/^\d{1,3}$/").unwrap();
        assert_eq!(parsed.params, vec![r"/^\d{1,3}$/"]);

        assert!(ParsedRule::parse(":3").is_err());
    }

    #[test]
    fn test_numeric_param() {
        let parsed = ParsedRule::parse("min:abc").unwrap();
        assert!(matches!(
            parsed.numeric_param(0),
            Err(EngineError::MalformedRule { .. })
        ));
        let parsed = ParsedRule::parse("min").unwrap();
        assert!(parsed.numeric_param(0).is_err());
    }

    #[test]
    fn test_has_rule() {
        let spec = RuleSpec::from("required|min:3");
        assert!(spec.has_rule("min"));
        assert!(!spec.has_rule("max"));
    }

    #[test]
    fn test_spec_deserialize() {
        let rules: Rules = serde_json::from_value(serde_json::json!({
            "email": "required|email",
            "name": ["required", "min:3"],
        }))
        .unwrap();
        assert_eq!(rules["email"], RuleSpec::from("required|email"));
        assert_eq!(rules["name"], RuleSpec::from(vec!["required", "min:3"]));

        let bad: Result<Rules, _> = serde_json::from_value(serde_json::json!({ "x": 3 }));
        assert!(bad.is_err());
    }
}
