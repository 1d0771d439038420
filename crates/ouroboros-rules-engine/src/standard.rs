//! Standard rule engine
//!
//! Evaluates the built-in rule vocabulary plus any [`CustomRule`]s found in
//! the rule specs. Errors accumulate per field rather than returning on the
//! first failure.
//!
//! Rules fall into two groups:
//!
//! - implicit rules (`required`, `present`, `filled`, `accepted`, implicit
//!   custom rules) run even when the field is missing or an empty string;
//! - every other rule only runs when the field is present and not `""`.
//!
//! `sometimes` skips the whole field when it is absent, `nullable` skips the
//! non-implicit rules when the value is null, and `bail` stops the field at
//! its first failure.

use crate::config::EngineConfig;
use crate::engine::{ValidationEngine, ValidationOutcome};
use crate::errors::{EngineError, EngineResult, ErrorBag};
use crate::formats;
use crate::messages::{self, Messages, SizeKind};
use crate::rules::{BoxedCustomRule, ParsedRule, RuleToken, Rules};
use crate::types::{Data, Value};
use parking_lot::RwLock;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

const IMPLICIT_RULES: &[&str] = &["required", "present", "filled", "accepted"];
const MARKER_RULES: &[&str] = &["sometimes", "nullable", "bail"];
const NUMERIC_RULES: &[&str] = &["numeric", "integer"];

// ============================================================================
// Engine
// ============================================================================

/// Built-in engine with the standard rule vocabulary
///
/// Clones share one cache of compiled `regex`/`not_regex` patterns.
#[derive(Debug, Clone, Default)]
pub struct StandardEngine {
    config: EngineConfig,
    patterns: PatternCache,
}

impl StandardEngine {
    /// Create an engine with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given config
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            patterns: PatternCache::default(),
        }
    }

    /// Current config
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl ValidationEngine for StandardEngine {
    fn make(
        &self,
        data: &Data,
        rules: &Rules,
        messages: &Messages,
    ) -> EngineResult<ValidationOutcome> {
        tracing::debug!(
            "Evaluating rules for {} attribute(s) against {} field(s)",
            rules.len(),
            data.len()
        );

        let data = self.prepare(data);
        let mut errors = ErrorBag::new();
        let mut validated = Data::new();

        for (attribute, spec) in rules {
            let steps = parse_steps(attribute, spec.tokens())?;
            let attr = AttributeRun {
                attribute,
                steps: &steps,
                data: &data,
                messages,
                config: &self.config,
                patterns: &self.patterns,
            };

            match attr.run(&mut errors)? {
                AttributeStatus::Skipped => {
                    tracing::debug!("Skipping absent attribute '{}' (sometimes)", attribute);
                }
                AttributeStatus::Passed => {
                    if let Some(value) = data.get(attribute) {
                        validated.insert(attribute.clone(), value.clone());
                    }
                }
                AttributeStatus::Failed => {
                    if self.config.stop_on_first_failure {
                        tracing::debug!("Stopping at first failing attribute '{}'", attribute);
                        break;
                    }
                }
            }
        }

        Ok(ValidationOutcome::new(errors, validated))
    }
}

impl StandardEngine {
    fn prepare<'a>(&self, data: &'a Data) -> Cow<'a, Data> {
        if !self.config.trim_strings {
            return Cow::Borrowed(data);
        }

        Cow::Owned(
            data.iter()
                .map(|(key, value)| {
                    let value = match value {
                        Value::String(s) => Value::String(s.trim().to_string()),
                        other => other.clone(),
                    };
                    (key.clone(), value)
                })
                .collect(),
        )
    }
}

// ============================================================================
// Rule Steps
// ============================================================================

enum Step {
    Named(ParsedRule),
    Custom(BoxedCustomRule),
}

impl Step {
    fn name(&self) -> &str {
        match self {
            Self::Named(rule) => &rule.name,
            Self::Custom(rule) => rule.name(),
        }
    }

    fn is_implicit(&self) -> bool {
        match self {
            Self::Named(rule) => IMPLICIT_RULES.contains(&rule.name.as_str()),
            Self::Custom(rule) => rule.implicit(),
        }
    }
}

fn parse_steps(attribute: &str, tokens: Vec<RuleToken>) -> EngineResult<Vec<Step>> {
    tokens
        .into_iter()
        .filter(|token| !token.is_empty())
        .map(|token| match token {
            RuleToken::Named(raw) => ParsedRule::parse(&raw).map(Step::Named).map_err(|err| {
                tracing::warn!("Invalid rule on attribute '{}': {}", attribute, err);
                err
            }),
            RuleToken::Custom(rule) => Ok(Step::Custom(rule)),
        })
        .collect()
}

// ============================================================================
// Per-attribute Evaluation
// ============================================================================

enum AttributeStatus {
    Skipped,
    Passed,
    Failed,
}

/// Outcome of a single rule check
enum Check {
    Pass,
    Fail {
        kind: SizeKind,
        replacements: Vec<(&'static str, String)>,
    },
}

impl Check {
    fn fail() -> Self {
        Self::Fail {
            kind: SizeKind::String,
            replacements: Vec::new(),
        }
    }

    fn from_bool(ok: bool) -> Self {
        if ok {
            Self::Pass
        } else {
            Self::fail()
        }
    }
}

struct AttributeRun<'a> {
    attribute: &'a str,
    steps: &'a [Step],
    data: &'a Data,
    messages: &'a Messages,
    config: &'a EngineConfig,
    patterns: &'a PatternCache,
}

impl<'a> AttributeRun<'a> {
    fn has(&self, rule: &str) -> bool {
        self.steps.iter().any(|step| step.name() == rule)
    }

    fn run(&self, errors: &mut ErrorBag) -> EngineResult<AttributeStatus> {
        let value = self.data.get(self.attribute);

        if value.is_none() && self.has("sometimes") {
            return Ok(AttributeStatus::Skipped);
        }

        let bail = self.config.bail_by_default || self.has("bail");
        let nullable = self.has("nullable");
        let numeric = NUMERIC_RULES.iter().any(|rule| self.has(rule));
        let mut failed = false;

        for step in self.steps {
            if MARKER_RULES.contains(&step.name()) {
                continue;
            }
            if !step.is_implicit() && !runs_non_implicit(value, nullable) {
                continue;
            }

            let message = match step {
                Step::Named(rule) => match self.check_named(rule, value, numeric)? {
                    Check::Pass => None,
                    Check::Fail { kind, replacements } => {
                        Some(self.render(&rule.name, None, kind, replacements))
                    }
                },
                Step::Custom(rule) => match rule.check(self.attribute, value, self.data) {
                    Ok(()) => None,
                    Err(fallback) => {
                        Some(self.render(
                            rule.name(),
                            Some(fallback.as_str()),
                            SizeKind::String,
                            Vec::new(),
                        ))
                    }
                },
            };

            if let Some(message) = message {
                errors.add(self.attribute, message);
                failed = true;
                if bail {
                    break;
                }
            }
        }

        Ok(if failed {
            AttributeStatus::Failed
        } else {
            AttributeStatus::Passed
        })
    }

    fn render(
        &self,
        rule: &str,
        fallback: Option<&str>,
        kind: SizeKind,
        mut replacements: Vec<(&'static str, String)>,
    ) -> String {
        let template = messages::custom_template(self.messages, self.attribute, rule)
            .or(fallback)
            .unwrap_or_else(|| messages::default_template(rule, kind));
        replacements.push(("attribute", self.config.display_attribute(self.attribute)));
        messages::interpolate(template, &replacements)
    }

    fn check_named(
        &self,
        rule: &ParsedRule,
        value: Option<&Value>,
        numeric: bool,
    ) -> EngineResult<Check> {
        let check = match rule.name.as_str() {
            "required" => Check::from_bool(value.map(|v| !v.is_blank()).unwrap_or(false)),
            "present" => Check::from_bool(value.is_some()),
            "filled" => Check::from_bool(value.map(|v| !v.is_blank()).unwrap_or(true)),
            "accepted" => Check::from_bool(value.map(is_accepted).unwrap_or(false)),
            "string" => Check::from_bool(matches!(value, Some(Value::String(_)))),
            "numeric" => Check::from_bool(value.and_then(Value::as_number).is_some()),
            "integer" => Check::from_bool(value.map(is_integer).unwrap_or(false)),
            "boolean" => Check::from_bool(value.map(is_boolean).unwrap_or(false)),
            "array" => Check::from_bool(matches!(value, Some(Value::List(_) | Value::Object(_)))),
            "email" => check_str(value, formats::validate_email),
            "url" => check_str(value, formats::validate_url),
            "uuid" => check_str(value, formats::validate_uuid),
            "date" => check_str(value, formats::validate_date),
            "alpha" => check_str(value, formats::validate_alpha),
            "alpha_num" => check_plain(value, formats::validate_alpha_num),
            "alpha_dash" => check_plain(value, formats::validate_alpha_dash),
            "min" | "max" | "size" | "between" => check_size(rule, value, numeric)?,
            "in" => check_in(rule, value, true),
            "not_in" => check_in(rule, value, false),
            "regex" => check_regex(&self.patterns.get(rule)?, value, true),
            "not_regex" => check_regex(&self.patterns.get(rule)?, value, false),
            "same" => self.check_other(rule, value, true)?,
            "different" => self.check_other(rule, value, false)?,
            "confirmed" => {
                let confirmation = self.data.get(&format!("{}_confirmation", self.attribute));
                Check::from_bool(value.is_some() && confirmation == value)
            }
            unknown => {
                tracing::warn!(
                    "Unknown rule '{}' on attribute '{}'",
                    unknown,
                    self.attribute
                );
                return Err(EngineError::UnknownRule {
                    attribute: self.attribute.to_string(),
                    rule: unknown.to_string(),
                });
            }
        };
        Ok(check)
    }

    fn check_other(
        &self,
        rule: &ParsedRule,
        value: Option<&Value>,
        equal: bool,
    ) -> EngineResult<Check> {
        let other = rule.param(0)?;
        let other_value = self.data.get(other);
        let ok = if equal {
            value == other_value
        } else {
            other_value.is_some() && value != other_value
        };

        if ok {
            return Ok(Check::Pass);
        }
        Ok(Check::Fail {
            kind: SizeKind::String,
            replacements: vec![("other", self.config.display_attribute(other))],
        })
    }
}

/// Whether non-implicit rules apply to this value
fn runs_non_implicit(value: Option<&Value>, nullable: bool) -> bool {
    match value {
        None => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Null) => !nullable,
        Some(_) => true,
    }
}

// ============================================================================
// Rule Implementations
// ============================================================================

fn is_accepted(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Int(i) => *i == 1,
        Value::String(s) => matches!(s.to_lowercase().as_str(), "yes" | "on" | "1" | "true"),
        _ => false,
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Int(_) => true,
        Value::Float(f) => f.is_finite() && f.fract() == 0.0,
        Value::String(_) => value.as_integer().is_some(),
        _ => false,
    }
}

fn is_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Int(i) => *i == 0 || *i == 1,
        Value::String(s) => matches!(s.as_str(), "0" | "1" | "true" | "false"),
        _ => false,
    }
}

fn check_str(value: Option<&Value>, predicate: fn(&str) -> bool) -> Check {
    Check::from_bool(value.and_then(Value::as_str).map(predicate).unwrap_or(false))
}

/// Like [`check_str`] but numbers are checked through their plain rendering
fn check_plain(value: Option<&Value>, predicate: fn(&str) -> bool) -> Check {
    let ok = match value {
        Some(Value::String(s)) => predicate(s),
        Some(v @ Value::Int(_)) => predicate(&v.to_plain_string()),
        _ => false,
    };
    Check::from_bool(ok)
}

/// Measure a value for size rules
///
/// Numbers (and numeric strings on fields marked `numeric`/`integer`) are
/// measured by value, strings by character count, collections by length.
fn measure(value: &Value, numeric: bool) -> (f64, SizeKind) {
    match value {
        Value::Int(_) | Value::Float(_) => (value.as_number().unwrap_or(0.0), SizeKind::Numeric),
        Value::String(s) => match value.as_number().filter(|_| numeric) {
            Some(n) => (n, SizeKind::Numeric),
            None => (s.chars().count() as f64, SizeKind::String),
        },
        Value::List(items) => (items.len() as f64, SizeKind::Array),
        Value::Object(fields) => (fields.len() as f64, SizeKind::Array),
        Value::Null | Value::Bool(_) => {
            (value.to_plain_string().chars().count() as f64, SizeKind::String)
        }
    }
}

fn check_size(rule: &ParsedRule, value: Option<&Value>, numeric: bool) -> EngineResult<Check> {
    let (size, kind) = value
        .map(|v| measure(v, numeric))
        .unwrap_or((0.0, SizeKind::String));

    let (ok, replacements) = match rule.name.as_str() {
        "min" => {
            let min = rule.numeric_param(0)?;
            (size >= min, vec![("min", rule.param(0)?.to_string())])
        }
        "max" => {
            let max = rule.numeric_param(0)?;
            (size <= max, vec![("max", rule.param(0)?.to_string())])
        }
        "size" => {
            let exact = rule.numeric_param(0)?;
            (size == exact, vec![("size", rule.param(0)?.to_string())])
        }
        _ => {
            let min = rule.numeric_param(0)?;
            let max = rule.numeric_param(1)?;
            (
                size >= min && size <= max,
                vec![
                    ("min", rule.param(0)?.to_string()),
                    ("max", rule.param(1)?.to_string()),
                ],
            )
        }
    };

    Ok(if ok {
        Check::Pass
    } else {
        Check::Fail { kind, replacements }
    })
}

fn check_in(rule: &ParsedRule, value: Option<&Value>, expect_member: bool) -> Check {
    let is_member = |v: &Value| rule.params.iter().any(|p| *p == v.to_plain_string());
    let ok = match value {
        Some(Value::List(items)) => items.iter().all(|item| is_member(item) == expect_member),
        Some(v) => is_member(v) == expect_member,
        None => !expect_member,
    };

    if ok {
        Check::Pass
    } else {
        Check::Fail {
            kind: SizeKind::String,
            replacements: vec![("values", rule.params.join(", "))],
        }
    }
}

// ============================================================================
// Pattern Cache
// ============================================================================

/// Compiled `regex`/`not_regex` patterns keyed by their raw parameter
#[derive(Debug, Clone, Default)]
struct PatternCache {
    compiled: Arc<RwLock<HashMap<String, Regex>>>,
}

impl PatternCache {
    fn get(&self, rule: &ParsedRule) -> EngineResult<Regex> {
        let raw = rule.param(0)?;
        if let Some(re) = self.compiled.read().get(raw) {
            return Ok(re.clone());
        }

        let re = compile_pattern(rule, raw)?;
        self.compiled.write().insert(raw.to_string(), re.clone());
        Ok(re)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.compiled.read().len()
    }
}

/// Compile `/pattern/flags` or a bare pattern
fn compile_pattern(rule: &ParsedRule, raw: &str) -> EngineResult<Regex> {
    let (pattern, flags) = match raw.strip_prefix('/').and_then(|rest| rest.rsplit_once('/')) {
        Some((pattern, flags)) => (pattern, flags),
        None => (raw, ""),
    };

    RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build()
        .map_err(|err| EngineError::MalformedRule {
            rule: rule.name.clone(),
            reason: format!("invalid pattern '{}': {}", raw, err),
        })
}

fn check_regex(re: &Regex, value: Option<&Value>, expect_match: bool) -> Check {
    let subject = match value {
        Some(v @ (Value::String(_) | Value::Int(_) | Value::Float(_))) => v.to_plain_string(),
        _ => return Check::fail(),
    };
    Check::from_bool(re.is_match(&subject) == expect_match)
}
