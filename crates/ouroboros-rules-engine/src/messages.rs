//! Message templates and placeholder replacement
//!
//! Lookup order for a failed rule on `email`:
//!
//! 1. `"email.<rule>"` from the messages mapping
//! 2. `"<rule>"` from the messages mapping
//! 3. the built-in default for the rule
//!
//! Templates may use `:attribute`, `:min`, `:max`, `:size`, `:other`
//! and `:values`.

use std::collections::BTreeMap;

/// Messages mapping: `"<field>.<rule>"` or `"<rule>"` → template
pub type Messages = BTreeMap<String, String>;

/// How a size rule measured the value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeKind {
    /// Compared numerically
    Numeric,
    /// Compared by character count
    String,
    /// Compared by item count
    Array,
}

/// Built-in template for a rule
pub fn default_template(rule: &str, kind: SizeKind) -> &'static str {
    match (rule, kind) {
        ("required", _) => "The :attribute field is required.",
        ("present", _) => "The :attribute field must be present.",
        ("filled", _) => "The :attribute field must have a value.",
        ("accepted", _) => "The :attribute must be accepted.",
        ("string", _) => "The :attribute must be a string.",
        ("numeric", _) => "The :attribute must be a number.",
        ("integer", _) => "The :attribute must be an integer.",
        ("boolean", _) => "The :attribute field must be true or false.",
        ("array", _) => "The :attribute must be an array.",
        ("email", _) => "The :attribute must be a valid email address.",
        ("url", _) => "The :attribute format is invalid.",
        ("uuid", _) => "The :attribute must be a valid UUID.",
        ("date", _) => "The :attribute is not a valid date.",
        ("alpha", _) => "The :attribute must only contain letters.",
        ("alpha_num", _) => "The :attribute must only contain letters and numbers.",
        ("alpha_dash", _) => {
            "The :attribute must only contain letters, numbers, dashes and underscores."
        }
        ("min", SizeKind::Numeric) => "The :attribute must be at least :min.",
        ("min", SizeKind::String) => "The :attribute must be at least :min characters.",
        ("min", SizeKind::Array) => "The :attribute must have at least :min items.",
        ("max", SizeKind::Numeric) => "The :attribute must not be greater than :max.",
        ("max", SizeKind::String) => "The :attribute must not be greater than :max characters.",
        ("max", SizeKind::Array) => "The :attribute must not have more than :max items.",
        ("between", SizeKind::Numeric) => "The :attribute must be between :min and :max.",
        ("between", SizeKind::String) => {
            "The :attribute must be between :min and :max characters."
        }
        ("between", SizeKind::Array) => "The :attribute must have between :min and :max items.",
        ("size", SizeKind::Numeric) => "The :attribute must be :size.",
        ("size", SizeKind::String) => "The :attribute must be :size characters.",
        ("size", SizeKind::Array) => "The :attribute must contain :size items.",
        ("in", _) => "The selected :attribute is invalid.",
        ("not_in", _) => "The selected :attribute is invalid.",
        ("regex", _) => "The :attribute format is invalid.",
        ("not_regex", _) => "The :attribute format is invalid.",
        ("same", _) => "The :attribute and :other must match.",
        ("different", _) => "The :attribute and :other must be different.",
        ("confirmed", _) => "The :attribute confirmation does not match.",
        _ => "The :attribute is invalid.",
    }
}

/// Find the custom template for `attribute`/`rule`, if the caller gave one
pub fn custom_template<'a>(messages: &'a Messages, attribute: &str, rule: &str) -> Option<&'a str> {
    messages
        .get(&format!("{}.{}", attribute, rule))
        .or_else(|| messages.get(rule))
        .map(String::as_str)
}

/// Replace `:placeholder` tokens in a template
///
/// The template is scanned once, so text coming from a replacement value is
/// never rewritten again. At each `:` the longest matching placeholder name
/// wins (`:values` over `:value`); unmatched colons are kept as-is.
pub fn interpolate(template: &str, replacements: &[(&str, String)]) -> String {
    let mut ordered: Vec<&(&str, String)> = replacements.iter().collect();
    ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(idx) = rest.find(':') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];
        match ordered.iter().find(|(name, _)| after.starts_with(*name)) {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len()..];
            }
            None => {
                out.push(':');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
