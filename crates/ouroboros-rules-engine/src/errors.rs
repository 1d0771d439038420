//! Error types
//!
//! Two very different things live here:
//!
//! - [`ErrorBag`]: failed rules collected per field. These are data, not
//!   control-flow errors; a failing field is a normal validation outcome.
//! - [`EngineError`]: the engine could not evaluate the rules at all
//!   (unknown rule name, malformed parameters).

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Engine Errors
// ============================================================================

/// Errors raised when a rule cannot be evaluated
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Rule name not in the engine's vocabulary
    #[error("Unknown validation rule '{rule}' on attribute '{attribute}'")]
    UnknownRule { attribute: String, rule: String },

    /// Rule parameters missing or invalid
    #[error("Malformed validation rule '{rule}': {reason}")]
    MalformedRule { rule: String, reason: String },
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

// ============================================================================
// Error Bag
// ============================================================================

/// Ordered collection of error messages, grouped by field
///
/// Fields keep the order in which their first message was added and each
/// field keeps its messages in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBag {
    entries: Vec<(String, Vec<String>)>,
}

impl ErrorBag {
    /// Create a new empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message for `attribute`
    pub fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        let attribute = attribute.into();
        let message = message.into();
        match self.entries.iter_mut().find(|(key, _)| *key == attribute) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((attribute, vec![message])),
        }
    }

    /// Messages for `attribute`, empty if the field has none
    pub fn get(&self, attribute: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(key, _)| key == attribute)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or(&[])
    }

    /// First message for `attribute`, or the first message overall with `None`
    pub fn first(&self, attribute: Option<&str>) -> Option<&str> {
        let first = match attribute {
            Some(attribute) => self.get(attribute).first(),
            None => self.entries.iter().find_map(|(_, messages)| messages.first()),
        };
        first.map(String::as_str)
    }

    /// Whether `attribute` has at least one message
    pub fn has(&self, attribute: &str) -> bool {
        !self.get(attribute).is_empty()
    }

    /// Check if there are any messages
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, messages)| messages.is_empty())
    }

    /// Total number of messages across all fields
    pub fn count(&self) -> usize {
        self.entries.iter().map(|(_, messages)| messages.len()).sum()
    }

    /// Fields that have messages, in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Every message, flattened in field order
    pub fn all(&self) -> Vec<&str> {
        self.entries
            .iter()
            .flat_map(|(_, messages)| messages.iter().map(String::as_str))
            .collect()
    }

    /// Iterate over `(field, messages)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, messages)| (key.as_str(), messages.as_slice()))
    }

    /// Merge another bag into this one
    pub fn merge(&mut self, other: ErrorBag) {
        for (attribute, messages) in other.entries {
            for message in messages {
                self.add(attribute.clone(), message);
            }
        }
    }
}

impl fmt::Display for ErrorBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.count())
    }
}

impl Serialize for ErrorBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (attribute, messages) in &self.entries {
            map.serialize_entry(attribute, messages)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_bag_empty() {
        let bag = ErrorBag::new();
        assert!(bag.is_empty());
        assert_eq!(bag.count(), 0);
        assert!(bag.get("email").is_empty());
        assert_eq!(bag.first(None), None);
    }

    #[test]
    fn test_error_bag_add_keeps_order() {
        let mut bag = ErrorBag::new();
        bag.add("name", "Name is required");
        bag.add("email", "Email is invalid");
        bag.add("name", "Name is too short");

        assert_eq!(bag.get("name"), ["Name is required", "Name is too short"]);
        assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["name", "email"]);
        assert_eq!(bag.first(Some("name")), Some("Name is required"));
        assert_eq!(bag.first(Some("email")), Some("Email is invalid"));
        assert_eq!(bag.first(None), Some("Name is required"));
        assert_eq!(bag.count(), 3);
        assert!(bag.has("email"));
        assert!(!bag.has("age"));
    }

    #[test]
    fn test_error_bag_merge() {
        let mut left = ErrorBag::new();
        left.add("a", "one");
        let mut right = ErrorBag::new();
        right.add("a", "two");
        right.add("b", "three");

        left.merge(right);
        assert_eq!(left.get("a"), ["one", "two"]);
        assert_eq!(left.all(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_error_bag_serialize() {
        let mut bag = ErrorBag::new();
        bag.add("email", "Invalid");
        let json = serde_json::to_value(&bag).unwrap();
        assert_eq!(json, serde_json::json!({ "email": ["Invalid"] }));
    }

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::UnknownRule {
            attribute: "email".to_string(),
            rule: "emial".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown validation rule 'emial' on attribute 'email'"
        );
    }
}
