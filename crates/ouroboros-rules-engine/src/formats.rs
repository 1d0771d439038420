//! Format checks used by the string rules
//!
//! Pre-compiled regex validators for email, URL, UUID, dates and the
//! alpha family of character classes.

use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// Pre-compiled Regex Patterns
// ============================================================================

/// Email regex pattern (RFC 5322 simplified)
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)*\.[a-zA-Z]{2,}$").unwrap()
});

/// URL regex pattern (http/https)
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap()
});

/// UUID regex pattern (any version, hyphenated)
static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

/// Date (YYYY-MM-DD) optionally followed by an ISO 8601 time part
static DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})([T ]([01]\d|2[0-3]):[0-5]\d(:[0-5]\d(\.\d{1,9})?)?(Z|[+-]\d{2}:\d{2})?)?$")
        .unwrap()
});

// ============================================================================
// Format Validators
// ============================================================================

/// Validate email format
///
/// # Example
/// ```
/// use ouroboros_rules_engine::formats::validate_email;
///
/// assert!(validate_email("user@example.com"));
/// assert!(!validate_email("not-an-email"));
/// ```
pub fn validate_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Validate URL format (http/https)
pub fn validate_url(value: &str) -> bool {
    URL_REGEX.is_match(value)
}

/// Validate hyphenated UUID format
pub fn validate_uuid(value: &str) -> bool {
    UUID_REGEX.is_match(value)
}

/// Validate a calendar date, with or without a time part
///
/// The month and day are range-checked, leap years included, so
/// `2023-02-29` is rejected while `2024-02-29` passes.
pub fn validate_date(value: &str) -> bool {
    let Some(caps) = DATE_REGEX.captures(value) else {
        return false;
    };

    let parse = |idx: usize| caps.get(idx).and_then(|m| m.as_str().parse::<u32>().ok());
    let (Some(year), Some(month), Some(day)) = (parse(1), parse(2), parse(3)) else {
        return false;
    };

    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    let days_in_month = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if leap => 29,
        2 => 28,
        _ => return false,
    };

    (1..=days_in_month).contains(&day)
}

/// Only alphabetic characters (Unicode aware)
pub fn validate_alpha(value: &str) -> bool {
    !value.is_empty() && value.chars().all(char::is_alphabetic)
}

/// Only alphabetic and numeric characters
pub fn validate_alpha_num(value: &str) -> bool {
    !value.is_empty() && value.chars().all(char::is_alphanumeric)
}

/// Alphanumeric characters plus dashes and underscores
pub fn validate_alpha_dash(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        // Valid emails
        assert!(validate_email("user@example.com"));
        assert!(validate_email("a@b.com"));
        assert!(validate_email("test.user+tag@subdomain.example.co.uk"));

        // Invalid emails
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("user@"));
        assert!(!validate_email("user@.com"));
        assert!(!validate_email("user@example"));
    }

    #[test]
    fn test_url_validation() {
        assert!(validate_url("https://example.com"));
        assert!(validate_url("http://localhost:8080/path?query=value"));

        assert!(!validate_url("ftp://example.com"));
        assert!(!validate_url("not-a-url"));
    }

    #[test]
    fn test_uuid_validation() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000"));
        assert!(validate_uuid("550e8400-e29b-11d4-a716-446655440000"));

        assert!(!validate_uuid("not-a-uuid"));
        assert!(!validate_uuid("550e8400e29b41d4a716446655440000")); // Missing hyphens
    }

    #[test]
    fn test_date_validation() {
        assert!(validate_date("2024-01-19"));
        assert!(validate_date("2024-02-29"));
        assert!(validate_date("2024-01-19T12:00:00Z"));
        assert!(validate_date("2024-01-19 12:00"));

        assert!(!validate_date("2023-02-29"));
        assert!(!validate_date("2024-13-01"));
        assert!(!validate_date("2024-04-31"));
        assert!(!validate_date("01/19/2024"));
        assert!(!validate_date("2024-1-19"));
    }

    #[test]
    fn test_alpha_family() {
        assert!(validate_alpha("Zoë"));
        assert!(!validate_alpha("abc1"));
        assert!(validate_alpha_num("abc123"));
        assert!(!validate_alpha_num("abc-123"));
        assert!(validate_alpha_dash("abc-1_2"));
        assert!(!validate_alpha_dash("abc 1"));
        assert!(!validate_alpha(""));
    }
}
