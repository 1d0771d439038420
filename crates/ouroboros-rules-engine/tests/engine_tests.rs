//! Standard engine tests against JSON payloads

use ouroboros_rules_engine::*;

fn rules(pairs: &[(&str, &str)]) -> Rules {
    pairs
        .iter()
        .map(|(field, spec)| (field.to_string(), RuleSpec::from(*spec)))
        .collect()
}

fn run(json: serde_json::Value, rules: &Rules) -> ValidationOutcome {
    StandardEngine::new()
        .make(&data_from_json(json), rules, &Messages::new())
        .unwrap()
}

// ============================================================================
// Type Rules
// ============================================================================

#[test]
fn test_type_rules() {
    let rules = rules(&[
        ("name", "string"),
        ("age", "integer"),
        ("price", "numeric"),
        ("active", "boolean"),
        ("tags", "array"),
    ]);

    let outcome = run(
        serde_json::json!({
            "name": "Ada",
            "age": 36,
            "price": "9.99",
            "active": "1",
            "tags": ["x"],
        }),
        &rules,
    );
    assert!(outcome.passes());

    let outcome = run(
        serde_json::json!({
            "name": 5,
            "age": 3.5,
            "price": "cheap",
            "active": "maybe",
            "tags": "x",
        }),
        &rules,
    );
    let mut failed: Vec<&str> = outcome.errors().keys().collect();
    failed.sort_unstable();
    assert_eq!(failed, vec!["active", "age", "name", "price", "tags"]);
}

#[test]
fn test_format_rules() {
    let rules = rules(&[
        ("site", "url"),
        ("id", "uuid"),
        ("born", "date"),
        ("code", "alpha_num"),
    ]);

    let outcome = run(
        serde_json::json!({
            "site": "https://example.com",
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "born": "1815-12-10",
            "code": 42,
        }),
        &rules,
    );
    assert!(outcome.passes());

    let outcome = run(
        serde_json::json!({
            "site": "example",
            "id": "nope",
            "born": "1815-02-30",
            "code": "a b",
        }),
        &rules,
    );
    assert_eq!(outcome.errors().count(), 4);
    assert_eq!(outcome.errors().first(Some("born")), Some("The born is not a valid date."));
}

// ============================================================================
// Implicit Rules
// ============================================================================

#[test]
fn test_required_blank_values() {
    let rules = rules(&[("a", "required"), ("b", "required"), ("c", "required"), ("d", "required")]);
    let outcome = run(
        serde_json::json!({ "a": "   ", "b": null, "c": [], "d": false }),
        &rules,
    );

    assert!(outcome.errors().has("a"));
    assert!(outcome.errors().has("b"));
    assert!(outcome.errors().has("c"));
    assert!(!outcome.errors().has("d"));
}

#[test]
fn test_present_filled_accepted() {
    let rules = rules(&[
        ("token", "present"),
        ("nickname", "filled"),
        ("terms", "accepted"),
    ]);

    let outcome = run(serde_json::json!({ "token": "", "terms": "yes" }), &rules);
    assert!(outcome.passes());

    let outcome = run(serde_json::json!({ "nickname": "", "terms": false }), &rules);
    assert_eq!(
        outcome.errors().get("token"),
        ["The token field must be present."]
    );
    assert_eq!(
        outcome.errors().get("nickname"),
        ["The nickname field must have a value."]
    );
    assert_eq!(outcome.errors().get("terms"), ["The terms must be accepted."]);
}

// ============================================================================
// Messages
// ============================================================================

#[test]
fn test_humanized_attribute_names() {
    let outcome = run(serde_json::json!({}), &rules(&[("first_name", "required")]));
    assert_eq!(
        outcome.errors().first(None),
        Some("The first name field is required.")
    );

    let engine = StandardEngine::with_config(EngineConfig::new().humanize_attributes(false));
    let outcome = engine
        .make(
            &Data::new(),
            &rules(&[("first_name", "required")]),
            &Messages::new(),
        )
        .unwrap();
    assert_eq!(
        outcome.errors().first(None),
        Some("The first_name field is required.")
    );
}

#[test]
fn test_in_list_values() {
    let outcome = run(
        serde_json::json!({ "roles": ["admin", "owner"] }),
        &rules(&[("roles", "array|in:admin,editor")]),
    );
    assert_eq!(
        outcome.errors().get("roles"),
        ["The selected roles is invalid."]
    );
}

#[test]
fn test_validated_excludes_failed_and_unruled_fields() {
    let outcome = run(
        serde_json::json!({ "email": "a@b.com", "name": "A", "extra": true }),
        &rules(&[("email", "email"), ("name", "min:2")]),
    );

    let validated = outcome.validated();
    assert!(validated.contains_key("email"));
    assert!(!validated.contains_key("name"));
    assert!(!validated.contains_key("extra"));
}

#[test]
fn test_sequence_and_delimited_specs_agree() {
    let json = serde_json::json!({ "email": "not-an-email" });

    let mut sequence = Rules::new();
    sequence.insert(
        "email".to_string(),
        RuleSpec::from(vec!["required", "email"]),
    );

    let delimited = rules(&[("email", "required|email")]);

    assert_eq!(
        run(json.clone(), &sequence).errors(),
        run(json, &delimited).errors()
    );
}
