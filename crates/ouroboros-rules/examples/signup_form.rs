//! Signup Form Example
//!
//! This example walks through a typical request handler flow with
//! ouroboros-rules: pick a rule set, tweak it, validate, add a business
//! error, and read the messages back.
//!
//! Run with:
//! ```bash
//! cargo run -p ouroboros-rules --example signup_form
//! ```

use ouroboros_rules::{
    data_from_json, FnRule, Messages, RuleSet, RuleSpec, RuleToken, Rules, Validator,
    ValidatorError,
};

struct SignupRules;

impl RuleSet for SignupRules {
    fn rules(&self) -> Rules {
        Rules::from([
            ("username".to_string(), RuleSpec::from("required|alpha_dash|between:3,20")),
            ("email".to_string(), RuleSpec::from("required|email")),
            ("password".to_string(), RuleSpec::from("required|min:8|confirmed")),
            ("age".to_string(), RuleSpec::from("nullable|integer|min:13")),
        ])
    }

    fn messages(&self) -> Messages {
        Messages::from([
            ("email.email".to_string(), "Please use a real email address.".to_string()),
            ("age.min".to_string(), "You must be at least :min to sign up.".to_string()),
        ])
    }
}

fn main() -> Result<(), ValidatorError> {
    println!("Signup Form Example");
    println!("===================\n");

    let mut validator = Validator::for_set(&SignupRules);

    // Usernames must not be taken; checked with a custom rule
    validator.add_rule(
        "username",
        RuleToken::custom(FnRule::new("available", |_attribute, value, _data| {
            match value.and_then(|v| v.as_str()) {
                Some("admin") | Some("root") => Err("That username is taken.".to_string()),
                _ => Ok(()),
            }
        })),
    );

    let request = data_from_json(serde_json::json!({
        "username": "admin",
        "email": "admin-at-example",
        "password": "hunter22",
        "password_confirmation": "hunter2",
        "age": 12,
    }));

    validator.validate(&request, None)?;
    print_errors("First attempt", &validator)?;

    // Business rule checked outside the rule set
    let fixed = data_from_json(serde_json::json!({
        "username": "ada_l",
        "email": "ada@example.com",
        "password": "analytical",
        "password_confirmation": "analytical",
    }));
    validator.validate(&fixed, None)?;
    if fixed.get("email").and_then(|v| v.as_str()) == Some("ada@example.com") {
        validator.add_error("email", "An account with this email already exists.")?;
    }
    print_errors("Second attempt", &validator)?;

    Ok(())
}

fn print_errors(title: &str, validator: &Validator) -> Result<(), ValidatorError> {
    println!("{}:", title);
    if validator.passes()? {
        println!("  passed\n");
        return Ok(());
    }
    for (field, messages) in validator.errors()?.iter() {
        for message in messages {
            println!("  {}: {}", field, message);
        }
    }
    println!();
    Ok(())
}
