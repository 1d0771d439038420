//! Rule set catalog file loading tests

use ouroboros_rules::{
    data_from_json, DeclaredRuleSet, RuleSet, RuleSetCatalog, RuleSpec, Validator, ValidatorError,
};
use std::fs;
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn write(dir: &TempDir, relative: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_yaml_and_validate() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "signup.yaml",
        r#"
name: signup
rules:
  email: required|email
  password: [required, "min:8", confirmed]
messages:
  password.confirmed: Passwords do not match.
"#,
    );

    let mut catalog = RuleSetCatalog::new();
    assert_eq!(catalog.load_file(&path).unwrap(), "signup");

    let signup = catalog.get("signup").unwrap();
    assert_eq!(
        signup.rules()["password"],
        RuleSpec::from(vec!["required", "min:8", "confirmed"])
    );

    let mut validator = Validator::default();
    let data = data_from_json(serde_json::json!({
        "email": "a@b.com",
        "password": "correct horse",
        "password_confirmation": "battery staple",
    }));
    validator.validate(&data, Some(&*signup)).unwrap();

    assert!(validator.fails().unwrap());
    assert_eq!(
        validator.first_error("password").unwrap(),
        Some("Passwords do not match.")
    );
    assert!(!validator.has_errors("email").unwrap());
}

#[test]
fn test_json_name_falls_back_to_file_stem() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "contact.json",
        r#"{ "name": "", "rules": { "phone": "required" } }"#,
    );

    let mut catalog = RuleSetCatalog::new();
    assert_eq!(catalog.load_file(&path).unwrap(), "contact");
    assert!(catalog.contains("contact"));
}

#[test]
fn test_load_dir_recurses_and_skips_other_files() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    write(&dir, "auth/login.yml", "name: login\nrules:\n  email: required|email\n");
    write(&dir, "auth/reset.json", r#"{ "name": "reset", "rules": { "token": "required" } }"#);
    write(&dir, "profile.yaml", "name: profile\nrules:\n  bio: nullable|max:500\n");
    write(&dir, "README.md", "# rule sets");

    let mut catalog = RuleSetCatalog::new();
    assert_eq!(catalog.load_dir(dir.path()).unwrap(), 3);
    assert_eq!(
        catalog.names().collect::<Vec<_>>(),
        vec!["login", "profile", "reset"]
    );
}

#[test]
fn test_parse_error_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.yaml", "name: broken\nrules:\n  email: 42\n");

    let err = RuleSetCatalog::new().load_file(&path).unwrap_err();
    match err {
        ValidatorError::RuleSetParse { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = RuleSetCatalog::new()
        .load_file(dir.path().join("missing.json"))
        .unwrap_err();
    assert!(matches!(err, ValidatorError::RuleSetIo { .. }));
}

#[test]
fn test_load_dir_with_broken_file_registers_nothing() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.yaml", "name: a\nrules:\n  email: required|email\n");
    let broken = write(&dir, "b.yaml", "name: [broken\n");

    let mut catalog = RuleSetCatalog::new();
    let err = catalog.load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, ValidatorError::RuleSetParse { .. }));
    assert!(catalog.is_empty());

    fs::write(&broken, "name: b\nrules:\n  token: required\n").unwrap();
    assert_eq!(catalog.load_dir(dir.path()).unwrap(), 2);
    assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn test_load_dir_rejects_duplicate_names() {
    let dir = TempDir::new().unwrap();
    write(&dir, "one.yaml", "name: shared\n");
    write(&dir, "two.json", r#"{ "name": "shared" }"#);

    let mut catalog = RuleSetCatalog::new();
    let err = catalog.load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, ValidatorError::DuplicateRuleSet(ref name) if name == "shared"));
    assert!(catalog.is_empty());

    let mut catalog = RuleSetCatalog::new();
    catalog.register(DeclaredRuleSet::new("shared")).unwrap();
    fs::remove_file(dir.path().join("two.json")).unwrap();
    assert!(catalog.load_dir(dir.path()).is_err());
    assert_eq!(catalog.len(), 1);
}
