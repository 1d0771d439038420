//! Named rule set catalog
//!
//! Keeps rule sets by name so request handlers can pick one at runtime.
//! Sets can be registered from code or loaded from JSON/YAML files.

use crate::error::{Result, ValidatorError};
use crate::rule_set::{DeclaredRuleSet, RuleSet};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

/// Shared handle to a rule set held by the catalog
pub type SharedRuleSet = Arc<dyn RuleSet + Send + Sync>;

/// Rule sets indexed by name
#[derive(Default, Clone)]
pub struct RuleSetCatalog {
    sets: BTreeMap<String, SharedRuleSet>,
}

impl RuleSetCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule set under its own name
    pub fn register(&mut self, rule_set: impl RuleSet + Send + Sync + 'static) -> Result<()> {
        let name = rule_set.name().to_string();
        if self.sets.contains_key(&name) {
            return Err(ValidatorError::DuplicateRuleSet(name));
        }
        tracing::debug!("Registered rule set '{}'", name);
        self.sets.insert(name, Arc::new(rule_set));
        Ok(())
    }

    /// Look up a rule set by name
    pub fn get(&self, name: &str) -> Result<SharedRuleSet> {
        self.sets
            .get(name)
            .cloned()
            .ok_or_else(|| ValidatorError::UnknownRuleSet(name.to_string()))
    }

    /// Whether a rule set with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Number of registered rule sets
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Load one `.json`, `.yaml` or `.yml` file and register it
    ///
    /// Returns the name of the loaded rule set.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<String> {
        let set = read_rule_set(path.as_ref())?;
        let name = set.name.clone();
        self.register(set)?;
        Ok(name)
    }

    /// Load every rule set file below `dir`, recursively
    ///
    /// Files with other extensions are ignored. Every file is read and every
    /// name checked before anything is registered, so on error the catalog
    /// is left as it was. Returns the number of sets loaded.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let mut batch: BTreeMap<String, DeclaredRuleSet> = BTreeMap::new();
        for entry in WalkDir::new(dir.as_ref()).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() || format_of(entry.path()).is_none() {
                continue;
            }
            let set = read_rule_set(entry.path())?;
            if self.sets.contains_key(&set.name) || batch.contains_key(&set.name) {
                tracing::warn!(
                    "Duplicate rule set '{}' in {}",
                    set.name,
                    entry.path().display()
                );
                return Err(ValidatorError::DuplicateRuleSet(set.name));
            }
            batch.insert(set.name.clone(), set);
        }

        let loaded = batch.len();
        for (name, set) in batch {
            self.sets.insert(name, Arc::new(set));
        }
        tracing::info!(
            "Loaded {} rule set(s) from {}",
            loaded,
            dir.as_ref().display()
        );
        Ok(loaded)
    }
}

impl std::fmt::Debug for RuleSetCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSetCatalog")
            .field("sets", &self.sets.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// File Loading
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Option<FileFormat> {
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "json" => Some(FileFormat::Json),
        "yaml" | "yml" => Some(FileFormat::Yaml),
        _ => None,
    }
}

/// Read a rule set file; an empty `name` falls back to the file stem
pub fn read_rule_set(path: &Path) -> Result<DeclaredRuleSet> {
    let format =
        format_of(path).ok_or_else(|| ValidatorError::UnsupportedFormat(path.to_path_buf()))?;

    let content = std::fs::read_to_string(path).map_err(|source| ValidatorError::RuleSetIo {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed = match format {
        FileFormat::Json => serde_json::from_str::<DeclaredRuleSet>(&content).map_err(|e| e.to_string()),
        FileFormat::Yaml => serde_yaml::from_str::<DeclaredRuleSet>(&content).map_err(|e| e.to_string()),
    };
    let mut set = parsed.map_err(|reason| ValidatorError::RuleSetParse {
        path: path.to_path_buf(),
        reason,
    })?;

    if set.name.is_empty() {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            set.name = stem.to_string();
        }
    }

    tracing::debug!(
        "Read rule set '{}' from {} ({} attribute(s))",
        set.name,
        path.display(),
        set.rules.len()
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut catalog = RuleSetCatalog::new();
        catalog
            .register(DeclaredRuleSet::new("login").rule("email", "required|email"))
            .unwrap();

        assert!(catalog.contains("login"));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("login").unwrap().rules().len(), 1);
        assert!(matches!(
            catalog.get("signup"),
            Err(ValidatorError::UnknownRuleSet(name)) if name == "signup"
        ));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut catalog = RuleSetCatalog::new();
        catalog.register(DeclaredRuleSet::new("login")).unwrap();
        let err = catalog.register(DeclaredRuleSet::new("login")).unwrap_err();
        assert!(matches!(err, ValidatorError::DuplicateRuleSet(name) if name == "login"));
    }

    #[test]
    fn test_format_of() {
        assert_eq!(format_of(Path::new("a/b.json")), Some(FileFormat::Json));
        assert_eq!(format_of(Path::new("a/b.YML")), Some(FileFormat::Yaml));
        assert_eq!(format_of(Path::new("a/b.toml")), None);
        assert_eq!(format_of(Path::new("a/b")), None);
    }

    #[test]
    fn test_read_unsupported_format() {
        let err = read_rule_set(Path::new("rules/signup.toml")).unwrap_err();
        assert!(matches!(err, ValidatorError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_names_sorted() {
        let mut catalog = RuleSetCatalog::new();
        catalog.register(DeclaredRuleSet::new("zeta")).unwrap();
        catalog.register(DeclaredRuleSet::new("alpha")).unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
    }
}
