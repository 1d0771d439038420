//! Configuration options for engine behavior

// ============================================================================
// Engine Config
// ============================================================================

/// Configuration options for the standard engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Stop evaluating further attributes after the first failing one
    pub stop_on_first_failure: bool,

    /// Stop each attribute at its first failing rule, as if every spec
    /// started with `bail`
    pub bail_by_default: bool,

    /// Replace `_` with spaces when filling `:attribute`
    pub humanize_attributes: bool,

    /// Trim string values before running rules
    pub trim_strings: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stop_on_first_failure: false,
            bail_by_default: false,
            humanize_attributes: true,
            trim_strings: false,
        }
    }
}

impl EngineConfig {
    /// Create a new engine config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after the first failing attribute
    pub fn stop_on_first_failure(mut self, stop: bool) -> Self {
        self.stop_on_first_failure = stop;
        self
    }

    /// Stop each attribute at its first failure
    pub fn bail_by_default(mut self, bail: bool) -> Self {
        self.bail_by_default = bail;
        self
    }

    /// Humanize attribute names in messages
    pub fn humanize_attributes(mut self, humanize: bool) -> Self {
        self.humanize_attributes = humanize;
        self
    }

    /// Trim strings before checking them
    pub fn trim_strings(mut self, trim: bool) -> Self {
        self.trim_strings = trim;
        self
    }

    /// Display name for an attribute according to config
    pub fn display_attribute(&self, attribute: &str) -> String {
        if self.humanize_attributes {
            attribute.replace('_', " ")
        } else {
            attribute.to_string()
        }
    }
}
