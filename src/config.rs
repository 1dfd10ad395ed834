//! Rule configuration, loadable from a `flowlint.toml` file.

use crate::diagnostics::LintError;
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Tuning knobs for the ordering analysis.
///
/// The accessor allowlist is a naming convention, not an effect proof: calls
/// whose callee name starts with one of the prefixes (followed by an
/// uppercase letter or digit, e.g. `useMemo` for prefix `use`) are assumed to
/// be referentially stable accessors. They are never reported as movable side
/// effects, and `accessors_are_pure` additionally lets the purity classifier
/// accept them inside initializers when scanning for movement barriers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleConfig {
    pub accessor_prefixes: Vec<String>,
    pub accessors_are_pure: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            accessor_prefixes: vec!["use".to_string()],
            accessors_are_pure: false,
        }
    }
}

impl RuleConfig {
    /// Does `name` match the accessor naming convention?
    pub fn is_accessor_name(&self, name: &str) -> bool {
        self.accessor_prefixes.iter().any(|prefix| {
            name.strip_prefix(prefix.as_str())
                .and_then(|rest| rest.chars().next())
                .is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        })
    }

    /// Load a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, LintError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LintError::io(format!("could not read config: {e}"), path.to_path_buf())
        })?;
        toml::from_str(&content).map_err(|e| {
            LintError::config(format!("invalid config: {e}"), path.to_path_buf())
        })
    }
}
