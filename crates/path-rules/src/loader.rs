use std::path::Path;

use anyhow::{Context, Result};

use crate::schema::RuleConfig;

/// Load a [`RuleConfig`] from a YAML file on disk.
///
/// The loader only reads and parses; pattern compilation happens in
/// [`RuleEngine::new`](crate::RuleEngine::new) so that syntax errors carry
/// the offending pattern rather than a file position.
pub fn load_rules(path: impl AsRef<Path>) -> Result<RuleConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file: {}", path.display()))?;
    load_rules_from_str(&contents)
        .with_context(|| format!("failed to parse rules file: {}", path.display()))
}

/// Parse a [`RuleConfig`] from a YAML string.
///
/// This is the primary entry point used in tests.
pub fn load_rules_from_str(yaml: &str) -> Result<RuleConfig> {
    let config: RuleConfig = serde_yml::from_str(yaml).context("YAML deserialization failed")?;
    Ok(config)
}
