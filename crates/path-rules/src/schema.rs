use serde::{Deserialize, Serialize};

/// Filter rule set as written by the operator.
///
/// Both lists hold regular-expression strings in standard `regex` crate
/// syntax and default to empty when absent from the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Patterns whose match against a request path marks it for rejection.
    #[serde(default)]
    pub block: Vec<String>,
    /// Patterns whose match overrides the rejection of an already-blocked
    /// path.  Never consulted for paths the block list did not match.
    #[serde(default)]
    pub allow: Vec<String>,
}
