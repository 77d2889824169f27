//! Request validation rules.

use serde::{Deserialize, Serialize};

/// What a matching rule does with the request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    /// Let the request through.
    #[default]
    Allow,
    /// Block the request.
    Deny,
}

/// A host-pattern rule evaluated against outgoing requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    /// Stable identifier, assigned by the client that created the entry.
    pub id: String,
    /// Host pattern the rule matches (e.g. `*.example.com`).
    pub pattern: String,
    /// Action taken on match.
    #[serde(default)]
    pub action: RuleAction,
    /// Disabled rules are kept but never evaluated.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Optional human-readable note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_enabled() -> bool {
    true
}
