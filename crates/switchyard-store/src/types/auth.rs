//! Stored proxy credentials.

use serde::{Deserialize, Serialize};

/// A username/password pair for an upstream proxy.
///
/// Persisted with restricted file permissions — see the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthCredential {
    /// Stable identifier, assigned by the client that created the entry.
    pub id: String,
    /// Proxy host this credential applies to.
    pub host: String,
    /// Proxy port, when the credential is port-specific.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Username.
    pub username: String,
    /// Password, stored as provided.
    pub password: String,
    /// Authentication realm, when the proxy advertises one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
}
