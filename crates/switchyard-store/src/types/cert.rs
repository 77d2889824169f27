//! CA certificates trusted for proxy interception.

use serde::{Deserialize, Serialize};

/// A PEM-encoded CA certificate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    /// Stable identifier, assigned by the client that created the entry.
    pub id: String,
    /// Display name.
    pub label: String,
    /// The certificate in PEM form, stored verbatim.
    pub pem: String,
    /// RFC 3339 timestamp of when the certificate was added.
    pub added_at: String,
}
