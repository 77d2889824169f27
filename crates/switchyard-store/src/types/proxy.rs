//! Proxy definitions.

use serde::{Deserialize, Serialize};

/// Supported proxy protocols.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyScheme {
    /// Plain HTTP proxy.
    #[default]
    Http,
    /// HTTP proxy over TLS.
    Https,
    /// SOCKS4 proxy.
    Socks4,
    /// SOCKS5 proxy.
    Socks5,
}

/// A user-defined proxy endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfig {
    /// Stable identifier, assigned by the client that created the entry.
    pub id: String,
    /// Display name.
    pub label: String,
    /// Protocol spoken to the proxy.
    #[serde(default)]
    pub scheme: ProxyScheme,
    /// Proxy host.
    pub host: String,
    /// Proxy port.
    pub port: u16,
    /// Credential to present, referencing an `AuthCredential` id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_id: Option<String>,
    /// Host patterns that bypass this proxy.
    #[serde(default)]
    pub bypass_list: Vec<String>,
}
