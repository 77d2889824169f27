//! Server configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the Switchyard server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `0` for auto-assign).
    pub port: u16,
    /// Directory holding the state documents.
    pub data_dir: PathBuf,
    /// Maximum concurrent WebSocket connections.
    pub max_connections: usize,
    /// Per-connection outbound queue depth before sends are dropped.
    pub send_queue_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            data_dir: default_data_dir(),
            max_connections: 50,
            send_queue_size: 256,
        }
    }
}

/// Resolve the default data directory (`~/.switchyard`).
pub fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".switchyard")
}

/// Apply environment variable overrides to a config.
///
/// Each variable has strict parsing rules; invalid values are silently
/// ignored (the existing value stands):
/// - `SWITCHYARD_HOST` — bind address
/// - `SWITCHYARD_PORT` — 1..=65535
/// - `SWITCHYARD_DATA_DIR` — state directory
/// - `SWITCHYARD_MAX_CONNECTIONS` — 1..=10000
pub fn apply_env_overrides(config: &mut ServerConfig) {
    if let Some(v) = read_env_string("SWITCHYARD_HOST") {
        config.host = v;
    }
    if let Some(v) = read_env_string("SWITCHYARD_PORT").and_then(|v| parse_u16_range(&v, 1, 65535))
    {
        config.port = v;
    }
    if let Some(v) = read_env_string("SWITCHYARD_DATA_DIR") {
        config.data_dir = PathBuf::from(v);
    }
    if let Some(v) = read_env_string("SWITCHYARD_MAX_CONNECTIONS")
        .and_then(|v| parse_usize_range(&v, 1, 10_000))
    {
        config.max_connections = v;
    }
}

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
