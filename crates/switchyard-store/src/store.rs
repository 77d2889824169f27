//! JSON file persistence for the shared application state.
//!
//! One document per [`StateKind`] under a data directory. List kinds are
//! wrapped in a versioned document; settings are a bare object loaded by
//! deep-merging the file over compiled defaults. Every `save` rewrites the
//! whole document and returns the stored value.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, StoreError};
use crate::kind::StateKind;
use crate::types::{AuthCredential, Certificate, ProxyConfig, Settings, ValidationRule};

/// Storage format version written into list documents.
const STORAGE_VERSION: u32 = 1;

/// Versioned on-disk wrapper for list kinds.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document<T> {
    version: u32,
    updated_at: String,
    items: Vec<T>,
}

/// File-backed store for the five shared state categories.
///
/// Holds no state beyond the data directory path; every call reads or
/// writes the filesystem, and each call is atomic from the caller's
/// perspective (whole-document read or whole-document rewrite).
#[derive(Clone, Debug)]
pub struct StateStore {
    data_dir: PathBuf,
}

impl StateStore {
    /// Create a store rooted at `data_dir`. The directory is created on
    /// first save, not here.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The directory this store reads and writes.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, kind: StateKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Load settings, deep-merging the on-disk document over defaults.
    ///
    /// A missing file yields pure defaults; unparseable JSON is an error.
    pub fn load_settings(&self) -> Result<Settings> {
        let path = self.path(StateKind::Settings);
        let defaults = serde_json::to_value(Settings::default())?;

        let merged = if path.exists() {
            debug!(?path, "loading settings from file");
            let content = std::fs::read_to_string(&path)?;
            let user: Value = serde_json::from_str(&content)?;
            deep_merge(defaults, user)
        } else {
            debug!(?path, "settings file not found, using defaults");
            defaults
        };

        Ok(serde_json::from_value(merged)?)
    }

    /// Persist settings, returning the stored value.
    pub fn save_settings(&self, settings: &Settings) -> Result<Settings> {
        self.ensure_data_dir()?;
        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(self.path(StateKind::Settings), json)?;
        Ok(settings.clone())
    }

    // ── List kinds ──────────────────────────────────────────────────

    /// Load stored proxy credentials.
    pub fn load_auths(&self) -> Result<Vec<AuthCredential>> {
        self.load_items(StateKind::Auths)
    }

    /// Persist proxy credentials. The file is written with 0o600
    /// permissions on Unix — it contains passwords.
    pub fn save_auths(&self, auths: &[AuthCredential]) -> Result<Vec<AuthCredential>> {
        self.save_items(StateKind::Auths, auths, true)
    }

    /// Load proxy definitions.
    pub fn load_proxies(&self) -> Result<Vec<ProxyConfig>> {
        self.load_items(StateKind::Proxies)
    }

    /// Persist proxy definitions.
    pub fn save_proxies(&self, proxies: &[ProxyConfig]) -> Result<Vec<ProxyConfig>> {
        self.save_items(StateKind::Proxies, proxies, false)
    }

    /// Load CA certificates.
    pub fn load_certs(&self) -> Result<Vec<Certificate>> {
        self.load_items(StateKind::Certs)
    }

    /// Persist CA certificates.
    pub fn save_certs(&self, certs: &[Certificate]) -> Result<Vec<Certificate>> {
        self.save_items(StateKind::Certs, certs, false)
    }

    /// Load validation rules.
    pub fn load_validation_rules(&self) -> Result<Vec<ValidationRule>> {
        self.load_items(StateKind::ValidationRules)
    }

    /// Persist validation rules.
    pub fn save_validation_rules(
        &self,
        rules: &[ValidationRule],
    ) -> Result<Vec<ValidationRule>> {
        self.save_items(StateKind::ValidationRules, rules, false)
    }

    // ── Shared I/O ──────────────────────────────────────────────────

    fn load_items<T: DeserializeOwned>(&self, kind: StateKind) -> Result<Vec<T>> {
        let path = self.path(kind);
        if !path.exists() {
            debug!(%kind, "state file not found, returning empty set");
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&path)?;
        let doc: Document<T> = serde_json::from_str(&content)?;
        if doc.version != STORAGE_VERSION {
            return Err(StoreError::UnsupportedVersion(doc.version));
        }
        Ok(doc.items)
    }

    fn save_items<T: Serialize + Clone>(
        &self,
        kind: StateKind,
        items: &[T],
        restrict_permissions: bool,
    ) -> Result<Vec<T>> {
        self.ensure_data_dir()?;
        let doc = Document {
            version: STORAGE_VERSION,
            updated_at: chrono::Utc::now().to_rfc3339(),
            items: items.to_vec(),
        };
        let json = serde_json::to_string_pretty(&doc)?;
        let path = self.path(kind);
        std::fs::write(&path, &json)?;

        #[cfg(unix)]
        if restrict_permissions {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&path, perms);
        }
        #[cfg(not(unix))]
        let _ = restrict_permissions;

        debug!(%kind, count = items.len(), "state document saved");
        Ok(items.to_vec())
    }

    fn ensure_data_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}
