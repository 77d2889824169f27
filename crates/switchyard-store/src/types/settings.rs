//! Application settings shared between the daemon and its UIs.

use serde::{Deserialize, Serialize};

/// Top-level settings document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// General proxy behavior.
    pub general: GeneralSettings,
    /// In-app notification behavior.
    pub notifications: NotificationSettings,
}

/// General proxy behavior settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    /// The proxy definition currently applied, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_proxy_id: Option<String>,
    /// Apply proxy changes immediately on save.
    pub auto_apply: bool,
    /// Fall back to a direct connection when the active proxy is unreachable.
    pub fallback_direct: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            active_proxy_id: None,
            auto_apply: true,
            fallback_direct: true,
        }
    }
}

/// In-app notification behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    /// Whether clients should surface banner notices at all.
    pub enabled: bool,
    /// How long a banner stays visible, in milliseconds.
    pub banner_timeout_ms: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            banner_timeout_ms: 5_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert!(s.general.active_proxy_id.is_none());
        assert!(s.general.auto_apply);
        assert!(s.general.fallback_direct);
        assert!(s.notifications.enabled);
        assert_eq!(s.notifications.banner_timeout_ms, 5_000);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert!(json["general"]["autoApply"].is_boolean());
        assert!(json["notifications"]["bannerTimeoutMs"].is_number());
    }

    #[test]
    fn absent_active_proxy_omitted() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(!json.contains("activeProxyId"));
    }

    #[test]
    fn partial_document_fills_defaults() {
        let s: Settings =
            serde_json::from_str(r#"{"general":{"autoApply":false}}"#).unwrap();
        assert!(!s.general.auto_apply);
        // Untouched fields keep defaults
        assert!(s.general.fallback_direct);
        assert!(s.notifications.enabled);
    }

    #[test]
    fn roundtrip() {
        let mut s = Settings::default();
        s.general.active_proxy_id = Some("px_1".into());
        s.notifications.banner_timeout_ms = 2_500;
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
