//! Entity kind identifiers.

use std::fmt;

/// The categories of shared state the store persists.
///
/// `as_str` yields the kind string used on the notification channel
/// (`<kind>Changed` event types are built from it).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// Application settings.
    Settings,
    /// Stored proxy credentials.
    Auths,
    /// Proxy definitions.
    Proxies,
    /// CA certificates.
    Certs,
    /// Request validation rules.
    ValidationRules,
}

impl StateKind {
    /// All kinds, in a stable order.
    pub const ALL: [Self; 5] = [
        Self::Settings,
        Self::Auths,
        Self::Proxies,
        Self::Certs,
        Self::ValidationRules,
    ];

    /// Wire kind string (camelCase, as clients see it).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Settings => "settings",
            Self::Auths => "auths",
            Self::Proxies => "proxies",
            Self::Certs => "certs",
            Self::ValidationRules => "validationRules",
        }
    }

    /// File name of this kind's document under the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Settings => "settings.json",
            Self::Auths => "auths.json",
            Self::Proxies => "proxies.json",
            Self::Certs => "certs.json",
            Self::ValidationRules => "validation-rules.json",
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_strings() {
        assert_eq!(StateKind::Settings.as_str(), "settings");
        assert_eq!(StateKind::Auths.as_str(), "auths");
        assert_eq!(StateKind::Proxies.as_str(), "proxies");
        assert_eq!(StateKind::Certs.as_str(), "certs");
        assert_eq!(StateKind::ValidationRules.as_str(), "validationRules");
    }

    #[test]
    fn file_names_are_distinct() {
        let mut names: Vec<&str> = StateKind::ALL.iter().map(|k| k.file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), StateKind::ALL.len());
    }

    #[test]
    fn display_matches_wire_string() {
        for kind in StateKind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }
}
