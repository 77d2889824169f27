//! Typed entities for the five shared state categories.

mod auth;
mod cert;
mod proxy;
mod rules;
mod settings;

pub use auth::AuthCredential;
pub use cert::Certificate;
pub use proxy::{ProxyConfig, ProxyScheme};
pub use rules::{RuleAction, ValidationRule};
pub use settings::{GeneralSettings, NotificationSettings, Settings};
