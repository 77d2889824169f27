//! # switchyard-store
//!
//! The state store service: typed entities for the five shared state
//! categories (settings, auths, proxies, certs, validation rules) and a
//! [`StateStore`] exposing `load`/`save` per kind over JSON files in a
//! data directory. The store persists; it never notifies — change
//! events are the route layer's responsibility.

#![deny(unsafe_code)]

pub mod errors;
pub mod kind;
pub mod store;
pub mod types;

pub use errors::{Result, StoreError};
pub use kind::StateKind;
pub use store::{deep_merge, StateStore};
pub use types::{
    AuthCredential, Certificate, ProxyConfig, ProxyScheme, RuleAction, Settings, ValidationRule,
};
