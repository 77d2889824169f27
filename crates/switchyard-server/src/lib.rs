//! # switchyard-server
//!
//! Axum HTTP + `WebSocket` server and state-change broadcasting.
//!
//! - REST routes: load/save per shared-state kind, health check, metrics
//! - `WebSocket` gateway: connection registry, greeting, keep-alive,
//!   best-effort fan-out of state-change and banner envelopes
//! - Graceful shutdown via `tokio::signal` + `CancellationToken`

#![deny(unsafe_code)]

pub mod api;
pub mod config;
pub mod health;
pub mod metrics;
pub mod server;
pub mod shutdown;
pub mod ws;
