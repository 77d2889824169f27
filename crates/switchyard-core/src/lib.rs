//! # switchyard-core
//!
//! Wire envelope model for the Switchyard notification channel:
//! - Outbound envelopes (`connected`, `pong`, `banner`, `<kind>Changed`)
//!   as a tagged union with explicit wire encoding
//! - Inbound message decoding (the protocol recognizes only `ping`)

#![deny(unsafe_code)]

pub mod envelope;

pub use envelope::{ClientMessage, Envelope, Payload, Severity};
