//! Outbound envelope construction and inbound message decoding.
//!
//! Every message pushed over a client connection is an `Envelope`: a type
//! tag, an optional payload, and an epoch-millisecond timestamp captured
//! when the envelope is built. Inbound traffic is decoded through
//! [`ClientMessage::decode`]; anything the protocol does not recognize
//! decodes to `None` and is dropped by the caller.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Greeting text sent once per connection, immediately after registration.
const GREETING: &str = "connected to switchyard";

/// Banner severity levels recognized by clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational notice.
    Info,
    /// Operation completed successfully.
    Success,
    /// Something needs attention but nothing failed.
    Warning,
    /// An operation failed.
    Error,
}

impl Severity {
    /// Wire string for this severity.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Typed payload of an outbound envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// One-off greeting sent to a newly registered connection.
    Connected {
        /// Human-readable greeting text.
        message: String,
    },
    /// Reply to a client `ping`.
    Pong,
    /// User-facing notice shown as a banner or toast.
    Banner {
        /// How prominently the client should render the notice.
        severity: Severity,
        /// Notice text.
        message: String,
    },
    /// A category of shared state changed; clients re-fetch on receipt.
    StateChanged {
        /// Caller-supplied kind string (e.g. `settings`, `proxies`).
        /// Any non-empty kind is accepted — new kinds need no changes here.
        kind: String,
    },
}

impl Payload {
    /// Wire `type` tag for this payload.
    pub fn wire_type(&self) -> String {
        match self {
            Self::Connected { .. } => "connected".into(),
            Self::Pong => "pong".into(),
            Self::Banner { .. } => "banner".into(),
            Self::StateChanged { kind } => format!("{kind}Changed"),
        }
    }

    /// Wire `data` field, if this payload carries one.
    fn data(&self) -> Option<Value> {
        match self {
            Self::Connected { message } => Some(json!({ "message": message })),
            Self::Banner { severity, message } => {
                Some(json!({ "severity": severity, "message": message }))
            }
            Self::Pong | Self::StateChanged { .. } => None,
        }
    }
}

/// The structured message unit exchanged over a connection.
///
/// Built, serialized, and discarded per send; never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// What this envelope announces.
    pub payload: Payload,
    /// Epoch milliseconds, captured at construction time.
    pub timestamp: i64,
}

impl Envelope {
    /// Build an envelope with the current timestamp.
    pub fn new(payload: Payload) -> Self {
        Self {
            payload,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Greeting envelope sent once per connection.
    pub fn connected() -> Self {
        Self::new(Payload::Connected {
            message: GREETING.into(),
        })
    }

    /// Keep-alive reply.
    pub fn pong() -> Self {
        Self::new(Payload::Pong)
    }

    /// User-facing banner notice.
    pub fn banner(severity: Severity, message: impl Into<String>) -> Self {
        Self::new(Payload::Banner {
            severity,
            message: message.into(),
        })
    }

    /// State-change notification for the given kind.
    pub fn state_change(kind: impl Into<String>) -> Self {
        Self::new(Payload::StateChanged { kind: kind.into() })
    }

    /// Encode to the wire shape `{ "type", "data"?, "timestamp" }`.
    ///
    /// `data` is omitted entirely for payloads that carry none.
    pub fn to_wire(&self) -> Value {
        let mut wire = json!({
            "type": self.payload.wire_type(),
            "timestamp": self.timestamp,
        });
        if let Some(data) = self.payload.data() {
            wire["data"] = data;
        }
        wire
    }

    /// Serialize the wire shape to a JSON string.
    pub fn to_json(&self) -> String {
        self.to_wire().to_string()
    }
}

/// Inbound messages the server recognizes.
///
/// The inbound protocol today is just the keep-alive probe; everything
/// else on the channel is outbound-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientMessage {
    /// Liveness probe; answered with a direct `pong`.
    Ping,
}

impl ClientMessage {
    /// Decode an inbound text frame.
    ///
    /// Returns `None` for undecodable JSON, non-object payloads, and any
    /// `type` the protocol does not recognize. Callers discard the `None`
    /// branch deliberately — a malformed frame gets no response and must
    /// never tear down the connection.
    pub fn decode(text: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(text).ok()?;
        match value.get("type")?.as_str()? {
            "ping" => Some(Self::Ping),
            _ => None,
        }
    }
}
