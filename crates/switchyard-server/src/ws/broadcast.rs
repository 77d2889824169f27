//! Connection registry and envelope fan-out.
//!
//! The `Broadcaster` is the single live-connection registry for the
//! process. It is created once at server start, handed to route and
//! connection handlers through shared state, and drained at shutdown.
//! Membership changes only through `register`/`deregister` — broadcast
//! never evicts, so a transiently unwritable connection that recovers
//! keeps receiving later envelopes.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use metrics::counter;
use switchyard_core::{Envelope, Severity};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::connection::ClientConnection;
use crate::metrics::{STATE_CHANGES_TOTAL, WS_BROADCAST_DROPS_TOTAL};

/// Registry of connected clients plus best-effort envelope fan-out.
pub struct Broadcaster {
    /// Connected clients indexed by connection ID.
    connections: RwLock<HashMap<String, Arc<ClientConnection>>>,
    /// Atomic counter tracking total connections (avoids read-locking for count queries).
    active_count: AtomicUsize,
}

impl Broadcaster {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            active_count: AtomicUsize::new(0),
        }
    }

    /// Add a connection to the live set.
    ///
    /// Registration alone sends nothing — the greeting is the session's
    /// responsibility.
    pub async fn register(&self, connection: Arc<ClientConnection>) {
        let mut conns = self.connections.write().await;
        if conns.insert(connection.id.clone(), connection).is_none() {
            let _ = self.active_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Remove a connection by ID. Removing an absent connection is a no-op.
    pub async fn deregister(&self, connection_id: &str) {
        let mut conns = self.connections.write().await;
        if conns.remove(connection_id).is_some() {
            let _ = self.active_count.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Number of active connections. For observability only — never a
    /// control decision.
    pub fn connection_count(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }

    /// Serialize an envelope once and push it to every registered client.
    ///
    /// Delivery is at-most-once and best-effort: a member whose channel is
    /// full or closed is skipped (and stays registered), and a failed send
    /// to one member never aborts delivery to the rest.
    pub async fn broadcast(&self, envelope: &Envelope) {
        let json = Arc::new(envelope.to_json());
        let conns = self.connections.read().await;
        let mut recipients = 0u32;
        for conn in conns.values() {
            if conn.send(Arc::clone(&json)) {
                recipients += 1;
            } else {
                counter!(WS_BROADCAST_DROPS_TOTAL).increment(1);
                warn!(
                    conn_id = %conn.id,
                    total_drops = conn.drop_count(),
                    "failed to send envelope to client (channel full or closed), skipping"
                );
            }
        }
        debug!(
            event_type = %envelope.payload.wire_type(),
            recipients,
            "broadcast envelope"
        );
    }

    /// Announce that the shared state of `kind` changed.
    pub async fn emit_state_change(&self, kind: &str) {
        counter!(STATE_CHANGES_TOTAL, "kind" => kind.to_owned()).increment(1);
        self.broadcast(&Envelope::state_change(kind)).await;
    }

    /// Push a user-facing banner notice to every client.
    pub async fn emit_banner(&self, severity: Severity, message: &str) {
        self.broadcast(&Envelope::banner(severity, message)).await;
    }

    /// Clear the registry. Called once at shutdown; dropping the handles
    /// closes each session's send channel.
    pub async fn drain(&self) {
        let mut conns = self.connections.write().await;
        let drained = conns.len();
        conns.clear();
        self.active_count.store(0, Ordering::Relaxed);
        debug!(drained, "connection registry drained");
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tokio::sync::mpsc;

    fn make_connection(id: &str) -> (Arc<ClientConnection>, mpsc::Receiver<Arc<String>>) {
        let (tx, rx) = mpsc::channel(32);
        (Arc::new(ClientConnection::new(id.into(), tx)), rx)
    }

    fn parse(msg: &Arc<String>) -> Value {
        serde_json::from_str(msg).unwrap()
    }

    #[tokio::test]
    async fn register_connection() {
        let bus = Broadcaster::new();
        let (conn, _rx) = make_connection("c1");
        bus.register(conn).await;
        assert_eq!(bus.connection_count(), 1);
    }

    #[tokio::test]
    async fn deregister_connection() {
        let bus = Broadcaster::new();
        let (conn, _rx) = make_connection("c1");
        bus.register(conn).await;
        bus.deregister("c1").await;
        assert_eq!(bus.connection_count(), 0);
    }

    #[tokio::test]
    async fn deregister_absent_is_noop() {
        let bus = Broadcaster::new();
        bus.deregister("no_such").await;
        assert_eq!(bus.connection_count(), 0);
        // And again, for good measure
        bus.deregister("no_such").await;
        assert_eq!(bus.connection_count(), 0);
    }

    #[tokio::test]
    async fn register_same_id_does_not_double_count() {
        let bus = Broadcaster::new();
        let (c1, _rx1) = make_connection("same");
        let (c2, _rx2) = make_connection("same");
        bus.register(c1).await;
        bus.register(c2).await;
        assert_eq!(bus.connection_count(), 1);
    }

    #[tokio::test]
    async fn membership_after_sequence() {
        let bus = Broadcaster::new();
        let (c1, _rx1) = make_connection("c1");
        let (c2, _rx2) = make_connection("c2");
        let (c3, _rx3) = make_connection("c3");
        bus.register(c1).await;
        bus.register(c2).await;
        bus.register(c3).await;
        bus.deregister("c2").await;
        bus.deregister("missing").await;
        assert_eq!(bus.connection_count(), 2);
    }

    #[tokio::test]
    async fn broadcast_reaches_all_members() {
        let bus = Broadcaster::new();
        let (c1, mut rx1) = make_connection("c1");
        let (c2, mut rx2) = make_connection("c2");
        bus.register(c1).await;
        bus.register(c2).await;

        bus.broadcast(&Envelope::state_change("settings")).await;

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[tokio::test]
    async fn broadcast_to_empty_registry() {
        let bus = Broadcaster::new();
        // Should not panic
        bus.broadcast(&Envelope::state_change("settings")).await;
    }

    #[tokio::test]
    async fn broadcast_serializes_once_and_shares() {
        let bus = Broadcaster::new();
        let (c1, mut rx1) = make_connection("c1");
        let (c2, mut rx2) = make_connection("c2");
        bus.register(c1).await;
        bus.register(c2).await;

        bus.broadcast(&Envelope::state_change("proxies")).await;

        let msg1 = rx1.recv().await.unwrap();
        let msg2 = rx2.recv().await.unwrap();
        // Every member gets the identical serialized bytes (same Arc)
        assert!(Arc::ptr_eq(&msg1, &msg2));
        assert_eq!(&*msg1, &*msg2);
    }

    #[tokio::test]
    async fn emit_state_change_wire_shape() {
        let bus = Broadcaster::new();
        let (conn, mut rx) = make_connection("c1");
        bus.register(conn).await;

        bus.emit_state_change("proxies").await;

        let msg = parse(&rx.recv().await.unwrap());
        assert_eq!(msg["type"], "proxiesChanged");
        assert!(msg.get("data").is_none());
        assert!(msg["timestamp"].is_i64());
    }

    #[tokio::test]
    async fn emit_banner_wire_shape() {
        let bus = Broadcaster::new();
        let (conn, mut rx) = make_connection("c1");
        bus.register(conn).await;

        bus.emit_banner(Severity::Error, "X failed").await;

        let msg = parse(&rx.recv().await.unwrap());
        assert_eq!(msg["type"], "banner");
        assert_eq!(msg["data"]["severity"], "error");
        assert_eq!(msg["data"]["message"], "X failed");
    }

    #[tokio::test]
    async fn unwritable_member_skipped_but_stays_registered() {
        let bus = Broadcaster::new();
        // A member with a single-slot queue that is already full
        let (tx, _rx) = mpsc::channel(1);
        let stuck = Arc::new(ClientConnection::new("stuck".into(), tx));
        assert!(stuck.send(Arc::new("filler".into())));
        let (healthy, mut healthy_rx) = make_connection("healthy");

        bus.register(stuck).await;
        bus.register(healthy).await;

        bus.emit_state_change("settings").await;

        // Healthy member got the envelope, stuck one was skipped,
        // and nobody was evicted.
        assert!(healthy_rx.try_recv().is_ok());
        assert_eq!(bus.connection_count(), 2);
    }

    #[tokio::test]
    async fn send_failure_does_not_abort_remaining_deliveries() {
        let bus = Broadcaster::new();
        // Closed channel: every send fails
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let dead = Arc::new(ClientConnection::new("dead".into(), tx));
        let (alive1, mut rx1) = make_connection("alive1");
        let (alive2, mut rx2) = make_connection("alive2");

        bus.register(dead).await;
        bus.register(alive1).await;
        bus.register(alive2).await;

        bus.emit_state_change("certs").await;

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
        assert_eq!(bus.connection_count(), 3);
    }

    #[tokio::test]
    async fn member_registered_after_broadcast_receives_nothing() {
        let bus = Broadcaster::new();
        let (early, mut early_rx) = make_connection("early");
        bus.register(early).await;

        bus.emit_state_change("auths").await;

        let (late, mut late_rx) = make_connection("late");
        bus.register(late).await;

        assert!(early_rx.try_recv().is_ok());
        // No retroactive delivery
        assert!(late_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn envelopes_issued_in_call_order() {
        let bus = Broadcaster::new();
        let (conn, mut rx) = make_connection("c1");
        bus.register(conn).await;

        bus.emit_state_change("settings").await;
        bus.emit_state_change("proxies").await;
        bus.emit_banner(Severity::Info, "done").await;

        let first = parse(&rx.recv().await.unwrap());
        let second = parse(&rx.recv().await.unwrap());
        let third = parse(&rx.recv().await.unwrap());
        assert_eq!(first["type"], "settingsChanged");
        assert_eq!(second["type"], "proxiesChanged");
        assert_eq!(third["type"], "banner");
    }

    #[tokio::test]
    async fn drain_clears_registry() {
        let bus = Broadcaster::new();
        let (c1, _rx1) = make_connection("c1");
        let (c2, _rx2) = make_connection("c2");
        bus.register(c1).await;
        bus.register(c2).await;
        assert_eq!(bus.connection_count(), 2);

        bus.drain().await;
        assert_eq!(bus.connection_count(), 0);

        // A broadcast after drain reaches nobody and does not panic
        bus.emit_state_change("settings").await;
    }

    #[tokio::test]
    async fn default_broadcaster_is_empty() {
        let bus = Broadcaster::default();
        assert_eq!(bus.connection_count(), 0);
    }
}
