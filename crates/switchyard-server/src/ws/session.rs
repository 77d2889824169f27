//! WebSocket session lifecycle — handles a single connected client from
//! upgrade through disconnect.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use metrics::{counter, gauge, histogram};
use switchyard_core::{ClientMessage, Envelope};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::broadcast::Broadcaster;
use super::connection::ClientConnection;
use crate::metrics::{
    WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_CONNECTION_DURATION_SECONDS,
    WS_DISCONNECTIONS_TOTAL,
};

/// Run a WebSocket session for a connected client.
///
/// 1. Registers the connection, then sends the `connected` greeting
///    directly to this socket (the only message that bypasses the bus)
/// 2. Answers inbound `ping` envelopes with a direct `pong`; everything
///    else inbound is decoded and deliberately discarded
/// 3. Forwards bus envelopes via the send channel
/// 4. Deregisters on close or transport error
#[instrument(skip_all, fields(client_id = %client_id))]
pub async fn run_session(
    ws: WebSocket,
    client_id: String,
    broadcast: Arc<Broadcaster>,
    send_queue_size: usize,
) {
    let (mut ws_tx, mut ws_rx) = ws.split();

    let (send_tx, mut send_rx) = mpsc::channel::<Arc<String>>(send_queue_size);
    let connection = Arc::new(ClientConnection::new(client_id.clone(), send_tx));

    let connection_start = std::time::Instant::now();
    info!(client_id, "client connected");
    counter!(WS_CONNECTIONS_TOTAL).increment(1);
    gauge!(WS_CONNECTIONS_ACTIVE).increment(1.0);

    broadcast.register(connection.clone()).await;

    // Greeting goes straight to this socket, never through the bus.
    let greeting = Envelope::connected().to_json();
    let _ = ws_tx.send(Message::Text(greeting.into())).await;

    // Outbound forwarder: drains the send channel into the socket.
    let outbound = tokio::spawn(async move {
        while let Some(text) = send_rx.recv().await {
            if ws_tx
                .send(Message::Text(text.as_str().to_owned().into()))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    // Inbound loop
    while let Some(msg) = ws_rx.next().await {
        let msg = match msg {
            Ok(m) => m,
            Err(e) => {
                warn!(client_id, error = %e, "websocket transport error");
                break;
            }
        };

        // Extract text from either Text or Binary frames
        let text = match msg {
            Message::Text(ref t) => Some(t.to_string()),
            Message::Binary(ref data) => match std::str::from_utf8(data) {
                Ok(s) => Some(s.to_string()),
                Err(_) => {
                    debug!(client_id, len = data.len(), "ignoring non-UTF8 binary frame");
                    None
                }
            },
            Message::Close(_) => {
                info!(client_id, "client sent close frame");
                break;
            }
            Message::Ping(_) | Message::Pong(_) => None,
        };

        let Some(text) = text else { continue };

        match ClientMessage::decode(&text) {
            Some(ClientMessage::Ping) => {
                // Reply on this connection only; no broadcast side effect.
                if !connection.send(Arc::new(Envelope::pong().to_json())) {
                    debug!(client_id, "failed to enqueue pong (channel full or closed)");
                }
            }
            // Malformed or unrecognized payloads get no response and
            // never tear down the connection.
            None => debug!(client_id, "ignoring unrecognized inbound message"),
        }
    }

    // Clean up
    info!(client_id, "client disconnected");
    counter!(WS_DISCONNECTIONS_TOTAL).increment(1);
    gauge!(WS_CONNECTIONS_ACTIVE).decrement(1.0);
    histogram!(WS_CONNECTION_DURATION_SECONDS).record(connection_start.elapsed().as_secs_f64());
    outbound.abort();
    broadcast.deregister(&client_id).await;
}
