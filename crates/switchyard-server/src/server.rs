//! `SwitchyardServer` — axum HTTP + WebSocket server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use switchyard_core::Severity;
use switchyard_store::StateStore;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api;
use crate::config::ServerConfig;
use crate::health::{self, HealthResponse};
use crate::shutdown::ShutdownCoordinator;
use crate::ws::broadcast::Broadcaster;
use crate::ws::session::run_session;

/// Shared state accessible from axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// The state store service.
    pub store: Arc<StateStore>,
    /// Connection registry and envelope fan-out.
    pub broadcast: Arc<Broadcaster>,
    /// Shutdown coordinator.
    pub shutdown: Arc<ShutdownCoordinator>,
    /// When the server started.
    pub start_time: Instant,
    /// Handle for rendering `/metrics`.
    pub metrics: PrometheusHandle,
    /// Server configuration.
    pub config: ServerConfig,
}

/// The main Switchyard server.
pub struct SwitchyardServer {
    config: ServerConfig,
    store: Arc<StateStore>,
    broadcast: Arc<Broadcaster>,
    shutdown: Arc<ShutdownCoordinator>,
    start_time: Instant,
    metrics: PrometheusHandle,
}

impl SwitchyardServer {
    /// Create a new server.
    pub fn new(config: ServerConfig, store: StateStore, metrics: PrometheusHandle) -> Self {
        Self {
            config,
            store: Arc::new(store),
            broadcast: Arc::new(Broadcaster::new()),
            shutdown: Arc::new(ShutdownCoordinator::new()),
            start_time: Instant::now(),
            metrics,
        }
    }

    /// Build the axum router with all routes.
    pub fn router(&self) -> Router {
        let state = AppState {
            store: self.store.clone(),
            broadcast: self.broadcast.clone(),
            shutdown: self.shutdown.clone(),
            start_time: self.start_time,
            metrics: self.metrics.clone(),
            config: self.config.clone(),
        };

        Router::new()
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .route("/ws", get(ws_handler))
            .route(
                "/api/settings",
                get(api::state::get_settings).put(api::state::put_settings),
            )
            .route(
                "/api/auths",
                get(api::state::get_auths).put(api::state::put_auths),
            )
            .route(
                "/api/proxies",
                get(api::state::get_proxies).put(api::state::put_proxies),
            )
            .route(
                "/api/certs",
                get(api::state::get_certs).put(api::state::put_certs),
            )
            .route(
                "/api/validation-rules",
                get(api::state::get_validation_rules).put(api::state::put_validation_rules),
            )
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Bind and serve until the shutdown token fires.
    ///
    /// Returns the bound address (useful with port `0`) and the serve task
    /// handle.
    pub async fn listen(&self) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;

        let app = self.router();
        let token = self.shutdown.token();
        let handle = tokio::spawn(async move {
            let serve = axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await });
            if let Err(e) = serve.await {
                tracing::error!(error = %e, "server error");
            }
        });

        info!(%local_addr, "listening");
        Ok((local_addr, handle))
    }

    /// Announce shutdown to connected clients and drain the registry.
    pub async fn drain_connections(&self) {
        self.broadcast
            .emit_banner(Severity::Warning, "Server is shutting down")
            .await;
        self.broadcast.drain().await;
    }

    /// Get the broadcaster.
    pub fn broadcast(&self) -> &Arc<Broadcaster> {
        &self.broadcast
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the state store.
    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let connections = state.broadcast.connection_count();
    Json(health::health_check(state.start_time, connections))
}

/// GET /metrics
async fn metrics_handler(State(state): State<AppState>) -> String {
    crate::metrics::render(&state.metrics)
}

/// GET /ws — upgrade to a WebSocket session.
async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    if state.broadcast.connection_count() >= state.config.max_connections {
        tracing::warn!(
            max = state.config.max_connections,
            "connection limit reached, refusing upgrade"
        );
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let client_id = uuid::Uuid::now_v7().to_string();
    let broadcast = state.broadcast.clone();
    let queue_size = state.config.send_queue_size;
    ws.on_upgrade(move |socket| run_session(socket, client_id, broadcast, queue_size))
}
