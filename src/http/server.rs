//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, metrics, CORS, body limit)
//! - Mount the WebSocket observer beside the API on the same listener
//! - Serve until the shutdown signal fires

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::dispatch::Dispatcher;
use crate::gateway::{EmailGateway, GatewayError, SendGridClient};
use crate::http::handlers::{send_from_my_bulb, SEND_PATH};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response::not_found;
use crate::http::websocket::{ws_handler, WS_PATH};
use crate::net::ConnectionRegistry;
use crate::observability::metrics;
use crate::security::{body_limit_layer, cors_layer, origin_gate, OriginPolicy};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub connections: Arc<ConnectionRegistry>,
}

/// HTTP + WebSocket server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
    connections: Arc<ConnectionRegistry>,
}

impl HttpServer {
    /// Create a server talking to SendGrid. Fails when the API key is missing.
    pub fn new(config: RelayConfig) -> Result<Self, GatewayError> {
        let gateway = Arc::new(SendGridClient::from_config(&config.email)?);
        Ok(Self::with_gateway(config, gateway))
    }

    /// Create a server with an explicit gateway implementation.
    pub fn with_gateway(config: RelayConfig, gateway: Arc<dyn EmailGateway>) -> Self {
        let connections = Arc::new(ConnectionRegistry::new());
        let state = AppState {
            dispatcher: Arc::new(Dispatcher::new(gateway, &config.email)),
            connections: connections.clone(),
        };

        let router = build_router(&config, state);
        Self {
            router,
            config,
            connections,
        }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// A clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The WebSocket connection registry.
    pub fn connections(&self) -> Arc<ConnectionRegistry> {
        self.connections.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
///
/// The cross-origin gate and body limit wrap the API routes only; `/ws` sits beside them.
pub fn build_router(config: &RelayConfig, state: AppState) -> Router {
    let policy = Arc::new(OriginPolicy::from_config(&config.cors));

    let api = Router::new()
        .route(SEND_PATH, post(send_from_my_bulb))
        .fallback(not_found)
        .layer(body_limit_layer())
        .layer(cors_layer(policy.clone()))
        .layer(middleware::from_fn_with_state(policy, origin_gate));

    let ws = Router::new().route(WS_PATH, get(ws_handler));

    Router::new()
        .merge(api)
        .merge(ws)
        .with_state(state)
        .layer(middleware::from_fn(metrics::track_http))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id_layer())
}
