//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use mail_relay::config::{OriginMatchMode, RecipientMode, RelayConfig};
use mail_relay::gateway::{EmailGateway, GatewayError, SendRequest, SendResult};
use mail_relay::net::ConnectionRegistry;
use mail_relay::{HttpServer, Shutdown};
use serde_json::Value;

/// In-memory gateway that records every request.
#[derive(Clone, Default)]
pub struct RecordingGateway {
    calls: Arc<Mutex<Vec<SendRequest>>>,
    fail_with: Option<u16>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every send with a provider rejection carrying `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<SendRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailGateway for RecordingGateway {
    async fn send(&self, request: &SendRequest) -> Result<SendResult, GatewayError> {
        self.calls.lock().unwrap().push(request.clone());
        match self.fail_with {
            Some(status) => Err(GatewayError::Rejected {
                status,
                body: r#"{"errors":[{"message":"secret provider detail"}]}"#.to_string(),
            }),
            None => Ok(SendResult { status_code: 202 }),
        }
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Configuration accepted by validation, bound to an ephemeral local port.
pub fn test_config() -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.email.sender = "noreply@example.com".into();
    config.email.api_key = Some("SG.test-key".into());
    config.email.recipient_mode = RecipientMode::Submitter;
    config.cors.allowed_origins = "https://example.com,http://localhost:5173".into();
    config.cors.match_mode = OriginMatchMode::Exact;
    config
}

/// A valid contact form.
pub fn valid_form() -> Value {
    serde_json::json!({
        "email": "a@b.com",
        "name": "Jo",
        "ecole": "X",
        "post": "Dev",
        "message": "hi"
    })
}

/// Build a JSON POST request for the contact-form endpoint.
pub fn form_request(payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(mail_relay::http::SEND_PATH)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

/// Read a JSON response body.
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// A relay running on a real socket.
pub struct RunningRelay {
    pub addr: SocketAddr,
    pub connections: Arc<ConnectionRegistry>,
    pub shutdown: Shutdown,
}

impl RunningRelay {
    pub fn ws_url(&self) -> String {
        format!("ws://{}{}", self.addr, mail_relay::http::WS_PATH)
    }
}

impl Drop for RunningRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a relay with `gateway` on an ephemeral port.
pub async fn start_relay(config: RelayConfig, gateway: RecordingGateway) -> RunningRelay {
    let server = HttpServer::with_gateway(config, Arc::new(gateway));
    let connections = server.connections();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Give the accept loop a moment
    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningRelay {
        addr,
        connections,
        shutdown,
    }
}
