//! Email gateway subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher
//!     → SendRequest (normalized, provider-agnostic)
//!     → EmailGateway::send (one attempt, no retry)
//!     → SendResult { status_code } | GatewayError
//! ```
//!
//! # Design Decisions
//! - The gateway is a trait object so the dispatcher can be driven by a fake in tests
//! - Credentials are passed in at construction; there is no process-wide client
//! - Errors carry full provider detail; callers decide what to expose

pub mod sendgrid;

use async_trait::async_trait;
use thiserror::Error;

pub use sendgrid::SendGridClient;

/// Provider-agnostic outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub from: String,
    pub to: String,
    pub subject: String,
    /// Plain-text body, sent verbatim.
    pub body: String,
    pub reply_to: Option<String>,
}

/// Outcome of an accepted send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendResult {
    /// HTTP status the provider answered with (SendGrid uses 202).
    pub status_code: u16,
}

/// Errors raised while talking to the email provider.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No API key was supplied.
    #[error("provider credential is missing")]
    MissingCredential,

    /// The HTTP call itself failed (DNS, connect, TLS, body decode).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Anything that can deliver a [`SendRequest`].
#[async_trait]
pub trait EmailGateway: Send + Sync {
    /// Send one message.
    async fn send(&self, request: &SendRequest) -> Result<SendResult, GatewayError>;

    /// Short provider name for logs and metrics.
    fn name(&self) -> &'static str;
}
