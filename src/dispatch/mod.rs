//! Form dispatch: validate, compose, send.
//!
//! # Data Flow
//! ```text
//! JSON payload
//!     → form.rs (required fields, falsy check)
//!     → Dispatcher::compose (RecipientMode decides to/subject/reply_to)
//!     → EmailGateway::send (exactly once)
//!     → SendResult | DispatchError
//! ```

pub mod form;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::config::{EmailConfig, RecipientMode};
use crate::gateway::{EmailGateway, GatewayError, SendRequest, SendResult};
use crate::observability::metrics;

pub use form::{ContactForm, FormError, REQUIRED_FIELDS};

/// Why a submission was not sent.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    InvalidForm(#[from] FormError),

    #[error("email gateway failed: {0}")]
    Gateway(#[from] GatewayError),
}

/// Turns form submissions into provider calls.
pub struct Dispatcher {
    gateway: Arc<dyn EmailGateway>,
    sender: String,
    recipient_mode: RecipientMode,
}

impl Dispatcher {
    /// Create a dispatcher bound to a gateway and the email settings.
    pub fn new(gateway: Arc<dyn EmailGateway>, config: &EmailConfig) -> Self {
        Self {
            gateway,
            sender: config.sender.clone(),
            recipient_mode: config.recipient_mode,
        }
    }

    pub fn recipient_mode(&self) -> RecipientMode {
        self.recipient_mode
    }

    /// Build the outgoing message for a validated form.
    pub fn compose(&self, form: &ContactForm) -> SendRequest {
        match self.recipient_mode {
            RecipientMode::Submitter => SendRequest {
                from: self.sender.clone(),
                to: form.email.clone(),
                subject: format!("{}, {}, {}", form.ecole, form.name, form.post),
                body: form.message.clone(),
                reply_to: None,
            },
            RecipientMode::SelfNotify => SendRequest {
                from: self.sender.clone(),
                to: self.sender.clone(),
                subject: format!(
                    "{}, {}, {} -> {}",
                    form.ecole, form.name, form.post, form.email
                ),
                body: form.message.clone(),
                reply_to: Some(form.email.clone()),
            },
        }
    }

    /// Validate `payload` and send it through the gateway.
    pub async fn dispatch(&self, payload: &Value) -> Result<SendResult, DispatchError> {
        let form = match ContactForm::from_payload(payload) {
            Ok(form) => form,
            Err(FormError::MissingFields(fields)) => {
                tracing::debug!(missing = ?fields, "Rejecting incomplete form");
                metrics::record_send("invalid");
                return Err(FormError::MissingFields(fields).into());
            }
        };

        let request = self.compose(&form);

        match self.gateway.send(&request).await {
            Ok(result) => {
                tracing::info!(
                    provider = self.gateway.name(),
                    status = result.status_code,
                    to = %request.to,
                    "Email accepted by provider"
                );
                metrics::record_send("sent");
                Ok(result)
            }
            Err(e) => {
                tracing::error!(
                    provider = self.gateway.name(),
                    error = %e,
                    "Email gateway error"
                );
                metrics::record_send("failed");
                Err(e.into())
            }
        }
    }
}
