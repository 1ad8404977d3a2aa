//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject startup without provider credentials or a sender address
//! - Check that exact-mode origins and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{OriginMatchMode, RelayConfig};
use crate::security::origin::normalize_origin;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("SENDGRID_API_KEY is missing")]
    MissingApiKey,

    #[error("EMAIL_SENDER is missing")]
    MissingSender,

    #[error("invalid allowed origin `{origin}`: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    #[error("invalid SendGrid API URL `{0}`")]
    InvalidApiBaseUrl(String),

    #[error("invalid metrics address `{0}`")]
    InvalidMetricsAddress(String),
}

/// Check a fully merged configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let has_key = config
        .email
        .api_key
        .as_deref()
        .is_some_and(|key| !key.trim().is_empty());
    if !has_key {
        errors.push(ValidationError::MissingApiKey);
    }

    if config.email.sender.trim().is_empty() {
        errors.push(ValidationError::MissingSender);
    }

    if url::Url::parse(&config.email.api_base_url).is_err() {
        errors.push(ValidationError::InvalidApiBaseUrl(
            config.email.api_base_url.clone(),
        ));
    }

    if config.cors.match_mode == OriginMatchMode::Exact {
        for entry in config
            .cors
            .allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            if let Err(reason) = normalize_origin(entry) {
                errors.push(ValidationError::InvalidOrigin {
                    origin: entry.to_string(),
                    reason,
                });
            }
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
