//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file plus the process environment.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Load configuration using `lookup` in place of the process environment.
///
/// Environment values override file values. Empty variables are treated as unset.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<RelayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => RelayConfig::default(),
    };

    apply_env(&mut config, |key| lookup(key).filter(|v| !v.is_empty()))?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn apply_env<F>(config: &mut RelayConfig, get: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(origins) = get("FRONTEND_URL") {
        config.cors.allowed_origins = origins;
    }
    if let Some(mode) = get("CORS_MATCH_MODE") {
        config.cors.match_mode = parse_var("CORS_MATCH_MODE", &mode)?;
    }

    if let Some(sender) = get("EMAIL_SENDER") {
        config.email.sender = sender;
    }
    if let Some(key) = get("SENDGRID_API_KEY") {
        config.email.api_key = Some(key);
    }
    if let Some(url) = get("SENDGRID_API_URL") {
        config.email.api_base_url = url;
    }
    if let Some(mode) = get("RECIPIENT_MODE") {
        config.email.recipient_mode = parse_var("RECIPIENT_MODE", &mode)?;
    }

    if let Some(host) = get("BIND_HOST") {
        config.listener.host = host;
    }
    if let Some(port) = get("PORT") {
        config.listener.port = port.trim().parse().map_err(|e| ConfigError::InvalidEnv {
            var: "PORT",
            reason: format!("`{}` is not a port number ({})", port, e),
        })?;
    }

    if let Some(level) = get("LOG_LEVEL") {
        config.observability.log_level = level;
    }
    if let Some(format) = get("LOG_FORMAT") {
        config.observability.log_format = parse_var("LOG_FORMAT", &format)?;
    }
    if let Some(address) = get("METRICS_ADDRESS") {
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = address;
    }

    Ok(())
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|reason| ConfigError::InvalidEnv { var, reason })
}
