//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the mail relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Outgoing email settings.
    pub email: EmailConfig,

    /// Cross-origin policy.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host or IP to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port.
    pub port: u16,
}

impl ListenerConfig {
    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Who receives the notification built from a form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecipientMode {
    /// Mail goes to the address typed into the form.
    #[default]
    Submitter,
    /// Mail goes to the configured sender, with the submitter as reply-to.
    SelfNotify,
}

impl std::str::FromStr for RecipientMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "submitter" => Ok(RecipientMode::Submitter),
            "self-notify" | "self_notify" | "self" => Ok(RecipientMode::SelfNotify),
            other => Err(format!("expected `submitter` or `self-notify`, got `{}`", other)),
        }
    }
}

/// Outgoing email configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Sender address for every outgoing message.
    pub sender: String,

    /// SendGrid API key. Never serialized back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Base URL of the SendGrid API.
    pub api_base_url: String,

    /// Recipient selection.
    pub recipient_mode: RecipientMode,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            sender: String::new(),
            api_key: None,
            api_base_url: "https://api.sendgrid.com".to_string(),
            recipient_mode: RecipientMode::default(),
        }
    }
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("sender", &self.sender)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("recipient_mode", &self.recipient_mode)
            .finish()
    }
}

/// How a request `Origin` is compared against the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginMatchMode {
    /// Origin must equal one of the comma-separated allow-list entries.
    #[default]
    Exact,
    /// Origin must appear anywhere inside the raw allow-list string.
    /// Kept for compatibility with older deployments only.
    Substring,
}

impl std::str::FromStr for OriginMatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(OriginMatchMode::Exact),
            "substring" | "legacy" => Ok(OriginMatchMode::Substring),
            other => Err(format!("expected `exact` or `substring`, got `{}`", other)),
        }
    }
}

/// Cross-origin configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allow-list string (FRONTEND_URL).
    pub allowed_origins: String,

    /// Matching strategy.
    pub match_mode: OriginMatchMode,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected `pretty` or `json`, got `{}`", other)),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
