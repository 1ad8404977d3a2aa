//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (FRONTEND_URL, EMAIL_SENDER, SENDGRID_API_KEY, PORT, ...)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → passed by value into the server at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with, ConfigError};
pub use schema::{
    CorsConfig, EmailConfig, ListenerConfig, LogFormat, ObservabilityConfig, OriginMatchMode,
    RecipientMode, RelayConfig,
};
pub use validation::ValidationError;
