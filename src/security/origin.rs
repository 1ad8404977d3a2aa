//! Cross-origin policy.
//!
//! # Responsibilities
//! - Decide whether a request `Origin` is allowed
//! - Reject disallowed origins before any handler runs
//! - Build the CORS response layer for allowed origins
//!
//! # Design Decisions
//! - Requests without an `Origin` header (curl, server-to-server) are always allowed
//! - Exact matching compares normalized `scheme://host[:port]` strings
//! - Substring matching reproduces the older allow-list behaviour and is opt-in

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::{CorsConfig, OriginMatchMode};

/// Body returned to rejected cross-origin requests.
pub const CORS_REJECTION: &str = "Not allowed by CORS";

/// Compiled allow-list.
#[derive(Debug, Clone)]
pub enum OriginPolicy {
    /// Normalized origins that may call the API.
    Exact(HashSet<String>),
    /// Raw allow-list string; an origin passes if it occurs inside it.
    Substring(String),
}

impl OriginPolicy {
    /// Compile the policy from configuration. Invalid exact-mode entries are skipped
    /// (validation reports them before startup).
    pub fn from_config(config: &CorsConfig) -> Self {
        match config.match_mode {
            OriginMatchMode::Exact => Self::Exact(
                config
                    .allowed_origins
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .filter_map(|s| normalize_origin(s).ok())
                    .collect(),
            ),
            OriginMatchMode::Substring => Self::Substring(config.allowed_origins.clone()),
        }
    }

    /// Whether a request carrying `origin` may proceed. An empty origin is treated as absent.
    pub fn allows(&self, origin: &str) -> bool {
        if origin.is_empty() {
            return true;
        }

        match self {
            Self::Exact(allowed) => normalize_origin(origin)
                .map(|o| allowed.contains(&o))
                .unwrap_or(false),
            Self::Substring(allow_list) => allow_list.contains(origin),
        }
    }

    fn allows_header(&self, origin: &HeaderValue) -> bool {
        origin.to_str().map(|o| self.allows(o)).unwrap_or(false)
    }
}

/// Normalize an origin or URL to `scheme://host[:port]` (default ports dropped).
pub fn normalize_origin(raw: &str) -> Result<String, String> {
    let url = url::Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return Err("origin is opaque".to_string());
    }
    Ok(origin.ascii_serialization())
}

/// Middleware rejecting requests whose `Origin` is not allowed.
pub async fn origin_gate(
    State(policy): State<Arc<OriginPolicy>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        if !policy.allows_header(origin) {
            tracing::warn!(origin = ?origin, path = %request.uri().path(), "Origin rejected");
            return (StatusCode::FORBIDDEN, Json(json!({ "error": CORS_REJECTION }))).into_response();
        }
    }

    next.run(request).await
}

/// CORS headers for allowed origins; answers preflight requests.
pub fn cors_layer(policy: Arc<OriginPolicy>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin, _parts| {
            policy.allows_header(origin)
        }))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
