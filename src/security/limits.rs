//! Request size limits.
//!
//! # Responsibilities
//! - Enforce the maximum request body size for every API route
//!
//! # Design Decisions
//! - The limit is applied by the body extractor, so oversize requests surface as a
//!   `JsonRejection` and share the `{error}` body with every other parser failure
//! - Declared and streamed lengths are both counted against the same limit
//! - Returns 413 Payload Too Large

use axum::extract::DefaultBodyLimit;

/// Maximum accepted request body: 1 MiB.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Body limit layer for the API router.
pub fn body_limit_layer() -> DefaultBodyLimit {
    DefaultBodyLimit::max(MAX_BODY_BYTES)
}
