//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming API request:
//!     → origin.rs (cross-origin gate, CORS headers, preflight)
//!     → limits.rs (request body size)
//!     → Pass to route handler
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - Checks run before the handler sees the request

pub mod limits;
pub mod origin;

pub use limits::{body_limit_layer, MAX_BODY_BYTES};
pub use origin::{cors_layer, origin_gate, OriginPolicy};
