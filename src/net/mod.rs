//! Network connection subsystem.
//!
//! # Data Flow
//! ```text
//! WebSocket upgrade on /ws
//!     → connection.rs (register as Connecting)
//!     → handshake completes → Connected event
//!     → socket closes (any reason) → Disconnected event
//! ```
//!
//! # Design Decisions
//! - Lifecycle bookkeeping is per-connection; no cross-connection coordination
//! - Disconnected is emitted from a drop guard, so it fires exactly once
//! - No connection limit; the transport handles load shedding

pub mod connection;

pub use connection::{
    ConnectionEvent, ConnectionEventKind, ConnectionGuard, ConnectionId, ConnectionRegistry,
    ConnectionState, PendingConnection,
};
