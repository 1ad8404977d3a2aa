//! WebSocket connection registry and lifecycle tracking.
//!
//! # Responsibilities
//! - Track connection state (Connecting → Connected → Disconnected)
//! - Generate unique connection IDs for tracing
//! - Emit exactly one Connected and one Disconnected event per upgraded socket
//! - Collect per-connection metrics

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::observability::metrics;

/// Global atomic counter for connection IDs.
/// Using relaxed ordering is sufficient since we only need uniqueness, not synchronization.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Capacity of the lifecycle event channel.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Connection state for lifecycle tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Upgrade requested, handshake not finished.
    Connecting,
    /// Socket is open.
    Connected,
    /// Socket is gone. Terminal.
    Disconnected,
}

/// Kind of lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEventKind {
    Connected,
    Disconnected,
}

/// A lifecycle transition of one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionEvent {
    pub id: ConnectionId,
    pub remote_addr: SocketAddr,
    pub kind: ConnectionEventKind,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    remote_addr: SocketAddr,
    state: ConnectionState,
}

/// Bookkeeping for live WebSocket connections.
///
/// Connections are independent: entries are keyed by id and never coordinate.
#[derive(Debug)]
pub struct ConnectionRegistry {
    entries: DashMap<ConnectionId, Entry>,
    events: broadcast::Sender<ConnectionEvent>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            entries: DashMap::new(),
            events,
        }
    }

    /// Register an upgrade request from `remote_addr`.
    pub fn open(self: &Arc<Self>, remote_addr: SocketAddr) -> PendingConnection {
        let id = ConnectionId::new();
        self.entries.insert(
            id,
            Entry {
                remote_addr,
                state: ConnectionState::Connecting,
            },
        );
        tracing::debug!(connection_id = %id, remote_addr = %remote_addr, "WebSocket upgrade requested");

        PendingConnection {
            id,
            remote_addr,
            registry: Arc::clone(self),
            armed: true,
        }
    }

    /// Subscribe to lifecycle events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionEvent> {
        self.events.subscribe()
    }

    /// Number of connections currently in the `Connected` state.
    pub fn active_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.state == ConnectionState::Connected)
            .count()
    }

    /// Current state of a connection. Unknown ids are reported as `Disconnected`,
    /// since ids are never reused and closed entries are dropped.
    pub fn state(&self, id: ConnectionId) -> ConnectionState {
        self.entries
            .get(&id)
            .map(|e| e.state)
            .unwrap_or(ConnectionState::Disconnected)
    }

    /// Remote address of a tracked connection.
    pub fn remote_addr(&self, id: ConnectionId) -> Option<SocketAddr> {
        self.entries.get(&id).map(|e| e.remote_addr)
    }

    fn emit(&self, event: ConnectionEvent) {
        // No subscribers is fine; logging already happened.
        let _ = self.events.send(event);
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A connection whose upgrade handshake has not completed.
///
/// Dropping it without calling [`PendingConnection::connected`] forgets the entry silently.
#[derive(Debug)]
pub struct PendingConnection {
    id: ConnectionId,
    remote_addr: SocketAddr,
    registry: Arc<ConnectionRegistry>,
    armed: bool,
}

impl PendingConnection {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Mark the connection as open. The returned guard emits `Disconnected` when dropped.
    pub fn connected(mut self) -> ConnectionGuard {
        self.armed = false;

        if let Some(mut entry) = self.registry.entries.get_mut(&self.id) {
            entry.state = ConnectionState::Connected;
        }

        tracing::info!(
            connection_id = %self.id,
            remote_addr = %self.remote_addr,
            "WS connected"
        );
        metrics::record_ws_connected();
        self.registry.emit(ConnectionEvent {
            id: self.id,
            remote_addr: self.remote_addr,
            kind: ConnectionEventKind::Connected,
        });

        ConnectionGuard {
            id: self.id,
            remote_addr: self.remote_addr,
            registry: Arc::clone(&self.registry),
        }
    }
}

impl Drop for PendingConnection {
    fn drop(&mut self) {
        if self.armed {
            self.registry.entries.remove(&self.id);
            tracing::debug!(connection_id = %self.id, "WebSocket upgrade abandoned");
        }
    }
}

/// Guard that tracks an open connection's lifetime.
/// Emits the `Disconnected` event when dropped.
#[derive(Debug)]
pub struct ConnectionGuard {
    id: ConnectionId,
    remote_addr: SocketAddr,
    registry: Arc<ConnectionRegistry>,
}

impl ConnectionGuard {
    /// Get this connection's ID.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.registry.entries.remove(&self.id);
        tracing::info!(
            connection_id = %self.id,
            remote_addr = %self.remote_addr,
            "WS disconnected"
        );
        metrics::record_ws_disconnected();
        self.registry.emit(ConnectionEvent {
            id: self.id,
            remote_addr: self.remote_addr,
            kind: ConnectionEventKind::Disconnected,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn connection_id_unique() {
        let id1 = ConnectionId::new();
        let id2 = ConnectionId::new();
        assert_ne!(id1, id2);
        assert!(id1.to_string().starts_with("conn-"));
    }

    #[test]
    fn lifecycle_transitions() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut events = registry.subscribe();

        let pending = registry.open(addr(40001));
        let id = pending.id();
        assert_eq!(registry.state(id), ConnectionState::Connecting);
        assert_eq!(registry.active_count(), 0);

        let guard = pending.connected();
        assert_eq!(registry.state(id), ConnectionState::Connected);
        assert_eq!(registry.active_count(), 1);
        assert_eq!(registry.remote_addr(id), Some(addr(40001)));

        drop(guard);
        assert_eq!(registry.state(id), ConnectionState::Disconnected);
        assert_eq!(registry.active_count(), 0);

        let connected = events.try_recv().unwrap();
        assert_eq!(connected.kind, ConnectionEventKind::Connected);
        assert_eq!(connected.id, id);
        let disconnected = events.try_recv().unwrap();
        assert_eq!(disconnected.kind, ConnectionEventKind::Disconnected);
        assert_eq!(disconnected.remote_addr, addr(40001));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn abandoned_upgrade_emits_nothing() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut events = registry.subscribe();

        let pending = registry.open(addr(40002));
        let id = pending.id();
        drop(pending);

        assert_eq!(registry.state(id), ConnectionState::Disconnected);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn connections_are_independent() {
        let registry = Arc::new(ConnectionRegistry::new());

        let a = registry.open(addr(40003)).connected();
        let b = registry.open(addr(40004)).connected();
        assert_eq!(registry.active_count(), 2);

        drop(a);
        assert_eq!(registry.active_count(), 1);
        assert_eq!(registry.state(b.id()), ConnectionState::Connected);
    }
}
