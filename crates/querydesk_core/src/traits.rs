use crate::{Dialect, EngineError, QueryResult};
use async_trait::async_trait;
use uuid::Uuid;

/// Identifies a registered backend connection.
pub type ConnectionId = Uuid;

/// Registry view of a connection's health.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Error,
}

/// Executes statement text against a backend connection.
///
/// The engine never talks to drivers directly; implementations own
/// transport, timeouts, and driver-specific row decoding.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(
        &self,
        connection_id: ConnectionId,
        statement: &str,
    ) -> Result<QueryResult, EngineError>;
}

/// Read-only view of registered connections and their dialects.
///
/// Connection lifecycle (connect/disconnect/test) lives outside the engine.
pub trait ConnectionRegistry: Send + Sync {
    fn status(&self, connection_id: ConnectionId) -> ConnectionStatus;

    fn dialect(&self, connection_id: ConnectionId) -> Option<Dialect>;
}
