use thiserror::Error;

/// Engine-level failures.
///
/// Backend failures are absorbed at the engine boundary into tab-local
/// state; nothing here is fatal to the process. Precondition misses
/// (missing tab, unavailable connection) are not errors: the `begin_*`
/// planners return `None` and the operation is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The backend rejected or failed a statement.
    #[error("Query failed: {0}")]
    Execution(String),
}
