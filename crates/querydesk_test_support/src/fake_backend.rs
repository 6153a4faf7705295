use async_trait::async_trait;
use querydesk_core::{
    ConnectionId, ConnectionRegistry, ConnectionStatus, Dialect, EngineError, QueryExecutor,
    QueryResult,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// One scripted executor response.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    Success(QueryResult),
    Error(String),
}

impl ScriptedOutcome {
    fn into_result(self) -> Result<QueryResult, EngineError> {
        match self {
            Self::Success(result) => Ok(result),
            Self::Error(message) => Err(EngineError::Execution(message)),
        }
    }
}

/// Executor that replays a queue of scripted outcomes in order and records
/// every statement it receives, for asserting on synthesized SQL.
#[derive(Default)]
pub struct ScriptedExecutor {
    script: Mutex<VecDeque<ScriptedOutcome>>,
    executed: Mutex<Vec<(ConnectionId, String)>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_success(&self, result: QueryResult) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedOutcome::Success(result));
    }

    pub fn push_error(&self, message: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedOutcome::Error(message.into()));
    }

    /// Statements executed so far, in call order.
    pub fn executed_statements(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|(_, sql)| sql.clone())
            .collect()
    }

    pub fn execute_count(&self) -> usize {
        self.executed.lock().unwrap().len()
    }
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        connection_id: ConnectionId,
        statement: &str,
    ) -> Result<QueryResult, EngineError> {
        self.executed
            .lock()
            .unwrap()
            .push((connection_id, statement.to_string()));

        let outcome = self.script.lock().unwrap().pop_front();
        match outcome {
            Some(outcome) => outcome.into_result(),
            None => Err(EngineError::Execution(format!(
                "no scripted outcome left for: {statement}"
            ))),
        }
    }
}

/// Fixed registry mapping connection ids to a status and dialect.
#[derive(Default)]
pub struct StaticRegistry {
    connections: HashMap<ConnectionId, (ConnectionStatus, Dialect)>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connected backend and return its id.
    pub fn add(&mut self, dialect: Dialect) -> ConnectionId {
        self.add_with_status(dialect, ConnectionStatus::Connected)
    }

    pub fn add_with_status(&mut self, dialect: Dialect, status: ConnectionStatus) -> ConnectionId {
        let id = ConnectionId::new_v4();
        self.connections.insert(id, (status, dialect));
        id
    }

    pub fn set_status(&mut self, id: ConnectionId, status: ConnectionStatus) {
        if let Some(entry) = self.connections.get_mut(&id) {
            entry.0 = status;
        }
    }
}

impl ConnectionRegistry for StaticRegistry {
    fn status(&self, connection_id: ConnectionId) -> ConnectionStatus {
        self.connections
            .get(&connection_id)
            .map(|(status, _)| *status)
            .unwrap_or(ConnectionStatus::Disconnected)
    }

    fn dialect(&self, connection_id: ConnectionId) -> Option<Dialect> {
        self.connections
            .get(&connection_id)
            .map(|(_, dialect)| *dialect)
    }
}
