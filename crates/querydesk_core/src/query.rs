use crate::Value;
use serde::{Deserialize, Serialize};

/// A single row of query results.
pub type Row = Vec<Value>;

/// Result of executing a statement against a backend.
///
/// `columns` carries display order; every row holds values in the same
/// order. Backends must honor this shape verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// First cell of the first row interpreted as a count, if present.
    ///
    /// Used for `SELECT COUNT(*)` results where drivers disagree about the
    /// column name but always return a single numeric cell.
    pub fn scalar_count(&self) -> Option<u64> {
        match self.rows.first()?.first()? {
            Value::Number(n) if *n >= 0.0 => Some(*n as u64),
            Value::Text(s) => s.parse().ok(),
            _ => None,
        }
    }
}
