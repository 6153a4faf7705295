use crate::browse::TableRef;
use crate::query::{QueryResult, Row};
use crate::sort::{SortState, sort_rows};
use crate::traits::ConnectionId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type TabId = Uuid;

/// How a tab was opened: free-form statement editing vs. table browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabMode {
    Query,
    Browse,
}

/// Execution state machine for a tab.
///
/// `Executing` implies exactly one in-flight backend call for this tab;
/// a second execute while in flight is a no-op until the first resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionState {
    #[default]
    Idle,
    Executing,
    Failed,
}

/// Pagination metadata for Browse-mode windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub limit: u32,
    pub offset: u64,
    /// Heuristic: the last fetched page came back full.
    pub has_more: bool,
    pub loading: bool,
}

impl PageState {
    pub fn first_page(limit: u32, fetched: usize) -> Self {
        Self {
            limit,
            offset: 0,
            has_more: fetched == limit as usize,
            loading: false,
        }
    }
}

/// Materialized result slice displayed by a tab.
#[derive(Debug, Clone)]
pub struct ResultWindow {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// Present only for Browse-mode table loads.
    pub pagination: Option<PageState>,
    /// Best-effort `COUNT(*)`; `None` when the count fetch failed.
    pub total_rows: Option<u64>,
}

impl ResultWindow {
    /// Window for a plain query result: no pagination, no total.
    pub fn from_result(result: QueryResult) -> Self {
        Self {
            columns: result.columns,
            rows: result.rows,
            pagination: None,
            total_rows: None,
        }
    }

    /// Window for the first page of a table load.
    pub fn first_page(result: QueryResult, limit: u32, total_rows: Option<u64>) -> Self {
        let page = PageState::first_page(limit, result.rows.len());
        Self {
            columns: result.columns,
            rows: result.rows,
            pagination: Some(page),
            total_rows,
        }
    }

    /// Append a fetched page, advancing the offset. Rows are never replaced.
    pub fn append_page(&mut self, mut rows: Vec<Row>, new_offset: u64) {
        let fetched = rows.len();
        self.rows.append(&mut rows);

        if let Some(page) = self.pagination.as_mut() {
            page.offset = new_offset;
            page.has_more = fetched == page.limit as usize;
            page.loading = false;
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// User-authored column values for an in-progress insert.
///
/// Only the columns the user actually populated are present; everything
/// else is omitted from the synthesized INSERT, not set to NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftRow {
    entries: Vec<(String, String)>,
}

impl DraftRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column's pending value, replacing any previous entry.
    /// Blank input removes the entry so the column stays unpopulated.
    pub fn set(&mut self, column: impl Into<String>, raw: impl Into<String>) {
        let column = column.into();
        let raw = raw.into();

        self.entries.retain(|(c, _)| c != &column);
        if !raw.is_empty() {
            self.entries.push((column, raw));
        }
    }

    pub fn value(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An independent query/browse session.
#[derive(Debug, Clone)]
pub struct Tab {
    pub id: TabId,
    pub title: String,
    pub statement: String,
    pub connection_id: Option<ConnectionId>,
    pub mode: TabMode,
    pub execution: ExecutionState,
    /// `None` until an execute has completed successfully at least once.
    pub result: Option<ResultWindow>,
    pub error: Option<String>,
    pub sort: Option<SortState>,
    pub table: Option<TableRef>,
    pub draft: Option<DraftRow>,
}

impl Tab {
    /// A free-form query tab. `table` is set for "new query from table"
    /// tabs, where it keeps row mutations available on the results.
    pub fn query(
        title: impl Into<String>,
        statement: impl Into<String>,
        connection_id: Option<ConnectionId>,
        table: Option<TableRef>,
    ) -> Self {
        Self {
            id: TabId::new_v4(),
            title: title.into(),
            statement: statement.into(),
            connection_id,
            mode: TabMode::Query,
            execution: ExecutionState::default(),
            result: None,
            error: None,
            sort: None,
            table,
            draft: None,
        }
    }

    pub fn browse(connection_id: ConnectionId, table: TableRef) -> Self {
        Self {
            id: TabId::new_v4(),
            title: table.qualified_name(),
            statement: String::new(),
            connection_id: Some(connection_id),
            mode: TabMode::Browse,
            execution: ExecutionState::default(),
            result: None,
            error: None,
            sort: None,
            table: Some(table),
            draft: None,
        }
    }

    pub fn is_executing(&self) -> bool {
        self.execution == ExecutionState::Executing
    }

    /// Rows in display order: stored order filtered through the active sort.
    pub fn display_rows(&self) -> Vec<Row> {
        match &self.result {
            Some(window) => sort_rows(&window.rows, &window.columns, self.sort.as_ref()),
            None => Vec::new(),
        }
    }
}
