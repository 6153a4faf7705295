use crate::browse::{self, TableRef};
use crate::config::EngineConfig;
use crate::limit::apply_auto_limit;
use crate::query::QueryResult;
use crate::statement;
use crate::tab::{ExecutionState, ResultWindow, Tab, TabId, TabMode};
use crate::traits::{ConnectionId, ConnectionRegistry, ConnectionStatus, QueryExecutor};
use crate::workspace::Workspace;
use crate::{Dialect, EngineError};
use log::{debug, info, warn};
use std::sync::Arc;

/// A planned backend call for one tab.
///
/// Produced by the synchronous `begin_*` methods and consumed by
/// `finish_*` once the executor resolves. Hosts that want several tabs in
/// flight at once hold one job per tab and apply outcomes as they arrive.
#[derive(Debug, Clone)]
pub struct StatementJob {
    pub tab_id: TabId,
    pub connection_id: ConnectionId,
    pub statement: String,
}

/// First-page table load: a best-effort count plus the windowed select.
#[derive(Debug, Clone)]
pub struct TableLoadJob {
    pub tab_id: TabId,
    pub connection_id: ConnectionId,
    pub count_statement: String,
    pub select_statement: String,
    pub page_size: u32,
}

/// Incremental page fetch for an already-materialized window.
#[derive(Debug, Clone)]
pub struct LoadMoreJob {
    pub tab_id: TabId,
    pub connection_id: ConnectionId,
    pub statement: String,
    pub new_offset: u64,
}

/// Orchestrates tabs, statement synthesis, and backend calls.
///
/// Every operation splits into a synchronous `begin_*` (guard checks, state
/// flip, statement planning) and a synchronous `finish_*` that applies an
/// outcome only if the tab still exists — a result arriving for a closed
/// tab is dropped, which makes the close-while-in-flight race safe. The
/// async methods are thin drivers around that split.
pub struct Engine {
    workspace: Workspace,
    executor: Arc<dyn QueryExecutor>,
    registry: Arc<dyn ConnectionRegistry>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(
        executor: Arc<dyn QueryExecutor>,
        registry: Arc<dyn ConnectionRegistry>,
        config: EngineConfig,
    ) -> Self {
        Self {
            workspace: Workspace::new(),
            executor,
            registry,
            config,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    /// Open a blank or pre-filled query tab and activate it. Pass the
    /// table a "new query from table" statement targets so cell edits,
    /// row deletes, and draft inserts stay available on its results.
    pub fn open_query(
        &mut self,
        title: impl Into<String>,
        statement: impl Into<String>,
        connection_id: Option<ConnectionId>,
        table: Option<TableRef>,
    ) -> TabId {
        self.workspace
            .open(Tab::query(title, statement, connection_id, table))
    }

    // --- Query execution ---

    /// Plan a query run. No-op (`None`) when the tab is missing, already
    /// executing, or has no connected backend. Flips the tab to
    /// `Executing` and clears any prior error.
    pub fn begin_query(&mut self, tab_id: TabId) -> Option<StatementJob> {
        let tab = self.workspace.tab(tab_id)?;
        if tab.is_executing() {
            debug!("Tab {tab_id} already has an execute in flight");
            return None;
        }
        let connection_id = self.resolve_connection(tab)?;

        // The rewriter only touches user-authored statements; Browse-mode
        // selects carry their own explicit window clause.
        let statement = match (tab.mode, self.registry.dialect(connection_id)) {
            (TabMode::Query, Some(dialect)) => {
                apply_auto_limit(&tab.statement, dialect, self.config.auto_limit)
            }
            _ => tab.statement.clone(),
        };

        self.mark_executing(tab_id);
        info!("Tab {tab_id} executing: {}", statement_preview(&statement));

        Some(StatementJob {
            tab_id,
            connection_id,
            statement,
        })
    }

    /// Apply a query outcome. Dropped silently when the tab has been
    /// closed since the job began.
    pub fn finish_query(&mut self, tab_id: TabId, outcome: Result<QueryResult, EngineError>) {
        let Some(tab) = self.workspace.tab_mut(tab_id) else {
            debug!("Dropping query result for closed tab {tab_id}");
            return;
        };

        match outcome {
            Ok(result) => {
                tab.execution = ExecutionState::Idle;
                tab.result = Some(ResultWindow::from_result(result));
            }
            Err(err) => {
                tab.execution = ExecutionState::Failed;
                tab.error = Some(err.to_string());
            }
        }
    }

    pub async fn run_query(&mut self, tab_id: TabId) {
        let Some(job) = self.begin_query(tab_id) else {
            return;
        };
        let outcome = self.executor.execute(job.connection_id, &job.statement).await;
        self.finish_query(tab_id, outcome);
    }

    // --- Table browsing ---

    /// Open a Browse tab for a table and load its first page.
    pub async fn open_table(&mut self, connection_id: ConnectionId, table: TableRef) -> TabId {
        let tab_id = self.workspace.open(Tab::browse(connection_id, table));
        self.load_table(tab_id).await;
        tab_id
    }

    /// Plan a first-page load (count + windowed select) for a Browse tab.
    pub fn begin_table_load(&mut self, tab_id: TabId) -> Option<TableLoadJob> {
        let tab = self.workspace.tab(tab_id)?;
        if tab.is_executing() {
            return None;
        }
        let connection_id = self.resolve_connection(tab)?;
        let dialect = self.registry.dialect(connection_id)?;
        let table = tab.table.clone()?;
        let page_size = self.config.page_size;

        self.mark_executing(tab_id);

        Some(TableLoadJob {
            tab_id,
            connection_id,
            count_statement: browse::count_select(&table),
            select_statement: browse::windowed_select(dialect, &table, page_size, 0),
            page_size,
        })
    }

    /// Apply a first-page outcome. A failed count only leaves `total_rows`
    /// unset; it never blocks data display.
    pub fn finish_table_load(
        &mut self,
        tab_id: TabId,
        outcome: Result<QueryResult, EngineError>,
        total_rows: Option<u64>,
        page_size: u32,
    ) {
        let Some(tab) = self.workspace.tab_mut(tab_id) else {
            debug!("Dropping table page for closed tab {tab_id}");
            return;
        };

        match outcome {
            Ok(result) => {
                tab.execution = ExecutionState::Idle;
                tab.result = Some(ResultWindow::first_page(result, page_size, total_rows));
            }
            Err(err) => {
                tab.execution = ExecutionState::Failed;
                tab.error = Some(err.to_string());
            }
        }
    }

    /// (Re)load the first page of a Browse tab.
    pub async fn load_table(&mut self, tab_id: TabId) {
        let Some(job) = self.begin_table_load(tab_id) else {
            return;
        };

        let total_rows = match self
            .executor
            .execute(job.connection_id, &job.count_statement)
            .await
        {
            Ok(result) => result.scalar_count(),
            Err(err) => {
                warn!("Count fetch failed for tab {tab_id}: {err}");
                None
            }
        };

        let outcome = self
            .executor
            .execute(job.connection_id, &job.select_statement)
            .await;
        self.finish_table_load(tab_id, outcome, total_rows, job.page_size);
    }

    /// Plan the next page fetch. No-op while a fetch is loading or when
    /// the last page came back short. Holds the tab's `Executing` state
    /// until `finish_load_more`, so a reload or mutation cannot replace
    /// the window while a stale page is still in flight.
    pub fn begin_load_more(&mut self, tab_id: TabId) -> Option<LoadMoreJob> {
        let tab = self.workspace.tab(tab_id)?;
        if tab.is_executing() {
            return None;
        }
        let connection_id = self.resolve_connection(tab)?;
        let dialect = self.registry.dialect(connection_id)?;
        let table = tab.table.clone()?;

        let page = tab.result.as_ref()?.pagination.as_ref()?;
        if page.loading || !page.has_more {
            return None;
        }
        let limit = page.limit;
        let new_offset = page.offset + limit as u64;

        self.mark_executing(tab_id);
        if let Some(page) = self
            .workspace
            .tab_mut(tab_id)
            .and_then(|t| t.result.as_mut())
            .and_then(|w| w.pagination.as_mut())
        {
            page.loading = true;
        }

        Some(LoadMoreJob {
            tab_id,
            connection_id,
            statement: browse::windowed_select(dialect, &table, limit, new_offset),
            new_offset,
        })
    }

    /// Apply a load-more outcome: append on success; on failure revert
    /// only the loading flag, keeping every already-loaded row. Failures
    /// are non-fatal, so the tab returns to `Idle` either way.
    pub fn finish_load_more(
        &mut self,
        tab_id: TabId,
        outcome: Result<QueryResult, EngineError>,
        new_offset: u64,
    ) {
        let Some(tab) = self.workspace.tab_mut(tab_id) else {
            debug!("Dropping load-more page for closed tab {tab_id}");
            return;
        };

        tab.execution = ExecutionState::Idle;
        match outcome {
            Ok(result) => {
                if let Some(window) = tab.result.as_mut() {
                    window.append_page(result.rows, new_offset);
                }
            }
            Err(err) => {
                warn!("Load more failed for tab {tab_id}: {err}");
                if let Some(page) = tab.result.as_mut().and_then(|w| w.pagination.as_mut()) {
                    page.loading = false;
                }
            }
        }
    }

    pub async fn load_more(&mut self, tab_id: TabId) {
        let Some(job) = self.begin_load_more(tab_id) else {
            return;
        };
        let outcome = self.executor.execute(job.connection_id, &job.statement).await;
        self.finish_load_more(tab_id, outcome, job.new_offset);
    }

    // --- Row mutations ---

    /// Plan an UPDATE for an edited cell. `row_index` addresses the
    /// display order (sorted view), matching what the user sees.
    pub fn begin_cell_update(
        &mut self,
        tab_id: TabId,
        row_index: usize,
        col_index: usize,
        new_raw: &str,
    ) -> Option<StatementJob> {
        let (connection_id, dialect, table) = self.mutation_target(tab_id)?;
        let tab = self.workspace.tab(tab_id)?;
        let columns = tab.result.as_ref()?.columns.clone();
        let rows = tab.display_rows();
        let row = rows.get(row_index)?;

        let sql = statement::build_update(&table, &columns, row, col_index, new_raw, dialect)?;
        self.mark_executing(tab_id);
        info!("Tab {tab_id} updating cell: {}", statement_preview(&sql));

        Some(StatementJob {
            tab_id,
            connection_id,
            statement: sql,
        })
    }

    /// Plan a DELETE for a displayed row (display-order index).
    pub fn begin_row_delete(&mut self, tab_id: TabId, row_index: usize) -> Option<StatementJob> {
        let (connection_id, dialect, table) = self.mutation_target(tab_id)?;
        let tab = self.workspace.tab(tab_id)?;
        let columns = tab.result.as_ref()?.columns.clone();
        let rows = tab.display_rows();
        let row = rows.get(row_index)?;

        let sql = statement::build_delete(&table, &columns, row, dialect);
        self.mark_executing(tab_id);
        info!("Tab {tab_id} deleting row: {}", statement_preview(&sql));

        Some(StatementJob {
            tab_id,
            connection_id,
            statement: sql,
        })
    }

    /// Plan an INSERT from the tab's draft row. The draft is detached
    /// either way; an empty draft is discarded without executing anything.
    pub fn begin_draft_insert(&mut self, tab_id: TabId) -> Option<StatementJob> {
        let (connection_id, dialect, table) = self.mutation_target(tab_id)?;
        let draft = self.workspace.take_draft(tab_id)?;

        let Some(sql) = statement::build_insert(&table, &draft, dialect) else {
            debug!("Tab {tab_id}: empty draft, insert skipped");
            return None;
        };

        self.mark_executing(tab_id);
        info!("Tab {tab_id} inserting row: {}", statement_preview(&sql));

        Some(StatementJob {
            tab_id,
            connection_id,
            statement: sql,
        })
    }

    /// Apply a mutation outcome. Returns whether the tab should re-fetch
    /// its data to reflect the backend's authoritative state.
    pub fn finish_mutation(
        &mut self,
        tab_id: TabId,
        outcome: Result<QueryResult, EngineError>,
    ) -> bool {
        let Some(tab) = self.workspace.tab_mut(tab_id) else {
            debug!("Dropping mutation result for closed tab {tab_id}");
            return false;
        };

        match outcome {
            Ok(_) => {
                tab.execution = ExecutionState::Idle;
                true
            }
            Err(err) => {
                tab.execution = ExecutionState::Failed;
                tab.error = Some(err.to_string());
                false
            }
        }
    }

    pub async fn update_cell(
        &mut self,
        tab_id: TabId,
        row_index: usize,
        col_index: usize,
        new_raw: &str,
    ) {
        let Some(job) = self.begin_cell_update(tab_id, row_index, col_index, new_raw) else {
            return;
        };
        self.execute_mutation(job).await;
    }

    pub async fn delete_row(&mut self, tab_id: TabId, row_index: usize) {
        let Some(job) = self.begin_row_delete(tab_id, row_index) else {
            return;
        };
        self.execute_mutation(job).await;
    }

    pub async fn commit_draft(&mut self, tab_id: TabId) {
        let Some(job) = self.begin_draft_insert(tab_id) else {
            return;
        };
        self.execute_mutation(job).await;
    }

    async fn execute_mutation(&mut self, job: StatementJob) {
        let outcome = self.executor.execute(job.connection_id, &job.statement).await;
        if self.finish_mutation(job.tab_id, outcome) {
            self.refresh(job.tab_id).await;
        }
    }

    /// Authoritative re-fetch after a successful mutation.
    async fn refresh(&mut self, tab_id: TabId) {
        match self.workspace.tab(tab_id).map(|t| t.mode) {
            Some(TabMode::Browse) => self.load_table(tab_id).await,
            Some(TabMode::Query) => self.run_query(tab_id).await,
            None => {}
        }
    }

    // --- Internals ---

    fn resolve_connection(&self, tab: &Tab) -> Option<ConnectionId> {
        let connection_id = tab.connection_id?;
        match self.registry.status(connection_id) {
            ConnectionStatus::Connected => Some(connection_id),
            status => {
                debug!("Connection {connection_id} unavailable ({status:?})");
                None
            }
        }
    }

    fn mutation_target(&self, tab_id: TabId) -> Option<(ConnectionId, Dialect, TableRef)> {
        let tab = self.workspace.tab(tab_id)?;
        if tab.is_executing() {
            return None;
        }
        let connection_id = self.resolve_connection(tab)?;
        let dialect = self.registry.dialect(connection_id)?;
        let table = tab.table.clone()?;
        Some((connection_id, dialect, table))
    }

    fn mark_executing(&mut self, tab_id: TabId) {
        if let Some(tab) = self.workspace.tab_mut(tab_id) {
            tab.execution = ExecutionState::Executing;
            tab.error = None;
        }
    }
}

/// Safely truncate a statement for log lines, cutting at a char boundary.
fn statement_preview(s: &str) -> String {
    const MAX: usize = 120;
    if s.len() <= MAX {
        return s.to_string();
    }

    let safe_end = s
        .char_indices()
        .take_while(|(idx, _)| *idx <= MAX - 3)
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    format!("{}...", &s[..safe_end])
}
