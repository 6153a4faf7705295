mod browse;
mod config;
mod dialect;
mod engine;
mod error;
mod limit;
mod query;
mod sort;
mod statement;
mod tab;
mod traits;
mod value;
mod workspace;

pub use browse::{TableRef, count_select, windowed_select};
pub use config::EngineConfig;
pub use dialect::Dialect;
pub use engine::{Engine, LoadMoreJob, StatementJob, TableLoadJob};
pub use error::EngineError;
pub use limit::apply_auto_limit;
pub use query::{QueryResult, Row};
pub use sort::{SortDirection, SortState, sort_rows};
pub use statement::{
    build_delete, build_insert, build_predicate, build_update, coerce_draft_value, coerce_edit,
};
pub use tab::{DraftRow, ExecutionState, PageState, ResultWindow, Tab, TabId, TabMode};
pub use traits::{ConnectionId, ConnectionRegistry, ConnectionStatus, QueryExecutor};
pub use value::Value;
pub use workspace::Workspace;
