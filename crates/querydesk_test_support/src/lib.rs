mod fake_backend;
mod fixtures;

pub use fake_backend::{ScriptedExecutor, ScriptedOutcome, StaticRegistry};
pub use fixtures::{count_result, page_result, result};
