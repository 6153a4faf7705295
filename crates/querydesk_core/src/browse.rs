use crate::Dialect;
use serde::{Deserialize, Serialize};

/// Reference to a table (schema + name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    pub fn with_schema(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    pub fn from_qualified(qualified: &str) -> Self {
        if let Some((schema, table)) = qualified.split_once('.') {
            Self::with_schema(schema, table)
        } else {
            Self::new(qualified)
        }
    }

    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(s) => format!("{}.{}", s, self.name),
            None => self.name.clone(),
        }
    }
}

/// Windowed `SELECT *` for one page of a table.
///
/// SQL Server has no bare OFFSET/LIMIT; it requires an ORDER BY before
/// OFFSET, hence the `(SELECT NULL)` placeholder ordering.
pub fn windowed_select(dialect: Dialect, table: &TableRef, limit: u32, offset: u64) -> String {
    let table_ref = table.qualified_name();
    if dialect.uses_top_syntax() {
        format!(
            "SELECT * FROM {} ORDER BY (SELECT NULL) OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
            table_ref, offset, limit
        )
    } else {
        format!("SELECT * FROM {} LIMIT {} OFFSET {}", table_ref, limit, offset)
    }
}

/// Total-count query matching a windowed select's table reference.
pub fn count_select(table: &TableRef) -> String {
    format!("SELECT COUNT(*) FROM {}", table.qualified_name())
}
