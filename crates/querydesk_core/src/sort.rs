use crate::query::Row;
use crate::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Active sort for a tab's result window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    /// Advance the tri-state cycle for a column click.
    ///
    /// unset -> Ascending, Ascending -> Descending, Descending -> Ascending.
    /// Once a column has been sorted there is no way back to unset; clicking
    /// a different column restarts at Ascending.
    pub fn advanced(previous: Option<&SortState>, column: &str) -> SortState {
        match previous {
            Some(prev) if prev.column == column => SortState {
                column: column.to_string(),
                direction: prev.direction.toggled(),
            },
            _ => SortState {
                column: column.to_string(),
                direction: SortDirection::Ascending,
            },
        }
    }
}

/// Reorder rows for display.
///
/// Pure and stateless; stored rows are never mutated, which keeps
/// "load more" appends correct regardless of the active sort. The sort is
/// stable so ties keep their original relative order across re-renders.
pub fn sort_rows(rows: &[Row], columns: &[String], sort: Option<&SortState>) -> Vec<Row> {
    let mut sorted: Vec<Row> = rows.to_vec();

    let Some(state) = sort else {
        return sorted;
    };
    let Some(col_index) = columns.iter().position(|c| c == &state.column) else {
        return sorted;
    };

    sorted.sort_by(|a, b| {
        let left = a.get(col_index).unwrap_or(&Value::Null);
        let right = b.get(col_index).unwrap_or(&Value::Null);
        compare_cells(left, right, state.direction)
    });

    sorted
}

/// NULLs sort last regardless of direction; direction only scales the
/// comparison of present values.
fn compare_cells(a: &Value, b: &Value, direction: SortDirection) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    let ordering = match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => a
            .as_display_string()
            .to_lowercase()
            .cmp(&b.as_display_string().to_lowercase()),
    };

    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}
