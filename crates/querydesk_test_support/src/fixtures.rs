use querydesk_core::{QueryResult, Value};

/// Build a result from column names and rows.
pub fn result(columns: &[&str], rows: Vec<Vec<Value>>) -> QueryResult {
    QueryResult::new(columns.iter().map(|c| c.to_string()).collect(), rows)
}

/// A page of `id`/`name` rows starting at `offset`, for pagination tests.
pub fn page_result(offset: usize, len: usize) -> QueryResult {
    let rows = (offset..offset + len)
        .map(|i| {
            vec![
                Value::Number(i as f64),
                Value::Text(format!("row-{i}")),
            ]
        })
        .collect();
    result(&["id", "name"], rows)
}

/// A single-cell `COUNT(*)` result.
pub fn count_result(total: u64) -> QueryResult {
    result(&["count"], vec![vec![Value::Number(total as f64)]])
}
