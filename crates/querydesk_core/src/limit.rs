use crate::Dialect;

/// Best-effort auto-limit injection for user-authored SELECTs.
///
/// This is a heuristic, not a parser. A statement is rewritten only when it
/// can be classified with confidence: the trimmed text must start with
/// `SELECT` (case-insensitive) and must not already mention `LIMIT` or
/// `TOP` anywhere. Anything else passes through untouched — skipping a
/// rewrite is acceptable, corrupting a valid statement is not.
pub fn apply_auto_limit(statement: &str, dialect: Dialect, auto_limit: u32) -> String {
    if auto_limit == 0 {
        return statement.to_string();
    }

    let trimmed = statement.trim();
    if !is_rewrite_candidate(trimmed) {
        return statement.to_string();
    }

    if dialect.uses_top_syntax() {
        format!("SELECT TOP {} * FROM ({}) AS subqb", auto_limit, trimmed)
    } else {
        format!("{} LIMIT {}", trimmed, auto_limit)
    }
}

fn is_rewrite_candidate(trimmed: &str) -> bool {
    let upper = trimmed.to_ascii_uppercase();
    upper.starts_with("SELECT") && !upper.contains("LIMIT") && !upper.contains("TOP")
}
