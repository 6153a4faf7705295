//! Mutation statement synthesis from observed runtime values.
//!
//! No schema or primary-key metadata is available: a row is identified by
//! the full set of its currently displayed column values. If the table
//! permits duplicate rows, or a compared column round-trips imprecisely
//! (floating point), an UPDATE/DELETE will hit every matching row. This is
//! a known limitation of value-only identity, not something the engine
//! tries to patch over.

use crate::browse::TableRef;
use crate::tab::DraftRow;
use crate::{Dialect, Value};

/// Full-row equality predicate: `col = <literal>` per column, NULLs via
/// `IS NULL`, joined with ` AND `.
pub fn build_predicate(columns: &[String], row: &[Value], dialect: Dialect) -> String {
    let conditions: Vec<String> = columns
        .iter()
        .zip(row.iter())
        .map(|(col, val)| {
            if val.is_null() {
                format!("{} IS NULL", col)
            } else {
                format!("{} = {}", col, dialect.value_to_literal(val))
            }
        })
        .collect();

    conditions.join(" AND ")
}

/// Synthesize `UPDATE <table> SET <col> = <literal> WHERE <predicate>`.
///
/// The new value's type is inferred from the ORIGINAL cell, not the raw
/// input text. Returns `None` when `col_index` is out of range.
pub fn build_update(
    table: &TableRef,
    columns: &[String],
    row: &[Value],
    col_index: usize,
    new_raw: &str,
    dialect: Dialect,
) -> Option<String> {
    let column = columns.get(col_index)?;
    let original = row.get(col_index)?;

    let new_value = coerce_edit(original, new_raw);
    let predicate = build_predicate(columns, row, dialect);

    Some(format!(
        "UPDATE {} SET {} = {} WHERE {}",
        table.qualified_name(),
        column,
        dialect.value_to_literal(&new_value),
        predicate
    ))
}

/// Synthesize `DELETE FROM <table> WHERE <predicate>`.
pub fn build_delete(table: &TableRef, columns: &[String], row: &[Value], dialect: Dialect) -> String {
    format!(
        "DELETE FROM {} WHERE {}",
        table.qualified_name(),
        build_predicate(columns, row, dialect)
    )
}

/// Synthesize `INSERT INTO <table> (<cols>) VALUES (<literals>)` from a
/// draft row. Unpopulated columns are omitted, not set to NULL. An empty
/// draft returns `None`: the action is skipped, nothing executes.
pub fn build_insert(table: &TableRef, draft: &DraftRow, dialect: Dialect) -> Option<String> {
    if draft.is_empty() {
        return None;
    }

    let columns: Vec<&str> = draft.entries().iter().map(|(c, _)| c.as_str()).collect();
    let values: Vec<String> = draft
        .entries()
        .iter()
        .map(|(_, raw)| dialect.value_to_literal(&coerce_draft_value(raw)))
        .collect();

    Some(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.qualified_name(),
        columns.join(", "),
        values.join(", ")
    ))
}

/// Infer the edited cell's new value from the original cell's runtime type.
pub fn coerce_edit(original: &Value, raw: &str) -> Value {
    match original {
        Value::Number(_) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Value::Null
            } else if let Ok(n) = trimmed.parse::<f64>() {
                Value::Number(n)
            } else {
                Value::Text(raw.to_string())
            }
        }
        Value::Bool(_) => match raw.trim() {
            t if t.eq_ignore_ascii_case("true") || t == "1" => Value::Bool(true),
            f if f.eq_ignore_ascii_case("false") || f == "0" => Value::Bool(false),
            _ => Value::Text(raw.to_string()),
        },
        Value::Json(_) => match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(parsed) if parsed.is_object() || parsed.is_array() => Value::Json(parsed),
            _ => Value::Text(raw.to_string()),
        },
        // NULL or text cell: the input is opaque text.
        _ => Value::Text(raw.to_string()),
    }
}

/// Lenient coercion for draft-row input, which has no original cell to
/// infer from.
pub fn coerce_draft_value(raw: &str) -> Value {
    let trimmed = raw.trim();

    if let Ok(n) = trimmed.parse::<f64>() {
        return Value::Number(n);
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(trimmed) {
            return Value::Json(parsed);
        }
    }

    Value::Text(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> TableRef {
        TableRef::from_qualified("public.users")
    }

    fn columns() -> Vec<String> {
        vec!["name".into(), "nickname".into(), "age".into()]
    }

    fn alice() -> Vec<Value> {
        vec![
            Value::Text("Alice".into()),
            Value::Null,
            Value::Number(30.0),
        ]
    }

    #[test]
    fn predicate_covers_full_row_with_null_handling() {
        let clause = build_predicate(&columns(), &alice(), Dialect::Postgres);
        assert_eq!(clause, "name = 'Alice' AND nickname IS NULL AND age = 30");
    }

    #[test]
    fn update_infers_number_from_original_cell() {
        let sql = build_update(&users(), &columns(), &alice(), 2, "43", Dialect::Postgres)
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE public.users SET age = 43 \
             WHERE name = 'Alice' AND nickname IS NULL AND age = 30"
        );
    }

    #[test]
    fn update_empty_input_on_numeric_cell_becomes_null() {
        let sql = build_update(&users(), &columns(), &alice(), 2, "", Dialect::Postgres)
            .unwrap();
        assert!(sql.starts_with("UPDATE public.users SET age = NULL WHERE"));
    }

    #[test]
    fn update_out_of_range_column_is_none() {
        assert!(build_update(&users(), &columns(), &alice(), 9, "x", Dialect::Postgres).is_none());
    }

    #[test]
    fn delete_uses_full_row_predicate() {
        let sql = build_delete(&users(), &columns(), &alice(), Dialect::Postgres);
        assert_eq!(
            sql,
            "DELETE FROM public.users \
             WHERE name = 'Alice' AND nickname IS NULL AND age = 30"
        );
    }

    #[test]
    fn insert_includes_only_populated_columns() {
        let mut draft = DraftRow::new();
        draft.set("name", "O'Brien");
        draft.set("age", "41");

        let sql = build_insert(&users(), &draft, Dialect::Postgres).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO public.users (name, age) VALUES ('O''Brien', 41)"
        );
    }

    #[test]
    fn empty_draft_skips_synthesis() {
        assert!(build_insert(&users(), &DraftRow::new(), Dialect::Postgres).is_none());
    }

    #[test]
    fn bool_edits_map_common_spellings() {
        let original = Value::Bool(false);
        assert_eq!(coerce_edit(&original, "true"), Value::Bool(true));
        assert_eq!(coerce_edit(&original, "1"), Value::Bool(true));
        assert_eq!(coerce_edit(&original, "false"), Value::Bool(false));
        assert_eq!(coerce_edit(&original, "0"), Value::Bool(false));
        assert_eq!(coerce_edit(&original, "maybe"), Value::Text("maybe".into()));
    }

    #[test]
    fn json_edits_reparse_when_valid() {
        let original = Value::Json(serde_json::json!({"a": 1}));
        assert_eq!(
            coerce_edit(&original, r#"{"a": 2}"#),
            Value::Json(serde_json::json!({"a": 2}))
        );
        assert_eq!(
            coerce_edit(&original, "not json"),
            Value::Text("not json".into())
        );
    }

    #[test]
    fn draft_values_coerce_leniently() {
        assert_eq!(coerce_draft_value("42"), Value::Number(42.0));
        assert_eq!(coerce_draft_value("true"), Value::Bool(true));
        assert_eq!(
            coerce_draft_value(r#"[1, 2]"#),
            Value::Json(serde_json::json!([1, 2]))
        );
        assert_eq!(coerce_draft_value("plain"), Value::Text("plain".into()));
    }
}
