use crate::value::{Value, format_number};
use serde::{Deserialize, Serialize};

/// SQL/command flavor of a target connection.
///
/// Closed set matching the supported client types. Controls literal
/// formatting and pagination clause syntax; owned by the connection
/// registry and treated as read-only per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Mssql,
    Mysql,
    Postgres,
    Mongo,
    Redis,
}

impl Dialect {
    pub fn display_name(&self) -> &'static str {
        match self {
            Dialect::Mssql => "SQL Server",
            Dialect::Mysql => "MySQL",
            Dialect::Postgres => "PostgreSQL",
            Dialect::Mongo => "MongoDB",
            Dialect::Redis => "Redis",
        }
    }

    /// Whether row limiting uses `TOP`/`OFFSET ... FETCH` instead of `LIMIT`.
    pub fn uses_top_syntax(&self) -> bool {
        matches!(self, Dialect::Mssql)
    }

    /// Convert a runtime value to a SQL literal for this dialect.
    pub fn value_to_literal(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => self.bool_literal(*b).to_string(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => format!("'{}'", self.escape_string(s)),
            // Best-effort: structured values travel as quoted JSON text.
            Value::Json(v) => format!("'{}'", self.escape_string(&v.to_string())),
        }
    }

    /// Escape a string for use inside a single-quoted literal.
    pub fn escape_string(&self, s: &str) -> String {
        s.replace('\'', "''")
    }

    fn bool_literal(&self, b: bool) -> &'static str {
        match self {
            Dialect::Mssql => {
                if b {
                    "1"
                } else {
                    "0"
                }
            }
            _ => {
                if b {
                    "TRUE"
                } else {
                    "FALSE"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ALL: [Dialect; 5] = [
        Dialect::Mssql,
        Dialect::Mysql,
        Dialect::Postgres,
        Dialect::Mongo,
        Dialect::Redis,
    ];

    #[test]
    fn null_is_null_everywhere() {
        for dialect in ALL {
            assert_eq!(dialect.value_to_literal(&Value::Null), "NULL");
        }
    }

    #[test]
    fn bool_literals_follow_dialect() {
        assert_eq!(Dialect::Mssql.value_to_literal(&Value::Bool(true)), "1");
        assert_eq!(Dialect::Mssql.value_to_literal(&Value::Bool(false)), "0");

        for dialect in [Dialect::Mysql, Dialect::Postgres, Dialect::Mongo, Dialect::Redis] {
            assert_eq!(dialect.value_to_literal(&Value::Bool(true)), "TRUE");
            assert_eq!(dialect.value_to_literal(&Value::Bool(false)), "FALSE");
        }
    }

    #[test]
    fn numbers_are_bare() {
        assert_eq!(
            Dialect::Postgres.value_to_literal(&Value::Number(30.0)),
            "30"
        );
        assert_eq!(
            Dialect::Postgres.value_to_literal(&Value::Number(1.5)),
            "1.5"
        );
    }

    #[test]
    fn strings_double_embedded_quotes() {
        assert_eq!(
            Dialect::Postgres.value_to_literal(&Value::Text("O'Brien".into())),
            "'O''Brien'"
        );
    }

    #[test]
    fn json_values_become_quoted_text() {
        assert_eq!(
            Dialect::Mysql.value_to_literal(&Value::Json(json!({"tag": "it's"}))),
            "'{\"tag\":\"it''s\"}'"
        );
    }
}
