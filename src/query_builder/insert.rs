use super::conditions::bind_value;
use super::ident::quote_ident;
use crate::database::SqlBuilder;
use serde_json::Value;

/// Multi-row INSERT with a fixed column list
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    table: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    on_conflict_do_nothing: bool,
    returning: Option<String>,
}

impl InsertStatement {
    pub fn new(table: &str, columns: Vec<String>) -> Self {
        Self {
            table: table.to_string(),
            columns,
            rows: Vec::new(),
            on_conflict_do_nothing: false,
            returning: None,
        }
    }

    /// Append a row; values must follow the column order
    pub fn row(mut self, values: Vec<Value>) -> Self {
        self.rows.push(values);
        self
    }

    pub fn push_row(&mut self, values: Vec<Value>) {
        self.rows.push(values);
    }

    /// Skip rows that collide with an existing unique key
    pub fn on_conflict_do_nothing(mut self) -> Self {
        self.on_conflict_do_nothing = true;
        self
    }

    /// Return `column` for every inserted row
    pub fn returning(mut self, column: &str) -> Self {
        self.returning = Some(column.to_string());
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn build(&self) -> SqlBuilder {
        let columns = self
            .columns
            .iter()
            .map(|column| quote_ident(column))
            .collect::<Vec<_>>()
            .join(", ");

        let mut qb = SqlBuilder::new(format!("INSERT INTO {}", quote_ident(&self.table)));
        if self.columns.is_empty() {
            qb.push(" DEFAULT VALUES");
        } else {
            qb.push(format!(" ({columns}) VALUES "));
            for (row_index, row) in self.rows.iter().enumerate() {
                if row_index > 0 {
                    qb.push(", ");
                }
                qb.push("(");
                for column_index in 0..self.columns.len() {
                    if column_index > 0 {
                        qb.push(", ");
                    }
                    bind_value(&mut qb, row.get(column_index).unwrap_or(&Value::Null));
                }
                qb.push(")");
            }
        }

        if self.on_conflict_do_nothing {
            qb.push(" ON CONFLICT DO NOTHING");
        }
        if let Some(ref column) = self.returning {
            qb.push(format!(" RETURNING {}", quote_ident(column)));
        }
        qb
    }

    pub fn build_sql(&self) -> String {
        self.build().sql().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_row_with_returning() {
        let insert = InsertStatement::new("users", vec!["name".into(), "age".into()])
            .row(vec![json!("ann"), json!(30)])
            .returning("id");

        assert_eq!(
            insert.build_sql(),
            "INSERT INTO \"users\" (\"name\", \"age\") VALUES (?, ?) RETURNING \"id\""
        );
    }

    #[test]
    fn test_multi_row_ignoring_conflicts() {
        let insert = InsertStatement::new("user_languages", vec!["user_id".into(), "language_id".into()])
            .row(vec![json!(1), json!(2)])
            .row(vec![json!(1), json!(3)])
            .on_conflict_do_nothing();

        assert_eq!(insert.row_count(), 2);
        assert_eq!(
            insert.build_sql(),
            "INSERT INTO \"user_languages\" (\"user_id\", \"language_id\") VALUES (?, ?), (?, ?) ON CONFLICT DO NOTHING"
        );
    }

    #[test]
    fn test_no_columns_uses_default_values() {
        let insert = InsertStatement::new("events", vec![]).returning("id");
        assert_eq!(
            insert.build_sql(),
            "INSERT INTO \"events\" DEFAULT VALUES RETURNING \"id\""
        );
    }
}
