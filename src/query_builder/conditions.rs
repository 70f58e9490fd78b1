use super::ident::quote_ident;
use crate::database::SqlBuilder;
use serde_json::Value;

/// Represents different types of SQL conditions.
///
/// Values are never inlined into the SQL text; they are pushed as bind
/// parameters when the condition is rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Simple {
        field: String,
        operator: String,
        value: Value,
    },
    In {
        field: String,
        values: Vec<Value>,
    },
    NotIn {
        field: String,
        values: Vec<Value>,
    },
    Between {
        field: String,
        start: Value,
        end: Value,
    },
    Like {
        field: String,
        pattern: Value,
    },
    IsNull {
        field: String,
    },
    IsNotNull {
        field: String,
    },
    /// Free-form SQL; each `?` is replaced by the next value in order
    Raw {
        sql: String,
        values: Vec<Value>,
    },
}

impl Condition {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Condition::Simple {
            field: field.to_string(),
            operator: "=".to_string(),
            value: value.into(),
        }
    }

    pub fn like(field: &str, pattern: impl Into<Value>) -> Self {
        Condition::Like {
            field: field.to_string(),
            pattern: pattern.into(),
        }
    }

    /// Append this condition to a statement
    pub fn push_sql(&self, qb: &mut SqlBuilder) {
        match self {
            Condition::Simple {
                field,
                operator,
                value,
            } => {
                qb.push(format!("{} {} ", quote_ident(field), operator));
                bind_value(qb, value);
            }
            Condition::In { field, values } => {
                if values.is_empty() {
                    // IN () is not valid SQL; an empty set matches nothing
                    qb.push("1 = 0");
                } else {
                    qb.push(format!("{} IN (", quote_ident(field)));
                    push_value_list(qb, values);
                    qb.push(")");
                }
            }
            Condition::NotIn { field, values } => {
                if values.is_empty() {
                    qb.push("1 = 1");
                } else {
                    qb.push(format!("{} NOT IN (", quote_ident(field)));
                    push_value_list(qb, values);
                    qb.push(")");
                }
            }
            Condition::Between { field, start, end } => {
                qb.push(format!("{} BETWEEN ", quote_ident(field)));
                bind_value(qb, start);
                qb.push(" AND ");
                bind_value(qb, end);
            }
            Condition::Like { field, pattern } => {
                qb.push(format!("{} LIKE ", quote_ident(field)));
                bind_value(qb, pattern);
            }
            Condition::IsNull { field } => {
                qb.push(format!("{} IS NULL", quote_ident(field)));
            }
            Condition::IsNotNull { field } => {
                qb.push(format!("{} IS NOT NULL", quote_ident(field)));
            }
            Condition::Raw { sql, values } => {
                // grouped so an OR inside the fragment cannot escape the AND chain
                qb.push("(");
                let mut parts = sql.split('?');
                if let Some(head) = parts.next() {
                    qb.push(head);
                }
                for (index, part) in parts.enumerate() {
                    // a placeholder without a value binds NULL
                    bind_value(qb, values.get(index).unwrap_or(&Value::Null));
                    qb.push(part);
                }
                qb.push(")");
            }
        }
    }
}

/// Represents a WHERE clause that can contain multiple conditions
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub conditions: Vec<Condition>,
    pub operator: LogicalOperator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl WhereClause {
    fn single(condition: Condition) -> Self {
        Self {
            conditions: vec![condition],
            operator: LogicalOperator::And,
        }
    }

    /// Create a simple WHERE clause with a single condition
    pub fn simple(field: &str, operator: &str, value: impl Into<Value>) -> Self {
        Self::single(Condition::Simple {
            field: field.to_string(),
            operator: operator.to_string(),
            value: value.into(),
        })
    }

    /// Create WHERE IN clause
    pub fn in_condition(field: &str, values: Vec<Value>) -> Self {
        Self::single(Condition::In {
            field: field.to_string(),
            values,
        })
    }

    /// Create WHERE NOT IN clause
    pub fn not_in_condition(field: &str, values: Vec<Value>) -> Self {
        Self::single(Condition::NotIn {
            field: field.to_string(),
            values,
        })
    }

    pub fn between(field: &str, start: impl Into<Value>, end: impl Into<Value>) -> Self {
        Self::single(Condition::Between {
            field: field.to_string(),
            start: start.into(),
            end: end.into(),
        })
    }

    /// `(c1 LIKE p OR c2 LIKE p ...)` as one clause
    pub fn like_any(fields: &[&str], pattern: impl Into<Value>) -> Self {
        let pattern = pattern.into();
        Self::or(
            fields
                .iter()
                .map(|field| Condition::like(field, pattern.clone()))
                .collect(),
        )
    }

    /// Create WHERE IS NULL clause
    pub fn is_null(field: &str) -> Self {
        Self::single(Condition::IsNull {
            field: field.to_string(),
        })
    }

    /// Create WHERE IS NOT NULL clause
    pub fn is_not_null(field: &str) -> Self {
        Self::single(Condition::IsNotNull {
            field: field.to_string(),
        })
    }

    /// Create raw SQL condition with `?` placeholders
    pub fn raw(sql: &str, values: Vec<Value>) -> Self {
        Self::single(Condition::Raw {
            sql: sql.to_string(),
            values,
        })
    }

    /// Combine multiple conditions with AND
    pub fn and(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            operator: LogicalOperator::And,
        }
    }

    /// Combine multiple conditions with OR
    pub fn or(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            operator: LogicalOperator::Or,
        }
    }

    /// Append this clause to a statement, parenthesized when it groups several conditions
    pub fn push_sql(&self, qb: &mut SqlBuilder) {
        match self.conditions.as_slice() {
            [] => {
                qb.push("1 = 1");
            }
            [only] => only.push_sql(qb),
            conditions => {
                let separator = match self.operator {
                    LogicalOperator::And => " AND ",
                    LogicalOperator::Or => " OR ",
                };
                qb.push("(");
                for (index, condition) in conditions.iter().enumerate() {
                    if index > 0 {
                        qb.push(separator);
                    }
                    condition.push_sql(qb);
                }
                qb.push(")");
            }
        }
    }
}

fn push_value_list(qb: &mut SqlBuilder, values: &[Value]) {
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            qb.push(", ");
        }
        bind_value(qb, value);
    }
}

/// Bind a JSON value using the closest native SQL type
pub fn bind_value(qb: &mut SqlBuilder, value: &Value) {
    match value {
        Value::Null => {
            qb.push_bind(None::<String>);
        }
        Value::Bool(b) => {
            qb.push_bind(*b);
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                qb.push_bind(i);
            } else {
                qb.push_bind(n.as_f64().unwrap_or_default());
            }
        }
        Value::String(s) => {
            qb.push_bind(s.clone());
        }
        Value::Array(_) | Value::Object(_) => {
            qb.push_bind(sqlx::types::Json(value.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(clause: &WhereClause) -> String {
        let mut qb = SqlBuilder::new("");
        clause.push_sql(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn test_simple_condition_binds_value() {
        let clause = WhereClause::simple("age", ">=", 18);
        assert_eq!(render(&clause), "\"age\" >= ?");
    }

    #[test]
    fn test_in_condition() {
        let clause = WhereClause::in_condition("id", vec![json!(1), json!(2), json!(3)]);
        assert_eq!(render(&clause), "\"id\" IN (?, ?, ?)");
    }

    #[test]
    fn test_empty_in_matches_nothing() {
        assert_eq!(render(&WhereClause::in_condition("id", vec![])), "1 = 0");
        assert_eq!(render(&WhereClause::not_in_condition("id", vec![])), "1 = 1");
    }

    #[test]
    fn test_between_condition() {
        let clause = WhereClause::between("age", 20, 30);
        assert_eq!(render(&clause), "\"age\" BETWEEN ? AND ?");
    }

    #[test]
    fn test_like_any_groups_with_or() {
        let clause = WhereClause::like_any(&["name", "email"], "%bob%");
        assert_eq!(render(&clause), "(\"name\" LIKE ? OR \"email\" LIKE ?)");
    }

    #[test]
    fn test_raw_condition_placeholders() {
        let clause = WhereClause::raw("lower(name) = ? AND age > ?", vec![json!("bob"), json!(3)]);
        assert_eq!(render(&clause), "(lower(name) = ? AND age > ?)");
    }

    #[test]
    fn test_raw_disjunction_stays_grouped() {
        let clause = WhereClause::raw("name = ? OR name = ?", vec![json!("ann"), json!("bob")]);
        assert_eq!(render(&clause), "(name = ? OR name = ?)");
    }

    #[test]
    fn test_null_checks() {
        assert_eq!(render(&WhereClause::is_null("email")), "\"email\" IS NULL");
        assert_eq!(
            render(&WhereClause::is_not_null("users.email")),
            "\"users\".\"email\" IS NOT NULL"
        );
    }

    #[test]
    fn test_and_group() {
        let clause = WhereClause::and(vec![Condition::eq("a", 1), Condition::eq("b", "x")]);
        assert_eq!(render(&clause), "(\"a\" = ? AND \"b\" = ?)");
    }
}
