use super::conditions::WhereClause;
use super::ident::{qualified, quote_ident};
use super::joins::Join;
use super::pagination::LimitOffset;
use crate::database::SqlBuilder;
use serde_json::Value;
use std::fmt;

/// Sort direction for ORDER BY
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn is_asc(self) -> bool {
        matches!(self, Direction::Asc)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("ASC"),
            Direction::Desc => f.write_str("DESC"),
        }
    }
}

/// Statement under construction for one table.
///
/// Scopes transform a `QueryBuilder`; actions then render it as a SELECT,
/// COUNT, UPDATE or DELETE. When the builder knows the table's soft-delete
/// column, every rendering filters out tombstoned rows unless
/// [`QueryBuilder::unscoped`] was called.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    base_table: String,
    select_fields: Vec<String>,
    joins: Vec<Join>,
    where_clauses: Vec<WhereClause>,
    order_by: Vec<(String, Direction)>,
    pagination: Option<LimitOffset>,
    soft_delete_column: Option<String>,
    unscoped: bool,
}

impl QueryBuilder {
    /// Create a new query builder for the given table
    pub fn new(table: &str) -> Self {
        Self {
            base_table: table.to_string(),
            select_fields: vec!["*".to_string()],
            joins: Vec::new(),
            where_clauses: Vec::new(),
            order_by: Vec::new(),
            pagination: None,
            soft_delete_column: None,
            unscoped: false,
        }
    }

    pub fn table(&self) -> &str {
        &self.base_table
    }

    /// Set specific fields to select
    pub fn select(mut self, fields: &[&str]) -> Self {
        self.select_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Add a JOIN clause
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Add an INNER JOIN
    pub fn inner_join(self, table: &str, on_condition: &str) -> Self {
        self.join(Join::inner(table, on_condition))
    }

    /// Add a LEFT JOIN
    pub fn left_join(self, table: &str, on_condition: &str) -> Self {
        self.join(Join::left(table, on_condition))
    }

    /// Add a WHERE clause; clauses are combined with AND
    pub fn where_clause(mut self, clause: WhereClause) -> Self {
        self.where_clauses.push(clause);
        self
    }

    /// Add a simple WHERE condition
    pub fn where_eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.where_clause(WhereClause::simple(field, "=", value))
    }

    /// Add WHERE IN condition
    pub fn where_in(self, field: &str, values: Vec<Value>) -> Self {
        self.where_clause(WhereClause::in_condition(field, values))
    }

    /// Add WHERE BETWEEN condition
    pub fn where_between(
        self,
        field: &str,
        start: impl Into<Value>,
        end: impl Into<Value>,
    ) -> Self {
        self.where_clause(WhereClause::between(field, start, end))
    }

    /// Add raw SQL with `?` placeholders
    pub fn where_raw(self, sql: &str, values: Vec<Value>) -> Self {
        self.where_clause(WhereClause::raw(sql, values))
    }

    /// Add ORDER BY clause
    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by.push((field.to_string(), direction));
        self
    }

    /// Add ORDER BY ASC
    pub fn order_asc(self, field: &str) -> Self {
        self.order_by(field, Direction::Asc)
    }

    /// Add ORDER BY DESC
    pub fn order_desc(self, field: &str) -> Self {
        self.order_by(field, Direction::Desc)
    }

    /// Replace the LIMIT/OFFSET window
    pub fn paginate(mut self, window: LimitOffset) -> Self {
        self.pagination = Some(window);
        self
    }

    /// Add LIMIT clause
    pub fn limit(mut self, limit: u64) -> Self {
        match self.pagination {
            Some(ref mut window) => window.limit = Some(limit),
            None => self.pagination = Some(LimitOffset::limit_only(limit)),
        }
        self
    }

    /// Add OFFSET clause
    pub fn offset(mut self, offset: u64) -> Self {
        match self.pagination {
            Some(ref mut window) => window.offset = Some(offset),
            None => self.pagination = Some(LimitOffset::offset_only(offset)),
        }
        self
    }

    /// Declare the soft-delete column; `None` turns the filter off entirely
    pub fn soft_delete(mut self, column: Option<&str>) -> Self {
        self.soft_delete_column = column.map(str::to_string);
        self
    }

    /// Include soft-deleted rows
    pub fn unscoped(mut self) -> Self {
        self.unscoped = true;
        self
    }

    pub fn is_unscoped(&self) -> bool {
        self.unscoped
    }

    /// Soft-delete column that is currently filtered on, if any
    pub fn soft_delete_filter(&self) -> Option<&str> {
        if self.unscoped {
            None
        } else {
            self.soft_delete_column.as_deref()
        }
    }

    /// True when caller-supplied WHERE conditions exist (the soft-delete filter does not count)
    pub fn has_conditions(&self) -> bool {
        !self.where_clauses.is_empty()
    }

    /// Render a SELECT statement
    pub fn build_select(&self) -> SqlBuilder {
        let mut qb = SqlBuilder::new("SELECT ");
        qb.push(self.select_list());
        self.push_from(&mut qb);
        self.push_where(&mut qb, !self.joins.is_empty());

        if !self.order_by.is_empty() {
            let order = self
                .order_by
                .iter()
                .map(|(field, direction)| format!("{} {}", quote_ident(field), direction))
                .collect::<Vec<_>>()
                .join(", ");
            qb.push(format!(" ORDER BY {order}"));
        }

        if let Some(ref window) = self.pagination {
            qb.push(window.to_sql());
        }

        qb
    }

    /// Render a COUNT(*) over the same rows, ignoring ordering and pagination
    pub fn build_count(&self) -> SqlBuilder {
        let mut qb = SqlBuilder::new("SELECT COUNT(*)");
        self.push_from(&mut qb);
        self.push_where(&mut qb, !self.joins.is_empty());
        qb
    }

    /// Render an UPDATE assigning `assignments` to matching rows
    pub fn build_update(&self, assignments: &[(String, Value)]) -> SqlBuilder {
        let mut qb = SqlBuilder::new(format!("UPDATE {} SET ", quote_ident(&self.base_table)));
        for (index, (column, value)) in assignments.iter().enumerate() {
            if index > 0 {
                qb.push(", ");
            }
            qb.push(format!("{} = ", quote_ident(column)));
            super::conditions::bind_value(&mut qb, value);
        }
        self.push_where(&mut qb, false);
        qb
    }

    /// Render a DELETE of matching rows
    pub fn build_delete(&self) -> SqlBuilder {
        let mut qb = SqlBuilder::new(format!("DELETE FROM {}", quote_ident(&self.base_table)));
        self.push_where(&mut qb, false);
        qb
    }

    /// Build the SELECT SQL string, placeholders included
    pub fn build_sql(&self) -> String {
        self.build_select().sql().to_string()
    }

    /// Build the COUNT SQL string, placeholders included
    pub fn count_sql(&self) -> String {
        self.build_count().sql().to_string()
    }

    fn select_list(&self) -> String {
        if self.select_fields.len() == 1 && self.select_fields[0] == "*" && !self.joins.is_empty() {
            return qualified(&self.base_table, "*");
        }
        self.select_fields
            .iter()
            .map(|field| quote_ident(field))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn push_from(&self, qb: &mut SqlBuilder) {
        qb.push(format!(" FROM {}", quote_ident(&self.base_table)));
        for join in &self.joins {
            join.push_sql(qb);
        }
    }

    fn push_where(&self, qb: &mut SqlBuilder, qualify: bool) {
        let soft_delete = self.soft_delete_filter().map(|column| {
            if qualify {
                qualified(&self.base_table, column)
            } else {
                quote_ident(column)
            }
        });

        if self.where_clauses.is_empty() && soft_delete.is_none() {
            return;
        }

        qb.push(" WHERE ");
        for (index, clause) in self.where_clauses.iter().enumerate() {
            if index > 0 {
                qb.push(" AND ");
            }
            clause.push_sql(qb);
        }

        if let Some(column) = soft_delete {
            if !self.where_clauses.is_empty() {
                qb.push(" AND ");
            }
            qb.push(format!("{column} = 0"));
        }
    }
}
