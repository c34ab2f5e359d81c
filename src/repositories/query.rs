// src/repositories/query.rs
//
// Query descriptors: filter predicates, sort order, limits and pages.
//
// Filters render to parameterized SQL. Values are always bound, never
// interpolated, and column names must be declared by the entity.

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::repositories::entity::{ensure_column, Entity};
use crate::repositories::error::{RepoError, RepoResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    fn as_sql(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "<>",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }
}

/// Row predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Compare {
        column: String,
        op: Comparison,
        value: Value,
    },
    Like {
        column: String,
        pattern: String,
    },
    IsNull(String),
    In {
        column: String,
        values: Vec<Value>,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn compare(column: impl Into<String>, op: Comparison, value: impl Into<Value>) -> Self {
        Filter::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::Eq, value)
    }

    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::Ne, value)
    }

    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::Lt, value)
    }

    pub fn le(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::Le, value)
    }

    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::Gt, value)
    }

    pub fn ge(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::Ge, value)
    }

    pub fn like(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Filter::Like {
            column: column.into(),
            pattern: pattern.into(),
        }
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Filter::IsNull(column.into())
    }

    pub fn is_in<V: Into<Value>>(column: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Filter::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn and(self, other: Filter) -> Self {
        match self {
            Filter::And(mut parts) => {
                parts.push(other);
                Filter::And(parts)
            }
            first => Filter::And(vec![first, other]),
        }
    }

    pub fn or(self, other: Filter) -> Self {
        match self {
            Filter::Or(mut parts) => {
                parts.push(other);
                Filter::Or(parts)
            }
            first => Filter::Or(vec![first, other]),
        }
    }

    pub fn negate(self) -> Self {
        Filter::Not(Box::new(self))
    }

    /// Render into a SQL boolean expression with `?` placeholders.
    pub(crate) fn render<T: Entity>(&self) -> RepoResult<(String, Vec<Value>)> {
        let mut sql = String::new();
        let mut params = Vec::new();
        self.write_sql::<T>(&mut sql, &mut params)?;
        Ok((sql, params))
    }

    fn write_sql<T: Entity>(&self, sql: &mut String, params: &mut Vec<Value>) -> RepoResult<()> {
        match self {
            Filter::Compare { column, op, value } => {
                let column = ensure_column::<T>(column)?;
                sql.push_str(&format!("{column} {} ?", op.as_sql()));
                params.push(value.clone());
            }
            Filter::Like { column, pattern } => {
                let column = ensure_column::<T>(column)?;
                sql.push_str(&format!("{column} LIKE ?"));
                params.push(Value::Text(pattern.clone()));
            }
            Filter::IsNull(column) => {
                let column = ensure_column::<T>(column)?;
                sql.push_str(&format!("{column} IS NULL"));
            }
            Filter::In { column, values } => {
                let column = ensure_column::<T>(column)?;
                if values.is_empty() {
                    sql.push_str("1 = 0");
                } else {
                    let marks = vec!["?"; values.len()].join(", ");
                    sql.push_str(&format!("{column} IN ({marks})"));
                    params.extend(values.iter().cloned());
                }
            }
            Filter::And(parts) => Self::write_group::<T>(parts, " AND ", "1 = 1", sql, params)?,
            Filter::Or(parts) => Self::write_group::<T>(parts, " OR ", "1 = 0", sql, params)?,
            Filter::Not(inner) => {
                sql.push_str("NOT (");
                inner.write_sql::<T>(sql, params)?;
                sql.push(')');
            }
        }
        Ok(())
    }

    fn write_group<T: Entity>(
        parts: &[Filter],
        joiner: &str,
        empty: &str,
        sql: &mut String,
        params: &mut Vec<Value>,
    ) -> RepoResult<()> {
        if parts.is_empty() {
            sql.push_str(empty);
            return Ok(());
        }
        sql.push('(');
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                sql.push_str(joiner);
            }
            part.write_sql::<T>(sql, params)?;
        }
        sql.push(')');
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    None,
    Asc,
    Desc,
}

/// Filter, sort and limit for list queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Option<Filter>,
    pub sort_key: Option<String>,
    pub direction: SortDirection,
    /// 0 means unlimited
    pub limit: u32,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filtered(filter: Filter) -> Self {
        Self::new().filter(filter)
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn order_by(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_key = Some(key.into());
        self.direction = direction;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// ` WHERE ...` clause (or empty) plus its bound values.
    pub(crate) fn where_clause<T: Entity>(&self) -> RepoResult<(String, Vec<Value>)> {
        match &self.filter {
            Some(filter) => {
                let (sql, params) = filter.render::<T>()?;
                Ok((format!(" WHERE {sql}"), params))
            }
            None => Ok((String::new(), Vec::new())),
        }
    }

    /// ` ORDER BY ...` clause.
    ///
    /// A direction without a key sorts by the primary key. `SortDirection::None`
    /// yields no clause unless `stable` is set, in which case rows come back in
    /// key order so consecutive pages never overlap.
    pub(crate) fn order_clause<T: Entity>(&self, stable: bool) -> RepoResult<String> {
        let key = match &self.sort_key {
            Some(key) => ensure_column::<T>(key)?,
            None => T::KEY,
        };
        let clause = match self.direction {
            SortDirection::Asc => format!(" ORDER BY {key} ASC"),
            SortDirection::Desc => format!(" ORDER BY {key} DESC"),
            SortDirection::None if stable => format!(" ORDER BY {} ASC", T::KEY),
            SortDirection::None => String::new(),
        };
        // Tie-break on the key so equal sort values page deterministically.
        if stable && key != T::KEY && self.direction != SortDirection::None {
            return Ok(format!("{clause}, {} ASC", T::KEY));
        }
        Ok(clause)
    }
}

/// One page of a paginated query. `index` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub index: u32,
    pub size: u32,
    pub query: Query,
}

impl PageRequest {
    pub fn new(index: u32, size: u32) -> Self {
        Self {
            index,
            size,
            query: Query::default(),
        }
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Rows to skip. Fails for a zero index or size, and when the skip
    /// does not fit an SQLite integer.
    pub(crate) fn offset(&self) -> RepoResult<i64> {
        let invalid = || RepoError::InvalidPage {
            index: self.index,
            size: self.size,
        };
        if self.index == 0 || self.size == 0 {
            return Err(invalid());
        }
        (i64::from(self.index) - 1)
            .checked_mul(i64::from(self.size))
            .ok_or_else(invalid)
    }
}

/// A result slice together with the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub index: u32,
    pub size: u32,
}

impl<T> Page<T> {
    /// Number of pages needed to hold `total` rows.
    pub fn page_count(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.index) < self.page_count()
    }
}
