//! Typed statement parameters and their binding into sqlx queries.

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};

/// A value bound to a statement placeholder. Every variant is nullable so that
/// NULLs keep their column type on PostgreSQL.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Int(Option<i64>),
    Float(Option<f64>),
    Text(Option<String>),
    Timestamp(Option<DateTime<Utc>>),
}

impl SqlValue {
    pub fn text(s: impl Into<String>) -> Self {
        SqlValue::Text(Some(s.into()))
    }

    pub fn int(n: i64) -> Self {
        SqlValue::Int(Some(n))
    }

    pub fn bind_pg<'q>(&self, query: Query<'q, Postgres, PgArguments>) -> Query<'q, Postgres, PgArguments> {
        match self {
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.clone()),
            SqlValue::Timestamp(v) => query.bind(*v),
        }
    }

    /// SQLite has no timestamp storage class: timestamps are stored as RFC 3339 text.
    pub fn bind_sqlite<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        match self {
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.clone()),
            SqlValue::Timestamp(v) => query.bind(v.map(|t| t.to_rfc3339())),
        }
    }
}
