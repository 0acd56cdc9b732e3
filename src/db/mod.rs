//! Database gateway: the `Database` seam handed to every controller, and its sqlx implementation.

mod gateway;

pub use gateway::SqlxDatabase;

use crate::error::DbError;
use crate::sql::Statement;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// One result row, keyed by column name.
pub type Row = Map<String, Value>;

/// SQL flavour behind a gateway. Only schema bootstrap needs to know.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

#[derive(Clone, Debug, PartialEq)]
pub enum QueryResult {
    Rows(Vec<Row>),
    Inserted { id: i64 },
    Affected(u64),
}

impl QueryResult {
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            QueryResult::Rows(rows) => rows,
            _ => Vec::new(),
        }
    }

    pub fn insert_id(&self) -> Option<i64> {
        match self {
            QueryResult::Inserted { id } => Some(*id),
            _ => None,
        }
    }
}

/// Async statement execution. Each call is independent: no transaction scoping, no retry.
#[async_trait]
pub trait Database: Send + Sync {
    fn dialect(&self) -> Dialect;

    async fn query(&self, statement: &Statement) -> Result<QueryResult, DbError>;

    /// Waits for checked-out connections to return, then closes the pool.
    async fn close(&self);
}
