//! sqlx-backed gateway over a PostgreSQL or SQLite pool.

use super::{Database, Dialect, QueryResult, Row};
use crate::config::DatabaseConfig;
use crate::error::DbError;
use crate::sql::{Statement, StatementKind};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};
use std::str::FromStr;

#[derive(Clone)]
enum Pool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

#[derive(Clone)]
pub struct SqlxDatabase {
    pool: Pool,
}

impl SqlxDatabase {
    /// Open the pool described by `config`. A `sqlite:` URL selects SQLite; anything else is PostgreSQL.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        let connect_err = |e: sqlx::Error| DbError::Connect(e.to_string());
        let pool = match config.url.as_deref() {
            Some(url) if url.starts_with("sqlite:") => {
                let options = SqliteConnectOptions::from_str(url)
                    .map_err(connect_err)?
                    .create_if_missing(true);
                // An in-memory database lives exactly as long as its connection.
                let pool = SqlitePoolOptions::new()
                    .max_connections(config.max_connections)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options)
                    .await
                    .map_err(connect_err)?;
                Pool::Sqlite(pool)
            }
            Some(url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect(url)
                    .await
                    .map_err(connect_err)?;
                Pool::Postgres(pool)
            }
            None => {
                let options = PgConnectOptions::new()
                    .host(&config.host)
                    .port(config.port)
                    .username(&config.user)
                    .password(&config.password)
                    .database(&config.name);
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect_with(options)
                    .await
                    .map_err(connect_err)?;
                Pool::Postgres(pool)
            }
        };
        Ok(SqlxDatabase { pool })
    }
}

#[async_trait]
impl Database for SqlxDatabase {
    fn dialect(&self) -> Dialect {
        match self.pool {
            Pool::Postgres(_) => Dialect::Postgres,
            Pool::Sqlite(_) => Dialect::Sqlite,
        }
    }

    async fn query(&self, statement: &Statement) -> Result<QueryResult, DbError> {
        tracing::debug!(sql = %statement.sql, params = ?statement.params, "query");
        match &self.pool {
            Pool::Postgres(pool) => run_pg(pool, statement).await,
            Pool::Sqlite(pool) => run_sqlite(pool, statement).await,
        }
    }

    async fn close(&self) {
        match &self.pool {
            Pool::Postgres(pool) => pool.close().await,
            Pool::Sqlite(pool) => pool.close().await,
        }
    }
}

fn query_err(e: sqlx::Error) -> DbError {
    DbError::Query(e.to_string())
}

fn decode_err(column: &str, e: sqlx::Error) -> DbError {
    DbError::Decode(format!("column {}: {}", column, e))
}

async fn run_pg(pool: &PgPool, statement: &Statement) -> Result<QueryResult, DbError> {
    let mut query = sqlx::query(&statement.sql);
    for p in &statement.params {
        query = p.bind_pg(query);
    }
    Ok(match statement.kind {
        StatementKind::Read => {
            let rows = query.fetch_all(pool).await.map_err(query_err)?;
            QueryResult::Rows(rows.iter().map(pg_row_to_json).collect::<Result<_, _>>()?)
        }
        StatementKind::Insert => {
            let row = query.fetch_one(pool).await.map_err(query_err)?;
            QueryResult::Inserted { id: row.try_get("id").map_err(|e| decode_err("id", e))? }
        }
        StatementKind::Write => QueryResult::Affected(query.execute(pool).await.map_err(query_err)?.rows_affected()),
    })
}

async fn run_sqlite(pool: &SqlitePool, statement: &Statement) -> Result<QueryResult, DbError> {
    let mut query = sqlx::query(&statement.sql);
    for p in &statement.params {
        query = p.bind_sqlite(query);
    }
    Ok(match statement.kind {
        StatementKind::Read => {
            let rows = query.fetch_all(pool).await.map_err(query_err)?;
            QueryResult::Rows(rows.iter().map(sqlite_row_to_json).collect::<Result<_, _>>()?)
        }
        StatementKind::Insert => {
            let row = query.fetch_one(pool).await.map_err(query_err)?;
            QueryResult::Inserted { id: row.try_get("id").map_err(|e| decode_err("id", e))? }
        }
        StatementKind::Write => QueryResult::Affected(query.execute(pool).await.map_err(query_err)?.rows_affected()),
    })
}

fn pg_row_to_json(row: &PgRow) -> Result<Row, DbError> {
    let mut map = Map::new();
    for col in row.columns() {
        let i = col.ordinal();
        let v = match col.type_info().name() {
            "INT2" => row.try_get::<Option<i16>, _>(i).map(|v| v.map(Value::from)),
            "INT4" => row.try_get::<Option<i32>, _>(i).map(|v| v.map(Value::from)),
            "INT8" => row.try_get::<Option<i64>, _>(i).map(|v| v.map(Value::from)),
            "FLOAT4" => row
                .try_get::<Option<f32>, _>(i)
                .map(|v| v.map(|n| Value::from(f64::from(n)))),
            "FLOAT8" => row.try_get::<Option<f64>, _>(i).map(|v| v.map(Value::from)),
            "BOOL" => row.try_get::<Option<bool>, _>(i).map(|v| v.map(Value::Bool)),
            "TIMESTAMPTZ" => row
                .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(i)
                .map(|v| v.map(|d| Value::String(d.to_rfc3339()))),
            "TIMESTAMP" => row
                .try_get::<Option<chrono::NaiveDateTime>, _>(i)
                .map(|v| v.map(|d| Value::String(d.and_utc().to_rfc3339()))),
            "DATE" => row
                .try_get::<Option<chrono::NaiveDate>, _>(i)
                .map(|v| v.map(|d| Value::String(d.format("%Y-%m-%d").to_string()))),
            "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(i),
            _ => row.try_get::<Option<String>, _>(i).map(|v| v.map(Value::String)),
        }
        .map_err(|e| decode_err(col.name(), e))?;
        map.insert(col.name().to_string(), v.unwrap_or(Value::Null));
    }
    Ok(map)
}

/// SQLite is dynamically typed: decode by the storage class of each value, not the declared column type.
fn sqlite_row_to_json(row: &SqliteRow) -> Result<Row, DbError> {
    let mut map = Map::new();
    for col in row.columns() {
        let i = col.ordinal();
        let storage = match row.try_get_raw(i) {
            Ok(raw) if !raw.is_null() => raw.type_info().name().to_string(),
            Ok(_) => String::from("NULL"),
            Err(e) => return Err(decode_err(col.name(), e)),
        };
        let v = match storage.as_str() {
            "NULL" => Ok(None),
            "INTEGER" | "BOOLEAN" => row.try_get::<Option<i64>, _>(i).map(|v| v.map(Value::from)),
            "REAL" | "NUMERIC" => row.try_get::<Option<f64>, _>(i).map(|v| v.map(Value::from)),
            "TEXT" => row.try_get::<Option<String>, _>(i).map(|v| v.map(Value::String)),
            other => Err(sqlx::Error::Decode(format!("unsupported storage class {}", other).into())),
        }
        .map_err(|e| decode_err(col.name(), e))?;
        map.insert(col.name().to_string(), v.unwrap_or(Value::Null));
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::SqlValue;

    async fn memory() -> SqlxDatabase {
        SqlxDatabase::connect(&DatabaseConfig::from_url("sqlite::memory:"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn sqlite_url_selects_sqlite_dialect() {
        let db = memory().await;
        assert_eq!(db.dialect(), Dialect::Sqlite);
    }

    #[tokio::test]
    async fn insert_reports_generated_id_and_rows_decode_by_storage_class() {
        let db = memory().await;
        db.query(&Statement::write(
            "CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT, label TEXT, price REAL, note TEXT)",
        ))
        .await
        .unwrap();

        let mut insert = Statement::read("INSERT INTO t (label, price, note) VALUES ($1, $2, $3) RETURNING id");
        insert.kind = StatementKind::Insert;
        insert.params = vec![SqlValue::text("a"), SqlValue::Float(Some(19.99)), SqlValue::Text(None)];
        let inserted = db.query(&insert).await.unwrap();
        assert_eq!(inserted.insert_id(), Some(1));

        let rows = db.query(&Statement::read("SELECT * FROM t")).await.unwrap().into_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], 1);
        assert_eq!(rows[0]["label"], "a");
        assert_eq!(rows[0]["price"].as_f64(), Some(19.99));
        assert!(rows[0]["note"].is_null());
    }

    #[tokio::test]
    async fn driver_errors_become_query_errors() {
        let db = memory().await;
        let err = db.query(&Statement::read("SELECT * FROM missing")).await.unwrap_err();
        match err {
            DbError::Query(msg) => assert!(msg.contains("missing")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_cells_are_reported_not_nulled() {
        let db = memory().await;
        db.query(&Statement::write("CREATE TABLE t (id INTEGER PRIMARY KEY, payload BLOB)"))
            .await
            .unwrap();
        db.query(&Statement::write("INSERT INTO t (payload) VALUES (X'00FF')"))
            .await
            .unwrap();
        let err = db.query(&Statement::read("SELECT * FROM t")).await.unwrap_err();
        match err {
            DbError::Decode(msg) => assert!(msg.starts_with("column payload:"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn write_reports_affected_rows() {
        let db = memory().await;
        db.query(&Statement::write("CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT)"))
            .await
            .unwrap();
        db.query(&Statement::write("INSERT INTO t (v) VALUES ('x'), ('y')"))
            .await
            .unwrap();
        let res = db.query(&Statement::write("DELETE FROM t")).await.unwrap();
        assert_eq!(res, QueryResult::Affected(2));
        db.close().await;
    }
}
