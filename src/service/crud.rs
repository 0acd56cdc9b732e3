//! Generic CRUD execution: parse, validate, check, mutate, re-fetch.
//!
//! Existence and duplicate checks run as separate statements ahead of the mutation
//! they guard, without a transaction. Two concurrent creates with the same natural
//! key can both pass the check.

use crate::db::{Database, Row};
use crate::error::{AppError, DbError};
use crate::model::{EntityDef, Resource};
use crate::service::RequestValidator;
use crate::sql::{delete, insert, select_by_column, select_by_id, select_list, update};
use chrono::Utc;
use serde_json::{Map, Value};

pub struct CrudService;

impl CrudService {
    /// All rows ordered by id.
    pub async fn list<R: Resource>(db: &dyn Database) -> Result<Vec<R>, AppError> {
        let rows = db.query(&select_list(R::def())).await?.into_rows();
        rows.into_iter().map(from_row::<R>).collect()
    }

    pub async fn get<R: Resource>(db: &dyn Database, raw_id: &str) -> Result<R, AppError> {
        let def = R::def();
        let id = parse_id(def, raw_id)?;
        Self::find::<R>(db, id).await?.ok_or(AppError::NotFound(def.label))
    }

    pub async fn create<R: Resource>(db: &dyn Database, body: &Map<String, Value>) -> Result<R, AppError> {
        let def = R::def();
        let values = RequestValidator::normalize(body, def.fields)?;
        if let Some((_, key)) = values.iter().find(|(col, _)| *col == def.natural_key) {
            let existing = db.query(&select_by_column(def, def.natural_key, key.clone())).await?;
            if !existing.into_rows().is_empty() {
                return Err(AppError::Duplicate(def.label));
            }
        }
        let inserted = db.query(&insert(def, &values, Utc::now())).await?;
        let id = inserted
            .insert_id()
            .ok_or_else(|| DbError::Query(format!("insert into {} returned no identifier", def.table)))?;
        tracing::info!(entity = def.table, id, "created");
        Self::find::<R>(db, id).await?.ok_or(AppError::NotFound(def.label))
    }

    /// Full-record overwrite: every declared field is written, absent optional ones as NULL.
    pub async fn update<R: Resource>(
        db: &dyn Database,
        raw_id: &str,
        body: &Map<String, Value>,
    ) -> Result<R, AppError> {
        let def = R::def();
        let id = parse_id(def, raw_id)?;
        let values = RequestValidator::normalize(body, def.fields)?;
        if Self::find::<R>(db, id).await?.is_none() {
            return Err(AppError::NotFound(def.label));
        }
        db.query(&update(def, id, &values, Utc::now())).await?;
        tracing::info!(entity = def.table, id, "updated");
        Self::find::<R>(db, id).await?.ok_or(AppError::NotFound(def.label))
    }

    /// Returns the id of the removed row.
    pub async fn delete<R: Resource>(db: &dyn Database, raw_id: &str) -> Result<i64, AppError> {
        let def = R::def();
        let id = parse_id(def, raw_id)?;
        if Self::find::<R>(db, id).await?.is_none() {
            return Err(AppError::NotFound(def.label));
        }
        db.query(&delete(def, id)).await?;
        tracing::info!(entity = def.table, id, "deleted");
        Ok(id)
    }

    async fn find<R: Resource>(db: &dyn Database, id: i64) -> Result<Option<R>, AppError> {
        let rows = db.query(&select_by_id(R::def(), id)).await?.into_rows();
        rows.into_iter().next().map(from_row::<R>).transpose()
    }
}

/// Path ids must be whole integers; anything else is rejected before the database is touched.
pub fn parse_id(def: &EntityDef, raw: &str) -> Result<i64, AppError> {
    raw.trim().parse().map_err(|_| AppError::InvalidId(def.noun))
}

fn from_row<R: Resource>(row: Row) -> Result<R, AppError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| AppError::Database(DbError::Decode(e.to_string())))
}
