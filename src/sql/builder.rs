//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from an entity definition.
//! Placeholders use `$n`, understood by both the PostgreSQL and SQLite drivers.

use crate::model::EntityDef;
use crate::sql::SqlValue;
use chrono::{DateTime, Utc};

/// Primary key column shared by every table.
pub const ID_COLUMN: &str = "id";

/// What the gateway should hand back for a statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatementKind {
    /// Result rows.
    Read,
    /// The generated identifier (statement ends in `RETURNING "id"`).
    Insert,
    /// The affected-row count.
    Write,
}

#[derive(Clone, Debug)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
    pub kind: StatementKind,
}

impl Statement {
    fn new(kind: StatementKind) -> Self {
        Statement {
            sql: String::new(),
            params: Vec::new(),
            kind,
        }
    }

    pub fn read(sql: impl Into<String>) -> Self {
        Statement {
            sql: sql.into(),
            params: Vec::new(),
            kind: StatementKind::Read,
        }
    }

    pub fn write(sql: impl Into<String>) -> Self {
        Statement {
            sql: sql.into(),
            params: Vec::new(),
            kind: StatementKind::Write,
        }
    }

    fn push_param(&mut self, v: SqlValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// Quote identifier (safe: only from static entity definitions).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// SELECT every row ordered by id, with the display join when the entity declares one.
pub fn select_list(def: &EntityDef) -> Statement {
    const MAIN_ALIAS: &str = "main";
    const REL_ALIAS: &str = "rel";
    let mut q = Statement::new(StatementKind::Read);
    let table = quoted(def.table);
    q.sql = match &def.join {
        Some(join) => format!(
            "SELECT {main}.*, {rel}.{col} AS {alias} FROM {table} {main} LEFT JOIN {rel_table} {rel} ON {rel}.{id} = {main}.{fk} ORDER BY {main}.{id}",
            main = MAIN_ALIAS,
            rel = REL_ALIAS,
            col = quoted(join.column),
            alias = quoted(join.alias),
            table = table,
            rel_table = quoted(join.table),
            id = quoted(ID_COLUMN),
            fk = quoted(join.local_key),
        ),
        None => format!("SELECT * FROM {} ORDER BY {}", table, quoted(ID_COLUMN)),
    };
    q
}

/// SELECT by primary key.
pub fn select_by_id(def: &EntityDef, id: i64) -> Statement {
    select_by_column(def, ID_COLUMN, SqlValue::int(id))
}

/// SELECT rows where one column equals a value. Used for natural-key duplicate checks.
pub fn select_by_column(def: &EntityDef, column: &str, value: SqlValue) -> Statement {
    let mut q = Statement::new(StatementKind::Read);
    let n = q.push_param(value);
    q.sql = format!("SELECT * FROM {} WHERE {} = ${}", quoted(def.table), quoted(column), n);
    q
}

/// INSERT one row from validated values, stamping the creation column when the entity has one.
pub fn insert(def: &EntityDef, values: &[(&str, SqlValue)], now: DateTime<Utc>) -> Statement {
    let mut q = Statement::new(StatementKind::Insert);
    let mut cols = Vec::with_capacity(values.len() + 1);
    let mut placeholders = Vec::with_capacity(values.len() + 1);
    for (col, v) in values {
        cols.push(quoted(col));
        placeholders.push(format!("${}", q.push_param(v.clone())));
    }
    if let Some(created) = def.created_at {
        cols.push(quoted(created));
        placeholders.push(format!("${}", q.push_param(SqlValue::Timestamp(Some(now)))));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(def.table),
        cols.join(", "),
        placeholders.join(", "),
        quoted(ID_COLUMN)
    );
    q
}

/// UPDATE every mutable column by id, stamping the modification column when the entity has one.
pub fn update(def: &EntityDef, id: i64, values: &[(&str, SqlValue)], now: DateTime<Utc>) -> Statement {
    let mut q = Statement::new(StatementKind::Write);
    let mut sets = Vec::with_capacity(values.len() + 1);
    for (col, v) in values {
        let n = q.push_param(v.clone());
        sets.push(format!("{} = ${}", quoted(col), n));
    }
    if let Some(modified) = def.updated_at {
        let n = q.push_param(SqlValue::Timestamp(Some(now)));
        sets.push(format!("{} = ${}", quoted(modified), n));
    }
    let id_param = q.push_param(SqlValue::int(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}",
        quoted(def.table),
        sets.join(", "),
        quoted(ID_COLUMN),
        id_param
    );
    q
}

/// DELETE by primary key.
pub fn delete(def: &EntityDef, id: i64) -> Statement {
    let mut q = Statement::new(StatementKind::Write);
    let n = q.push_param(SqlValue::int(id));
    q.sql = format!("DELETE FROM {} WHERE {} = ${}", quoted(def.table), quoted(ID_COLUMN), n);
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Agence, Resource, Vehicule};

    #[test]
    fn insert_appends_creation_stamp_and_returns_id() {
        let now = Utc::now();
        let q = insert(Agence::def(), &[("name", SqlValue::text("Central"))], now);
        assert_eq!(
            q.sql,
            "INSERT INTO \"agence\" (\"name\", \"date_of_creation\") VALUES ($1, $2) RETURNING \"id\""
        );
        assert_eq!(q.params, vec![SqlValue::text("Central"), SqlValue::Timestamp(Some(now))]);
        assert_eq!(q.kind, StatementKind::Insert);
    }

    #[test]
    fn update_binds_id_last() {
        let now = Utc::now();
        let values = [("marque", SqlValue::text("Renault")), ("annee", SqlValue::int(2019))];
        let q = update(Vehicule::def(), 7, &values, now);
        assert_eq!(
            q.sql,
            "UPDATE \"vehicule\" SET \"marque\" = $1, \"annee\" = $2 WHERE \"id\" = $3"
        );
        assert_eq!(q.params.last(), Some(&SqlValue::int(7)));
        assert_eq!(q.kind, StatementKind::Write);
    }

    #[test]
    fn vehicule_list_joins_agence_name() {
        let q = select_list(Vehicule::def());
        assert!(q.sql.contains("LEFT JOIN \"agence\" rel ON rel.\"id\" = main.\"agence_id\""));
        assert!(q.sql.contains("rel.\"name\" AS \"agence_name\""));
        assert!(q.params.is_empty());
    }

    #[test]
    fn agence_list_is_a_plain_select() {
        assert_eq!(select_list(Agence::def()).sql, "SELECT * FROM \"agence\" ORDER BY \"id\"");
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quoted("we\"ird"), "\"we\"\"ird\"");
    }
}
