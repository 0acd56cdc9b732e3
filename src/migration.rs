//! Idempotent bootstrap of the `agence` and `vehicule` tables.
//! Names are not declared UNIQUE: duplicates are rejected by the check before insert.

use crate::db::{Database, Dialect};
use crate::error::DbError;
use crate::sql::Statement;

const POSTGRES_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS agence (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        address TEXT,
        phone TEXT,
        email TEXT,
        date_of_creation TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        date_of_modification TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vehicule (
        id BIGSERIAL PRIMARY KEY,
        agence_id BIGINT REFERENCES agence(id) ON DELETE SET NULL,
        marque TEXT NOT NULL,
        model TEXT NOT NULL,
        annee INTEGER NOT NULL,
        statut TEXT NOT NULL,
        immatriculation TEXT NOT NULL,
        prix_par_jour DOUBLE PRECISION NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS vehicule_agence_id_idx ON vehicule (agence_id)",
];

const SQLITE_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS agence (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        address TEXT,
        phone TEXT,
        email TEXT,
        date_of_creation TEXT NOT NULL,
        date_of_modification TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vehicule (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        agence_id INTEGER REFERENCES agence(id) ON DELETE SET NULL,
        marque TEXT NOT NULL,
        model TEXT NOT NULL,
        annee INTEGER NOT NULL,
        statut TEXT NOT NULL,
        immatriculation TEXT NOT NULL,
        prix_par_jour REAL NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS vehicule_agence_id_idx ON vehicule (agence_id)",
];

/// Create the tables when missing. Safe to run on every startup.
pub async fn ensure_tables(db: &dyn Database) -> Result<(), DbError> {
    let ddl = match db.dialect() {
        Dialect::Postgres => POSTGRES_DDL,
        Dialect::Sqlite => SQLITE_DDL,
    };
    for sql in ddl {
        db.query(&Statement::write(*sql)).await?;
    }
    tracing::info!(dialect = ?db.dialect(), "tables ready");
    Ok(())
}
