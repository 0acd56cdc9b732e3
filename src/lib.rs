//! Agence / Vehicule: CRUD backend for rental agencies and their vehicles.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod logging;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod views;

pub use config::{DatabaseConfig, ServerConfig, Settings};
pub use db::{Database, Dialect, QueryResult, SqlxDatabase};
pub use error::{ApiError, AppError, ConfigError, DbError};
pub use migration::ensure_tables;
pub use model::{Agence, Resource, Vehicule};
pub use response::{Envelope, Meta};
pub use routes::{app, common_routes, entity_routes};
pub use service::CrudService;
pub use state::AppState;
