//! Shared application state for all routes.

use crate::db::Database;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Injected gateway; tests swap in SQLite or a failing double.
    pub db: Arc<dyn Database>,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>) -> Self {
        AppState { db }
    }

    pub fn db(&self) -> &dyn Database {
        self.db.as_ref()
    }
}
