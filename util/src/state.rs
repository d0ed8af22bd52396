//! Application state shared across Axum route handlers and background jobs.

use sea_orm::DatabaseConnection;

/// Central application state, passed into route handlers via Axum's
/// `State<T>` extractor and cloned into spawned tasks.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Shared reference to the SeaORM connection pool.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Cloned connection handle for async contexts that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }
}
