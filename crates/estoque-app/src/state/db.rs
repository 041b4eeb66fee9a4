//! # Database State
//!
//! Wraps the [`Database`] handle shared by all actions.

use estoque_db::Database;

#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let products = db_state.inner().products().list().await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
