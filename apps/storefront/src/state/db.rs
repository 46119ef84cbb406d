//! # Database State
//!
//! Wraps the local store for use in commands. The pool inside `Database`
//! is shared, so commands query it without extra locking.

use storefront_db::Database;

/// Wrapper around `Database` for command state.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the local store.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let recent = db_state.inner().history().recently_viewed(Utc::now()).await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
