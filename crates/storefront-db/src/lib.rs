//! # storefront-db: Local Storage for the Storefront
//!
//! Keeps the handful of values the storefront remembers on the device in a
//! single SQLite key/value table, with sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Data Flow                             │
//! │                                                                         │
//! │  CLI command (view product, compare, cart as guest)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   storefront-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │   Repositories     │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │    │                    │  │ (embedded) │  │   │
//! │  │   │               │◄───│ KvRepository       │  │            │  │   │
//! │  │   │ SqlitePool    │    │ SessionRepository  │  │ 001_init   │  │   │
//! │  │   │ event sender  │    │ HistoryRepository  │  │            │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <data dir>/storefront.db  (or :memory:)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - Key/value, session and history repositories
//! - [`events`] - Same-process change notifications
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("storefront.db")).await?;
//! let session_id = db.session().get_or_create_guest_session_id().await?;
//! let recent = db.history().recently_viewed(chrono::Utc::now()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod events;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use events::StorageEvent;
pub use pool::{Database, DbConfig};

pub use repository::history::HistoryRepository;
pub use repository::kv::KvRepository;
pub use repository::session::SessionRepository;

// =============================================================================
// Storage Keys
// =============================================================================

/// Keys of the values kept in `local_storage`.
pub mod keys {
    /// Plain string: `guest_{millis}_{base36}`.
    pub const GUEST_SESSION_ID: &str = "guestSessionId";
    /// JSON array of recently viewed entries.
    pub const RECENTLY_VIEWED: &str = "recentlyViewedProducts";
    /// JSON array of comparison snapshots.
    pub const COMPARISON: &str = "productComparison";
    /// Plain string: `en` or `vi`.
    pub const LANGUAGE: &str = "language";
}
