//! # Storage Events
//!
//! Same-process change notifications for stored lists. Any part of the app
//! that shows the comparison list subscribes via
//! [`crate::Database::subscribe`] and redraws on `ComparisonUpdated`.

use storefront_core::history::ComparisonList;

#[derive(Debug, Clone, PartialEq)]
pub enum StorageEvent {
    /// The comparison list changed; carries the list as stored.
    ComparisonUpdated(ComparisonList),
}
