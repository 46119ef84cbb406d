//! # History Repository
//!
//! Persists the recently viewed and comparison lists. List rules live in
//! `storefront_core::history`; this repository only loads, applies and
//! stores.
//!
//! ## Comparison Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add / remove / clear                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load productComparison ─► ComparisonList rule ─► store                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  broadcast StorageEvent::ComparisonUpdated(list)                        │
//! │       │                                                                 │
//! │       └─► every subscriber in this process sees the new list            │
//! │                                                                         │
//! │  Rejected adds (list full) and no-op adds store nothing and send        │
//! │  nothing.                                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use storefront_core::history::{self, ComparisonList, ProductSnapshot, RecentlyViewedEntry};
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::DbResult;
use crate::events::StorageEvent;
use crate::keys;
use crate::repository::kv::KvRepository;

/// Repository for the locally kept product lists.
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    kv: KvRepository,
    events: broadcast::Sender<StorageEvent>,
}

impl HistoryRepository {
    /// Creates a new HistoryRepository.
    pub fn new(kv: KvRepository, events: broadcast::Sender<StorageEvent>) -> Self {
        HistoryRepository { kv, events }
    }

    // =========================================================================
    // Recently Viewed
    // =========================================================================

    /// Recently viewed entries still inside the retention window at `now`,
    /// most recent first.
    pub async fn recently_viewed(&self, now: DateTime<Utc>) -> DbResult<Vec<RecentlyViewedEntry>> {
        let stored: Vec<RecentlyViewedEntry> = self
            .kv
            .get_json(keys::RECENTLY_VIEWED)
            .await?
            .unwrap_or_default();
        Ok(history::prune_expired(stored, now))
    }

    /// Records a product view and returns the updated list.
    pub async fn record_view(
        &self,
        product: ProductSnapshot,
        now: DateTime<Utc>,
    ) -> DbResult<Vec<RecentlyViewedEntry>> {
        let stored: Vec<RecentlyViewedEntry> = self
            .kv
            .get_json(keys::RECENTLY_VIEWED)
            .await?
            .unwrap_or_default();

        debug!(product_id = product.product_id, "Recording product view");
        let updated = history::record_view(stored, product, now);
        self.kv.set_json(keys::RECENTLY_VIEWED, &updated).await?;
        Ok(updated)
    }

    pub async fn clear_recently_viewed(&self) -> DbResult<()> {
        self.kv.remove(keys::RECENTLY_VIEWED).await?;
        Ok(())
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    /// The stored comparison list.
    pub async fn comparison(&self) -> DbResult<ComparisonList> {
        Ok(self
            .kv
            .get_json(keys::COMPARISON)
            .await?
            .unwrap_or_default())
    }

    /// Adds a product to the comparison list.
    ///
    /// Returns `Ok(false)` when the product was already there. Fails with
    /// [`crate::DbError::Rejected`] when the list is full.
    pub async fn add_to_comparison(&self, product: ProductSnapshot) -> DbResult<bool> {
        let mut list = self.comparison().await?;
        let product_id = product.product_id;
        if !list.add(product)? {
            debug!(product_id, "Product already in comparison");
            return Ok(false);
        }
        self.store_comparison(list).await?;
        Ok(true)
    }

    /// Removes a product from the comparison list. Returns whether it was
    /// there.
    pub async fn remove_from_comparison(&self, product_id: i64) -> DbResult<bool> {
        let mut list = self.comparison().await?;
        if !list.remove(product_id) {
            return Ok(false);
        }
        self.store_comparison(list).await?;
        Ok(true)
    }

    pub async fn clear_comparison(&self) -> DbResult<()> {
        self.store_comparison(ComparisonList::new()).await
    }

    async fn store_comparison(&self, list: ComparisonList) -> DbResult<()> {
        self.kv.set_json(keys::COMPARISON, &list).await?;
        debug!(items = list.len(), "Comparison updated");
        // No subscribers is fine.
        let _ = self.events.send(StorageEvent::ComparisonUpdated(list));
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
