//! # Local History Lists
//!
//! Pure list logic for the two product lists kept on the device:
//!
//! ```text
//! recentlyViewedProducts            productComparison
//! ┌──────────────────────────┐      ┌──────────────────────────┐
//! │ most recent first        │      │ insertion order          │
//! │ re-view moves to front   │      │ duplicate add: no-op     │
//! │ cap 10, oldest dropped   │      │ cap 4, fifth rejected    │
//! │ entries expire (30 days) │      │ no expiry                │
//! └──────────────────────────┘      └──────────────────────────┘
//! ```
//!
//! Persistence lives in `storefront-db`; this module never touches storage.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::pricing::resolve_product_pricing;
use crate::types::Product;
use crate::{MAX_COMPARISON_ITEMS, MAX_RECENTLY_VIEWED, RECENTLY_VIEWED_TTL_DAYS};

// =============================================================================
// Product Snapshot
// =============================================================================

/// The bits of a product kept in a local list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub product_id: i64,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Resolved final price at the time the snapshot was taken.
    #[serde(default)]
    pub price: f64,
}

impl ProductSnapshot {
    pub fn from_product(product: &Product) -> Self {
        ProductSnapshot {
            product_id: product.id,
            name: product.name.clone(),
            image_url: product.primary_image().map(str::to_string),
            price: resolve_product_pricing(product, None).final_price,
        }
    }
}

// =============================================================================
// Recently Viewed
// =============================================================================

/// One entry of the recently viewed list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RecentlyViewedEntry {
    #[serde(flatten)]
    pub product: ProductSnapshot,
    #[ts(as = "String")]
    pub viewed_at: DateTime<Utc>,
}

impl RecentlyViewedEntry {
    /// Whether the entry is older than the retention window at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.viewed_at > Duration::days(RECENTLY_VIEWED_TTL_DAYS)
    }
}

/// Drops entries past the retention window.
pub fn prune_expired(entries: Vec<RecentlyViewedEntry>, now: DateTime<Utc>) -> Vec<RecentlyViewedEntry> {
    entries.into_iter().filter(|e| !e.is_expired(now)).collect()
}

/// Records a view: expired entries are dropped, an existing entry for the
/// same product is moved to the front, and the list is capped.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use storefront_core::history::{record_view, ProductSnapshot};
///
/// let snap = |id| ProductSnapshot { product_id: id, name: format!("P{id}"), image_url: None, price: 1.0 };
/// let now = Utc::now();
///
/// let list = record_view(Vec::new(), snap(1), now);
/// let list = record_view(list, snap(2), now);
/// let list = record_view(list, snap(1), now);
///
/// let ids: Vec<i64> = list.iter().map(|e| e.product.product_id).collect();
/// assert_eq!(ids, vec![1, 2]);
/// ```
pub fn record_view(
    entries: Vec<RecentlyViewedEntry>,
    product: ProductSnapshot,
    now: DateTime<Utc>,
) -> Vec<RecentlyViewedEntry> {
    let product_id = product.product_id;
    let mut list = Vec::with_capacity(MAX_RECENTLY_VIEWED);
    list.push(RecentlyViewedEntry {
        product,
        viewed_at: now,
    });
    list.extend(
        prune_expired(entries, now)
            .into_iter()
            .filter(|e| e.product.product_id != product_id),
    );
    list.truncate(MAX_RECENTLY_VIEWED);
    list
}

// =============================================================================
// Comparison List
// =============================================================================

/// Products picked for side-by-side comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ComparisonList(Vec<ProductSnapshot>);

/// Stored arrays are replayed through [`ComparisonList::add`], so
/// duplicates collapse and anything past the cap is dropped.
impl<'de> Deserialize<'de> for ComparisonList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = Vec::<ProductSnapshot>::deserialize(deserializer)?;
        let mut list = ComparisonList::new();
        for product in stored {
            if list.add(product).is_err() {
                break;
            }
        }
        Ok(list)
    }
}

impl ComparisonList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ProductSnapshot] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, product_id: i64) -> bool {
        self.0.iter().any(|i| i.product_id == product_id)
    }

    /// Adds a product.
    ///
    /// Returns `Ok(false)` if it was already there (no-op) and
    /// [`CoreError::ComparisonFull`] if the list is at capacity.
    pub fn add(&mut self, product: ProductSnapshot) -> CoreResult<bool> {
        if self.contains(product.product_id) {
            return Ok(false);
        }
        if self.0.len() >= MAX_COMPARISON_ITEMS {
            return Err(CoreError::ComparisonFull {
                max: MAX_COMPARISON_ITEMS,
            });
        }
        self.0.push(product);
        Ok(true)
    }

    /// Removes a product; returns whether anything was removed.
    pub fn remove(&mut self, product_id: i64) -> bool {
        let before = self.0.len();
        self.0.retain(|i| i.product_id != product_id);
        self.0.len() != before
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(id: i64) -> ProductSnapshot {
        ProductSnapshot {
            product_id: id,
            name: format!("Product {id}"),
            image_url: None,
            price: 100.0,
        }
    }

    fn ids(list: &[RecentlyViewedEntry]) -> Vec<i64> {
        list.iter().map(|e| e.product.product_id).collect()
    }

    #[test]
    fn test_recently_viewed_most_recent_first() {
        let now = Utc::now();
        let mut list = Vec::new();
        for id in 1..=3 {
            list = record_view(list, snap(id), now);
        }
        assert_eq!(ids(&list), vec![3, 2, 1]);

        list = record_view(list, snap(1), now);
        assert_eq!(ids(&list), vec![1, 3, 2]);
    }

    #[test]
    fn test_recently_viewed_cap() {
        let now = Utc::now();
        let mut list = Vec::new();
        for id in 1..=12 {
            list = record_view(list, snap(id), now);
        }
        assert_eq!(list.len(), MAX_RECENTLY_VIEWED);
        assert_eq!(list[0].product.product_id, 12);
        assert!(!ids(&list).contains(&1));
        assert!(!ids(&list).contains(&2));
    }

    #[test]
    fn test_recently_viewed_ttl() {
        let now = Utc::now();
        let old = RecentlyViewedEntry {
            product: snap(1),
            viewed_at: now - Duration::days(31),
        };
        let fresh = RecentlyViewedEntry {
            product: snap(2),
            viewed_at: now - Duration::days(29),
        };

        let pruned = prune_expired(vec![old.clone(), fresh.clone()], now);
        assert_eq!(ids(&pruned), vec![2]);

        let list = record_view(vec![fresh, old], snap(3), now);
        assert_eq!(ids(&list), vec![3, 2]);
    }

    #[test]
    fn test_entry_serializes_flat() {
        let entry = RecentlyViewedEntry {
            product: snap(5),
            viewed_at: Utc::now(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["productId"], 5);
        assert!(json.get("viewedAt").is_some());
    }

    #[test]
    fn test_comparison_dedupe_and_cap() {
        let mut list = ComparisonList::new();
        assert_eq!(list.add(snap(1)), Ok(true));
        assert_eq!(list.add(snap(1)), Ok(false));
        for id in 2..=4 {
            list.add(snap(id)).unwrap();
        }
        assert_eq!(list.len(), 4);
        assert_eq!(list.add(snap(5)), Err(CoreError::ComparisonFull { max: 4 }));

        // Re-adding an existing product at capacity is still a no-op.
        assert_eq!(list.add(snap(2)), Ok(false));
    }

    #[test]
    fn test_comparison_remove_and_clear() {
        let mut list = ComparisonList::new();
        list.add(snap(1)).unwrap();
        list.add(snap(2)).unwrap();
        assert!(list.remove(1));
        assert!(!list.remove(1));
        assert_eq!(list.items()[0].product_id, 2);
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_comparison_serializes_as_array() {
        let mut list = ComparisonList::new();
        list.add(snap(1)).unwrap();
        let json = serde_json::to_string(&list).unwrap();
        assert!(json.starts_with('['));
        let back: ComparisonList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn test_comparison_load_enforces_cap() {
        let stored: Vec<ProductSnapshot> = [1, 2, 2, 3, 4, 5, 6].into_iter().map(snap).collect();
        let json = serde_json::to_string(&stored).unwrap();

        let mut list: ComparisonList = serde_json::from_str(&json).unwrap();
        let loaded: Vec<i64> = list.items().iter().map(|i| i.product_id).collect();
        assert_eq!(loaded, vec![1, 2, 3, 4]);
        assert_eq!(list.add(snap(7)), Err(CoreError::ComparisonFull { max: 4 }));
    }

    #[test]
    fn test_snapshot_uses_resolved_price() {
        let product: Product =
            serde_json::from_str(r#"{"id":1,"name":"Shirt","regularPrice":200,"salePrice":150}"#).unwrap();
        assert_eq!(ProductSnapshot::from_product(&product).price, 150.0);
    }
}
