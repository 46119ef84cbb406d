//! # Discount Campaigns
//!
//! Campaign DTOs for the admin screens, the status function, and a local
//! preview of what a campaign does to a price.
//!
//! ## Campaign Status
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 status(campaign, now) (never persisted)                 │
//! │                                                                         │
//! │   isActive == false ───────────────────────────────► Inactive          │
//! │          │                                                              │
//! │          ▼                                                              │
//! │   now <  startDate ────────────────────────────────► Upcoming          │
//! │          │                                                              │
//! │          ▼                                                              │
//! │   now >  endDate ──────────────────────────────────► Expired           │
//! │          │                                                              │
//! │          ▼                                                              │
//! │   otherwise ───────────────────────────────────────► Active            │
//! │                                                                         │
//! │   Both window bounds are inclusive.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The backend computes the authoritative effect
//! ([`crate::types::ActiveDiscountSummary`]); [`DiscountEffect`] is only a
//! preview for the admin form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::serde_helpers::{flexible_datetime, lenient_amount};
use crate::types::DiscountType;

// =============================================================================
// Campaign Status
// =============================================================================

/// Display status of a campaign at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Active,
    Inactive,
    Upcoming,
    Expired,
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Inactive => "inactive",
            CampaignStatus::Upcoming => "upcoming",
            CampaignStatus::Expired => "expired",
        };
        f.write_str(label)
    }
}

/// Computes a campaign's status from its flag and window.
///
/// ## Example
/// ```rust
/// use chrono::{Duration, Utc};
/// use storefront_core::discount::{campaign_status, CampaignStatus};
///
/// let now = Utc::now();
/// let status = campaign_status(true, now + Duration::days(1), now + Duration::days(7), now);
/// assert_eq!(status, CampaignStatus::Upcoming);
/// ```
pub fn campaign_status(
    is_active: bool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> CampaignStatus {
    if !is_active {
        CampaignStatus::Inactive
    } else if now < start {
        CampaignStatus::Upcoming
    } else if now > end {
        CampaignStatus::Expired
    } else {
        CampaignStatus::Active
    }
}

// =============================================================================
// Discount Effect
// =============================================================================

/// What a discount rule does to one price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountEffect {
    pub original_price: Money,
    pub discount_amount: Money,
    pub final_price: Money,
}

/// Applies a discount rule to a price.
///
/// - Percentage: `value`% of the price, capped by `cap` when given.
/// - Fixed amount: `value`, never more than the price.
///
/// The final price is never negative.
pub fn compute_effect(
    discount_type: DiscountType,
    value: f64,
    cap: Option<f64>,
    price: Money,
) -> DiscountEffect {
    let price = price.non_negative();
    let raw = match discount_type {
        DiscountType::Percentage => {
            let bps = (value.clamp(0.0, 100.0) * 100.0).round() as u32;
            let amount = price.percentage(bps);
            match cap {
                Some(cap) => amount.min(Money::from_amount(cap).non_negative()),
                None => amount,
            }
        }
        DiscountType::FixedAmount => Money::from_amount(value).non_negative(),
    };
    let discount_amount = raw.min(price);

    DiscountEffect {
        original_price: price,
        discount_amount,
        final_price: price - discount_amount,
    }
}

// =============================================================================
// Discount Campaign
// =============================================================================

/// A campaign as returned by `/discount-campaigns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCampaign {
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub discount_type: DiscountType,

    pub discount_value: f64,

    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub max_discount_amount: Option<f64>,

    #[serde(deserialize_with = "flexible_datetime")]
    #[ts(as = "String")]
    pub start_date: DateTime<Utc>,

    #[serde(deserialize_with = "flexible_datetime")]
    #[ts(as = "String")]
    pub end_date: DateTime<Utc>,

    #[serde(default)]
    pub is_active: bool,

    #[serde(default)]
    pub product_ids: Vec<i64>,

    #[serde(default)]
    pub variant_ids: Vec<i64>,
}

impl DiscountCampaign {
    /// Status at `now`.
    pub fn status(&self, now: DateTime<Utc>) -> CampaignStatus {
        campaign_status(self.is_active, self.start_date, self.end_date, now)
    }

    /// Previews this campaign's effect on a price.
    pub fn preview_effect(&self, price: f64) -> DiscountEffect {
        compute_effect(
            self.discount_type,
            self.discount_value,
            self.max_discount_amount,
            Money::from_amount(price),
        )
    }

    /// Whether the campaign targets the product or the variant.
    pub fn applies_to(&self, product_id: i64, variant_id: Option<i64>) -> bool {
        self.product_ids.contains(&product_id)
            || variant_id.is_some_and(|v| self.variant_ids.contains(&v))
    }

    /// Request body that would recreate this campaign; the edit form starts
    /// from it.
    pub fn to_request(&self) -> CampaignRequest {
        CampaignRequest {
            name: self.name.clone(),
            description: self.description.clone(),
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            max_discount_amount: self.max_discount_amount,
            start_date: self.start_date,
            end_date: self.end_date,
            is_active: self.is_active,
            product_ids: self.product_ids.clone(),
            variant_ids: self.variant_ids.clone(),
        }
    }
}

// =============================================================================
// Campaign Request
// =============================================================================

/// Create/update body for `/discount-campaigns`.
///
/// Checked with [`crate::validation::validate_campaign`] before sending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRequest {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub discount_type: DiscountType,

    pub discount_value: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount_amount: Option<f64>,

    #[ts(as = "String")]
    pub start_date: DateTime<Utc>,

    #[ts(as = "String")]
    pub end_date: DateTime<Utc>,

    pub is_active: bool,

    #[serde(default)]
    pub product_ids: Vec<i64>,

    #[serde(default)]
    pub variant_ids: Vec<i64>,
}

impl CampaignRequest {
    /// Previews the requested rule on a price.
    pub fn preview_effect(&self, price: f64) -> DiscountEffect {
        compute_effect(
            self.discount_type,
            self.discount_value,
            self.max_discount_amount,
            Money::from_amount(price),
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn campaign() -> DiscountCampaign {
        DiscountCampaign {
            id: 1,
            name: "Summer".to_string(),
            description: None,
            discount_type: DiscountType::Percentage,
            discount_value: 20.0,
            max_discount_amount: Some(30000.0),
            start_date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap(),
            is_active: true,
            product_ids: vec![10],
            variant_ids: vec![100],
        }
    }

    #[test]
    fn test_status_transitions_over_time() {
        let c = campaign();
        assert_eq!(c.status(c.start_date - Duration::seconds(1)), CampaignStatus::Upcoming);
        assert_eq!(c.status(c.start_date), CampaignStatus::Active);
        assert_eq!(c.status(c.end_date), CampaignStatus::Active);
        assert_eq!(c.status(c.end_date + Duration::seconds(1)), CampaignStatus::Expired);
    }

    #[test]
    fn test_inactive_flag_wins() {
        let mut c = campaign();
        c.is_active = false;
        assert_eq!(c.status(c.start_date + Duration::days(1)), CampaignStatus::Inactive);
        assert_eq!(c.status(c.end_date + Duration::days(1)), CampaignStatus::Inactive);
    }

    #[test]
    fn test_percentage_preview_respects_cap() {
        let c = campaign();
        let effect = c.preview_effect(100000.0);
        assert_eq!(effect.discount_amount.amount(), 20000.0);
        assert_eq!(effect.final_price.amount(), 80000.0);

        let capped = c.preview_effect(500000.0);
        assert_eq!(capped.discount_amount.amount(), 30000.0);
        assert_eq!(capped.final_price.amount(), 470000.0);
    }

    #[test]
    fn test_fixed_amount_bounded_by_price() {
        let effect = compute_effect(DiscountType::FixedAmount, 50000.0, None, Money::from_amount(30000.0));
        assert_eq!(effect.discount_amount.amount(), 30000.0);
        assert_eq!(effect.final_price, Money::zero());
    }

    #[test]
    fn test_applies_to() {
        let c = campaign();
        assert!(c.applies_to(10, None));
        assert!(c.applies_to(11, Some(100)));
        assert!(!c.applies_to(11, Some(101)));
    }

    #[test]
    fn test_campaign_deserializes_zoneless_dates() {
        let c: DiscountCampaign = serde_json::from_str(
            r#"{
                "id": 5, "name": "Flash", "discountType": "FIXED_AMOUNT", "discountValue": 10000,
                "startDate": "2024-06-01T00:00:00", "endDate": "2024-06-02T00:00:00",
                "isActive": true, "productIds": [1, 2]
            }"#,
        )
        .unwrap();
        assert_eq!(c.discount_type, DiscountType::FixedAmount);
        assert!(c.variant_ids.is_empty());
        assert_eq!(c.to_request().product_ids, vec![1, 2]);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(CampaignStatus::Upcoming.to_string(), "upcoming");
    }
}
