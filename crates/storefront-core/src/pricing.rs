//! # Pricing Resolver
//!
//! Maps a product (and optionally one of its variants) to the price
//! breakdown shown on catalog and detail screens, before the item is in the
//! cart. Once in the cart the server's own figures are used instead.
//!
//! ## Resolution Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  finalPrice     variant.finalPrice → variant.price                     │
//! │                 → product.finalPrice → product.salePrice               │
//! │                 → product.regularPrice → 0                             │
//! │                                                                         │
//! │  basePrice      variant.basePrice → variant.price                      │
//! │                 → product.basePrice → product.regularPrice             │
//! │                 → product.salePrice → finalPrice                       │
//! │                                                                         │
//! │  discountAmount variant.discountAmount → product.discountAmount        │
//! │                 → max(basePrice - finalPrice, 0)                       │
//! │                                                                         │
//! │  hasDiscount    basePrice - finalPrice > PRICE_EPSILON                 │
//! │  discountPct    round((base - final) / base * 100) if hasDiscount      │
//! │  activeDiscount variant's → product's → none                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Output is clamped so that `0 <= finalPrice <= basePrice` and
//! `0 <= discountAmount <= basePrice`. A final price above the base lifts
//! the base to the final price.
//!
//! There are no error conditions. Malformed numeric fields were already
//! turned into "absent" during deserialization, so they fall through.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{ActiveDiscountSummary, Product, ProductVariant};
use crate::PRICE_EPSILON;

// =============================================================================
// Resolved Pricing
// =============================================================================

/// Price breakdown for display. Recomputed on every call; never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPricing {
    pub base_price: f64,
    pub final_price: f64,
    pub discount_amount: f64,
    /// Whole-number percentage, present only when `has_discount`.
    pub discount_percent: Option<i64>,
    pub has_discount: bool,
    pub active_discount: Option<ActiveDiscountSummary>,
}

impl ResolvedPricing {
    /// Final price as Money.
    #[inline]
    pub fn final_money(&self) -> Money {
        Money::from_amount(self.final_price)
    }

    /// Base price as Money.
    #[inline]
    pub fn base_money(&self) -> Money {
        Money::from_amount(self.base_price)
    }

    /// Total for `qty` units at the final price.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::pricing::resolve_product_pricing;
    /// use storefront_core::types::Product;
    ///
    /// let product: Product =
    ///     serde_json::from_str(r#"{"id": 1, "name": "Tea", "regularPrice": 12.5}"#).unwrap();
    /// assert_eq!(resolve_product_pricing(&product, None).line_total(3).amount(), 37.5);
    /// ```
    pub fn line_total(&self, qty: i64) -> Money {
        self.final_money().multiply_quantity(qty.max(0))
    }

    /// Amount saved across `qty` units.
    pub fn line_savings(&self, qty: i64) -> Money {
        Money::from_amount(self.discount_amount).multiply_quantity(qty.max(0))
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves the displayed pricing of a product, or of one of its variants.
///
/// Variant fields take precedence over product fields. Pure: identical
/// input yields identical output.
pub fn resolve_product_pricing(product: &Product, variant: Option<&ProductVariant>) -> ResolvedPricing {
    let variant_final = variant.and_then(|v| v.final_price.or(v.price));
    let variant_base = variant.and_then(|v| v.base_price.or(v.price));

    let final_price = variant_final
        .or(product.final_price)
        .or(product.sale_price)
        .or(product.regular_price)
        .unwrap_or(0.0)
        .max(0.0);

    let base_price = variant_base
        .or(product.base_price)
        .or(product.regular_price)
        .or(product.sale_price)
        .unwrap_or(final_price)
        .max(final_price);

    let gap = base_price - final_price;

    let explicit_discount = variant
        .and_then(|v| v.discount_amount)
        .or(product.discount_amount);
    let discount_amount = explicit_discount
        .unwrap_or(gap)
        .clamp(0.0, base_price);

    let has_discount = gap > PRICE_EPSILON;
    let discount_percent = if has_discount && base_price > 0.0 {
        Some((gap / base_price * 100.0).round() as i64)
    } else {
        None
    };

    let active_discount = variant
        .and_then(|v| v.active_discount.clone())
        .or_else(|| product.active_discount.clone());

    ResolvedPricing {
        base_price,
        final_price,
        discount_amount,
        discount_percent,
        has_discount,
        active_discount,
    }
}

/// Resolves every variant and returns the one with the lowest final price.
///
/// Used for "from" prices on listings. Ties keep the earlier variant.
/// Returns `None` for products without variants.
pub fn resolve_cheapest_variant(product: &Product) -> Option<(&ProductVariant, ResolvedPricing)> {
    product
        .variants
        .iter()
        .map(|v| (v, resolve_product_pricing(product, Some(v))))
        .fold(None, |best: Option<(&ProductVariant, ResolvedPricing)>, candidate| {
            let keep = matches!(&best, Some((_, p)) if p.final_price <= candidate.1.final_price);
            if keep {
                best
            } else {
                Some(candidate)
            }
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
