//! # Catalog Types
//!
//! Wire DTOs for the catalog as the backend returns them.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Catalog Types                                  │
//! │                                                                         │
//! │  ┌─────────────────────┐        ┌─────────────────────┐                │
//! │  │      Product        │ 0..n   │   ProductVariant    │                │
//! │  │  ─────────────────  │───────►│  ─────────────────  │                │
//! │  │  regularPrice       │        │  price              │                │
//! │  │  salePrice?         │        │  basePrice?         │                │
//! │  │  basePrice?         │        │  finalPrice?        │                │
//! │  │  finalPrice?        │        │  discountAmount?    │                │
//! │  │  discountAmount?    │        │  activeDiscount? ─┐ │                │
//! │  │  activeDiscount? ─┐ │        └───────────────────┼─┘                │
//! │  └───────────────────┼─┘                            │                  │
//! │                      ▼                              ▼                   │
//! │             ┌───────────────────────────────────────────┐              │
//! │             │          ActiveDiscountSummary            │              │
//! │             │  campaign, type, value, cap, window,      │              │
//! │             │  discountAmount, finalPrice (authoritative)│             │
//! │             └───────────────────────────────────────────┘              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every price field is optional and read leniently (see
//! [`crate::serde_helpers`]). Variant fields, when present, take precedence
//! over product fields; that precedence lives in [`crate::pricing`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::serde_helpers::{lenient_amount, lenient_count, lenient_datetime, lenient_object};

// =============================================================================
// Discount Type
// =============================================================================

/// How a campaign reduces a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    /// `value` percent off, optionally capped by `maxDiscountAmount`.
    Percentage,
    /// A flat `value` off, never more than the price itself.
    FixedAmount,
}

impl DiscountType {
    /// Wire name (`PERCENTAGE` / `FIXED_AMOUNT`).
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "PERCENTAGE",
            DiscountType::FixedAmount => "FIXED_AMOUNT",
        }
    }
}

impl std::str::FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "PERCENTAGE" | "PERCENT" => Ok(DiscountType::Percentage),
            "FIXED_AMOUNT" | "FIXED" => Ok(DiscountType::FixedAmount),
            other => Err(format!("unknown discount type: {other}")),
        }
    }
}

// =============================================================================
// Active Discount Summary
// =============================================================================

/// The backend-resolved effect of a campaign on one product or variant.
///
/// Treated as authoritative when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDiscountSummary {
    #[serde(default)]
    pub campaign_id: Option<i64>,

    #[serde(default)]
    pub campaign_name: Option<String>,

    pub discount_type: DiscountType,

    #[serde(default, deserialize_with = "lenient_amount")]
    pub discount_value: Option<f64>,

    /// Cap on the reduction for percentage campaigns.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub max_discount_amount: Option<f64>,

    #[serde(default, deserialize_with = "lenient_datetime")]
    #[ts(as = "Option<String>")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_datetime")]
    #[ts(as = "Option<String>")]
    pub end_date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_amount")]
    pub discount_amount: Option<f64>,

    #[serde(default, deserialize_with = "lenient_amount")]
    pub final_price: Option<f64>,
}

impl ActiveDiscountSummary {
    /// Short human label, e.g. `-25%` or `-50000`.
    pub fn badge(&self) -> Option<String> {
        let value = self.discount_value?;
        Some(match self.discount_type {
            DiscountType::Percentage => format!("-{}%", value.round() as i64),
            DiscountType::FixedAmount => format!("-{}", value.round() as i64),
        })
    }
}

// =============================================================================
// Product Image
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub image_url: String,
    #[serde(default)]
    pub is_primary: bool,
}

// =============================================================================
// Product Variant
// =============================================================================

/// A purchasable configuration of a product (size, color, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: i64,

    #[serde(default)]
    pub sku: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub size: Option<String>,

    /// Variant list price. Stands in for both base and final when the
    /// explicit fields are absent.
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub final_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<f64>,

    #[serde(default, deserialize_with = "lenient_object", skip_serializing_if = "Option::is_none")]
    pub active_discount: Option<ActiveDiscountSummary>,

    #[serde(default, deserialize_with = "lenient_count")]
    pub stock_quantity: Option<i64>,

    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProductVariant {
    /// Display label built from name, color and size.
    pub fn label(&self) -> String {
        let parts: Vec<&str> = [&self.name, &self.color, &self.size]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .filter(|p| !p.trim().is_empty())
            .collect();
        if parts.is_empty() {
            format!("Variant #{}", self.id)
        } else {
            parts.join(" / ")
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// The client holds an immutable snapshot per fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub regular_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub final_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<f64>,

    #[serde(default, deserialize_with = "lenient_object", skip_serializing_if = "Option::is_none")]
    pub active_discount: Option<ActiveDiscountSummary>,

    #[serde(default)]
    pub variants: Vec<ProductVariant>,

    #[serde(default, deserialize_with = "lenient_count")]
    pub stock_quantity: Option<i64>,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default)]
    pub images: Vec<ProductImage>,

    #[serde(default)]
    pub category_id: Option<i64>,

    #[serde(default)]
    pub category_name: Option<String>,

    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default, deserialize_with = "lenient_amount")]
    pub average_rating: Option<f64>,

    #[serde(default, deserialize_with = "lenient_count")]
    pub review_count: Option<i64>,
}

impl Product {
    /// Looks up a variant by id.
    pub fn variant(&self, variant_id: i64) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }

    /// Primary image: explicit `imageUrl`, else the image flagged primary,
    /// else the first image.
    pub fn primary_image(&self) -> Option<&str> {
        if let Some(url) = self.image_url.as_deref() {
            return Some(url);
        }
        self.images
            .iter()
            .find(|i| i.is_primary)
            .or_else(|| self.images.first())
            .map(|i| i.image_url.as_str())
    }

    /// Stock available for the product or the chosen variant.
    ///
    /// Unknown stock is treated as zero.
    pub fn available_stock(&self, variant: Option<&ProductVariant>) -> i64 {
        variant
            .and_then(|v| v.stock_quantity)
            .or(self.stock_quantity)
            .unwrap_or(0)
            .max(0)
    }

    /// Checks if the product (or chosen variant) can be added to the cart.
    pub fn in_stock(&self, variant: Option<&ProductVariant>) -> bool {
        self.available_stock(variant) > 0
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// A page of results in the backend's pagination envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: i64,
    #[serde(default)]
    pub total_pages: i64,
    /// Zero-based page index.
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub size: i64,
}

impl<T> Page<T> {
    /// Whether a following page exists.
    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }
}

// =============================================================================
// Language
// =============================================================================

/// Interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Vi,
}

impl Language {
    /// Stored code (`en` / `vi`).
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Vi => "vi",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "vi" => Ok(Language::Vi),
            other => Err(format!("unsupported language: {other} (expected en or vi)")),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        assert_eq!("VI".parse::<Language>(), Ok(Language::Vi));
        assert_eq!(Language::default().code(), "en");
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_product_deserializes_lenient_fields() {
        let product: Product = serde_json::from_str(
            r#"{
                "id": 7,
                "name": "Linen shirt",
                "regularPrice": "200000",
                "salePrice": "n/a",
                "stockQuantity": 4,
                "activeDiscount": { "unexpected": true },
                "variants": [{ "id": 70, "price": 180000, "color": "White", "size": "M" }]
            }"#,
        )
        .unwrap();

        assert_eq!(product.regular_price, Some(200000.0));
        assert_eq!(product.sale_price, None);
        assert!(product.active_discount.is_none());
        assert_eq!(product.variants[0].label(), "White / M");
        assert_eq!(product.available_stock(None), 4);
    }

    #[test]
    fn test_active_discount_summary() {
        let summary: ActiveDiscountSummary = serde_json::from_str(
            r#"{
                "campaignId": 3,
                "campaignName": "Summer",
                "discountType": "PERCENTAGE",
                "discountValue": 25,
                "startDate": "2024-06-01T00:00:00",
                "endDate": "2024-06-30T23:59:59"
            }"#,
        )
        .unwrap();

        assert_eq!(summary.discount_type, DiscountType::Percentage);
        assert_eq!(summary.badge().as_deref(), Some("-25%"));
        assert!(summary.start_date.is_some());
    }

    #[test]
    fn test_variant_stock_overrides_product_stock() {
        let product = Product {
            id: 1,
            name: "Mug".to_string(),
            stock_quantity: Some(10),
            variants: vec![ProductVariant {
                id: 2,
                stock_quantity: Some(0),
                ..Default::default()
            }],
            ..Default::default()
        };

        let variant = product.variant(2);
        assert_eq!(product.available_stock(variant), 0);
        assert!(!product.in_stock(variant));
        assert!(product.in_stock(None));
    }

    #[test]
    fn test_primary_image_fallbacks() {
        let mut product = Product {
            id: 1,
            name: "Mug".to_string(),
            images: vec![
                ProductImage { image_url: "a.jpg".to_string(), is_primary: false },
                ProductImage { image_url: "b.jpg".to_string(), is_primary: true },
            ],
            ..Default::default()
        };
        assert_eq!(product.primary_image(), Some("b.jpg"));

        product.image_url = Some("main.jpg".to_string());
        assert_eq!(product.primary_image(), Some("main.jpg"));
    }

    #[test]
    fn test_discount_type_parsing() {
        assert_eq!("percentage".parse::<DiscountType>(), Ok(DiscountType::Percentage));
        assert_eq!("fixed-amount".parse::<DiscountType>(), Ok(DiscountType::FixedAmount));
        assert!("bogo".parse::<DiscountType>().is_err());
    }

    #[test]
    fn test_page_has_next() {
        let page: Page<Product> =
            serde_json::from_str(r#"{"content": [], "totalElements": 25, "totalPages": 3, "number": 1, "size": 10}"#)
                .unwrap();
        assert!(page.has_next());
    }
}
