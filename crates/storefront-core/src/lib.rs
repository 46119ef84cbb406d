//! # storefront-core: Pure Business Logic for the Storefront
//!
//! This crate holds the storefront rules that carry real business weight:
//! how a product's displayed price is resolved, how a discount campaign's
//! status and validity are decided, how cart quantities are clamped, and how
//! the locally kept history lists behave. Everything here is a pure function
//! over small DTOs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/storefront (CLI)                        │   │
//! │  │    catalog ──► product detail ──► cart ──► checkout ──► orders  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │         ┌──────────────────────┼──────────────────────┐                │
//! │         ▼                      ▼                      ▼                 │
//! │  ┌──────────────┐   ┌─────────────────────┐   ┌──────────────────┐     │
//! │  │storefront-db │   │ ★ storefront-core ★ │   │storefront-client │     │
//! │  │ local blobs  │   │                     │   │ REST services    │     │
//! │  └──────────────┘   │ pricing  discount   │   └──────────────────┘     │
//! │                     │ cart     history    │                            │
//! │                     │ session  validation │                            │
//! │                     │                     │                            │
//! │                     │ NO I/O • PURE FNS   │                            │
//! │                     └─────────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog DTOs (Product, ProductVariant, ActiveDiscountSummary)
//! - [`pricing`] - The pricing resolver
//! - [`discount`] - Discount campaigns: status, validation, effect preview
//! - [`cart`] - Server cart DTOs and client-side quantity clamping
//! - [`history`] - Recently viewed and comparison lists
//! - [`session`] - Cart session identity (user vs guest)
//! - [`order`] - Checkout, orders, reviews and wishlist DTOs
//! - [`money`] - Integer minor-unit money for client-side arithmetic
//! - [`validation`] - Form-level input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::pricing::resolve_product_pricing;
//! use storefront_core::types::Product;
//!
//! let product: Product = serde_json::from_str(
//!     r#"{ "id": 1, "name": "Linen shirt", "regularPrice": 200000, "salePrice": 150000 }"#,
//! ).unwrap();
//!
//! let pricing = resolve_product_pricing(&product, None);
//! assert!(pricing.has_discount);
//! assert_eq!(pricing.discount_percent, Some(25));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod discount;
pub mod error;
pub mod history;
pub mod money;
pub mod order;
pub mod pricing;
pub mod serde_helpers;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use pricing::{resolve_product_pricing, ResolvedPricing};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tolerance used when comparing currency amounts.
///
/// Absorbs floating-point noise from currency math: a base/final gap at or
/// below this value is not a discount.
pub const PRICE_EPSILON: f64 = 0.005;

/// Maximum entries kept in the recently viewed list.
pub const MAX_RECENTLY_VIEWED: usize = 10;

/// Days a recently viewed entry stays valid.
pub const RECENTLY_VIEWED_TTL_DAYS: i64 = 30;

/// Maximum products in the comparison list.
pub const MAX_COMPARISON_ITEMS: usize = 4;

/// Quiet period before a search query is sent (milliseconds).
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Maximum length of a review comment.
pub const MAX_REVIEW_COMMENT_LEN: usize = 1000;
