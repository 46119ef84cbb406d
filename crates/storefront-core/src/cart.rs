//! # Cart Module
//!
//! The server-held cart and the checks the client makes before it talks to
//! the server.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Cart Lifecycle                                 │
//! │                                                                         │
//! │   ┌───────────┐  add / update / remove / clear  ┌──────────────────┐   │
//! │   │ Local Cart│ ───────────────────────────────►│ Backend /cart    │   │
//! │   │ (snapshot)│ ◄───────────────────────────────│ computes totals  │   │
//! │   └───────────┘      whole cart replaced        └──────────────────┘   │
//! │        ▲                                                                │
//! │        │ on failure: snapshot untouched                                 │
//! │                                                                         │
//! │   Quantity edit:                                                        │
//! │   input ──► QuantityEdit::commit(stock)                                 │
//! │               ├── < 1 or > stock ──► warning, revert, NO network call  │
//! │               ├── unchanged ──────► nothing to send                    │
//! │               └── valid ──────────► PUT /cart/items/:id                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are computed server-side and trusted; [`Cart::recomputed_total`]
//! exists only to flag drift in logs.

use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::serde_helpers::{lenient_amount, lenient_count};

// =============================================================================
// Cart Item
// =============================================================================

/// One line of the server cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,

    pub product_id: i64,

    #[serde(default)]
    pub variant_id: Option<i64>,

    #[serde(default)]
    pub product_name: String,

    #[serde(default)]
    pub variant_name: Option<String>,

    #[serde(default)]
    pub image_url: Option<String>,

    /// Price per unit after discounts.
    #[serde(default)]
    pub unit_price: f64,

    /// Price per unit before discounts.
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,

    /// Discount per unit.
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<f64>,

    pub quantity: i64,

    #[serde(default)]
    pub subtotal: f64,

    /// Stock left for this product or variant. `None` when the backend did
    /// not say.
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
}

impl CartItem {
    /// Display name including the variant, if any.
    pub fn display_name(&self) -> String {
        match self.variant_name.as_deref() {
            Some(v) if !v.trim().is_empty() => format!("{} ({})", self.product_name, v),
            _ => self.product_name.clone(),
        }
    }

    /// Whether the line carries a per-unit discount.
    pub fn has_discount(&self) -> bool {
        self.discount_amount.is_some_and(|d| d > crate::PRICE_EPSILON)
    }

    /// Line subtotal as Money.
    pub fn subtotal_money(&self) -> Money {
        Money::from_amount(self.subtotal)
    }

    /// Validates a requested quantity against this line's stock.
    pub fn check_quantity(&self, requested: i64) -> CoreResult<i64> {
        check_quantity(&self.product_name, requested, self.stock_quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart as the backend returns it. Replaced wholesale after every
/// successful mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub session_id: Option<String>,

    #[serde(default)]
    pub items: Vec<CartItem>,

    #[serde(default)]
    pub subtotal: f64,

    #[serde(default)]
    pub total_discount: f64,

    #[serde(default)]
    pub total: f64,

    #[serde(default)]
    pub total_items: i64,
}

impl Cart {
    /// An empty cart for a session (before the first fetch completes).
    pub fn empty(session_id: impl Into<String>) -> Self {
        Cart {
            session_id: Some(session_id.into()),
            ..Default::default()
        }
    }

    /// Finds a line by its cart item id.
    pub fn item(&self, item_id: i64) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Finds the line holding a product/variant combination.
    pub fn find_line(&self, product_id: i64, variant_id: Option<i64>) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|i| i.product_id == product_id && i.variant_id == variant_id)
    }

    /// Total units in the cart (sum of quantities, not line count).
    pub fn items_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line subtotals.
    pub fn recomputed_subtotal(&self) -> Money {
        self.items.iter().map(CartItem::subtotal_money).sum()
    }

    /// Line subtotals minus the cart-level discount, never negative.
    pub fn recomputed_total(&self) -> Money {
        (self.recomputed_subtotal() - Money::from_amount(self.total_discount)).non_negative()
    }

    /// Whether the server's subtotal and total match its lines.
    pub fn is_consistent(&self) -> bool {
        self.recomputed_subtotal() == Money::from_amount(self.subtotal)
            && self.recomputed_total() == Money::from_amount(self.total)
    }
}

// =============================================================================
// Quantity Checks
// =============================================================================

/// Validates a requested quantity against stock.
///
/// ## Example
/// ```rust
/// use storefront_core::cart::check_quantity;
///
/// assert_eq!(check_quantity("Mug", 2, Some(3)), Ok(2));
///
/// let err = check_quantity("Mug", 5, Some(3)).unwrap_err();
/// assert_eq!(err.to_string(), "Only 3 left in stock for Mug (requested 5)");
/// ```
pub fn check_quantity(product: &str, requested: i64, stock: Option<i64>) -> CoreResult<i64> {
    if requested < 1 {
        return Err(CoreError::QuantityTooSmall { requested });
    }
    match stock {
        Some(available) if available <= 0 => Err(CoreError::OutOfStock {
            product: product.to_string(),
        }),
        Some(available) if requested > available => Err(CoreError::InsufficientStock {
            product: product.to_string(),
            available,
            requested,
        }),
        _ => Ok(requested),
    }
}

// =============================================================================
// Quantity Edit Buffer
// =============================================================================

/// Echo/revert buffer for editing one line's quantity.
///
/// Raw input is echoed while typing; on commit it is parsed and checked.
/// Anything out of range reverts the buffer to the last valid quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityEdit {
    item_id: i64,
    last_valid: i64,
    pending: String,
}

impl QuantityEdit {
    /// Starts an edit from the line's current quantity.
    pub fn new(item: &CartItem) -> Self {
        QuantityEdit {
            item_id: item.id,
            last_valid: item.quantity,
            pending: item.quantity.to_string(),
        }
    }

    pub fn item_id(&self) -> i64 {
        self.item_id
    }

    pub fn last_valid(&self) -> i64 {
        self.last_valid
    }

    /// What the input currently shows.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Echoes raw input without validating it.
    pub fn echo(&mut self, raw: &str) {
        self.pending = raw.to_string();
    }

    /// Drops pending input and shows the last valid quantity again.
    pub fn revert(&mut self) {
        self.pending = self.last_valid.to_string();
    }

    /// Parses and checks the pending input.
    ///
    /// Returns `Ok(Some(qty))` when a new quantity should be sent,
    /// `Ok(None)` when nothing changed. On error the buffer is reverted.
    pub fn commit(&mut self, product: &str, stock: Option<i64>) -> CoreResult<Option<i64>> {
        let parsed = match self.pending.trim().parse::<i64>() {
            Ok(q) => q,
            Err(e) => {
                self.revert();
                return Err(unparsable_quantity(product, stock, e.kind()));
            }
        };

        match check_quantity(product, parsed, stock) {
            Ok(q) if q == self.last_valid => {
                self.revert();
                Ok(None)
            }
            Ok(q) => Ok(Some(q)),
            Err(e) => {
                self.revert();
                Err(e)
            }
        }
    }

    /// Records a quantity the server accepted.
    pub fn confirm(&mut self, quantity: i64) {
        self.last_valid = quantity;
        self.pending = quantity.to_string();
    }
}

/// Error for input that is not an `i64`. Digits past `i64::MAX` are still
/// an over-stock request and report the stock left.
fn unparsable_quantity(product: &str, stock: Option<i64>, kind: &IntErrorKind) -> CoreError {
    match kind {
        IntErrorKind::PosOverflow => match check_quantity(product, i64::MAX, stock) {
            Err(e) => e,
            Ok(_) => ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1.0,
                max: i64::MAX as f64,
            }
            .into(),
        },
        IntErrorKind::NegOverflow => CoreError::QuantityTooSmall { requested: i64::MIN },
        _ => ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: "must be a whole number".to_string(),
        }
        .into(),
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST /cart/items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<i64>,
    pub quantity: i64,
}

/// Body of `PUT /cart/items/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// Body of `POST /cart/merge`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MergeCartRequest {
    pub guest_session_id: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i64, stock: Option<i64>) -> CartItem {
        CartItem {
            id: 1,
            product_id: 10,
            product_name: "Linen shirt".to_string(),
            unit_price: 150000.0,
            quantity,
            subtotal: 150000.0 * quantity as f64,
            stock_quantity: stock,
            ..Default::default()
        }
    }

    #[test]
    fn test_check_quantity_bounds() {
        assert_eq!(check_quantity("Shirt", 3, Some(3)), Ok(3));
        assert_eq!(check_quantity("Shirt", 10, None), Ok(10));
        assert_eq!(
            check_quantity("Shirt", 0, Some(3)),
            Err(CoreError::QuantityTooSmall { requested: 0 })
        );
        assert!(matches!(
            check_quantity("Shirt", 1, Some(0)),
            Err(CoreError::OutOfStock { .. })
        ));
    }

    #[test]
    fn test_exceeding_stock_reports_remaining_count() {
        let err = item(1, Some(3)).check_quantity(7).unwrap_err();
        assert!(err.to_string().contains("Only 3 left"));
    }

    #[test]
    fn test_quantity_edit_reverts_on_out_of_range() {
        let mut edit = QuantityEdit::new(&item(2, Some(3)));
        edit.echo("5");
        assert_eq!(edit.pending(), "5");

        let err = edit.commit("Linen shirt", Some(3)).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { available: 3, .. }));
        assert_eq!(edit.pending(), "2");
        assert_eq!(edit.last_valid(), 2);
    }

    #[test]
    fn test_quantity_edit_rejects_garbage() {
        let mut edit = QuantityEdit::new(&item(2, Some(3)));
        edit.echo("two");
        assert!(matches!(
            edit.commit("Linen shirt", Some(3)),
            Err(CoreError::Validation(_))
        ));
        assert_eq!(edit.pending(), "2");
    }

    #[test]
    fn test_quantity_edit_oversized_input_reports_stock() {
        let mut edit = QuantityEdit::new(&item(2, Some(3)));
        edit.echo("99999999999999999999");
        let err = edit.commit("Mug", Some(3)).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientStock {
                product: "Mug".into(),
                available: 3,
                requested: i64::MAX,
            }
        );
        assert!(err.to_string().contains("Only 3 left"));
        assert_eq!(edit.pending(), "2");

        edit.echo("99999999999999999999");
        assert!(matches!(
            edit.commit("Mug", None),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));

        edit.echo("-99999999999999999999");
        assert_eq!(
            edit.commit("Mug", Some(3)),
            Err(CoreError::QuantityTooSmall { requested: i64::MIN })
        );
        assert_eq!(edit.pending(), "2");
    }

    #[test]
    fn test_quantity_edit_valid_and_unchanged() {
        let mut edit = QuantityEdit::new(&item(2, Some(3)));
        edit.echo(" 2 ");
        assert_eq!(edit.commit("Linen shirt", Some(3)), Ok(None));

        edit.echo("3");
        assert_eq!(edit.commit("Linen shirt", Some(3)), Ok(Some(3)));
        edit.confirm(3);
        assert_eq!(edit.last_valid(), 3);
    }

    #[test]
    fn test_items_count_sums_quantities() {
        let mut second = item(3, Some(10));
        second.id = 2;
        let cart = Cart {
            items: vec![item(2, Some(5)), second],
            subtotal: 750000.0,
            total: 750000.0,
            ..Cart::empty("guest_1")
        };
        assert_eq!(cart.items_count(), 5);
        assert!(cart.is_consistent());
        assert_eq!(cart.recomputed_total().amount(), 750000.0);
        assert!(!Cart { total: 700000.0, ..cart.clone() }.is_consistent());
        assert_eq!(cart.item(2).map(|i| i.quantity), Some(3));
        assert!(cart.find_line(10, None).is_some());
    }

    #[test]
    fn test_cart_deserializes_backend_payload() {
        let cart: Cart = serde_json::from_str(
            r#"{
                "id": 4, "sessionId": "user_9",
                "items": [{
                    "id": 1, "productId": 10, "productName": "Mug", "unitPrice": 90,
                    "originalPrice": 100, "discountAmount": 10, "quantity": 2,
                    "subtotal": 180, "stockQuantity": 6
                }],
                "subtotal": 180, "totalDiscount": 0, "total": 180, "totalItems": 2
            }"#,
        )
        .unwrap();
        assert_eq!(cart.items[0].stock_quantity, Some(6));
        assert!(cart.items[0].has_discount());
        assert_eq!(cart.items_count(), 2);
    }
}
