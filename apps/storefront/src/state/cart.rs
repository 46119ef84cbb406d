//! # Cart State
//!
//! The cart context: the last cart the backend returned for this session,
//! and the operations that change it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Action              Local check                 Backend call           │
//! │  ──────              ───────────                 ────────────           │
//! │                                                                         │
//! │  add_to_cart ──────► qty in [1, stock] ─────────► POST /cart/items     │
//! │                                                                         │
//! │  update_quantity ──► qty in [1, stock]           PUT /cart/items/:id   │
//! │                      out of range? warn, ──X     (skipped)             │
//! │                      keep last valid value                              │
//! │                                                                         │
//! │  remove_item ──────────────────────────────────► DELETE /cart/items/:id│
//! │  clear_cart ───────────────────────────────────► DELETE /cart          │
//! │  refresh_cart ─────────────────────────────────► GET /cart             │
//! │  merge_guest_cart ─────────────────────────────► POST /cart/merge      │
//! │                                                                         │
//! │  Ok(cart)  ──► local cart replaced wholesale                           │
//! │  Err(e)    ──► warning logged, local cart untouched, AppError returned  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The lock is only held to read or replace the cart, never across a
//! backend call; the last response to arrive wins.

use std::sync::Arc;

use storefront_client::error::ClientResult;
use storefront_client::services::CartService;
use storefront_client::CartApi;
use storefront_core::cart::{check_quantity, AddToCartRequest, Cart};
use storefront_core::session::SessionIdentity;
use storefront_core::{CoreError, Product, ProductVariant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::AppResult;

/// Cart context over a cart backend.
///
/// Generic over [`CartApi`] so the reconciliation rules can be exercised
/// without a server.
#[derive(Debug)]
pub struct CartState<C = CartService> {
    api: C,
    session_id: String,
    cart: Arc<Mutex<Cart>>,
}

impl<C: CartApi> CartState<C> {
    /// Creates an empty cart context for a session. Call
    /// [`refresh_cart`](Self::refresh_cart) to load the server copy.
    pub fn new(api: C, session: &SessionIdentity) -> Self {
        let session_id = session.session_id();
        CartState {
            api,
            cart: Arc::new(Mutex::new(Cart::empty(session_id.clone()))),
            session_id,
        }
    }

    /// The `sessionId` every cart call is keyed by.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// A copy of the current cart.
    pub async fn cart(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    /// Runs a read-only closure against the current cart.
    pub async fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().await;
        f(&cart)
    }

    /// Total units in the cart.
    pub async fn get_cart_items_count(&self) -> i64 {
        self.with_cart(Cart::items_count).await
    }

    /// Reloads the cart from the backend.
    pub async fn refresh_cart(&self) -> AppResult<Cart> {
        let result = self.api.get_cart(&self.session_id).await;
        self.apply("refresh", result).await
    }

    /// Adds `quantity` units of a product (or one of its variants).
    ///
    /// The resulting line quantity is checked against stock first; when the
    /// product's stock is unknown only the lower bound applies.
    pub async fn add_to_cart(
        &self,
        product: &Product,
        variant: Option<&ProductVariant>,
        quantity: i64,
    ) -> AppResult<Cart> {
        let variant_id = variant.map(|v| v.id);
        let stock = variant
            .and_then(|v| v.stock_quantity)
            .or(product.stock_quantity);

        if quantity < 1 {
            return Err(CoreError::QuantityTooSmall { requested: quantity }.into());
        }
        let in_cart = self
            .with_cart(|cart| cart.find_line(product.id, variant_id).map(|l| l.quantity))
            .await
            .unwrap_or(0);
        check_quantity(&product.name, in_cart.saturating_add(quantity), stock)?;

        let request = AddToCartRequest {
            product_id: product.id,
            variant_id,
            quantity,
        };
        let result = self.api.add_item(&self.session_id, &request).await;
        let cart = self.apply("add", result).await?;
        info!(product_id = product.id, ?variant_id, quantity, "Added to cart");
        Ok(cart)
    }

    /// Sets a line's quantity.
    ///
    /// Out-of-range input never reaches the backend: the error carries the
    /// exact stock left and the line keeps its last valid quantity. Setting
    /// the current quantity again is a no-op.
    pub async fn update_quantity(&self, item_id: i64, quantity: i64) -> AppResult<Cart> {
        let line = self
            .with_cart(|cart| cart.item(item_id).cloned())
            .await
            .ok_or(CoreError::CartItemNotFound(item_id))?;

        if let Err(e) = line.check_quantity(quantity) {
            warn!(item_id, quantity, stock = ?line.stock_quantity, "Quantity rejected: {}", e);
            return Err(e.into());
        }
        if quantity == line.quantity {
            debug!(item_id, quantity, "Quantity unchanged");
            return Ok(self.cart().await);
        }

        let result = self.api.update_item(&self.session_id, item_id, quantity).await;
        self.apply("update", result).await
    }

    /// Removes one line.
    pub async fn remove_item(&self, item_id: i64) -> AppResult<Cart> {
        let result = self.api.remove_item(&self.session_id, item_id).await;
        self.apply("remove", result).await
    }

    /// Empties the cart.
    pub async fn clear_cart(&self) -> AppResult<Cart> {
        let result = self.api.clear_cart(&self.session_id).await;
        self.apply("clear", result).await
    }

    /// Folds a guest cart into this session's cart after sign-in.
    ///
    /// Forgetting the guest id afterwards is the caller's job; the cart
    /// context does not touch local storage.
    pub async fn merge_guest_cart(&self, guest_session_id: &str) -> AppResult<Cart> {
        let result = self.api.merge_carts(&self.session_id, guest_session_id).await;
        let cart = self.apply("merge", result).await?;
        info!(guest_session_id, items = cart.items_count(), "Guest cart merged");
        Ok(cart)
    }

    /// Replaces the local cart with a backend result, or leaves it alone.
    async fn apply(&self, op: &'static str, result: ClientResult<Cart>) -> AppResult<Cart> {
        match result {
            Ok(cart) => {
                debug!(op, lines = cart.items.len(), total = cart.total, "Cart replaced");
                *self.cart.lock().await = cart.clone();
                Ok(cart)
            }
            Err(e) => {
                warn!(op, error = %e, "Cart update failed; keeping previous cart");
                Err(e.into())
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use storefront_client::ClientError;
    use storefront_core::cart::CartItem;

    /// In-memory backend that records every call.
    #[derive(Default)]
    struct MockCartApi {
        server: std::sync::Mutex<Cart>,
        calls: std::sync::Mutex<Vec<String>>,
        fail: AtomicBool,
    }

    impl MockCartApi {
        fn with_cart(cart: Cart) -> Self {
            MockCartApi {
                server: std::sync::Mutex::new(cart),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn respond(&self, call: String, change: impl FnOnce(&mut Cart)) -> ClientResult<Cart> {
            self.calls.lock().unwrap().push(call);
            if self.fail.load(Ordering::SeqCst) {
                return Err(ClientError::Http {
                    status: 500,
                    message: "Internal Server Error".into(),
                });
            }
            let mut server = self.server.lock().unwrap();
            change(&mut server);
            for item in &mut server.items {
                item.subtotal = item.unit_price * item.quantity as f64;
            }
            server.total_items = server.items_count();
            server.subtotal = server.items.iter().map(|i| i.subtotal).sum();
            server.total = server.subtotal - server.total_discount;
            Ok(server.clone())
        }
    }

    #[async_trait]
    impl CartApi for MockCartApi {
        async fn get_cart(&self, session_id: &str) -> ClientResult<Cart> {
            self.respond(format!("get {session_id}"), |_| {})
        }

        async fn add_item(&self, session_id: &str, request: &AddToCartRequest) -> ClientResult<Cart> {
            let request = request.clone();
            self.respond(format!("add {session_id} {}", request.product_id), |cart| {
                match cart
                    .items
                    .iter_mut()
                    .find(|i| i.product_id == request.product_id && i.variant_id == request.variant_id)
                {
                    Some(line) => line.quantity += request.quantity,
                    None => cart.items.push(CartItem {
                        id: 100 + request.product_id,
                        product_id: request.product_id,
                        variant_id: request.variant_id,
                        product_name: "Added".into(),
                        unit_price: 10000.0,
                        quantity: request.quantity,
                        ..Default::default()
                    }),
                }
            })
        }

        async fn update_item(&self, session_id: &str, item_id: i64, quantity: i64) -> ClientResult<Cart> {
            self.respond(format!("update {session_id} {item_id} {quantity}"), |cart| {
                if let Some(line) = cart.items.iter_mut().find(|i| i.id == item_id) {
                    line.quantity = quantity;
                }
            })
        }

        async fn remove_item(&self, session_id: &str, item_id: i64) -> ClientResult<Cart> {
            self.respond(format!("remove {session_id} {item_id}"), |cart| {
                cart.items.retain(|i| i.id != item_id)
            })
        }

        async fn clear_cart(&self, session_id: &str) -> ClientResult<Cart> {
            self.respond(format!("clear {session_id}"), |cart| cart.items.clear())
        }

        async fn merge_carts(&self, session_id: &str, guest_session_id: &str) -> ClientResult<Cart> {
            self.respond(format!("merge {session_id} {guest_session_id}"), |cart| {
                cart.items.push(CartItem {
                    id: 9,
                    product_id: 90,
                    product_name: "From guest cart".into(),
                    unit_price: 5000.0,
                    quantity: 2,
                    ..Default::default()
                })
            })
        }
    }

    fn shirt_line() -> CartItem {
        CartItem {
            id: 1,
            product_id: 5,
            product_name: "Linen shirt".into(),
            unit_price: 150000.0,
            quantity: 1,
            subtotal: 150000.0,
            stock_quantity: Some(3),
            ..Default::default()
        }
    }

    fn server_cart() -> Cart {
        Cart {
            id: Some(1),
            session_id: Some("user_7".into()),
            items: vec![shirt_line()],
            subtotal: 150000.0,
            total: 150000.0,
            total_items: 1,
            ..Default::default()
        }
    }

    async fn loaded_state() -> CartState<MockCartApi> {
        let state = CartState::new(MockCartApi::with_cart(server_cart()), &SessionIdentity::User(7));
        state.refresh_cart().await.unwrap();
        state
    }

    fn product(id: i64, stock: Option<i64>) -> Product {
        Product {
            id,
            name: "Canvas tote".into(),
            regular_price: Some(10000.0),
            stock_quantity: stock,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_refresh_replaces_local_cart() {
        let state = CartState::new(MockCartApi::with_cart(server_cart()), &SessionIdentity::User(7));
        assert!(state.cart().await.is_empty());
        assert_eq!(state.session_id(), "user_7");

        let cart = state.refresh_cart().await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(state.cart().await, cart);
        assert_eq!(state.api.calls(), vec!["get user_7"]);
    }

    #[tokio::test]
    async fn test_update_above_stock_makes_no_call() {
        let state = loaded_state().await;
        let before = state.cart().await;

        let err = state.update_quantity(1, 5).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("Only 3 left"), "{}", err.message);

        assert_eq!(state.cart().await, before);
        assert_eq!(state.api.calls(), vec!["get user_7"]);
    }

    #[tokio::test]
    async fn test_update_below_one_makes_no_call() {
        let state = loaded_state().await;

        let err = state.update_quantity(1, 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(state.api.calls().len(), 1);
        assert_eq!(state.cart().await.item(1).unwrap().quantity, 1);
    }

    #[tokio::test]
    async fn test_update_within_stock() {
        let state = loaded_state().await;

        let cart = state.update_quantity(1, 3).await.unwrap();
        assert_eq!(cart.item(1).unwrap().quantity, 3);
        assert_eq!(cart.subtotal, 450000.0);
        assert_eq!(state.get_cart_items_count().await, 3);
        assert_eq!(state.api.calls().last().unwrap(), "update user_7 1 3");
    }

    #[tokio::test]
    async fn test_same_quantity_is_noop() {
        let state = loaded_state().await;
        state.update_quantity(1, 1).await.unwrap();
        assert_eq!(state.api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_line_is_not_found() {
        let state = loaded_state().await;
        let err = state.update_quantity(42, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(state.api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_leaves_cart_unchanged() {
        let state = loaded_state().await;
        let before = state.cart().await;
        state.api.fail.store(true, Ordering::SeqCst);

        let err = state.remove_item(1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ServerError);
        assert!(state.update_quantity(1, 2).await.is_err());
        assert!(state.clear_cart().await.is_err());

        assert_eq!(state.cart().await, before);
    }

    #[tokio::test]
    async fn test_add_checks_combined_quantity() {
        let state = loaded_state().await;

        state.add_to_cart(&product(7, Some(2)), None, 2).await.unwrap();
        assert_eq!(state.get_cart_items_count().await, 3);

        let err = state.add_to_cart(&product(7, Some(2)), None, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("Only 2 left"));
        assert_eq!(state.get_cart_items_count().await, 3);
    }

    #[tokio::test]
    async fn test_add_huge_quantity_onto_existing_line() {
        let state = loaded_state().await;

        let err = state
            .add_to_cart(&product(5, Some(3)), None, i64::MAX)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("Only 3 left"));
        assert!(state.api.calls().iter().all(|c| !c.starts_with("add")));
        assert_eq!(state.get_cart_items_count().await, 1);
    }

    #[tokio::test]
    async fn test_add_with_unknown_stock() {
        let state = loaded_state().await;
        let cart = state.add_to_cart(&product(8, None), None, 40).await.unwrap();
        assert_eq!(cart.find_line(8, None).unwrap().quantity, 40);

        let err = state.add_to_cart(&product(8, None), None, 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_add_variant_uses_variant_stock() {
        let state = loaded_state().await;
        let mut tote = product(7, Some(50));
        tote.variants.push(ProductVariant {
            id: 71,
            stock_quantity: Some(0),
            ..Default::default()
        });

        let err = state
            .add_to_cart(&tote, tote.variant(71), 1)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(state.api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let state = loaded_state().await;
        state.add_to_cart(&product(7, None), None, 1).await.unwrap();

        let cart = state.remove_item(1).await.unwrap();
        assert!(cart.item(1).is_none());
        assert_eq!(state.get_cart_items_count().await, 1);

        let cart = state.clear_cart().await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(state.get_cart_items_count().await, 0);
    }

    #[tokio::test]
    async fn test_merge_guest_cart() {
        let state = loaded_state().await;
        let cart = state.merge_guest_cart("guest_1717200000000_abcdefghi").await.unwrap();
        assert_eq!(cart.items_count(), 3);
        assert_eq!(
            state.api.calls().last().unwrap(),
            "merge user_7 guest_1717200000000_abcdefghi"
        );
    }
}
