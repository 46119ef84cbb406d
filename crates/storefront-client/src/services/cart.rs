//! # Cart Service
//!
//! `/cart` endpoints. Every call names the cart through the `sessionId`
//! query parameter and every mutation answers with the whole updated cart.
//!
//! ```text
//! GET    /cart?sessionId=..             ─► Cart
//! POST   /cart/items?sessionId=..       ─► Cart   body: AddToCartRequest
//! PUT    /cart/items/:id?sessionId=..   ─► Cart   body: { quantity }
//! DELETE /cart/items/:id?sessionId=..   ─► Cart
//! DELETE /cart?sessionId=..             ─► Cart | empty
//! POST   /cart/merge?sessionId=user_N   ─► Cart   body: { guestSessionId }
//! ```

use async_trait::async_trait;
use storefront_core::cart::{AddToCartRequest, Cart, MergeCartRequest, UpdateQuantityRequest};

use crate::client::ApiClient;
use crate::error::ClientResult;

/// Backend cart operations.
///
/// The app's cart state is written against this trait so it can be driven
/// by a fake in tests.
#[async_trait]
pub trait CartApi: Send + Sync {
    async fn get_cart(&self, session_id: &str) -> ClientResult<Cart>;

    async fn add_item(&self, session_id: &str, request: &AddToCartRequest) -> ClientResult<Cart>;

    async fn update_item(&self, session_id: &str, item_id: i64, quantity: i64) -> ClientResult<Cart>;

    async fn remove_item(&self, session_id: &str, item_id: i64) -> ClientResult<Cart>;

    async fn clear_cart(&self, session_id: &str) -> ClientResult<Cart>;

    /// Moves the guest cart's lines into the cart of `session_id`.
    async fn merge_carts(&self, session_id: &str, guest_session_id: &str) -> ClientResult<Cart>;
}

/// [`CartApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct CartService {
    api: ApiClient,
}

impl CartService {
    pub fn new(api: ApiClient) -> Self {
        CartService { api }
    }
}

fn session_query(session_id: &str) -> [(&'static str, String); 1] {
    [("sessionId", session_id.to_string())]
}

#[async_trait]
impl CartApi for CartService {
    async fn get_cart(&self, session_id: &str) -> ClientResult<Cart> {
        self.api.get("/cart", &session_query(session_id)).await
    }

    async fn add_item(&self, session_id: &str, request: &AddToCartRequest) -> ClientResult<Cart> {
        self.api
            .post("/cart/items", &session_query(session_id), request)
            .await
    }

    async fn update_item(&self, session_id: &str, item_id: i64, quantity: i64) -> ClientResult<Cart> {
        self.api
            .put(
                &format!("/cart/items/{item_id}"),
                &session_query(session_id),
                &UpdateQuantityRequest { quantity },
            )
            .await
    }

    async fn remove_item(&self, session_id: &str, item_id: i64) -> ClientResult<Cart> {
        match self
            .api
            .delete(&format!("/cart/items/{item_id}"), &session_query(session_id))
            .await?
        {
            Some(cart) => Ok(cart),
            None => self.get_cart(session_id).await,
        }
    }

    async fn clear_cart(&self, session_id: &str) -> ClientResult<Cart> {
        let cart = self.api.delete("/cart", &session_query(session_id)).await?;
        Ok(cart.unwrap_or_else(|| Cart::empty(session_id)))
    }

    async fn merge_carts(&self, session_id: &str, guest_session_id: &str) -> ClientResult<Cart> {
        self.api
            .post(
                "/cart/merge",
                &session_query(session_id),
                &MergeCartRequest {
                    guest_session_id: guest_session_id.to_string(),
                },
            )
            .await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
