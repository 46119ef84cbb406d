//! # Order Service
//!
//! Checkout, order history and the admin order board.
//!
//! ```text
//! POST  /orders              checkout (shipping address validated first)
//! GET   /orders/my           signed-in user's orders
//! GET   /orders/:id          detail
//! GET   /orders?status=..    admin listing, paged
//! PATCH /orders/:id/status   admin status change
//! ```

use storefront_core::order::{CreateOrderRequest, Order, OrderStatus, UpdateOrderStatusRequest};
use storefront_core::validation::validate_shipping_address;
use storefront_core::{Page, ValidationError};
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::services::Listing;

/// Admin listing parameters for `GET /orders`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    /// Zero-based page index.
    pub page: u32,
    pub size: u32,
}

impl Default for OrderQuery {
    fn default() -> Self {
        OrderQuery {
            status: None,
            page: 0,
            size: 20,
        }
    }
}

impl OrderQuery {
    fn to_params(self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        params
    }
}

#[derive(Debug, Clone)]
pub struct OrderService {
    api: ApiClient,
}

impl OrderService {
    pub fn new(api: ApiClient) -> Self {
        OrderService { api }
    }

    /// `POST /orders`
    pub async fn create(&self, request: &CreateOrderRequest) -> ClientResult<Order> {
        validate_shipping_address(&request.shipping_address)?;
        let order: Order = self.api.post("/orders", &[], request).await?;
        info!(order = %order.reference(), total = order.total, "Order placed");
        Ok(order)
    }

    /// `GET /orders/my`
    pub async fn my_orders(&self) -> ClientResult<Vec<Order>> {
        let listing: Listing<Order> = self.api.get("/orders/my", &[]).await?;
        Ok(listing.into_vec())
    }

    /// `GET /orders/:id`
    pub async fn get(&self, order_id: i64) -> ClientResult<Order> {
        self.api.get(&format!("/orders/{order_id}"), &[]).await
    }

    /// `GET /orders`
    pub async fn list(&self, query: OrderQuery) -> ClientResult<Page<Order>> {
        self.api.get("/orders", &query.to_params()).await
    }

    /// `PATCH /orders/:id/status`
    ///
    /// `current`, when known, is checked against the status workflow first
    /// so an impossible change (e.g. out of `DELIVERED`) is never sent.
    pub async fn update_status(
        &self,
        order_id: i64,
        current: Option<OrderStatus>,
        status: OrderStatus,
    ) -> ClientResult<Order> {
        if let Some(current) = current {
            if !current.can_transition_to(status) {
                return Err(ClientError::Validation(ValidationError::InvalidFormat {
                    field: "status".into(),
                    reason: format!("cannot change {current} to {status}"),
                }));
            }
        }
        debug!(order_id, %status, "Updating order status");
        self.api
            .patch(
                &format!("/orders/{order_id}/status"),
                &[],
                Some(&UpdateOrderStatusRequest { status }),
            )
            .await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
