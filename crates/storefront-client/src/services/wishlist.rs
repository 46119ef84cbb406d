//! # Wishlist Service
//!
//! Requires a signed-in user; the backend answers 401 otherwise.

use storefront_core::order::{AddToWishlistRequest, WishlistItem};

use crate::client::ApiClient;
use crate::error::ClientResult;
use crate::services::Listing;

#[derive(Debug, Clone)]
pub struct WishlistService {
    api: ApiClient,
}

impl WishlistService {
    pub fn new(api: ApiClient) -> Self {
        WishlistService { api }
    }

    /// `GET /wishlist`
    pub async fn get(&self) -> ClientResult<Vec<WishlistItem>> {
        let listing: Listing<WishlistItem> = self.api.get("/wishlist", &[]).await?;
        Ok(listing.into_vec())
    }

    /// `POST /wishlist`
    pub async fn add(&self, product_id: i64) -> ClientResult<WishlistItem> {
        self.api
            .post("/wishlist", &[], &AddToWishlistRequest { product_id })
            .await
    }

    /// `DELETE /wishlist/:productId`
    pub async fn remove(&self, product_id: i64) -> ClientResult<()> {
        self.api
            .delete::<serde_json::Value>(&format!("/wishlist/{product_id}"), &[])
            .await?;
        Ok(())
    }

    /// Whether the product is on the wishlist.
    pub async fn contains(&self, product_id: i64) -> ClientResult<bool> {
        Ok(self.get().await?.iter().any(|item| item.product_id == product_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::testing::{client_for, spawn_backend};
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{delete, get};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    type Ids = Arc<Mutex<Vec<i64>>>;

    fn authorized(headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some("Bearer good") => Ok(()),
            _ => Err((StatusCode::UNAUTHORIZED, Json(json!({"message": "Login required"})))),
        }
    }

    async fn backend() -> String {
        let router = Router::new()
            .route(
                "/wishlist",
                get(|State(ids): State<Ids>, headers: HeaderMap| async move {
                    authorized(&headers)?;
                    let items: Vec<Value> = ids
                        .lock()
                        .unwrap()
                        .iter()
                        .map(|id| json!({"id": id * 10, "productId": id}))
                        .collect();
                    Ok::<_, (StatusCode, Json<Value>)>(Json(Value::Array(items)))
                })
                .post(
                    |State(ids): State<Ids>, headers: HeaderMap, Json(body): Json<Value>| async move {
                        authorized(&headers)?;
                        let id = body["productId"].as_i64().unwrap_or_default();
                        ids.lock().unwrap().push(id);
                        Ok::<_, (StatusCode, Json<Value>)>(Json(json!({"id": id * 10, "productId": id})))
                    },
                ),
            )
            .route(
                "/wishlist/{product_id}",
                delete(|State(ids): State<Ids>, Path(id): Path<i64>| async move {
                    ids.lock().unwrap().retain(|p| *p != id);
                    StatusCode::NO_CONTENT
                }),
            )
            .with_state(Ids::default());
        spawn_backend(router).await
    }

    #[tokio::test]
    async fn test_add_list_remove() {
        let base = backend().await;
        let service = WishlistService::new(client_for(&base).with_token(Some("good".into())));

        let item = service.add(5).await.unwrap();
        assert_eq!(item.product_id, 5);
        service.add(6).await.unwrap();
        assert!(service.contains(5).await.unwrap());

        service.remove(5).await.unwrap();
        let ids: Vec<i64> = service.get().await.unwrap().iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![6]);
    }

    #[tokio::test]
    async fn test_requires_login() {
        let base = backend().await;
        let service = WishlistService::new(client_for(&base));

        let err = service.get().await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized(ref m) if m == "Login required"));
    }
}
