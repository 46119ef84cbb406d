//! # Discount Campaign Service
//!
//! Admin CRUD over `/discount-campaigns`. Create and update run the form
//! rules from `storefront_core::validation` first; a rejected form never
//! reaches the backend.

use storefront_core::discount::{CampaignRequest, DiscountCampaign};
use storefront_core::validation::validate_campaign;
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::error::ClientResult;
use crate::services::Listing;

#[derive(Debug, Clone)]
pub struct CampaignService {
    api: ApiClient,
}

impl CampaignService {
    pub fn new(api: ApiClient) -> Self {
        CampaignService { api }
    }

    /// `GET /discount-campaigns`
    pub async fn list(&self) -> ClientResult<Vec<DiscountCampaign>> {
        let listing: Listing<DiscountCampaign> = self.api.get("/discount-campaigns", &[]).await?;
        Ok(listing.into_vec())
    }

    /// `GET /discount-campaigns/:id`
    pub async fn get(&self, campaign_id: i64) -> ClientResult<DiscountCampaign> {
        self.api
            .get(&format!("/discount-campaigns/{campaign_id}"), &[])
            .await
    }

    /// `POST /discount-campaigns`
    pub async fn create(&self, request: &CampaignRequest) -> ClientResult<DiscountCampaign> {
        validate_campaign(request)?;
        let campaign: DiscountCampaign = self.api.post("/discount-campaigns", &[], request).await?;
        info!(campaign_id = campaign.id, name = %campaign.name, "Campaign created");
        Ok(campaign)
    }

    /// `PUT /discount-campaigns/:id`
    pub async fn update(
        &self,
        campaign_id: i64,
        request: &CampaignRequest,
    ) -> ClientResult<DiscountCampaign> {
        validate_campaign(request)?;
        debug!(campaign_id, "Updating campaign");
        self.api
            .put(&format!("/discount-campaigns/{campaign_id}"), &[], request)
            .await
    }

    /// `DELETE /discount-campaigns/:id`
    pub async fn delete(&self, campaign_id: i64) -> ClientResult<()> {
        self.api
            .delete::<serde_json::Value>(&format!("/discount-campaigns/{campaign_id}"), &[])
            .await?;
        info!(campaign_id, "Campaign deleted");
        Ok(())
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
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use storefront_core::discount::CampaignStatus;
    use storefront_core::{DiscountType, ValidationError};

    type Store = Arc<Mutex<Vec<Value>>>;

    fn backend(store: Store) -> Router {
        Router::new()
            .route(
                "/discount-campaigns",
                get(|State(store): State<Store>| async move {
                    Json(Value::Array(store.lock().unwrap().clone()))
                })
                .post(|State(store): State<Store>, Json(mut body): Json<Value>| async move {
                    let mut store = store.lock().unwrap();
                    body["id"] = json!(store.len() as i64 + 1);
                    store.push(body.clone());
                    (StatusCode::CREATED, Json(body))
                }),
            )
            .route(
                "/discount-campaigns/{id}",
                get(|State(store): State<Store>, Path(id): Path<i64>| async move {
                    let store = store.lock().unwrap();
                    match store.iter().find(|c| c["id"] == json!(id)) {
                        Some(c) => Ok(Json(c.clone())),
                        None => Err((StatusCode::NOT_FOUND, Json(json!({"message": "Campaign not found"})))),
                    }
                })
                .put(
                    |State(store): State<Store>, Path(id): Path<i64>, Json(mut body): Json<Value>| async move {
                        body["id"] = json!(id);
                        let mut store = store.lock().unwrap();
                        store.retain(|c| c["id"] != json!(id));
                        store.push(body.clone());
                        Json(body)
                    },
                )
                .delete(|State(store): State<Store>, Path(id): Path<i64>| async move {
                    store.lock().unwrap().retain(|c| c["id"] != json!(id));
                    StatusCode::NO_CONTENT
                }),
            )
            .with_state(store)
    }

    fn request() -> CampaignRequest {
        CampaignRequest {
            name: "Black Friday".into(),
            description: None,
            discount_type: DiscountType::Percentage,
            discount_value: 30.0,
            max_discount_amount: Some(100000.0),
            start_date: "2026-11-01T00:00:00Z".parse().unwrap(),
            end_date: "2026-11-30T23:59:59Z".parse().unwrap(),
            is_active: true,
            product_ids: vec![1, 2],
            variant_ids: vec![],
        }
    }

    async fn service() -> (CampaignService, Store) {
        let store: Store = Arc::default();
        let base = spawn_backend(backend(store.clone())).await;
        (CampaignService::new(client_for(&base)), store)
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let (service, _) = service().await;

        let created = service.create(&request()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.discount_type, DiscountType::Percentage);

        let during = "2026-11-15T12:00:00Z".parse().unwrap();
        assert_eq!(created.status(during), CampaignStatus::Active);

        let mut edit = created.to_request();
        edit.discount_value = 40.0;
        let updated = service.update(created.id, &edit).await.unwrap();
        assert_eq!(updated.discount_value, 40.0);

        assert_eq!(service.list().await.unwrap().len(), 1);
        assert_eq!(service.get(1).await.unwrap().discount_value, 40.0);

        service.delete(1).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
        assert!(matches!(service.get(1).await, Err(ClientError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_form_never_sent() {
        let (service, store) = service().await;

        let mut bad = request();
        bad.discount_value = 120.0;
        let err = service.create(&bad).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(ValidationError::OutOfRange { .. })));

        let mut bad = request();
        bad.product_ids.clear();
        let err = service.update(1, &bad).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(ValidationError::EmptySelection { .. })));

        assert!(store.lock().unwrap().is_empty());
    }
}
