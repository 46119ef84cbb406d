//! # Review Service

use storefront_core::order::{CreateReviewRequest, Review, UpdateReviewRequest};
use storefront_core::validation::{validate_rating, validate_review_comment};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::ClientResult;
use crate::services::Listing;

#[derive(Debug, Clone)]
pub struct ReviewService {
    api: ApiClient,
}

impl ReviewService {
    pub fn new(api: ApiClient) -> Self {
        ReviewService { api }
    }

    /// `GET /reviews/product/:id`
    pub async fn for_product(&self, product_id: i64) -> ClientResult<Vec<Review>> {
        let listing: Listing<Review> = self
            .api
            .get(&format!("/reviews/product/{product_id}"), &[])
            .await?;
        Ok(listing.into_vec())
    }

    /// `POST /reviews`. Blank comments are sent as absent.
    pub async fn create(&self, request: &CreateReviewRequest) -> ClientResult<Review> {
        validate_rating(request.rating)?;
        let request = CreateReviewRequest {
            comment: validate_review_comment(request.comment.as_deref())?,
            ..request.clone()
        };
        debug!(product_id = request.product_id, rating = request.rating, "Posting review");
        self.api.post("/reviews", &[], &request).await
    }

    /// `PUT /reviews/:id`
    pub async fn update(&self, review_id: i64, request: &UpdateReviewRequest) -> ClientResult<Review> {
        validate_rating(request.rating)?;
        let request = UpdateReviewRequest {
            rating: request.rating,
            comment: validate_review_comment(request.comment.as_deref())?,
        };
        self.api
            .put(&format!("/reviews/{review_id}"), &[], &request)
            .await
    }

    /// `PATCH /reviews/:id/helpful`
    pub async fn mark_helpful(&self, review_id: i64) -> ClientResult<Review> {
        self.api
            .patch(&format!("/reviews/{review_id}/helpful"), &[], None::<&()>)
            .await
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
    use axum::extract::Path;
    use axum::routing::{get, patch, post, put};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use storefront_core::order::RatingSummary;
    use storefront_core::ValidationError;

    async fn service() -> ReviewService {
        let router = Router::new()
            .route(
                "/reviews/product/{id}",
                get(|Path(id): Path<i64>| async move {
                    Json(json!({
                        "content": [
                            {"id": 1, "productId": id, "rating": 5, "comment": "Great"},
                            {"id": 2, "productId": id, "rating": 4},
                        ],
                        "totalElements": 2,
                        "totalPages": 1
                    }))
                }),
            )
            .route(
                "/reviews",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({
                        "id": 10,
                        "productId": body["productId"],
                        "rating": body["rating"],
                        "comment": body.get("comment"),
                    }))
                }),
            )
            .route(
                "/reviews/{id}",
                put(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
                    Json(json!({"id": id, "productId": 3, "rating": body["rating"]}))
                }),
            )
            .route(
                "/reviews/{id}/helpful",
                patch(|Path(id): Path<i64>| async move {
                    Json(json!({"id": id, "productId": 3, "rating": 5, "helpfulCount": 8}))
                }),
            );
        ReviewService::new(client_for(&spawn_backend(router).await))
    }

    #[tokio::test]
    async fn test_list_and_summary() {
        let reviews = service().await.for_product(3).await.unwrap();
        assert_eq!(reviews.len(), 2);
        let summary = RatingSummary::from_reviews(&reviews);
        assert_eq!(summary.average, 4.5);
    }

    #[tokio::test]
    async fn test_create_trims_blank_comment() {
        let review = service()
            .await
            .create(&CreateReviewRequest {
                product_id: 3,
                rating: 4,
                comment: Some("   ".into()),
            })
            .await
            .unwrap();
        assert_eq!(review.id, 10);
        assert_eq!(review.comment, None);
    }

    #[tokio::test]
    async fn test_update_and_helpful() {
        let service = service().await;
        let review = service
            .update(
                4,
                &UpdateReviewRequest {
                    rating: 2,
                    comment: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(review.rating, 2);

        let review = service.mark_helpful(4).await.unwrap();
        assert_eq!(review.helpful_count, 8);
    }

    #[tokio::test]
    async fn test_invalid_review_rejected_locally() {
        let service = ReviewService::new(client_for("http://127.0.0.1:1"));

        let err = service
            .create(&CreateReviewRequest {
                product_id: 3,
                rating: 6,
                comment: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(ValidationError::OutOfRange { .. })));

        let err = service
            .update(
                1,
                &UpdateReviewRequest {
                    rating: 5,
                    comment: Some("x".repeat(1001)),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(ValidationError::TooLong { .. })));
    }
}
