//! # Product Service
//!
//! Catalog reads. Prices come back raw; callers run them through
//! `storefront_core::resolve_product_pricing` before showing them.

use storefront_core::validation::validate_search_query;
use storefront_core::{Page, Product};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::ClientResult;

/// Default page size of catalog listings.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Listing parameters for `GET /products`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    /// Zero-based page index.
    pub page: u32,
    pub size: u32,
    pub category_id: Option<i64>,
    /// Backend sort expression, e.g. `price,asc`.
    pub sort: Option<String>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        ProductQuery {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            category_id: None,
            sort: None,
        }
    }
}

impl ProductQuery {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(category_id) = self.category_id {
            params.push(("categoryId", category_id.to_string()));
        }
        if let Some(sort) = &self.sort {
            params.push(("sort", sort.clone()));
        }
        params
    }
}

#[derive(Debug, Clone)]
pub struct ProductService {
    api: ApiClient,
}

impl ProductService {
    pub fn new(api: ApiClient) -> Self {
        ProductService { api }
    }

    /// `GET /products`
    pub async fn list(&self, query: &ProductQuery) -> ClientResult<Page<Product>> {
        self.api.get("/products", &query.to_params()).await
    }

    /// `GET /products/:id`
    pub async fn get(&self, product_id: i64) -> ClientResult<Product> {
        self.api.get(&format!("/products/{product_id}"), &[]).await
    }

    /// `GET /products/search?keyword=..`
    pub async fn search(&self, keyword: &str, page: u32, size: u32) -> ClientResult<Page<Product>> {
        let keyword = validate_search_query(keyword)?;
        debug!(keyword = %keyword, page, "Searching products");
        self.api
            .get(
                "/products/search",
                &[
                    ("keyword", keyword),
                    ("page", page.to_string()),
                    ("size", size.to_string()),
                ],
            )
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
    use axum::extract::{Path, Query};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use storefront_core::resolve_product_pricing;

    fn product_json(id: i64) -> Value {
        json!({
            "id": id,
            "name": format!("Product {id}"),
            "regularPrice": 200000,
            "salePrice": 150000,
            "stockQuantity": 4
        })
    }

    async fn service() -> ProductService {
        let router = Router::new()
            .route(
                "/products",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    Json(json!({
                        "content": [product_json(1)],
                        "totalElements": 13,
                        "totalPages": 2,
                        "number": q.get("page").and_then(|p| p.parse::<i64>().ok()).unwrap_or(0),
                        "size": q.get("size").and_then(|p| p.parse::<i64>().ok()).unwrap_or(0),
                    }))
                }),
            )
            .route(
                "/products/search",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let keyword = q.get("keyword").cloned().unwrap_or_default();
                    let content: Vec<Value> = if keyword == "shirt" {
                        vec![product_json(7)]
                    } else {
                        vec![]
                    };
                    Json(json!({ "content": content, "totalElements": content.len(), "totalPages": 1 }))
                }),
            )
            .route(
                "/products/{id}",
                get(|Path(id): Path<i64>| async move { Json(product_json(id)) }),
            );
        ProductService::new(client_for(&spawn_backend(router).await))
    }

    #[test]
    fn test_query_params() {
        let query = ProductQuery {
            page: 1,
            size: 24,
            category_id: Some(3),
            sort: Some("price,asc".into()),
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("page", "1".to_string()),
                ("size", "24".to_string()),
                ("categoryId", "3".to_string()),
                ("sort", "price,asc".to_string()),
            ]
        );
        assert_eq!(ProductQuery::default().to_params().len(), 2);
    }

    #[tokio::test]
    async fn test_list_and_detail() {
        let service = service().await;

        let page = service
            .list(&ProductQuery {
                page: 0,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total_elements, 13);
        assert!(page.has_next());
        assert_eq!(page.size, 12);

        let product = service.get(9).await.unwrap();
        assert_eq!(product.id, 9);
        let pricing = resolve_product_pricing(&product, None);
        assert_eq!(pricing.discount_percent, Some(25));
    }

    #[tokio::test]
    async fn test_search() {
        let service = service().await;

        let hits = service.search("  shirt ", 0, 12).await.unwrap();
        assert_eq!(hits.content.len(), 1);
        assert_eq!(hits.content[0].id, 7);

        let none = service.search("socks", 0, 12).await.unwrap();
        assert!(none.content.is_empty());
    }

    #[tokio::test]
    async fn test_overlong_search_is_rejected_locally() {
        let service = ProductService::new(client_for("http://127.0.0.1:1"));
        let err = service.search(&"x".repeat(101), 0, 12).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }
}
