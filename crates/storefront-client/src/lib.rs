//! # storefront-client: Backend Client for the Storefront
//!
//! Typed access to the storefront's REST backend, plus the client-side
//! configuration and the search debouncer.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │  StorefrontConfig::load()                                              │
//! │       │  defaults → storefront.toml → STOREFRONT_* → validate()        │
//! │       ▼                                                                 │
//! │  ApiClient::from_config(&config)                                       │
//! │       │  base URL, timeout, bearer token                               │
//! │       ▼                                                                 │
//! │  Services::new(api)                                                    │
//! │       │                                                                 │
//! │       ├── cart       CartApi trait + CartService                        │
//! │       ├── products   list / detail / search                             │
//! │       ├── campaigns  admin CRUD, validated                              │
//! │       ├── reviews    per product, create / update / helpful             │
//! │       ├── wishlist   get / add / remove                                 │
//! │       └── orders     checkout, my orders, admin board                   │
//! │                                                                         │
//! │  SearchDebouncer::start() ─► (DebouncerHandle, Receiver<String>)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`client`] - `ApiClient`, the shared HTTP layer
//! - [`config`] - `StorefrontConfig`
//! - [`debounce`] - search input debouncing
//! - [`error`] - client error types
//! - [`services`] - one service per backend resource

pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod services;

pub use client::ApiClient;
pub use config::StorefrontConfig;
pub use debounce::{DebouncerHandle, SearchDebouncer};
pub use error::{ClientError, ClientResult};
pub use services::{CartApi, Services};

#[cfg(test)]
pub(crate) mod testing {
    //! In-process backend for service tests.

    use std::time::Duration;

    use crate::client::ApiClient;

    /// Serves `router` on an ephemeral local port; returns its base URL.
    pub async fn spawn_backend(router: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    pub fn client_for(base_url: &str) -> ApiClient {
        ApiClient::new(base_url, Duration::from_secs(5)).unwrap()
    }
}
