//! # Backend Services
//!
//! One typed service per backend resource, all sharing an [`ApiClient`].
//!
//! - [`cart`] - `/cart` (behind the [`CartApi`] trait)
//! - [`products`] - `/products` listing, detail, search
//! - [`campaigns`] - `/discount-campaigns` administration
//! - [`reviews`] - `/reviews`
//! - [`wishlist`] - `/wishlist`
//! - [`orders`] - `/orders` checkout, history, administration
//!
//! Services that take user input validate it first; invalid input fails
//! with [`crate::ClientError::Validation`] and no request is made.

pub mod campaigns;
pub mod cart;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod wishlist;

pub use campaigns::CampaignService;
pub use cart::{CartApi, CartService};
pub use orders::{OrderQuery, OrderService};
pub use products::{ProductQuery, ProductService};
pub use reviews::ReviewService;
pub use wishlist::WishlistService;

use serde::Deserialize;
use storefront_core::Page;

use crate::client::ApiClient;

/// A collection some endpoints return bare and others wrap in a page.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    List(Vec<T>),
    Page(Page<T>),
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::List(items) => items,
            Listing::Page(page) => page.content,
        }
    }
}

/// All services over one client.
#[derive(Debug, Clone)]
pub struct Services {
    pub cart: CartService,
    pub products: ProductService,
    pub campaigns: CampaignService,
    pub reviews: ReviewService,
    pub wishlist: WishlistService,
    pub orders: OrderService,
}

impl Services {
    pub fn new(api: ApiClient) -> Self {
        Services {
            cart: CartService::new(api.clone()),
            products: ProductService::new(api.clone()),
            campaigns: CampaignService::new(api.clone()),
            reviews: ReviewService::new(api.clone()),
            wishlist: WishlistService::new(api.clone()),
            orders: OrderService::new(api),
        }
    }
}
