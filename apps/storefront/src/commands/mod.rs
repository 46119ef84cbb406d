//! # Commands Module
//!
//! One module per storefront screen. Each exposes
//! `run(args, &AppContext) -> AppResult<()>`.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (arguments)
//! ├── catalog.rs   ◄─── products list / show / search
//! ├── cart.rs      ◄─── cart show / add / update / remove / clear / merge
//! ├── campaigns.rs ◄─── campaigns list / show / create / update / delete
//! ├── config.rs    ◄─── config show / init (runs without the local store)
//! ├── history.rs   ◄─── recent, compare, language
//! ├── wishlist.rs  ◄─── wishlist list / add / remove
//! ├── orders.rs    ◄─── checkout, mine, show, list, set-status
//! └── reviews.rs   ◄─── reviews list / add / edit / helpful
//! ```
//!
//! ## How Commands Work
//! ```text
//! storefront cart update 12 5
//!         │
//!         ▼  clap
//! Commands::Cart(CartArgs { command: CartCommand::Update { .. } })
//!         │
//!         ▼
//! commands::cart::run(args, &ctx)
//!         │   ctx.cart     ◄── CartState (cart context)
//!         │   ctx.services ◄── backend services
//!         │   ctx.db       ◄── local store
//!         ▼
//! AppResult<()>  ── Err ──► "[INSUFFICIENT_STOCK] Only 3 left ..." on stderr
//! ```

pub mod campaigns;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod history;
pub mod orders;
pub mod reviews;
pub mod wishlist;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use storefront_core::order::OrderStatus;
use storefront_core::{DiscountType, Language};

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List catalog products, one page at a time.
    List {
        /// Zero-based page index.
        #[arg(short, long, default_value_t = 0)]
        page: u32,

        /// Page size.
        #[arg(short, long, default_value_t = storefront_client::services::products::DEFAULT_PAGE_SIZE)]
        size: u32,

        /// Only this category.
        #[arg(short, long)]
        category: Option<i64>,

        /// Sort key passed to the backend (e.g. `price,asc`).
        #[arg(long)]
        sort: Option<String>,
    },

    /// Show one product with its pricing, variants and reviews.
    Show {
        id: i64,

        /// Price a specific variant.
        #[arg(short, long)]
        variant: Option<i64>,
    },

    /// Search by keyword. Without a keyword, reads queries from stdin as
    /// you type and searches once input settles.
    Search {
        keyword: Option<String>,

        #[arg(short, long, default_value_t = 0)]
        page: u32,
    },
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show the cart.
    Show,

    /// Add a product to the cart.
    Add {
        product_id: i64,

        #[arg(short, long)]
        variant: Option<i64>,

        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },

    /// Change a line's quantity.
    Update {
        item_id: i64,

        /// New quantity, as typed.
        quantity: String,
    },

    /// Remove a line.
    Remove { item_id: i64 },

    /// Empty the cart.
    Clear,

    /// Fold the stored guest cart into the signed-in user's cart.
    Merge,
}

// =============================================================================
// Discount Campaigns
// =============================================================================

#[derive(Debug, Args)]
pub struct CampaignsArgs {
    #[command(subcommand)]
    pub command: CampaignsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CampaignsCommand {
    /// List campaigns with their current status.
    List,

    /// Show one campaign.
    Show {
        id: i64,

        /// Preview the campaign's effect on this price.
        #[arg(long)]
        price: Option<f64>,
    },

    /// Create a campaign.
    Create(CampaignForm),

    /// Replace a campaign.
    Update {
        id: i64,

        #[command(flatten)]
        form: CampaignForm,
    },

    /// Delete a campaign.
    Delete {
        id: i64,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Campaign form fields.
#[derive(Debug, Clone, Args)]
pub struct CampaignForm {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: Option<String>,

    /// PERCENTAGE or FIXED_AMOUNT.
    #[arg(long = "type")]
    pub discount_type: DiscountType,

    #[arg(long)]
    pub value: f64,

    /// Cap on the reduction (percentage campaigns).
    #[arg(long)]
    pub max_discount: Option<f64>,

    /// RFC 3339 start, e.g. 2026-11-01T00:00:00Z.
    #[arg(long)]
    pub start: DateTime<Utc>,

    #[arg(long)]
    pub end: DateTime<Utc>,

    /// Create the campaign switched off.
    #[arg(long)]
    pub inactive: bool,

    /// Products in scope (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub products: Vec<i64>,

    /// Variants in scope (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub variants: Vec<i64>,
}

// =============================================================================
// History
// =============================================================================

#[derive(Debug, Args)]
pub struct RecentArgs {
    /// Forget the recently viewed list.
    #[arg(long)]
    pub clear: bool,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    #[command(subcommand)]
    pub command: Option<CompareCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CompareCommand {
    /// Show the comparison list (default).
    List,

    /// Add a product to the comparison.
    Add { product_id: i64 },

    /// Remove a product from the comparison.
    Remove { product_id: i64 },

    /// Empty the comparison.
    Clear,
}

#[derive(Debug, Args)]
pub struct LanguageArgs {
    /// `en` or `vi`. Shows the current language when omitted.
    pub language: Option<Language>,
}

// =============================================================================
// Wishlist
// =============================================================================

#[derive(Debug, Args)]
pub struct WishlistArgs {
    #[command(subcommand)]
    pub command: Option<WishlistCommand>,
}

#[derive(Debug, Subcommand)]
pub enum WishlistCommand {
    /// Show the wishlist (default).
    List,
    Add { product_id: i64 },
    Remove { product_id: i64 },
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    /// Place an order for the current cart (cash on delivery).
    Checkout(CheckoutForm),

    /// The signed-in user's orders.
    Mine,

    /// Show one order.
    Show { id: i64 },

    /// Admin: list orders.
    List {
        #[arg(long)]
        status: Option<OrderStatus>,

        #[arg(short, long, default_value_t = 0)]
        page: u32,

        #[arg(short, long, default_value_t = 20)]
        size: u32,
    },

    /// Admin: move an order along its workflow.
    SetStatus { id: i64, status: OrderStatus },
}

#[derive(Debug, Clone, Args)]
pub struct CheckoutForm {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub phone: String,

    #[arg(long)]
    pub address: String,

    #[arg(long)]
    pub ward: Option<String>,

    #[arg(long)]
    pub district: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub note: Option<String>,
}

// =============================================================================
// Reviews
// =============================================================================

#[derive(Debug, Args)]
pub struct ReviewsArgs {
    #[command(subcommand)]
    pub command: ReviewsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReviewsCommand {
    /// Reviews of a product with the rating breakdown.
    List { product_id: i64 },

    /// Review a product.
    Add {
        product_id: i64,

        /// 1 to 5 stars.
        #[arg(short, long)]
        rating: u8,

        #[arg(short, long)]
        comment: Option<String>,
    },

    /// Edit one of your reviews.
    Edit {
        review_id: i64,

        #[arg(short, long)]
        rating: u8,

        #[arg(short, long)]
        comment: Option<String>,
    },

    /// Mark a review as helpful.
    Helpful { review_id: i64 },
}

/// Shared line for an empty listing.
pub(crate) fn empty_note(what: &str) -> String {
    format!("No {what} yet.")
}

// =============================================================================
// Config
// =============================================================================

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (file + environment), token hidden.
    Show,

    /// Write a config file with the default settings.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}
