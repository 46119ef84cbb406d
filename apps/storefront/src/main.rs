//! Storefront CLI - browse the catalog, manage the cart and run the shop
//! admin screens against the storefront backend.
//!
//! Commands:
//! - `storefront products` - List, show and search products
//! - `storefront cart` - Show and change the cart
//! - `storefront campaigns` - Discount campaign admin
//! - `storefront recent` / `compare` - Locally kept product lists
//! - `storefront language` - Interface language
//! - `storefront wishlist` - Wishlist
//! - `storefront orders` - Checkout and order history
//! - `storefront reviews` - Product reviews
//! - `storefront config` - Inspect or create the config file

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use storefront_client::StorefrontConfig;

use storefront_app::commands::{
    self, CampaignsArgs, CartArgs, CompareArgs, ConfigArgs, LanguageArgs, OrdersArgs,
    ProductsArgs, RecentArgs, ReviewsArgs, WishlistArgs,
};
use storefront_app::error::AppError;
use storefront_app::output::Output;
use storefront_app::AppContext;

/// Storefront - command-line client for the storefront backend
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products(ProductsArgs),

    /// Show and change the shopping cart
    Cart(CartArgs),

    /// Manage discount campaigns
    Campaigns(CampaignsArgs),

    /// Recently viewed products
    Recent(RecentArgs),

    /// Side-by-side product comparison
    Compare(CompareArgs),

    /// Show or set the interface language
    Language(LanguageArgs),

    /// Saved products
    Wishlist(WishlistArgs),

    /// Checkout and orders
    Orders(OrdersArgs),

    /// Product reviews
    Reviews(ReviewsArgs),

    /// Inspect or create the config file
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    storefront_app::init_tracing();

    let output = Output::new(cli.json);

    let config = match StorefrontConfig::load(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => fail(output, AppError::from(e)),
    };

    if let Commands::Config(args) = cli.command {
        if let Err(e) = commands::config::run(args, &config, cli.config, output) {
            fail(output, e);
        }
        return Ok(());
    }

    let ctx = match AppContext::init(config, output).await {
        Ok(ctx) => ctx,
        Err(e) => fail(output, e),
    };

    let result = match cli.command {
        Commands::Products(args) => commands::catalog::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Campaigns(args) => commands::campaigns::run(args, &ctx).await,
        Commands::Recent(args) => commands::history::recent(args, &ctx).await,
        Commands::Compare(args) => commands::history::compare(args, &ctx).await,
        Commands::Language(args) => commands::history::language(args, &ctx).await,
        Commands::Wishlist(args) => commands::wishlist::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Reviews(args) => commands::reviews::run(args, &ctx).await,
        Commands::Config(_) => Ok(()),
    };

    if let Err(e) = result {
        fail(output, e);
    }

    Ok(())
}

fn fail(output: Output, err: AppError) -> ! {
    output.error(&err);
    std::process::exit(1);
}
