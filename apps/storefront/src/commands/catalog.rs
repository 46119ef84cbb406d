//! # Catalog Commands
//!
//! Product listing, detail and search. Every price shown goes through
//! `resolve_product_pricing`; nothing is cached between calls.
//!
//! ## Interactive Search
//! ```text
//! stdin lines ──► DebouncerHandle::query ──► SearchDebouncer (300 ms quiet)
//!                                                  │
//!                              settled query ◄─────┘
//!                                   │
//!                                   ▼
//!                      GET /products/search?keyword=..
//! ```
//! Only the last line of a burst is searched. End of input flushes the
//! pending query.

use chrono::Utc;
use serde::Serialize;
use storefront_client::services::ProductQuery;
use storefront_client::SearchDebouncer;
use storefront_core::history::ProductSnapshot;
use storefront_core::order::RatingSummary;
use storefront_core::pricing::resolve_cheapest_variant;
use storefront_core::{resolve_product_pricing, Page, Product, ResolvedPricing};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use super::{empty_note, ProductsArgs, ProductsCommand};
use crate::error::{AppError, AppResult};
use crate::state::ConfigState;
use crate::AppContext;

/// Run a products command.
pub async fn run(args: ProductsArgs, ctx: &AppContext) -> AppResult<()> {
    match args.command {
        ProductsCommand::List {
            page,
            size,
            category,
            sort,
        } => {
            let query = ProductQuery {
                page,
                size,
                category_id: category,
                sort,
            };
            let page = ctx.services.products.list(&query).await?;
            print_page(ctx, &page);
            Ok(())
        }
        ProductsCommand::Show { id, variant } => show(ctx, id, variant).await,
        ProductsCommand::Search {
            keyword: Some(keyword),
            page,
        } => {
            let results = ctx.services.products.search(&keyword, page, 20).await?;
            print_page(ctx, &results);
            Ok(())
        }
        ProductsCommand::Search { keyword: None, .. } => search_interactive(ctx).await,
    }
}

// =============================================================================
// Listing
// =============================================================================

/// One row of a product listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    /// Cheapest variant's pricing when the product has variants.
    pub pricing: ResolvedPricing,
    pub from_price: bool,
    pub in_stock: bool,
}

impl ProductRow {
    pub fn new(product: &Product) -> Self {
        let (pricing, from_price) = match resolve_cheapest_variant(product) {
            Some((_, pricing)) => (pricing, product.variants.len() > 1),
            None => (resolve_product_pricing(product, None), false),
        };
        ProductRow {
            id: product.id,
            name: product.name.clone(),
            pricing,
            from_price,
            in_stock: product.in_stock(None) || product.variants.iter().any(|v| product.in_stock(Some(v))),
        }
    }
}

fn print_page(ctx: &AppContext, page: &Page<Product>) {
    let rows: Vec<ProductRow> = page.content.iter().map(ProductRow::new).collect();
    ctx.output.emit(&rows, || {
        if rows.is_empty() {
            return empty_note("products");
        }
        let mut out = String::new();
        for row in &rows {
            let from = if row.from_price { "from " } else { "" };
            let stock = if row.in_stock { "" } else { "  [out of stock]" };
            out.push_str(&format!(
                "#{:<6} {:<40} {}{}{}\n",
                row.id,
                row.name,
                from,
                price_text(&ctx.config, &row.pricing),
                stock
            ));
        }
        out.push_str(&format!(
            "page {} of {} ({} products){}",
            page.number + 1,
            page.total_pages.max(1),
            page.total_elements,
            if page.has_next() { ", more with --page" } else { "" }
        ));
        out
    });
}

/// `150,000 ₫` or `150,000 ₫ (was 200,000 ₫, -25%)`.
pub fn price_text(config: &ConfigState, pricing: &ResolvedPricing) -> String {
    let current = config.price(pricing.final_price);
    if !pricing.has_discount {
        return current;
    }
    let percent = pricing
        .discount_percent
        .map(|p| format!(", -{p}%"))
        .unwrap_or_default();
    format!("{current} (was {}{percent})", config.price(pricing.base_price))
}

// =============================================================================
// Detail
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductDetail {
    product: Product,
    pricing: ResolvedPricing,
    variants: Vec<VariantRow>,
    rating: Option<RatingSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VariantRow {
    id: i64,
    label: String,
    pricing: ResolvedPricing,
    stock: i64,
}

async fn show(ctx: &AppContext, id: i64, variant_id: Option<i64>) -> AppResult<()> {
    let product = ctx.services.products.get(id).await?;
    let variant = match variant_id {
        Some(variant_id) => Some(
            product
                .variant(variant_id)
                .ok_or_else(|| AppError::not_found("Variant", variant_id))?,
        ),
        None => None,
    };

    let history = ctx.db.inner().history();
    if let Err(e) = history.record_view(ProductSnapshot::from_product(&product), Utc::now()).await {
        warn!(product_id = id, error = %e, "Could not record recently viewed product");
    }

    let rating = match ctx.services.reviews.for_product(id).await {
        Ok(reviews) => Some(RatingSummary::from_reviews(&reviews)),
        Err(e) => {
            debug!(product_id = id, error = %e, "Reviews unavailable");
            None
        }
    };

    let detail = ProductDetail {
        pricing: resolve_product_pricing(&product, variant),
        variants: product
            .variants
            .iter()
            .map(|v| VariantRow {
                id: v.id,
                label: v.label(),
                pricing: resolve_product_pricing(&product, Some(v)),
                stock: product.available_stock(Some(v)),
            })
            .collect(),
        rating,
        product,
    };

    ctx.output.emit(&detail, || render_detail(&ctx.config, &detail, variant_id));
    Ok(())
}

fn render_detail(config: &ConfigState, detail: &ProductDetail, variant_id: Option<i64>) -> String {
    let product = &detail.product;
    let mut out = format!("{} (#{})\n", product.name, product.id);
    if let Some(brand) = &product.brand {
        out.push_str(&format!("Brand: {brand}\n"));
    }
    out.push_str(&format!("Price: {}\n", price_text(config, &detail.pricing)));
    if let Some(discount) = &detail.pricing.active_discount {
        let name = discount.campaign_name.as_deref().unwrap_or("Promotion");
        let badge = discount.badge().unwrap_or_default();
        out.push_str(&format!("Promotion: {name} {badge}\n"));
    }
    let selected = variant_id.and_then(|id| product.variant(id));
    out.push_str(&format!("In stock: {}\n", product.available_stock(selected)));

    if !detail.variants.is_empty() {
        out.push_str("Variants:\n");
        for v in &detail.variants {
            let marker = if Some(v.id) == variant_id { "*" } else { " " };
            out.push_str(&format!(
                " {marker} #{:<6} {:<28} {}  (stock {})\n",
                v.id,
                v.label,
                price_text(config, &v.pricing),
                v.stock
            ));
        }
    }

    match &detail.rating {
        Some(rating) if rating.total > 0 => {
            out.push_str(&format!("Rating: {:.1}/5 from {} reviews\n", rating.average, rating.total));
        }
        Some(_) => out.push_str("No reviews yet\n"),
        None => {}
    }
    if let Some(description) = &product.description {
        out.push_str(&format!("\n{description}\n"));
    }
    out.trim_end().to_string()
}

// =============================================================================
// Search
// =============================================================================

async fn search_interactive(ctx: &AppContext) -> AppResult<()> {
    let (handle, mut settled) = SearchDebouncer::new(ctx.config.inner().search.debounce()).start();
    let mut handle = Some(handle);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if !ctx.output.is_json() {
        eprintln!("Type to search; results appear once you pause. Ctrl-D to finish.");
    }

    loop {
        tokio::select! {
            line = lines.next_line(), if handle.is_some() => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => {
                    if let Some(handle) = &handle {
                        handle.query(line).await?;
                    }
                }
                Ok(None) => {
                    if let Some(handle) = handle.take() {
                        handle.flush().await?;
                    }
                }
                Err(e) => return Err(AppError::internal(format!("Could not read input: {e}"))),
            },
            query = settled.recv() => match query {
                Some(query) => {
                    debug!(%query, "Search settled");
                    match ctx.services.products.search(&query, 0, 20).await {
                        Ok(page) => print_page(ctx, &page),
                        Err(e) => ctx.output.error(&AppError::from(e)),
                    }
                }
                None => break,
            },
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_client::StorefrontConfig;
    use storefront_core::ProductVariant;

    fn product(json: &str) -> Product {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_price_text_shows_discount() {
        let config = ConfigState::new(StorefrontConfig::default());
        let sale = product(r#"{"id": 1, "name": "Shirt", "regularPrice": 200000, "salePrice": 150000}"#);
        let pricing = resolve_product_pricing(&sale, None);
        assert_eq!(price_text(&config, &pricing), "150,000 ₫ (was 200,000 ₫, -25%)");

        let plain = product(r#"{"id": 2, "name": "Mug", "regularPrice": 100}"#);
        assert_eq!(price_text(&config, &resolve_product_pricing(&plain, None)), "100 ₫");
    }

    #[test]
    fn test_row_uses_cheapest_variant() {
        let mut p = product(r#"{"id": 3, "name": "Tee", "regularPrice": 100000, "stockQuantity": 0}"#);
        p.variants = vec![
            ProductVariant {
                id: 31,
                price: Some(90000.0),
                stock_quantity: Some(2),
                ..Default::default()
            },
            ProductVariant {
                id: 32,
                price: Some(80000.0),
                stock_quantity: Some(0),
                ..Default::default()
            },
        ];

        let row = ProductRow::new(&p);
        assert_eq!(row.pricing.final_price, 80000.0);
        assert!(row.from_price);
        assert!(row.in_stock);
    }
}
