//! # Wishlist Commands
//!
//! Needs a signed-in user; without a token the backend answers 401 and
//! the command fails with `UNAUTHORIZED`.

use storefront_core::resolve_product_pricing;

use super::catalog::price_text;
use super::{empty_note, WishlistArgs, WishlistCommand};
use crate::error::AppResult;
use crate::AppContext;

/// Run a wishlist command.
pub async fn run(args: WishlistArgs, ctx: &AppContext) -> AppResult<()> {
    let wishlist = &ctx.services.wishlist;

    match args.command.unwrap_or(WishlistCommand::List) {
        WishlistCommand::List => {}
        WishlistCommand::Add { product_id } => {
            if wishlist.contains(product_id).await? {
                ctx.output.success(&format!("Product #{product_id} is already on your wishlist"));
            } else {
                wishlist.add(product_id).await?;
                ctx.output.success(&format!("Product #{product_id} added to your wishlist"));
            }
        }
        WishlistCommand::Remove { product_id } => {
            wishlist.remove(product_id).await?;
            ctx.output.success(&format!("Product #{product_id} removed from your wishlist"));
        }
    }

    let items = wishlist.get().await?;
    ctx.output.emit(&items, || {
        if items.is_empty() {
            return empty_note("wishlist items");
        }
        items
            .iter()
            .map(|item| match &item.product {
                Some(product) => format!(
                    "#{:<6} {:<40} {}",
                    item.product_id,
                    product.name,
                    price_text(&ctx.config, &resolve_product_pricing(product, None))
                ),
                None => format!("#{}", item.product_id),
            })
            .collect::<Vec<_>>()
            .join("\n")
    });
    Ok(())
}
