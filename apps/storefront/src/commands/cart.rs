//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Guest   │────►│ In Cart  │────►│ Sign in  │────►│ Checkout │       │
//! │  │  Cart    │     │          │     │ + merge  │     │ (orders) │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                                │
//! │                   cart add                                              │
//! │                   cart update ── out of range: warning, no call         │
//! │                   cart remove                                           │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   cart clear ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command starts from a fresh `GET /cart` so stock checks run
//! against what the backend last said.

use storefront_core::cart::{Cart, QuantityEdit};
use storefront_core::{resolve_product_pricing, ResolvedPricing};
use tracing::debug;

use super::{CartArgs, CartCommand};
use crate::error::{AppError, AppResult, ErrorCode};
use crate::state::ConfigState;
use crate::AppContext;

/// Run a cart command.
pub async fn run(args: CartArgs, ctx: &AppContext) -> AppResult<()> {
    debug!(session = ctx.cart.session_id(), "cart command");
    ctx.cart.refresh_cart().await?;

    let cart = match args.command {
        CartCommand::Show => ctx.cart.cart().await,
        CartCommand::Add {
            product_id,
            variant,
            quantity,
        } => {
            let product = ctx.services.products.get(product_id).await?;
            let variant = match variant {
                Some(id) => Some(
                    product
                        .variant(id)
                        .ok_or_else(|| AppError::not_found("Variant", id))?,
                ),
                None => None,
            };
            let cart = ctx.cart.add_to_cart(&product, variant, quantity).await?;
            let pricing = resolve_product_pricing(&product, variant);
            ctx.output.success(&added_message(&ctx.config, &product.name, &pricing, quantity));
            cart
        }
        CartCommand::Update { item_id, quantity } => update(ctx, item_id, &quantity).await?,
        CartCommand::Remove { item_id } => {
            let cart = ctx.cart.remove_item(item_id).await?;
            ctx.output.success("Removed from cart");
            cart
        }
        CartCommand::Clear => {
            let cart = ctx.cart.clear_cart().await?;
            ctx.output.success("Cart cleared");
            cart
        }
        CartCommand::Merge => merge(ctx).await?,
    };

    ctx.output.emit(&cart, || render_cart(&ctx.config, &cart));
    Ok(())
}

/// Runs the typed quantity through the edit buffer before it may reach the
/// backend. A rejected value prints the warning and the quantity it reverts to.
async fn update(ctx: &AppContext, item_id: i64, raw: &str) -> AppResult<Cart> {
    let line = ctx
        .cart
        .with_cart(|cart| cart.item(item_id).cloned())
        .await
        .ok_or_else(|| AppError::not_found("Cart item", item_id))?;

    let mut edit = QuantityEdit::new(&line);
    edit.echo(raw);
    match edit.commit(&line.product_name, line.stock_quantity) {
        Ok(Some(quantity)) => {
            let cart = ctx.cart.update_quantity(item_id, quantity).await?;
            edit.confirm(quantity);
            ctx.output.success(&format!("{} quantity set to {}", line.display_name(), edit.last_valid()));
            Ok(cart)
        }
        Ok(None) => Ok(ctx.cart.cart().await),
        Err(e) => {
            ctx.output.warn(&format!("{}; quantity stays at {}", e, edit.pending()));
            Err(e.into())
        }
    }
}

/// Merges the stored guest cart into the signed-in user's cart and forgets
/// the guest id.
async fn merge(ctx: &AppContext) -> AppResult<Cart> {
    if ctx.config.inner().auth.user_id.is_none() {
        return Err(AppError::new(
            ErrorCode::Unauthorized,
            "Sign in (set auth.user_id) before merging the guest cart",
        ));
    }
    let sessions = ctx.db.inner().session();
    let Some(guest_id) = sessions.guest_session_id().await? else {
        ctx.output.success("No guest cart to merge");
        return Ok(ctx.cart.cart().await);
    };

    let cart = ctx.cart.merge_guest_cart(&guest_id).await?;
    sessions.clear_guest_session_id().await?;
    ctx.output.success("Guest cart merged");
    Ok(cart)
}

/// `Added 2 × Linen shirt (300,000 ₫, you save 100,000 ₫)`
fn added_message(config: &ConfigState, name: &str, pricing: &ResolvedPricing, quantity: i64) -> String {
    let total = config.price(pricing.line_total(quantity).amount());
    let savings = pricing.line_savings(quantity);
    if savings.is_positive() {
        format!(
            "Added {quantity} × {name} ({total}, you save {})",
            config.price(savings.amount())
        )
    } else {
        format!("Added {quantity} × {name} ({total})")
    }
}

/// Cart as text, one line per item followed by the totals.
pub fn render_cart(config: &ConfigState, cart: &Cart) -> String {
    if cart.is_empty() {
        return "Your cart is empty.".to_string();
    }

    let mut out = format!("CART{:>60}\n", format!("{} items", cart.items_count()));
    for item in &cart.items {
        let unit = match item.original_price {
            Some(original) if item.has_discount() => {
                format!("{} (was {})", config.price(item.unit_price), config.price(original))
            }
            _ => config.price(item.unit_price),
        };
        let stock = match item.stock_quantity {
            Some(stock) if stock <= item.quantity => format!("  [only {stock} left]"),
            _ => String::new(),
        };
        out.push_str(&format!(
            "#{:<5} {:<34} x{:<3} {:<28} {}{}\n",
            item.id,
            item.display_name(),
            item.quantity,
            unit,
            config.price(item.subtotal),
            stock
        ));
    }
    out.push_str(&format!("{:<44}{}\n", "Subtotal", config.price(cart.subtotal)));
    if cart.total_discount > 0.0 {
        out.push_str(&format!("{:<44}-{}\n", "Discount", config.price(cart.total_discount)));
    }
    out.push_str(&format!("{:<44}{}", "TOTAL", config.price(cart.total)));
    if !cart.is_consistent() {
        tracing::warn!(
            subtotal = cart.subtotal,
            total = cart.total,
            lines = %cart.recomputed_subtotal(),
            expected_total = %cart.recomputed_total(),
            "Cart totals do not match its lines"
        );
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_client::StorefrontConfig;
    use storefront_core::cart::CartItem;

    #[test]
    fn test_render_cart() {
        let config = ConfigState::new(StorefrontConfig::default());
        assert_eq!(render_cart(&config, &Cart::default()), "Your cart is empty.");

        let cart = Cart {
            items: vec![CartItem {
                id: 1,
                product_id: 5,
                product_name: "Linen shirt".into(),
                variant_name: Some("M".into()),
                unit_price: 150000.0,
                original_price: Some(200000.0),
                discount_amount: Some(50000.0),
                quantity: 2,
                subtotal: 300000.0,
                stock_quantity: Some(2),
                ..Default::default()
            }],
            subtotal: 300000.0,
            total: 300000.0,
            total_items: 2,
            ..Default::default()
        };
        let text = render_cart(&config, &cart);
        assert!(text.contains("Linen shirt (M)"));
        assert!(text.contains("150,000 ₫ (was 200,000 ₫)"));
        assert!(text.contains("[only 2 left]"));
        assert!(text.ends_with("300,000 ₫"));
    }

    #[test]
    fn test_added_message_shows_line_total_and_savings() {
        let config = ConfigState::new(StorefrontConfig::default());
        let product: storefront_core::Product = serde_json::from_str(
            r#"{"id": 5, "name": "Linen shirt", "regularPrice": 200000, "salePrice": 150000}"#,
        )
        .unwrap();
        let pricing = resolve_product_pricing(&product, None);
        assert_eq!(
            added_message(&config, &product.name, &pricing, 2),
            "Added 2 × Linen shirt (300,000 ₫, you save 100,000 ₫)"
        );

        let plain: storefront_core::Product =
            serde_json::from_str(r#"{"id": 6, "name": "Mug", "regularPrice": 50000}"#).unwrap();
        assert_eq!(
            added_message(&config, "Mug", &resolve_product_pricing(&plain, None), 1),
            "Added 1 × Mug (50,000 ₫)"
        );
    }
}
