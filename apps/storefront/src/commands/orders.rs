//! # Order Commands
//!
//! ```text
//! checkout ──► cart must not be empty ──► address checked ──► POST /orders
//!                                                                  │
//!                                              refresh cart ◄──────┘
//! ```
//! `list` and `set-status` are the admin order board; a status change is
//! checked against the workflow before it is sent.

use storefront_client::services::OrderQuery;
use storefront_core::order::{CreateOrderRequest, Order, PaymentMethod, ShippingAddress};
use tracing::warn;

use super::{empty_note, CheckoutForm, OrdersArgs, OrdersCommand};
use crate::error::{AppError, AppResult};
use crate::state::ConfigState;
use crate::AppContext;

/// Run an orders command.
pub async fn run(args: OrdersArgs, ctx: &AppContext) -> AppResult<()> {
    let orders = &ctx.services.orders;

    match args.command {
        OrdersCommand::Checkout(form) => checkout(ctx, form).await,
        OrdersCommand::Mine => {
            let list = orders.my_orders().await?;
            print_orders(ctx, &list);
            Ok(())
        }
        OrdersCommand::Show { id } => {
            let order = orders.get(id).await?;
            ctx.output.emit(&order, || render_order(&ctx.config, &order));
            Ok(())
        }
        OrdersCommand::List { status, page, size } => {
            let result = orders.list(OrderQuery { status, page, size }).await?;
            print_orders(ctx, &result.content);
            if !ctx.output.is_json() && result.has_next() {
                println!("page {} of {}, more with --page", result.number + 1, result.total_pages);
            }
            Ok(())
        }
        OrdersCommand::SetStatus { id, status } => {
            let current = orders.get(id).await?;
            let order = orders.update_status(id, Some(current.status), status).await?;
            ctx.output.success(&format!("Order {} is now {}", order.reference(), order.status));
            Ok(())
        }
    }
}

async fn checkout(ctx: &AppContext, form: CheckoutForm) -> AppResult<()> {
    let cart = ctx.cart.refresh_cart().await?;
    if cart.is_empty() {
        return Err(AppError::cart("Your cart is empty"));
    }

    let request = CreateOrderRequest {
        session_id: ctx.cart.session_id().to_string(),
        shipping_address: ShippingAddress {
            full_name: form.name,
            phone: form.phone,
            address_line: form.address,
            ward: form.ward,
            district: form.district,
            city: form.city,
        },
        payment_method: PaymentMethod::Cod,
        note: form.note.filter(|n| !n.trim().is_empty()),
    };
    let order = ctx.services.orders.create(&request).await?;

    if let Err(e) = ctx.cart.refresh_cart().await {
        warn!(error = %e, "Could not reload cart after checkout");
    }

    ctx.output.success(&format!("Order {} placed", order.reference()));
    ctx.output.emit(&order, || render_order(&ctx.config, &order));
    Ok(())
}

fn print_orders(ctx: &AppContext, orders: &[Order]) {
    ctx.output.emit(&orders, || {
        if orders.is_empty() {
            return empty_note("orders");
        }
        orders
            .iter()
            .map(|o| {
                let placed = o
                    .created_at
                    .map(|t| t.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                format!(
                    "{:<12} {:<11} {:>3} items  {:<16} {}",
                    o.reference(),
                    o.status.as_str(),
                    o.units(),
                    ctx.config.price(o.total),
                    placed
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    });
}

fn render_order(config: &ConfigState, order: &Order) -> String {
    let mut out = format!("Order {} [{}]\n", order.reference(), order.status);
    for item in &order.items {
        out.push_str(&format!(
            "  {:<38} x{:<3} {}\n",
            item.product_name,
            item.quantity,
            config.price(item.subtotal)
        ));
    }
    out.push_str(&format!("  {:<43}{}\n", "Subtotal", config.price(order.subtotal)));
    if order.discount_amount > 0.0 {
        out.push_str(&format!("  {:<43}-{}\n", "Discount", config.price(order.discount_amount)));
    }
    out.push_str(&format!("  {:<43}{}\n", "Shipping", config.price(order.shipping_fee)));
    out.push_str(&format!("  {:<43}{}\n", "TOTAL", config.price(order.total)));
    if let Some(address) = &order.shipping_address {
        out.push_str(&format!("Ship to: {}\n", address.one_line()));
    }
    if let Some(note) = &order.note {
        out.push_str(&format!("Note: {note}\n"));
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_client::StorefrontConfig;

    #[test]
    fn test_render_order() {
        let order: Order = serde_json::from_str(
            r#"{
                "id": 42,
                "orderNumber": "ORD-0042",
                "status": "SHIPPED",
                "items": [{"productId": 5, "productName": "Linen shirt", "quantity": 2, "unitPrice": 150000, "subtotal": 300000}],
                "subtotal": 300000,
                "shippingFee": 30000,
                "total": 330000
            }"#,
        )
        .unwrap();

        let text = render_order(&ConfigState::new(StorefrontConfig::default()), &order);
        assert!(text.starts_with("Order ORD-0042 [SHIPPED]"));
        assert!(text.contains("Linen shirt"));
        assert!(text.contains("330,000 ₫"));
        assert!(!text.contains("Discount"));
    }
}
