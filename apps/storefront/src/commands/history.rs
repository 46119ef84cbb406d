//! # History Commands
//!
//! Lists kept only in the local store: recently viewed products, the
//! product comparison, and the interface language.

use chrono::Utc;
use storefront_core::history::ProductSnapshot;
use storefront_core::MAX_COMPARISON_ITEMS;

use super::{empty_note, CompareArgs, CompareCommand, LanguageArgs, RecentArgs};
use crate::error::AppResult;
use crate::AppContext;

/// `storefront recent [--clear]`
pub async fn recent(args: RecentArgs, ctx: &AppContext) -> AppResult<()> {
    let history = ctx.db.inner().history();
    if args.clear {
        history.clear_recently_viewed().await?;
        ctx.output.success("Recently viewed cleared");
        return Ok(());
    }

    let entries = history.recently_viewed(Utc::now()).await?;
    ctx.output.emit(&entries, || {
        if entries.is_empty() {
            return empty_note("recently viewed products");
        }
        entries
            .iter()
            .map(|e| {
                format!(
                    "#{:<6} {:<40} {:<16} {}",
                    e.product.product_id,
                    e.product.name,
                    ctx.config.price(e.product.price),
                    e.viewed_at.format("%Y-%m-%d %H:%M")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    });
    Ok(())
}

/// `storefront compare [list|add|remove|clear]`
pub async fn compare(args: CompareArgs, ctx: &AppContext) -> AppResult<()> {
    let history = ctx.db.inner().history();

    match args.command.unwrap_or(CompareCommand::List) {
        CompareCommand::List => {}
        CompareCommand::Add { product_id } => {
            let product = ctx.services.products.get(product_id).await?;
            if history.add_to_comparison(ProductSnapshot::from_product(&product)).await? {
                ctx.output.success(&format!("Added {} to comparison", product.name));
            } else {
                ctx.output.success(&format!("{} is already in the comparison", product.name));
            }
        }
        CompareCommand::Remove { product_id } => {
            if history.remove_from_comparison(product_id).await? {
                ctx.output.success("Removed from comparison");
            } else {
                ctx.output.warn(&format!("Product #{product_id} is not in the comparison"));
            }
        }
        CompareCommand::Clear => {
            history.clear_comparison().await?;
            ctx.output.success("Comparison cleared");
        }
    }

    let list = history.comparison().await?;
    ctx.output.emit(&list, || {
        if list.is_empty() {
            return empty_note("products to compare");
        }
        let mut out = format!("Comparing {}/{}\n", list.len(), MAX_COMPARISON_ITEMS);
        for item in list.items() {
            out.push_str(&format!(
                "#{:<6} {:<40} {}\n",
                item.product_id,
                item.name,
                ctx.config.price(item.price)
            ));
        }
        out.trim_end().to_string()
    });
    Ok(())
}

/// `storefront language [en|vi]`
pub async fn language(args: LanguageArgs, ctx: &AppContext) -> AppResult<()> {
    if let Some(language) = args.language {
        ctx.db.inner().session().set_language(language).await?;
        if ctx.config.inner().display.language.is_some_and(|l| l != language) {
            ctx.output.warn("display.language in the config file overrides the stored choice");
        }
    }
    let current = ctx.config.language(&ctx.db).await?;
    ctx.output.emit(&current, || format!("Language: {current}"));
    Ok(())
}
