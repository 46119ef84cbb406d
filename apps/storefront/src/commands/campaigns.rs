//! # Discount Campaign Commands
//!
//! Admin screen for `/discount-campaigns`. The form is validated locally
//! before anything is sent; status is computed from the window at the
//! moment of listing.

use chrono::Utc;
use serde::Serialize;
use storefront_core::discount::{CampaignRequest, CampaignStatus, DiscountCampaign, DiscountEffect};
use storefront_core::DiscountType;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::{empty_note, CampaignForm, CampaignsArgs, CampaignsCommand};
use crate::error::{AppError, AppResult};
use crate::state::ConfigState;
use crate::AppContext;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CampaignRow {
    #[serde(flatten)]
    campaign: DiscountCampaign,
    status: CampaignStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<DiscountEffect>,
}

/// Run a campaigns command.
pub async fn run(args: CampaignsArgs, ctx: &AppContext) -> AppResult<()> {
    let campaigns = &ctx.services.campaigns;
    let now = Utc::now();

    match args.command {
        CampaignsCommand::List => {
            let rows: Vec<CampaignRow> = campaigns
                .list()
                .await?
                .into_iter()
                .map(|campaign| CampaignRow {
                    status: campaign.status(now),
                    campaign,
                    preview: None,
                })
                .collect();
            ctx.output.emit(&rows, || {
                if rows.is_empty() {
                    return empty_note("campaigns");
                }
                rows.iter()
                    .map(|row| summary_line(&ctx.config, row))
                    .collect::<Vec<_>>()
                    .join("\n")
            });
        }
        CampaignsCommand::Show { id, price } => {
            let campaign = campaigns.get(id).await?;
            let row = CampaignRow {
                status: campaign.status(now),
                preview: price.map(|p| campaign.preview_effect(p)),
                campaign,
            };
            ctx.output.emit(&row, || render_detail(&ctx.config, &row));
        }
        CampaignsCommand::Create(form) => {
            let campaign = campaigns.create(&to_request(form)).await?;
            ctx.output.success(&format!("Campaign #{} created", campaign.id));
        }
        CampaignsCommand::Update { id, form } => {
            let campaign = campaigns.update(id, &to_request(form)).await?;
            ctx.output.success(&format!("Campaign #{} updated", campaign.id));
        }
        CampaignsCommand::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete campaign #{id}?")).await? {
                ctx.output.warn("Cancelled");
                return Ok(());
            }
            campaigns.delete(id).await?;
            ctx.output.success(&format!("Campaign #{id} deleted"));
        }
    }
    Ok(())
}

fn to_request(form: CampaignForm) -> CampaignRequest {
    CampaignRequest {
        name: form.name.trim().to_string(),
        description: form.description.filter(|d| !d.trim().is_empty()),
        discount_type: form.discount_type,
        discount_value: form.value,
        max_discount_amount: form.max_discount,
        start_date: form.start,
        end_date: form.end,
        is_active: !form.inactive,
        product_ids: form.products,
        variant_ids: form.variants,
    }
}

fn value_text(config: &ConfigState, campaign: &DiscountCampaign) -> String {
    match campaign.discount_type {
        DiscountType::Percentage => {
            let cap = campaign
                .max_discount_amount
                .map(|cap| format!(" (max {})", config.price(cap)))
                .unwrap_or_default();
            format!("{}%{cap}", campaign.discount_value)
        }
        DiscountType::FixedAmount => config.price(campaign.discount_value),
    }
}

fn summary_line(config: &ConfigState, row: &CampaignRow) -> String {
    let c = &row.campaign;
    format!(
        "#{:<5} {:<30} {:<22} {:<9} {} → {}",
        c.id,
        c.name,
        value_text(config, c),
        row.status,
        c.start_date.format("%Y-%m-%d"),
        c.end_date.format("%Y-%m-%d"),
    )
}

fn render_detail(config: &ConfigState, row: &CampaignRow) -> String {
    let c = &row.campaign;
    let mut out = format!("{} (#{}) [{}]\n", c.name, c.id, row.status);
    if let Some(description) = &c.description {
        out.push_str(&format!("{description}\n"));
    }
    out.push_str(&format!("Discount: {}\n", value_text(config, c)));
    out.push_str(&format!("Window: {} → {}\n", c.start_date.to_rfc3339(), c.end_date.to_rfc3339()));
    out.push_str(&format!(
        "Scope: {} products, {} variants\n",
        c.product_ids.len(),
        c.variant_ids.len()
    ));
    if let Some(effect) = &row.preview {
        out.push_str(&format!(
            "Preview: {} - {} = {}\n",
            config.price(effect.original_price.amount()),
            config.price(effect.discount_amount.amount()),
            config.price(effect.final_price.amount()),
        ));
    }
    out.trim_end().to_string()
}

/// Asks a yes/no question on stderr; anything but `y`/`yes` is a no.
async fn confirm(question: &str) -> AppResult<bool> {
    let mut stderr = tokio::io::stderr();
    let prompt = format!("{question} [y/N] ");
    let io_err = |e: std::io::Error| AppError::internal(format!("Could not prompt: {e}"));
    stderr.write_all(prompt.as_bytes()).await.map_err(io_err)?;
    stderr.flush().await.map_err(io_err)?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await
        .map_err(|e| AppError::internal(format!("Could not read input: {e}")))?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

// =============================================================================
// Unit Tests
// =============================================================================
