//! # Review Commands

use storefront_core::order::{CreateReviewRequest, RatingSummary, Review, UpdateReviewRequest};

use super::{empty_note, ReviewsArgs, ReviewsCommand};
use crate::error::AppResult;
use crate::AppContext;

/// Run a reviews command.
pub async fn run(args: ReviewsArgs, ctx: &AppContext) -> AppResult<()> {
    let reviews = &ctx.services.reviews;

    match args.command {
        ReviewsCommand::List { product_id } => {
            let list = reviews.for_product(product_id).await?;
            let summary = RatingSummary::from_reviews(&list);
            ctx.output.emit(&serde_json::json!({ "summary": summary, "reviews": list }), || {
                render_reviews(&summary, &list)
            });
        }
        ReviewsCommand::Add {
            product_id,
            rating,
            comment,
        } => {
            let review = reviews
                .create(&CreateReviewRequest {
                    product_id,
                    rating,
                    comment,
                })
                .await?;
            ctx.output.success(&format!("Review #{} posted", review.id));
        }
        ReviewsCommand::Edit {
            review_id,
            rating,
            comment,
        } => {
            reviews
                .update(review_id, &UpdateReviewRequest { rating, comment })
                .await?;
            ctx.output.success(&format!("Review #{review_id} updated"));
        }
        ReviewsCommand::Helpful { review_id } => {
            let review = reviews.mark_helpful(review_id).await?;
            ctx.output.success(&format!(
                "Thanks! {} people found this helpful",
                review.helpful_count
            ));
        }
    }
    Ok(())
}

fn render_reviews(summary: &RatingSummary, reviews: &[Review]) -> String {
    if reviews.is_empty() {
        return empty_note("reviews");
    }
    let mut out = format!("{:.1}/5 from {} reviews\n", summary.average, summary.total);
    for stars in (1..=5u8).rev() {
        let pct = summary.percentage(stars);
        let bar = "█".repeat((pct / 5.0).round() as usize);
        out.push_str(&format!("{stars}★ {bar:<20} {pct:>3.0}%\n"));
    }
    for review in reviews {
        let author = review.user_name.as_deref().unwrap_or("Anonymous");
        let verified = if review.verified_purchase { " (verified purchase)" } else { "" };
        out.push_str(&format!("\n#{} {} {}{}\n", review.id, review.stars(), author, verified));
        if let Some(comment) = &review.comment {
            out.push_str(&format!("  {comment}\n"));
        }
        if review.helpful_count > 0 {
            out.push_str(&format!("  {} found this helpful\n", review.helpful_count));
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_reviews() {
        let reviews: Vec<Review> = serde_json::from_str(
            r#"[
                {"id": 1, "productId": 3, "rating": 5, "comment": "Great", "userName": "Lan", "helpfulCount": 2},
                {"id": 2, "productId": 3, "rating": 4}
            ]"#,
        )
        .unwrap();
        let summary = RatingSummary::from_reviews(&reviews);
        let text = render_reviews(&summary, &reviews);

        assert!(text.starts_with("4.5/5 from 2 reviews"));
        assert!(text.contains("Lan"));
        assert!(text.contains("2 found this helpful"));
        assert!(text.contains("Anonymous"));
        assert_eq!(render_reviews(&summary, &[]), "No reviews yet.");
    }
}
