//! Review commands.

use anyhow::{bail, Result};
use hogar_core::format::format_date;
use hogar_core::persist::StorefrontState;
use hogar_core::reviews::{NewReview, Review};

use super::{product_not_found, ReviewsArgs, ReviewsCommand};
use crate::context::Context;
use crate::output::{rating_summary, stars};

/// Run the reviews command.
pub async fn run(args: ReviewsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ReviewsCommand::List { id } => {
            let (_, state) = ctx.state()?;
            let reviews = state.reviews.product_reviews(id);

            if ctx.output.is_json() {
                ctx.output.json(&reviews);
                return Ok(());
            }

            let name = state.catalog.get(id).map_or("", |p| p.name.as_str());
            ctx.output.header(&format!("Reseñas {}", name));
            if reviews.is_empty() {
                ctx.output.info("Sin reseñas todavía.");
                return Ok(());
            }
            ctx.output
                .info(&rating_summary(state.reviews.average_rating(id), reviews.len()));
            for review in reviews {
                ctx.output.info("");
                ctx.output.list_item(&review_heading(review));
                if !review.comment.is_empty() {
                    ctx.output.kv("comentario", &review.comment);
                }
            }
        }
        ReviewsCommand::Add {
            id,
            name,
            rating,
            comment,
        } => {
            let (cache, mut state) = ctx.state()?;
            add_review(&mut state, NewReview::new(id, name, rating).with_comment(comment))?;
            state.save_reviews(&cache);
            ctx.output.success("¡Gracias por tu reseña!");
        }
    }
    Ok(())
}

fn review_heading(review: &Review) -> String {
    format!(
        "{} {} · {}",
        stars(f64::from(review.rating)),
        review.user_name,
        format_date(&review.created_at)
    )
}

/// Reviews are only taken for products in the catalog.
fn add_review(state: &mut StorefrontState, review: NewReview) -> Result<()> {
    let id = review.product_id;
    if state.catalog.get(id).is_none() {
        bail!(product_not_found(id));
    }
    state.reviews.add(review)?;
    Ok(())
}
