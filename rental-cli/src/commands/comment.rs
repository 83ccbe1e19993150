//! Publish a review.

use anyhow::{Context, Result};
use rental_client::{actions, ActionContext};
use rental_types::{NewComment, OfferId};

use super::require_login;

/// Run the comment command.
pub async fn run(ctx: &ActionContext, id: &OfferId, text: &str, rating: u8) -> Result<()> {
    require_login(ctx)?;
    let comment = NewComment::new(text, rating).context("Invalid review")?;

    actions::post_comment(ctx, id, &comment)
        .await
        .with_context(|| format!("Failed to post review for offer {}", id))?;

    let count = ctx.store().with_state(|s| s.comments.len());
    println!("Review posted. Offer {} now has {} reviews.", id, count);
    Ok(())
}
