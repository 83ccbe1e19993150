//! Add an offer to, or remove it from, the favorites.

use anyhow::{Context, Result};
use rental_client::{actions, ActionContext};
use rental_types::{FavoriteStatus, OfferId};

use super::require_login;

/// Run the favorite command.
pub async fn run(ctx: &ActionContext, id: &OfferId, status: FavoriteStatus) -> Result<()> {
    require_login(ctx)?;
    let follow_ups = actions::change_favorite(ctx, id, status)
        .await
        .with_context(|| format!("Failed to update favorite {}", id))?;

    // The refreshed list is what we report, so wait for it
    follow_ups
        .join()
        .await
        .context("Favorite saved, but refreshing favorites failed")?;

    let count = ctx.store().with_state(|s| s.favorite_offers.len());
    match status {
        FavoriteStatus::Add => println!("Added {} to favorites ({} saved)", id, count),
        FavoriteStatus::Remove => println!("Removed {} from favorites ({} saved)", id, count),
    }
    Ok(())
}
