//! List the signed-in user's favorites, grouped by city.

use anyhow::{Context, Result};
use rental_client::{actions, ActionContext};
use rental_core::group_by_city;
use rental_types::Offer;

use super::{offer_line, require_login};

/// Run the favorites command.
pub async fn run(ctx: &ActionContext) -> Result<()> {
    require_login(ctx)?;
    let favorites = actions::fetch_favorite_offers(ctx)
        .await
        .context("Failed to load favorites")?;

    print!("{}", render(&favorites));
    Ok(())
}

fn render(favorites: &[Offer]) -> String {
    if favorites.is_empty() {
        return "Nothing yet saved.\n".to_string();
    }

    let mut out = format!("Saved listing ({})\n", favorites.len());
    for (city, offers) in group_by_city(favorites) {
        out.push_str(&format!("{}\n", city));
        for offer in &offers {
            out.push_str(&offer_line(offer));
            out.push('\n');
        }
    }
    out
}
