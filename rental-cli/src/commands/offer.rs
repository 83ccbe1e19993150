//! Show one offer with its nearby places and reviews.

use anyhow::{Context, Result};
use rental_client::{actions, ActionContext};
use rental_core::AppState;
use rental_types::OfferId;

use super::offer_line;

/// Run the offer command.
pub async fn run(ctx: &ActionContext, id: &OfferId) -> Result<()> {
    actions::fetch_offer_detail(ctx, id)
        .await
        .with_context(|| format!("Failed to load offer {}", id))?;

    print!("{}", ctx.store().with_state(render));
    Ok(())
}

fn render(state: &AppState) -> String {
    let Some(offer) = &state.current_offer else {
        return "Offer not loaded.\n".to_string();
    };

    let mut out = String::new();
    out.push_str(&format!("{}\n", offer.title));
    out.push_str(&format!(
        "  {} in {}, €{} / night, rated {:.1}\n",
        offer.offer_type, offer.city.name, offer.price, offer.rating
    ));
    out.push_str(&format!(
        "  {} bedrooms, max {} adults\n",
        offer.bedrooms, offer.max_adults
    ));
    if offer.is_premium {
        out.push_str("  Premium\n");
    }
    if offer.is_favorite {
        out.push_str("  In your favorites\n");
    }
    if !offer.goods.is_empty() {
        out.push_str(&format!("  Inside: {}\n", offer.goods.join(", ")));
    }
    let pro = if offer.host.is_pro { " (Pro)" } else { "" };
    out.push_str(&format!("  Host: {}{}\n", offer.host.name, pro));
    if !offer.description.is_empty() {
        out.push_str(&format!("\n{}\n", offer.description));
    }

    out.push_str(&format!("\nReviews ({})\n", state.comments.len()));
    for comment in &state.comments {
        out.push_str(&format!(
            "  {} ({:.0}/5, {}): {}\n",
            comment.user.name, comment.rating, comment.date, comment.comment
        ));
    }

    if !state.nearby_offers.is_empty() {
        out.push_str("\nOther places in the neighbourhood\n");
        for nearby in &state.nearby_offers {
            out.push_str(&offer_line(nearby));
            out.push('\n');
        }
    }
    out
}
