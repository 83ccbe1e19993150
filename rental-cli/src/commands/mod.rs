//! CLI command implementations.

pub mod comment;
pub mod favorite;
pub mod favorites;
pub mod login;
pub mod logout;
pub mod offer;
pub mod offers;
pub mod status;

use anyhow::Result;
use rental_client::ActionContext;
use rental_types::Offer;

/// One catalog line: id, price, rating, badges, title.
pub fn offer_line(offer: &Offer) -> String {
    let mut badges = String::new();
    if offer.is_premium {
        badges.push_str(" [premium]");
    }
    if offer.is_favorite {
        badges.push_str(" [favorite]");
    }
    format!(
        "  {:>6}  €{:<5} ★{:.1}  {}{}",
        offer.id, offer.price, offer.rating, offer.title, badges
    )
}

/// Fail unless the last auth check found a live session.
pub fn require_login(ctx: &ActionContext) -> Result<()> {
    if ctx.store().with_state(|s| s.is_authenticated()) {
        Ok(())
    } else {
        anyhow::bail!("Not logged in. Run 'sixcities login --email <email>' first.")
    }
}
