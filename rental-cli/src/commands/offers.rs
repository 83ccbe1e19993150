//! List the catalog for one city.

use anyhow::{Context, Result};
use rental_client::{actions, ActionContext};
use rental_core::{Action, AppState, SortKey};
use rental_types::CityName;

use super::offer_line;

/// Run the offers command.
pub async fn run(ctx: &ActionContext, city: Option<CityName>, sort: SortKey) -> Result<()> {
    actions::fetch_offers(ctx)
        .await
        .context("Failed to load offers")?;

    let store = ctx.store();
    if let Some(city) = city {
        store.dispatch(Action::ChangeCity(city));
    }
    store.dispatch(Action::SetSorting(sort));

    print!("{}", store.with_state(|s| render(s, sort)));
    Ok(())
}

fn render(state: &AppState, sort: SortKey) -> String {
    let visible = state.visible_offers();
    if visible.is_empty() {
        return format!(
            "No places to stay available in {}.\n",
            state.city_name
        );
    }

    let mut out = format!(
        "{} places to stay in {} (sorted: {})\n",
        visible.len(),
        state.city_name,
        sort
    );
    for offer in &visible {
        out.push_str(&offer_line(offer));
        out.push('\n');
    }
    out
}
