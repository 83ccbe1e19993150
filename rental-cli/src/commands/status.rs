//! Show session status.

use anyhow::Result;
use rental_core::{AppState, AuthorizationStatus};

use crate::config::AppContext;

/// Run the status command.
pub async fn run(app: &AppContext) -> Result<()> {
    let state = app.actions.store().state();
    print!("{}", render(app, &state));
    Ok(())
}

fn render(app: &AppContext, state: &AppState) -> String {
    let mut out = String::from("=== sixcities status ===\n\n");

    out.push_str("API:\n");
    out.push_str(&format!("  Base URL: {}\n", app.config.api.base_url));
    out.push_str(&format!("  Timeout:  {}s\n", app.config.api.timeout_secs));
    out.push('\n');

    out.push_str("Session:\n");
    match state.authorization_status {
        AuthorizationStatus::Authenticated => {
            out.push_str("  Status: SIGNED IN\n");
            if let Some(user) = &state.user_data {
                let pro = if user.is_pro { " (Pro)" } else { "" };
                out.push_str(&format!("  User:   {} <{}>{}\n", user.name, user.email, pro));
            }
        }
        AuthorizationStatus::NotAuthenticated => {
            out.push_str("  Status: SIGNED OUT\n");
            out.push('\n');
            out.push_str("Run 'sixcities login --email <email>' to sign in.\n");
        }
        AuthorizationStatus::Unknown => out.push_str("  Status: UNKNOWN\n"),
    }
    out.push_str(&format!("  Token:  {}\n", app.token_path.display()));
    out.push('\n');

    out.push_str("View:\n");
    out.push_str(&format!("  City:   {}\n", state.city_name));
    out.push_str(&format!("  Sort:   {}\n", app.config.ui.default_sort));
    out
}
