//! Sign in and store the session token.

use anyhow::{Context, Result};
use rental_client::{actions, ActionContext};
use rental_types::AuthData;

/// Run the login command.
///
/// Prompts for the password (without echo) when none was given.
pub async fn run(ctx: &ActionContext, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ").context("Failed to read password")?,
    };
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    let follow_ups = actions::login(ctx, &AuthData::new(email, password))
        .await
        .context("Login failed")?;
    if let Err(e) = follow_ups.join().await {
        tracing::warn!("Post-login refresh failed: {}", e);
    }

    let (name, favorites) = ctx.store().with_state(|s| {
        (
            s.user_data.as_ref().map(|u| u.name.clone()).unwrap_or_default(),
            s.favorite_offers.len(),
        )
    });
    println!("Logged in as {} <{}>", name, email);
    println!("  {} saved favorites", favorites);
    Ok(())
}
