//! End the session.

use anyhow::{Context, Result};
use rental_client::{actions, ActionContext};

/// Run the logout command.
pub async fn run(ctx: &ActionContext) -> Result<()> {
    if !ctx.store().with_state(|s| s.is_authenticated()) {
        println!("Not logged in.");
        return Ok(());
    }

    actions::logout(ctx).await.context("Logout failed")?;
    println!("Logged out.");
    Ok(())
}
