//! # sixcities
//!
//! Command-line client for the six-cities rental API.
//!
//! ## Commands
//!
//! - `offers`: List places to stay in a city
//! - `offer`: Show one offer with reviews and nearby places
//! - `favorites`: List saved offers
//! - `favorite`: Add or remove a saved offer
//! - `comment`: Publish a review
//! - `login` / `logout`: Manage the session
//! - `status`: Show session status
//!
//! ## Example
//!
//! ```bash
//! # Browse Amsterdam, cheapest first
//! sixcities offers --city Amsterdam --sort price-asc
//!
//! # Sign in (prompts for the password)
//! sixcities login --email oliver@example.test
//!
//! # Save an offer and review it
//! sixcities favorite 42
//! sixcities comment 42 --rating 5 "Lovely flat, great host"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rental_client::actions;
use rental_core::SortKey;
use rental_types::{CityName, FavoriteStatus, OfferId};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{comment, favorite, favorites, login, logout, offer, offers, status};
use config::{default_data_dir, set_dir_permissions_0700, AppContext};

/// Command-line client for the six-cities rental API.
#[derive(Parser, Debug)]
#[command(name = "sixcities")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory holding config.toml and the session token
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override the API base URL from config.toml
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List places to stay in a city
    Offers {
        /// City to show (defaults to the configured city)
        #[arg(long, short)]
        city: Option<CityName>,

        /// Sort order: popular, price-asc, price-desc, top-rated
        #[arg(long, short)]
        sort: Option<SortKey>,
    },

    /// Show one offer with reviews and nearby places
    Offer {
        /// Offer id
        id: String,
    },

    /// List saved offers
    Favorites,

    /// Add an offer to favorites
    Favorite {
        /// Offer id
        id: String,

        /// Remove from favorites instead
        #[arg(long)]
        remove: bool,
    },

    /// Publish a review
    Comment {
        /// Offer id
        id: String,

        /// Star rating, 1 to 5
        #[arg(long, short)]
        rating: u8,

        /// Review text
        text: String,
    },

    /// Sign in
    Login {
        /// Account email
        #[arg(long, short)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(long, short)]
        password: Option<String>,
    },

    /// Sign out
    Logout,

    /// Show session status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;
    set_dir_permissions_0700(&data_dir).await?;

    let app = AppContext::load(&data_dir, cli.base_url.as_deref()).await?;
    let ctx = &app.actions;

    // Every command starts from a known session status
    let auth = actions::check_auth(ctx).await;
    tracing::debug!("Authorization status: {:?}", auth);

    match cli.command {
        Commands::Offers { city, sort } => {
            let sort = sort.unwrap_or(app.config.ui.default_sort);
            offers::run(ctx, city, sort).await?;
        }
        Commands::Offer { id } => {
            offer::run(ctx, &OfferId::new(id)).await?;
        }
        Commands::Favorites => {
            favorites::run(ctx).await?;
        }
        Commands::Favorite { id, remove } => {
            let status = if remove {
                FavoriteStatus::Remove
            } else {
                FavoriteStatus::Add
            };
            favorite::run(ctx, &OfferId::new(id), status).await?;
        }
        Commands::Comment { id, rating, text } => {
            comment::run(ctx, &OfferId::new(id), &text, rating).await?;
        }
        Commands::Login { email, password } => {
            login::run(ctx, &email, password).await?;
        }
        Commands::Logout => {
            logout::run(ctx).await?;
        }
        Commands::Status => {
            status::run(&app).await?;
        }
    }

    Ok(())
}
