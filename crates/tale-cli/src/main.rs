use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = Config::load()?;

    match cli.command {
        Commands::List {
            location,
            refresh,
            page,
            size,
            json,
        } => commands::stories::cmd_list(&config, location, refresh, page, size, json).await,
        Commands::Detail { id, json } => commands::stories::cmd_detail(&config, &id, json).await,
        Commands::Add {
            description,
            photo,
            lat,
            lon,
        } => commands::stories::cmd_add(&config, &description, &photo, lat, lon).await,
        Commands::Favorite { id } => commands::favorites::cmd_favorite(&config, &id).await,
        Commands::Unfavorite { id } => commands::favorites::cmd_unfavorite(&config, &id).await,
        Commands::Favorites { json } => commands::favorites::cmd_favorites(&config, json).await,
        Commands::Pending => commands::pending::cmd_pending(&config).await,
        Commands::Drain => commands::pending::cmd_drain(&config).await,
        Commands::Login { email, password } => {
            commands::auth::cmd_login(&mut config, &email, &password).await
        }
        Commands::Register {
            name,
            email,
            password,
        } => commands::auth::cmd_register(&config, &name, &email, &password).await,
        Commands::Logout => commands::auth::cmd_logout(&mut config),
    }
}
