//! Command implementations.

pub mod auth;
pub mod favorites;
pub mod pending;
pub mod stories;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tale_core::{AlwaysOnline, ConnectivityProbe, Gateway, StaticCredentials, SyncEngine};
use tale_store::Store;
use tale_types::Story;

use crate::config::Config;

/// Probe used when the config pins the device offline.
struct ForcedOffline;

impl ConnectivityProbe for ForcedOffline {
    fn is_online(&self) -> bool {
        false
    }
}

/// Build the sync engine from the configuration.
pub fn build_engine(config: &Config) -> Result<SyncEngine> {
    let store = Store::open_default().context("Failed to open the story database")?;

    let gateway = Gateway::with_timeout(&config.base_url, Duration::from_secs(config.timeout_secs))
        .context("Failed to create the story gateway")?;

    let credentials = match &config.token {
        Some(token) => StaticCredentials::new(token.clone()),
        None => StaticCredentials::anonymous(),
    };

    let connectivity: Arc<dyn ConnectivityProbe> = if config.offline {
        Arc::new(ForcedOffline)
    } else {
        Arc::new(AlwaysOnline)
    };

    Ok(SyncEngine::new(
        store,
        Arc::new(gateway),
        Arc::new(credentials),
        connectivity,
    ))
}

/// One-line story rendering shared by the listing commands.
pub(crate) fn print_story_line(story: &Story) {
    let marker = if story.favorited { "*" } else { " " };
    let location = match (story.lat, story.lon) {
        (Some(lat), Some(lon)) => format!(" @({lat:.4}, {lon:.4})"),
        _ => String::new(),
    };
    println!(
        "{marker} {}  {} - {}{location}",
        story.id, story.name, story.description
    );
}
