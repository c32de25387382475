//! Favorite management commands.

use anyhow::{bail, Result};

use super::{build_engine, print_story_line};
use crate::config::Config;

/// Execute the favorite command.
pub async fn cmd_favorite(config: &Config, id: &str) -> Result<()> {
    let engine = build_engine(config)?;

    if engine.mark_favorite_by_id(id).await {
        println!("Story {id} kept for offline reading");
        Ok(())
    } else {
        bail!("Could not favorite story {id}");
    }
}

/// Execute the unfavorite command.
pub async fn cmd_unfavorite(config: &Config, id: &str) -> Result<()> {
    let engine = build_engine(config)?;

    if engine.unmark_favorite(id).await {
        println!("Story {id} removed from favorites");
    } else {
        // Unknown ids are not an error, there is just nothing to remove
        println!("Story {id} was not in the favorites");
    }

    Ok(())
}

/// Execute the favorites listing command.
pub async fn cmd_favorites(config: &Config, json: bool) -> Result<()> {
    let engine = build_engine(config)?;
    let favorites = engine.list_favorites().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&favorites)?);
        return Ok(());
    }

    if favorites.is_empty() {
        println!("No favorited stories. Use 'tale favorite <id>' to keep one offline.");
        return Ok(());
    }

    for story in &favorites {
        print_story_line(story);
    }
    println!("\n{} favorited stories", favorites.len());

    Ok(())
}
