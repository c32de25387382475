//! Story listing, detail, and submission commands.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tale_types::{LoadOptions, NewStory, Photo};

use super::{build_engine, print_story_line};
use crate::config::Config;

/// Execute the list command.
pub async fn cmd_list(
    config: &Config,
    location: bool,
    refresh: bool,
    page: u32,
    size: u32,
    json: bool,
) -> Result<()> {
    let engine = build_engine(config)?;

    let mut options = LoadOptions::new().page(page).page_size(size);
    if location {
        options = options.location_only();
    }
    if refresh {
        options = options.force_refresh();
    }

    let result = engine.load_stories(&options).await;
    if result.error {
        bail!("{}", result.message);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result.stories)?);
        return Ok(());
    }

    if result.stories.is_empty() {
        println!("No stories ({})", result.message);
        return Ok(());
    }

    for story in &result.stories {
        print_story_line(story);
    }
    println!("\n{} stories - {}", result.stories.len(), result.message);

    Ok(())
}

/// Execute the detail command.
pub async fn cmd_detail(config: &Config, id: &str, json: bool) -> Result<()> {
    let engine = build_engine(config)?;
    let result = engine.load_story_detail(id).await;

    let Some(story) = result.story else {
        bail!("{}", result.message);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&story)?);
        return Ok(());
    }

    println!("{} - {}", story.id, story.name);
    println!("  {}", story.description);
    println!("  photo: {}", story.photo_url);
    if let (Some(lat), Some(lon)) = (story.lat, story.lon) {
        println!("  location: ({lat}, {lon})");
    }
    println!(
        "  created: {}",
        story
            .created_at
            .format(&time::format_description::well_known::Rfc3339)?
    );
    if story.favorited {
        println!("  kept for offline reading");
    }
    println!("  ({})", result.message);

    Ok(())
}

/// Execute the add command.
pub async fn cmd_add(
    config: &Config,
    description: &str,
    photo: &Path,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<()> {
    let bytes = std::fs::read(photo)
        .with_context(|| format!("Failed to read photo {}", photo.display()))?;
    let file_name = photo
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("photo.jpg")
        .to_string();

    let mut story = NewStory::new(description, Photo::new(file_name, bytes));
    if let (Some(lat), Some(lon)) = (lat, lon) {
        story = story.with_location(lat, lon);
    }

    let engine = build_engine(config)?;
    let outcome = engine.submit_story(story).await;
    if outcome.error {
        bail!("{}", outcome.message);
    }

    if outcome.queued {
        println!("{}", outcome.message);
        println!("Run 'tale drain' once the connection is back.");
    } else {
        match outcome.id {
            Some(id) => println!("Story created: {id}"),
            None => println!("{}", outcome.message),
        }
    }

    Ok(())
}
