//! Pending-queue commands.

use anyhow::Result;

use super::build_engine;
use crate::config::Config;

/// Execute the pending listing command.
pub async fn cmd_pending(config: &Config) -> Result<()> {
    let engine = build_engine(config)?;
    let pending = engine.queue().pending().await;

    if pending.is_empty() {
        println!("No pending submissions.");
        return Ok(());
    }

    println!("Pending submissions:\n");
    for entry in &pending {
        println!("  {}", entry.id);
        println!("    {}", entry.story.description);
        println!(
            "    queued: {}",
            entry
                .queued_at
                .format(&time::format_description::well_known::Rfc3339)?
        );
    }
    println!("\n{} submissions waiting for a replay", pending.len());

    Ok(())
}

/// Execute the drain command.
pub async fn cmd_drain(config: &Config) -> Result<()> {
    let engine = build_engine(config)?;
    let results = engine.drain_pending().await;

    if results.is_empty() {
        println!("Nothing to drain.");
        return Ok(());
    }

    let mut submitted = 0;
    for result in &results {
        if result.success {
            submitted += 1;
            println!("  ok      {} - {}", result.id, result.message);
        } else {
            println!("  failed  {} - {}", result.id, result.message);
        }
    }
    println!("\n{submitted}/{} submissions replayed", results.len());

    Ok(())
}
