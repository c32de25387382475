//! Durable local storage for Tale stories and pending submissions.
//!
//! This crate provides SQLite-based storage for the story records a user
//! keeps on-device, enabling offline reads, favorite tracking, and a
//! durable queue of submissions captured while the backend was
//! unreachable.
//!
//! # Features
//!
//! - Story records keyed by the server-assigned id, in insertion order
//! - Favorite-subset queries via a secondary index, with a full-scan
//!   fallback for stores created before the index existed
//! - Non-destructive schema migrations
//! - Independent pending-submission table that survives restarts
//!
//! # Example
//!
//! ```no_run
//! use tale_store::Store;
//!
//! let store = Store::open_default()?;
//! let favorites = store.get_favorites()?;
//! println!("{} stories kept for offline reading", favorites.len());
//! # Ok::<(), tale_store::Error>(())
//! ```

mod error;
mod schema;
mod store;

pub use error::{Error, Result};
pub use schema::SCHEMA_VERSION;
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/tale/stories.db`
/// - macOS: `~/Library/Application Support/tale/stories.db`
/// - Windows: `C:\Users\<user>\AppData\Local\tale\stories.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("tale")
        .join("stories.db")
}
