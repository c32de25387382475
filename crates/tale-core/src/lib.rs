//! Offline-resilient sync core for the Tale story-sharing app.
//!
//! This crate keeps client-held story data consistent with the remote
//! backend under intermittent connectivity:
//!
//! - **Gateway-first reads**: listings and details hit the backend and
//!   fall back to the durable local store when it is unreachable
//! - **Favorite reconciliation**: fresh server records are overlaid with
//!   locally-known favorite flags; only the favorited subset is persisted
//! - **Pending queue**: creations attempted offline are captured durably
//!   and replayed when connectivity returns
//! - **Events**: confirmed creations are announced on a broadcast
//!   channel for notification collaborators
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tale_core::{AlwaysOnline, Gateway, StaticCredentials, SyncEngine};
//! use tale_store::Store;
//! use tale_types::LoadOptions;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = Gateway::new("https://story-api.dicoding.dev/v1")?;
//!     let engine = SyncEngine::new(
//!         Store::open_default()?,
//!         Arc::new(gateway),
//!         Arc::new(StaticCredentials::anonymous()),
//!         Arc::new(AlwaysOnline),
//!     );
//!
//!     let listing = engine.load_stories(&LoadOptions::new()).await;
//!     println!("{} stories ({})", listing.stories.len(), listing.message);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod events;
pub mod favorites;
pub mod gateway;
pub mod mock;
pub mod queue;
pub mod sync;
pub mod traits;

pub use error::{Error, Result};
pub use events::{event_channel, EventDispatcher, EventReceiver, EventSender, SyncEvent};
pub use favorites::Favorites;
pub use gateway::{Gateway, DEFAULT_TIMEOUT};
pub use queue::PendingQueue;
pub use sync::SyncEngine;
pub use traits::{
    AlwaysOnline, ConnectivityProbe, CredentialProvider, StaticCredentials, StoryTransport,
};

// Re-export the shared types for convenience
pub use tale_types::{
    CreateStoryResult, DrainOutcome, ListOptions, LoadOptions, LoginResult, NewStory,
    PendingSubmission, Photo, RegisterResult, Story, StoryDetail, StoryList, SubmitOutcome,
};
