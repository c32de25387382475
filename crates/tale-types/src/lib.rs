//! Shared data types for the Tale story-sharing app.
//!
//! This crate provides the types shared by the storage layer
//! (tale-store) and the sync core (tale-core):
//!
//! - Story records and creation payloads
//! - Pending-submission entries for the offline queue
//! - Normalized result envelopes for gateway and engine operations
//! - Wire bodies matching the backend's JSON contract
//!
//! # Example
//!
//! ```
//! use tale_types::{NewStory, Photo, PendingSubmission};
//!
//! let story = NewStory::new("sunset over the bay", Photo::new("sunset.jpg", vec![0xFF]))
//!     .with_location(-6.2, 106.8);
//! let pending = PendingSubmission::new(story);
//! assert!(pending.id.starts_with("pending-"));
//! ```

pub mod envelope;
pub mod types;
pub mod wire;

pub use envelope::{
    CreateStoryResult, DrainOutcome, LoginResult, RegisterResult, StoryDetail, StoryList,
    SubmitOutcome,
};
pub use types::{
    generate_pending_id, ListOptions, LoadOptions, NewStory, PendingSubmission, Photo, Story,
};
