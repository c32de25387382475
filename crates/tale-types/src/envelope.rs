//! Normalized result envelopes returned by the gateway and sync engine.
//!
//! Every public operation resolves to one of these structures; transport
//! failures and server rejections are folded into the `error`/`message`
//! pair instead of surfacing as errors to the caller.

use serde::{Deserialize, Serialize};

use crate::types::Story;

/// Result of a story listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryList {
    /// Whether the operation failed.
    pub error: bool,
    /// Human-readable status message.
    pub message: String,
    /// The listed stories; empty on failure.
    pub stories: Vec<Story>,
}

impl StoryList {
    /// Successful listing.
    pub fn ok(message: impl Into<String>, stories: Vec<Story>) -> Self {
        Self {
            error: false,
            message: message.into(),
            stories,
        }
    }

    /// Failed listing with no stories.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            stories: Vec::new(),
        }
    }

    /// Listing served from the local store.
    pub fn from_cache(stories: Vec<Story>) -> Self {
        Self {
            error: false,
            message: "Stories retrieved from cache".to_string(),
            stories,
        }
    }
}

/// Result of a single-story fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryDetail {
    /// Whether the operation failed.
    pub error: bool,
    /// Human-readable status message.
    pub message: String,
    /// The story, when one was found.
    pub story: Option<Story>,
}

impl StoryDetail {
    /// Successful fetch.
    pub fn ok(message: impl Into<String>, story: Story) -> Self {
        Self {
            error: false,
            message: message.into(),
            story: Some(story),
        }
    }

    /// Failed fetch.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            story: None,
        }
    }

    /// The story is known to neither the gateway nor the local store.
    pub fn not_found() -> Self {
        Self::failure("Story not found")
    }

    /// Detail served from the local store.
    pub fn from_cache(story: Story) -> Self {
        Self {
            error: false,
            message: "Story retrieved from cache".to_string(),
            story: Some(story),
        }
    }
}

/// Result of a story creation call against the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStoryResult {
    /// Whether the creation failed.
    pub error: bool,
    /// Human-readable status message.
    pub message: String,
    /// Server-assigned id of the created story, when the backend
    /// reports one.
    pub id: Option<String>,
    /// `true` when the failure was transport-level and the submission
    /// is safe to queue and replay; server rejections are not.
    #[serde(default)]
    pub retriable: bool,
}

impl CreateStoryResult {
    /// Confirmed creation.
    pub fn ok(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            error: false,
            message: message.into(),
            id,
            retriable: false,
        }
    }

    /// Transport-level failure; the submission may be replayed.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            id: None,
            retriable: true,
        }
    }

    /// The backend rejected the submission; replaying cannot succeed.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            id: None,
            retriable: false,
        }
    }
}

/// Outcome of a story submission through the sync engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    /// Whether the submission failed outright.
    pub error: bool,
    /// Human-readable status message.
    pub message: String,
    /// Server-assigned id, when the story reached the backend.
    pub id: Option<String>,
    /// `true` when the story was captured in the pending queue for a
    /// later replay instead of reaching the backend.
    pub queued: bool,
}

impl SubmitOutcome {
    /// The story reached the backend.
    pub fn created(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            error: false,
            message: message.into(),
            id,
            queued: false,
        }
    }

    /// The story was captured offline for a later replay.
    pub fn queued() -> Self {
        Self {
            error: false,
            message: "Story saved offline and will be submitted when online".to_string(),
            id: None,
            queued: true,
        }
    }

    /// The submission failed and was not queued.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            id: None,
            queued: false,
        }
    }
}

/// Per-entry result of a pending-queue drain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrainOutcome {
    /// Id of the pending submission.
    pub id: String,
    /// Whether the replay was confirmed by the backend.
    pub success: bool,
    /// Status message from the replay attempt.
    pub message: String,
}

/// Result of an account registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResult {
    /// Whether the registration failed.
    pub error: bool,
    /// Human-readable status message.
    pub message: String,
}

/// Result of a login call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResult {
    /// Whether the login failed.
    pub error: bool,
    /// Human-readable status message.
    pub message: String,
    /// Bearer token for authenticated calls.
    pub token: Option<String>,
    /// Display name of the logged-in user.
    pub name: Option<String>,
}

impl LoginResult {
    /// Failed login.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            token: None,
            name: None,
        }
    }
}
