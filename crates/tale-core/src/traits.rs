//! Collaborator seams for the sync engine.
//!
//! The engine never reads ambient state: the bearer token and the
//! connectivity signal are supplied by injected collaborators, and the
//! network surface sits behind [`StoryTransport`] so tests and generic
//! code can swap the HTTP gateway for a mock.

use async_trait::async_trait;

use tale_types::{CreateStoryResult, ListOptions, NewStory, StoryDetail, StoryList};

/// Network surface of the story backend.
///
/// Implementations catch transport failures and fold them into the
/// returned envelopes; they never panic and never surface raw transport
/// errors to callers.
#[async_trait]
pub trait StoryTransport: Send + Sync {
    /// List stories.
    async fn list_stories(&self, options: &ListOptions, token: Option<&str>) -> StoryList;

    /// Fetch a single story by id.
    async fn get_story(&self, id: &str, token: Option<&str>) -> StoryDetail;

    /// Submit a new story.
    async fn create_story(&self, story: &NewStory, token: Option<&str>) -> CreateStoryResult;
}

/// Supplies the optional bearer token for backend calls.
///
/// `None` means anonymous mode; reads proceed unauthenticated and
/// creations go to the guest endpoint.
pub trait CredentialProvider: Send + Sync {
    /// The current token, polled at call time.
    fn token(&self) -> Option<String>;
}

/// Reports whether the device currently has connectivity.
///
/// Polled at call time when a creation is routed; an offline report
/// sends the submission to the pending queue instead of the gateway.
pub trait ConnectivityProbe: Send + Sync {
    /// Whether the device is online.
    fn is_online(&self) -> bool;
}

/// Fixed credentials supplied at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    token: Option<String>,
}

impl StaticCredentials {
    /// Use the given token for every call.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Anonymous mode.
    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

impl CredentialProvider for StaticCredentials {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Probe that always reports the device online.
///
/// Suitable for environments without a connectivity signal; transport
/// failures still route creations to the pending queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl ConnectivityProbe for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}
