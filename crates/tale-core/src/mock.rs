//! Mock transport implementation for testing.
//!
//! This module provides a scripted [`StoryTransport`] that can be used
//! for unit testing without a reachable backend. The mock implements the
//! same trait as the HTTP [`Gateway`](crate::Gateway), allowing it to be
//! used interchangeably in generic code.
//!
//! Responses are queued per operation and popped in call order; when a
//! queue runs dry the mock behaves like an unreachable backend and
//! returns the standard transport-failure envelope.
//!
//! # Example
//!
//! ```
//! use tale_core::mock::MockTransport;
//! use tale_core::StoryTransport;
//! use tale_types::{ListOptions, StoryList};
//!
//! #[tokio::main]
//! async fn main() {
//!     let transport = MockTransport::new();
//!     transport.push_list(StoryList::ok("Stories fetched successfully", vec![]));
//!
//!     let first = transport.list_stories(&ListOptions::new(), None).await;
//!     assert!(!first.error);
//!
//!     // Scripted responses exhausted: behaves unreachable
//!     let second = transport.list_stories(&ListOptions::new(), None).await;
//!     assert!(second.error);
//! }
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use tale_types::{CreateStoryResult, ListOptions, NewStory, StoryDetail, StoryList};

use crate::traits::{ConnectivityProbe, StoryTransport};

/// A scripted story transport for tests.
#[derive(Default)]
pub struct MockTransport {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    list_responses: VecDeque<StoryList>,
    detail_responses: VecDeque<StoryDetail>,
    create_responses: VecDeque<CreateStoryResult>,
    create_calls: Vec<String>,
    list_calls: u32,
    detail_calls: Vec<String>,
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().unwrap();
        f.debug_struct("MockTransport")
            .field("list_calls", &inner.list_calls)
            .field("detail_calls", &inner.detail_calls.len())
            .field("create_calls", &inner.create_calls.len())
            .finish()
    }
}

impl MockTransport {
    /// Create a mock with no scripted responses (every call fails like
    /// an unreachable backend).
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a listing response.
    pub fn push_list(&self, response: StoryList) {
        self.inner.lock().unwrap().list_responses.push_back(response);
    }

    /// Queue a detail response.
    pub fn push_detail(&self, response: StoryDetail) {
        self.inner
            .lock()
            .unwrap()
            .detail_responses
            .push_back(response);
    }

    /// Queue a creation response.
    pub fn push_create(&self, response: CreateStoryResult) {
        self.inner
            .lock()
            .unwrap()
            .create_responses
            .push_back(response);
    }

    /// Descriptions of submitted stories, in call order.
    pub fn create_calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().create_calls.clone()
    }

    /// Number of listing calls made.
    pub fn list_calls(&self) -> u32 {
        self.inner.lock().unwrap().list_calls
    }

    /// Ids requested through the detail path, in call order.
    pub fn detail_calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().detail_calls.clone()
    }

    fn unreachable_message() -> String {
        "Network error: backend unreachable".to_string()
    }
}

#[async_trait]
impl StoryTransport for MockTransport {
    async fn list_stories(&self, _options: &ListOptions, _token: Option<&str>) -> StoryList {
        let mut inner = self.inner.lock().unwrap();
        inner.list_calls += 1;
        inner
            .list_responses
            .pop_front()
            .unwrap_or_else(|| StoryList::failure(Self::unreachable_message()))
    }

    async fn get_story(&self, id: &str, _token: Option<&str>) -> StoryDetail {
        let mut inner = self.inner.lock().unwrap();
        inner.detail_calls.push(id.to_string());
        inner
            .detail_responses
            .pop_front()
            .unwrap_or_else(|| StoryDetail::failure(Self::unreachable_message()))
    }

    async fn create_story(&self, story: &NewStory, _token: Option<&str>) -> CreateStoryResult {
        let mut inner = self.inner.lock().unwrap();
        inner.create_calls.push(story.description.clone());
        inner
            .create_responses
            .pop_front()
            .unwrap_or_else(|| CreateStoryResult::transport(Self::unreachable_message()))
    }
}

/// A toggleable connectivity probe for tests.
#[derive(Debug)]
pub struct MockConnectivity {
    online: AtomicBool,
}

impl MockConnectivity {
    /// Probe that starts online.
    pub fn online() -> Self {
        Self {
            online: AtomicBool::new(true),
        }
    }

    /// Probe that starts offline.
    pub fn offline() -> Self {
        Self {
            online: AtomicBool::new(false),
        }
    }

    /// Flip the connectivity state.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Relaxed);
    }
}

impl ConnectivityProbe for MockConnectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }
}
