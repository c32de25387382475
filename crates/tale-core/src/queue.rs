//! Durable queue of story submissions captured while offline.
//!
//! Entries persist in the store's pending table until a replay is
//! confirmed by the backend. Draining is per-entry: one failed replay
//! leaves that entry queued and moves on to the next.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use tale_store::Store;
use tale_types::{DrainOutcome, NewStory, PendingSubmission};

use crate::error::Result;
use crate::events::{EventDispatcher, SyncEvent};
use crate::traits::StoryTransport;

/// Pending-submission queue over the shared store.
pub struct PendingQueue {
    store: Arc<Mutex<Store>>,
    transport: Arc<dyn StoryTransport>,
    events: EventDispatcher,
    /// Serializes drains; a concurrent drain could replay an entry again
    /// before its removal is persisted.
    drain_guard: Mutex<()>,
}

impl PendingQueue {
    pub(crate) fn new(
        store: Arc<Mutex<Store>>,
        transport: Arc<dyn StoryTransport>,
        events: EventDispatcher,
    ) -> Self {
        Self {
            store,
            transport,
            events,
            drain_guard: Mutex::new(()),
        }
    }

    /// Capture a submission with a fresh id and persist it immediately.
    pub async fn enqueue(&self, story: NewStory) -> Result<PendingSubmission> {
        let pending = PendingSubmission::new(story);
        self.store.lock().await.enqueue_pending(&pending)?;

        self.events.send(SyncEvent::StoryQueued {
            pending_id: pending.id.clone(),
        });
        Ok(pending)
    }

    /// List queued submissions in insertion order.
    pub async fn pending(&self) -> Vec<PendingSubmission> {
        match self.store.lock().await.pending_submissions() {
            Ok(pending) => pending,
            Err(e) => {
                warn!("Failed to read pending submissions: {e}");
                Vec::new()
            }
        }
    }

    /// Number of queued submissions.
    pub async fn count(&self) -> u64 {
        match self.store.lock().await.count_pending() {
            Ok(count) => count,
            Err(e) => {
                warn!("Failed to count pending submissions: {e}");
                0
            }
        }
    }

    /// Replay queued submissions against the backend.
    ///
    /// Entries are attempted in insertion order and removed only on a
    /// confirmed creation; a failed entry stays queued for the next
    /// drain without aborting the rest.
    pub async fn drain(&self, token: Option<&str>) -> Vec<DrainOutcome> {
        let _guard = self.drain_guard.lock().await;

        let entries = match self.store.lock().await.pending_submissions() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to read pending submissions for drain: {e}");
                return Vec::new();
            }
        };

        if entries.is_empty() {
            return Vec::new();
        }
        info!("Draining {} pending submission(s)", entries.len());

        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            let result = self.transport.create_story(&entry.story, token).await;

            if result.error {
                warn!("Replay of {} failed: {}", entry.id, result.message);
                results.push(DrainOutcome {
                    id: entry.id,
                    success: false,
                    message: result.message,
                });
                continue;
            }

            if let Err(e) = self.store.lock().await.remove_pending(&entry.id) {
                // The replay reached the backend; keep the outcome but
                // flag that the entry may be retried next drain
                warn!("Replayed {} but could not remove it from the queue: {e}", entry.id);
            }

            self.events.send(SyncEvent::PendingReplayed {
                pending_id: entry.id.clone(),
                id: result.id.clone(),
            });
            results.push(DrainOutcome {
                id: entry.id,
                success: true,
                message: result.message,
            });
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use tale_types::{CreateStoryResult, Photo};

    fn queue_with(transport: MockTransport) -> PendingQueue {
        PendingQueue::new(
            Arc::new(Mutex::new(Store::open_in_memory().unwrap())),
            Arc::new(transport),
            EventDispatcher::default(),
        )
    }

    fn submission(description: &str) -> NewStory {
        NewStory::new(description, Photo::new("p.jpg", vec![1, 2, 3]))
    }

    #[tokio::test]
    async fn test_enqueue_persists_immediately() {
        let queue = queue_with(MockTransport::new());

        let pending = queue.enqueue(submission("first")).await.unwrap();
        assert!(pending.id.starts_with("pending-"));
        assert_eq!(queue.count().await, 1);
    }

    #[tokio::test]
    async fn test_drain_success_empties_queue() {
        let transport = MockTransport::new();
        for _ in 0..3 {
            transport.push_create(CreateStoryResult::ok("created", None));
        }
        let queue = queue_with(transport);

        for i in 0..3 {
            queue.enqueue(submission(&format!("story {i}"))).await.unwrap();
        }

        let results = queue.drain(None).await;
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.success));
        assert_eq!(queue.count().await, 0);
    }

    #[tokio::test]
    async fn test_drain_keeps_failed_subset_in_order() {
        let transport = MockTransport::new();
        transport.push_create(CreateStoryResult::ok("created", Some("s1".into())));
        transport.push_create(CreateStoryResult::transport("connection reset"));
        transport.push_create(CreateStoryResult::ok("created", Some("s3".into())));
        transport.push_create(CreateStoryResult::transport("connection reset"));
        let queue = queue_with(transport);

        let mut ids = Vec::new();
        for i in 0..4 {
            ids.push(queue.enqueue(submission(&format!("story {i}"))).await.unwrap().id);
        }

        let results = queue.drain(None).await;
        assert_eq!(
            results.iter().map(|r| r.success).collect::<Vec<_>>(),
            [true, false, true, false]
        );

        // Exactly the failed entries remain, in their original order
        let remaining: Vec<String> = queue.pending().await.into_iter().map(|p| p.id).collect();
        assert_eq!(remaining, [ids[1].clone(), ids[3].clone()]);
    }

    #[tokio::test]
    async fn test_drain_empty_queue_is_a_no_op() {
        let queue = queue_with(MockTransport::new());
        assert!(queue.drain(None).await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_entries_survive_for_next_drain() {
        let transport = MockTransport::new();
        // First drain: replay fails (default response is a transport failure)
        let queue = queue_with(transport);
        queue.enqueue(submission("stubborn")).await.unwrap();

        let first = queue.drain(None).await;
        assert!(!first[0].success);
        assert_eq!(queue.count().await, 1);
    }
}
