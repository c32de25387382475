//! Sync/reconciliation engine.
//!
//! The engine is the single entry point UI collaborators talk to. Reads
//! are gateway-first with a local-store fallback; fresh records are
//! reconciled with locally-known favorite flags before they are returned
//! or persisted; creations that cannot reach the backend land in the
//! pending queue instead of failing.
//!
//! The server is the source of truth for story content, the device is
//! the source of truth for favorite status.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use tale_store::Store;
use tale_types::{
    DrainOutcome, LoadOptions, NewStory, Story, StoryDetail, StoryList, SubmitOutcome,
};

use crate::events::{EventDispatcher, EventReceiver, SyncEvent};
use crate::favorites::Favorites;
use crate::queue::PendingQueue;
use crate::traits::{ConnectivityProbe, CredentialProvider, StoryTransport};

/// Orchestrates the gateway, local store, favorites, and pending queue.
///
/// Constructed explicitly with its collaborators; the engine holds the
/// only handle that writes reconciled favorite flags to the store.
pub struct SyncEngine {
    store: Arc<Mutex<Store>>,
    transport: Arc<dyn StoryTransport>,
    credentials: Arc<dyn CredentialProvider>,
    connectivity: Arc<dyn ConnectivityProbe>,
    favorites: Favorites,
    queue: PendingQueue,
    events: EventDispatcher,
}

impl SyncEngine {
    /// Create an engine over the given store and collaborators.
    pub fn new(
        store: Store,
        transport: Arc<dyn StoryTransport>,
        credentials: Arc<dyn CredentialProvider>,
        connectivity: Arc<dyn ConnectivityProbe>,
    ) -> Self {
        let store = Arc::new(Mutex::new(store));
        let events = EventDispatcher::default();
        let favorites = Favorites::new(Arc::clone(&store));
        let queue = PendingQueue::new(Arc::clone(&store), Arc::clone(&transport), events.clone());

        Self {
            store,
            transport,
            credentials,
            connectivity,
            favorites,
            queue,
            events,
        }
    }

    /// Subscribe to sync events (creations, queueing, replays).
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    /// The pending-submission queue.
    pub fn queue(&self) -> &PendingQueue {
        &self.queue
    }

    /// The favorites subsystem.
    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    fn token(&self) -> Option<String> {
        self.credentials.token()
    }

    /// Load stories, gateway-first.
    ///
    /// On gateway success the fresh records win except for the
    /// `favorited` flag, which is overlaid from the store; only the
    /// favorited subset is persisted so read-only browsing never grows
    /// the store. On gateway failure the full local snapshot is returned
    /// as a cache-tagged success - an empty store yields an empty list,
    /// never an error. A forced refresh surfaces the gateway failure
    /// instead of falling back.
    pub async fn load_stories(&self, options: &LoadOptions) -> StoryList {
        let token = self.token();
        let response = self
            .transport
            .list_stories(&options.to_list_options(), token.as_deref())
            .await;

        if response.error {
            if options.force_refresh {
                warn!("Forced refresh failed: {}", response.message);
                return StoryList::failure(response.message);
            }

            debug!(
                "Gateway listing failed ({}), serving local snapshot",
                response.message
            );
            let cached = match self.store.lock().await.get_all() {
                Ok(stories) => stories,
                Err(e) => {
                    warn!("Local fallback read failed: {e}");
                    Vec::new()
                }
            };
            return StoryList::from_cache(cached);
        }

        let stories = self.reconcile_favorites(response.stories).await;
        self.persist_favorited(&stories).await;

        StoryList::ok(response.message, stories)
    }

    /// Load a single story, gateway-first.
    ///
    /// A fetched record is only persisted when it is favorited. On
    /// gateway failure a locally-held copy is returned as cache-tagged
    /// success; a miss on both sides is the distinct not-found result.
    pub async fn load_story_detail(&self, id: &str) -> StoryDetail {
        let token = self.token();
        let response = self.transport.get_story(id, token.as_deref()).await;

        if !response.error {
            if let Some(mut story) = response.story {
                story.favorited = self.favorites.is_favorited(id).await;

                if story.favorited {
                    if let Err(e) = self.store.lock().await.put(&story) {
                        warn!("Failed to refresh favorited record {id}: {e}");
                    }
                }
                return StoryDetail::ok(response.message, story);
            }
        }

        debug!(
            "Gateway detail for {id} unavailable ({}), checking local store",
            response.message
        );
        let cached = match self.store.lock().await.get(id) {
            Ok(cached) => cached,
            Err(e) => {
                warn!("Local detail read for {id} failed: {e}");
                None
            }
        };

        match cached {
            Some(story) => StoryDetail::from_cache(story),
            None => StoryDetail::not_found(),
        }
    }

    /// Submit a story.
    ///
    /// An offline device or a transport-level failure routes the
    /// submission into the pending queue and reports success-with-caveat;
    /// a submission must never be lost to transient connectivity. A
    /// rejection from the backend is surfaced as-is.
    pub async fn submit_story(&self, story: NewStory) -> SubmitOutcome {
        if !self.connectivity.is_online() {
            info!("Device offline, queueing story submission");
            return self.queue_submission(story).await;
        }

        let token = self.token();
        let result = self.transport.create_story(&story, token.as_deref()).await;

        if !result.error {
            self.events.send(SyncEvent::StoryCreated {
                id: result.id.clone(),
            });
            return SubmitOutcome::created(result.message, result.id);
        }

        if result.retriable {
            warn!(
                "Story creation failed in transit ({}), queueing for replay",
                result.message
            );
            return self.queue_submission(story).await;
        }

        SubmitOutcome::failure(result.message)
    }

    /// Replay pending submissions against the backend.
    pub async fn drain_pending(&self) -> Vec<DrainOutcome> {
        let token = self.token();
        self.queue.drain(token.as_deref()).await
    }

    /// Mark a story as favorite by id, fetching the record through the
    /// detail path when it is not held locally.
    pub async fn mark_favorite_by_id(&self, id: &str) -> bool {
        {
            let store = self.store.lock().await;
            match store.set_favorited(id, true) {
                Ok(true) => return true,
                Ok(false) => {} // not held locally yet
                Err(e) => {
                    warn!("Failed to favorite {id}: {e}");
                    return false;
                }
            }
        }

        let detail = self.load_story_detail(id).await;
        match detail.story {
            Some(story) => self.favorites.mark_record(&story).await,
            None => {
                warn!("Cannot favorite {id}: {}", detail.message);
                false
            }
        }
    }

    /// Mark an already-loaded record as favorite.
    pub async fn mark_favorite_record(&self, story: &Story) -> bool {
        self.favorites.mark_record(story).await
    }

    /// Remove a story from the favorites, deleting its local copy.
    pub async fn unmark_favorite(&self, id: &str) -> bool {
        self.favorites.unmark(id).await
    }

    /// List favorited stories.
    pub async fn list_favorites(&self) -> Vec<Story> {
        self.favorites.list().await
    }

    /// Whether a story is favorited.
    pub async fn is_favorited(&self, id: &str) -> bool {
        self.favorites.is_favorited(id).await
    }

    /// Overlay locally-known favorite flags onto freshly fetched records.
    async fn reconcile_favorites(&self, fresh: Vec<Story>) -> Vec<Story> {
        let favorited_ids: HashSet<String> = {
            let store = self.store.lock().await;
            match store.get_all() {
                Ok(existing) => existing
                    .into_iter()
                    .filter(|s| s.favorited)
                    .map(|s| s.id)
                    .collect(),
                Err(e) => {
                    warn!("Could not read local favorite flags: {e}");
                    HashSet::new()
                }
            }
        };

        fresh
            .into_iter()
            .map(|mut story| {
                story.favorited = favorited_ids.contains(&story.id);
                story
            })
            .collect()
    }

    /// Persist the favorited subset of reconciled records.
    async fn persist_favorited(&self, stories: &[Story]) {
        let favorited: Vec<Story> = stories.iter().filter(|s| s.favorited).cloned().collect();
        if favorited.is_empty() {
            return;
        }

        debug!("Refreshing {} favorited record(s)", favorited.len());
        if let Err(e) = self.store.lock().await.put_all(&favorited) {
            warn!("Failed to refresh favorited records: {e}");
        }
    }

    async fn queue_submission(&self, story: NewStory) -> SubmitOutcome {
        match self.queue.enqueue(story).await {
            Ok(_) => SubmitOutcome::queued(),
            Err(e) => {
                warn!("Failed to queue story locally: {e}");
                SubmitOutcome::failure("Could not save the story for later submission")
            }
        }
    }
}
