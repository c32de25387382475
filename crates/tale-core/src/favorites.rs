//! Favorites subsystem layered on the durable store.
//!
//! A favorited story is a story the user wants available offline, so
//! unfavoriting deletes the local copy entirely instead of flipping the
//! flag - the store only ever holds records the user asked to keep.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use tale_store::Store;
use tale_types::Story;

/// Read/write favorite operations over the shared store.
///
/// Store failures degrade to `false`/empty results; they are logged but
/// never surfaced to the caller.
#[derive(Clone)]
pub struct Favorites {
    store: Arc<Mutex<Store>>,
}

impl Favorites {
    pub(crate) fn new(store: Arc<Mutex<Store>>) -> Self {
        Self { store }
    }

    /// Persist a full record with `favorited` set.
    pub async fn mark_record(&self, story: &Story) -> bool {
        let mut record = story.clone();
        record.favorited = true;

        let store = self.store.lock().await;
        match store.put(&record) {
            Ok(saved) => {
                debug!("Marked story {} as favorite", record.id);
                saved
            }
            Err(e) => {
                warn!("Failed to persist favorite {}: {e}", record.id);
                false
            }
        }
    }

    /// Remove a story from the favorites by deleting its local copy.
    ///
    /// Returns whether a record existed to be removed; an unknown id is
    /// not an error.
    pub async fn unmark(&self, id: &str) -> bool {
        let store = self.store.lock().await;
        match store.delete(id) {
            Ok(removed) => removed,
            Err(e) => {
                warn!("Failed to remove favorite {id}: {e}");
                false
            }
        }
    }

    /// List the favorited subset.
    pub async fn list(&self) -> Vec<Story> {
        let store = self.store.lock().await;
        match store.get_favorites() {
            Ok(favorites) => favorites,
            Err(e) => {
                warn!("Failed to list favorites: {e}");
                Vec::new()
            }
        }
    }

    /// Whether the story is favorited, defaulting to `false` when the
    /// record is absent.
    pub async fn is_favorited(&self, id: &str) -> bool {
        let store = self.store.lock().await;
        match store.get(id) {
            Ok(Some(story)) => story.favorited,
            Ok(None) => false,
            Err(e) => {
                warn!("Failed to check favorite status of {id}: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn favorites_over_memory_store() -> Favorites {
        Favorites::new(Arc::new(Mutex::new(Store::open_in_memory().unwrap())))
    }

    fn test_story(id: &str) -> Story {
        Story {
            id: id.to_string(),
            name: "Dina".to_string(),
            description: "harbor at dusk".to_string(),
            photo_url: format!("https://cdn.example/{id}.jpg"),
            lat: None,
            lon: None,
            created_at: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
            favorited: false,
        }
    }

    #[tokio::test]
    async fn test_mark_then_unmark_deletes_record() {
        let favorites = favorites_over_memory_store();
        let story = test_story("s1");

        assert!(favorites.mark_record(&story).await);
        assert!(favorites.is_favorited("s1").await);

        assert!(favorites.unmark("s1").await);

        // Deletion semantics, not a flag flip
        let store = favorites.store.lock().await;
        assert!(store.get("s1").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unmark_absent_id_reports_nothing_removed() {
        let favorites = favorites_over_memory_store();
        assert!(!favorites.unmark("never-seen").await);
    }

    #[tokio::test]
    async fn test_is_favorited_defaults_to_false() {
        let favorites = favorites_over_memory_store();
        assert!(!favorites.is_favorited("unknown").await);
    }

    #[tokio::test]
    async fn test_list_returns_only_favorites() {
        let favorites = favorites_over_memory_store();
        favorites.mark_record(&test_story("fav")).await;
        {
            let store = favorites.store.lock().await;
            store.put(&test_story("plain")).unwrap();
        }

        let listed = favorites.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "fav");
        assert!(listed[0].favorited);
    }

    #[tokio::test]
    async fn test_mark_record_without_id_fails() {
        let favorites = favorites_over_memory_store();
        let mut story = test_story("x");
        story.id = String::new();

        assert!(!favorites.mark_record(&story).await);
    }
}
