//! End-to-end tests of the sync core over a durable store.
//!
//! These tests exercise whole offline/online cycles across simulated
//! process restarts: every "restart" reopens the same database file with
//! a fresh engine.

use std::path::Path;
use std::sync::Arc;

use tale_core::mock::{MockConnectivity, MockTransport};
use tale_core::{ConnectivityProbe, StaticCredentials, StoryTransport, SyncEngine};
use tale_store::Store;
use tale_types::{CreateStoryResult, LoadOptions, NewStory, Photo, Story, StoryList};
use time::OffsetDateTime;

fn server_story(id: &str, description: &str) -> Story {
    Story {
        id: id.to_string(),
        name: "Dina".to_string(),
        description: description.to_string(),
        photo_url: format!("https://cdn.example/{id}.jpg"),
        lat: Some(-6.2),
        lon: Some(106.8),
        created_at: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
        favorited: false,
    }
}

fn submission(description: &str) -> NewStory {
    NewStory::new(description, Photo::new("p.jpg", vec![0xFF, 0xD8]))
}

fn engine_at(
    path: &Path,
    transport: &Arc<MockTransport>,
    connectivity: &Arc<MockConnectivity>,
) -> SyncEngine {
    SyncEngine::new(
        Store::open(path).unwrap(),
        Arc::clone(transport) as Arc<dyn StoryTransport>,
        Arc::new(StaticCredentials::anonymous()),
        Arc::clone(connectivity) as Arc<dyn ConnectivityProbe>,
    )
}

#[tokio::test]
async fn offline_submissions_survive_restart_and_replay() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tale.db");
    let transport = Arc::new(MockTransport::new());
    let connectivity = Arc::new(MockConnectivity::offline());

    // Session one: offline, two submissions end up queued
    {
        let engine = engine_at(&path, &transport, &connectivity);
        let first = engine.submit_story(submission("first offline")).await;
        let second = engine.submit_story(submission("second offline")).await;
        assert!(first.queued && second.queued);
        assert_eq!(engine.queue().count().await, 2);
    }

    // Session two: back online, the queue drains in order
    connectivity.set_online(true);
    transport.push_create(CreateStoryResult::ok("created", Some("a".into())));
    transport.push_create(CreateStoryResult::ok("created", Some("b".into())));

    let engine = engine_at(&path, &transport, &connectivity);
    let results = engine.drain_pending().await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.success));
    assert_eq!(engine.queue().count().await, 0);
    assert_eq!(transport.create_calls(), ["first offline", "second offline"]);
}

#[tokio::test]
async fn favorites_survive_restart_and_win_reconciliation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tale.db");
    let transport = Arc::new(MockTransport::new());
    let connectivity = Arc::new(MockConnectivity::online());

    // Session one: favorite a record fetched through the detail path
    {
        transport.push_detail(tale_types::StoryDetail::ok(
            "Story fetched successfully",
            server_story("keep", "original text"),
        ));
        let engine = engine_at(&path, &transport, &connectivity);
        assert!(engine.mark_favorite_by_id("keep").await);
    }

    // Session two: a listing returns an edited copy of the same story
    transport.push_list(StoryList::ok(
        "Stories fetched successfully",
        vec![
            server_story("keep", "edited on the server"),
            server_story("other", "not kept"),
        ],
    ));

    let engine = engine_at(&path, &transport, &connectivity);
    let listing = engine.load_stories(&LoadOptions::new()).await;

    let kept = listing.stories.iter().find(|s| s.id == "keep").unwrap();
    assert!(kept.favorited);
    assert_eq!(kept.description, "edited on the server");
    assert!(!listing.stories.iter().any(|s| s.id == "other" && s.favorited));

    // The favorites list reflects the refreshed content
    let favorites = engine.list_favorites().await;
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].description, "edited on the server");
}

#[tokio::test]
async fn unfavorited_records_disappear_from_offline_reads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tale.db");
    let transport = Arc::new(MockTransport::new());
    let connectivity = Arc::new(MockConnectivity::online());

    {
        let engine = engine_at(&path, &transport, &connectivity);
        engine
            .mark_favorite_record(&server_story("gone", "kept briefly"))
            .await;
        assert!(engine.unmark_favorite("gone").await);
    }

    // Offline read after restart: the deleted record is really gone
    let engine = engine_at(&path, &transport, &connectivity);
    let listing = engine.load_stories(&LoadOptions::new()).await;
    assert!(listing.message.contains("from cache"));
    assert!(listing.stories.is_empty());

    let detail = engine.load_story_detail("gone").await;
    assert!(detail.error);
    assert_eq!(detail.message, "Story not found");
}
