//! Core data types for stories and submissions.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A story as held by the client.
///
/// Mirrors the backend record plus the client-only [`favorited`] flag.
/// The flag never appears in server payloads, so deserializing a fresh
/// gateway record defaults it to `false`.
///
/// [`favorited`]: Story::favorited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Server-assigned unique identifier.
    pub id: String,
    /// Display name of the author.
    pub name: String,
    /// Story text.
    pub description: String,
    /// URL of the uploaded photo.
    pub photo_url: String,
    /// Latitude of the story location, if shared.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude of the story location, if shared.
    #[serde(default)]
    pub lon: Option<f64>,
    /// When the story was created on the server.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Client-only flag marking the story for offline availability.
    #[serde(default)]
    pub favorited: bool,
}

/// Photo bytes plus the file name used for the multipart upload.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// File name reported to the backend (e.g. `shot.jpg`).
    pub file_name: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

impl Photo {
    /// Create a photo from a file name and raw bytes.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

impl std::fmt::Debug for Photo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Photo")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// A not-yet-submitted story creation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStory {
    /// Story text.
    pub description: String,
    /// Photo to upload.
    pub photo: Photo,
    /// Latitude of the story location, if shared.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude of the story location, if shared.
    #[serde(default)]
    pub lon: Option<f64>,
}

impl NewStory {
    /// Create a submission payload without a location.
    pub fn new(description: impl Into<String>, photo: Photo) -> Self {
        Self {
            description: description.into(),
            photo,
            lat: None,
            lon: None,
        }
    }

    /// Attach a location to the payload.
    pub fn with_location(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }
}

/// A story creation captured while the gateway was unreachable.
///
/// Entries survive process restarts and are removed only once a replay
/// is confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSubmission {
    /// Locally generated, time-derived identifier.
    pub id: String,
    /// The captured creation payload.
    pub story: NewStory,
    /// When the submission was queued.
    #[serde(with = "time::serde::rfc3339")]
    pub queued_at: OffsetDateTime,
}

impl PendingSubmission {
    /// Capture a payload with a freshly generated id and timestamp.
    pub fn new(story: NewStory) -> Self {
        let queued_at = OffsetDateTime::now_utc();
        Self {
            id: generate_pending_id(queued_at),
            story,
            queued_at,
        }
    }
}

/// Generate a unique pending-submission id.
///
/// Time-derived for readable ordering in logs; the UUID suffix keeps ids
/// unique when several submissions land in the same millisecond.
pub fn generate_pending_id(at: OffsetDateTime) -> String {
    let millis = at.unix_timestamp_nanos() / 1_000_000;
    format!("pending-{}-{}", millis, Uuid::new_v4().simple())
}

/// Options for a gateway story listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListOptions {
    /// 1-based page number.
    pub page: u32,
    /// Number of stories per page.
    pub page_size: u32,
    /// Restrict the listing to stories that carry a location.
    pub with_location_only: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            with_location_only: false,
        }
    }
}

impl ListOptions {
    /// Start from defaults (page 1, ten per page, all stories).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the 1-based page number.
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the page size.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Only list stories that carry a location.
    pub fn location_only(mut self) -> Self {
        self.with_location_only = true;
        self
    }
}

/// Options for a sync-engine story load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOptions {
    /// Restrict the listing to stories that carry a location.
    pub location_only: bool,
    /// Always hit the gateway and surface its failure instead of
    /// falling back to the local store.
    pub force_refresh: bool,
    /// 1-based page number; `None` uses the gateway default.
    pub page: Option<u32>,
    /// Page size; `None` uses the gateway default.
    pub page_size: Option<u32>,
}

impl LoadOptions {
    /// Plain load: gateway first, local store on failure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only load stories that carry a location.
    pub fn location_only(mut self) -> Self {
        self.location_only = true;
        self
    }

    /// Force a refresh from the gateway.
    pub fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }

    /// Request a specific page.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Request a specific page size.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Gateway listing options equivalent to these load options.
    pub fn to_list_options(&self) -> ListOptions {
        let defaults = ListOptions::default();
        ListOptions {
            page: self.page.unwrap_or(defaults.page),
            page_size: self.page_size.unwrap_or(defaults.page_size),
            with_location_only: self.location_only,
        }
    }
}
