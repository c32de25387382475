//! HTTP client for the story backend REST API.
//!
//! This module provides the remote half of the sync core: listing and
//! fetching stories, submitting creations, and the account calls. Every
//! method resolves to a normalized envelope; transport failures, parse
//! failures, and server rejections are all folded into the
//! `error`/`message` pair so callers never see a raw [`reqwest::Error`].
//!
//! # Example
//!
//! ```no_run
//! use tale_core::Gateway;
//! use tale_core::StoryTransport;
//! use tale_types::ListOptions;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Gateway::new("https://story-api.dicoding.dev/v1")?;
//!
//! // Anonymous reads are permitted
//! let listing = gateway.list_stories(&ListOptions::new(), None).await;
//! println!("{} stories", listing.stories.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use tracing::{debug, warn};

use tale_types::wire::{AuthBody, CreateStoryBody, ListStoriesBody, StatusBody, StoryDetailBody};
use tale_types::{
    CreateStoryResult, ListOptions, LoginResult, NewStory, RegisterResult, StoryDetail, StoryList,
};

use crate::error::{Error, Result};
use crate::traits::StoryTransport;

/// Default request timeout.
///
/// Calls that outlive it resolve to the standard failure envelope.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP gateway to the story backend.
#[derive(Debug, Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
}

impl Gateway {
    /// Create a gateway with the default timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the backend
    ///   (e.g., "https://story-api.dicoding.dev/v1")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a gateway with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        // Normalize URL (remove trailing slash)
        let base_url = base_url.trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::InvalidBaseUrl(format!(
                "URL must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Register a new account.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> RegisterResult {
        let url = format!("{}/register", self.base_url);
        let body = serde_json::json!({
            "name": name,
            "email": email,
            "password": password,
        });

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Registration request failed: {e}");
                return RegisterResult {
                    error: true,
                    message: format!("Network error: {e}"),
                };
            }
        };

        match response.json::<StatusBody>().await {
            Ok(body) => RegisterResult {
                error: body.error,
                message: body.message,
            },
            Err(e) => RegisterResult {
                error: true,
                message: format!("Unexpected response from the story service: {e}"),
            },
        }
    }

    /// Log in and obtain a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> LoginResult {
        let url = format!("{}/login", self.base_url);
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Login request failed: {e}");
                return LoginResult::failure(format!("Network error: {e}"));
            }
        };

        match response.json::<AuthBody>().await {
            Ok(body) => LoginResult {
                error: body.error,
                message: body.message,
                token: body.login_result.as_ref().map(|l| l.token.clone()),
                name: body.login_result.map(|l| l.name),
            },
            Err(e) => LoginResult::failure(format!("Unexpected response from the story service: {e}")),
        }
    }

    /// Attach the bearer token when one is present; anonymous calls
    /// proceed without an Authorization header.
    fn authorize(&self, request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl StoryTransport for Gateway {
    async fn list_stories(&self, options: &ListOptions, token: Option<&str>) -> StoryList {
        let url = format!("{}/stories", self.base_url);
        let location: u32 = if options.with_location_only { 1 } else { 0 };

        debug!(
            "Listing stories (page {}, size {}, location {})",
            options.page, options.page_size, location
        );

        let request = self.authorize(
            self.client.get(&url).query(&[
                ("page", options.page),
                ("size", options.page_size),
                ("location", location),
            ]),
            token,
        );

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Story listing failed: {e}");
                return StoryList::failure(format!("Network error: {e}"));
            }
        };

        match response.json::<ListStoriesBody>().await {
            Ok(body) => StoryList {
                error: body.error,
                message: body.message,
                stories: body.list_story,
            },
            Err(e) => StoryList::failure(format!("Unexpected response from the story service: {e}")),
        }
    }

    async fn get_story(&self, id: &str, token: Option<&str>) -> StoryDetail {
        let url = format!("{}/stories/{}", self.base_url, id);

        let request = self.authorize(self.client.get(&url), token);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Story detail fetch for {id} failed: {e}");
                return StoryDetail::failure(format!("Network error: {e}"));
            }
        };

        match response.json::<StoryDetailBody>().await {
            Ok(body) => match (body.error, body.story) {
                (false, Some(story)) => StoryDetail::ok(body.message, story),
                // The backend reports unknown ids with an error body
                _ => StoryDetail::failure(body.message),
            },
            Err(e) => StoryDetail::failure(format!("Unexpected response from the story service: {e}")),
        }
    }

    async fn create_story(&self, story: &NewStory, token: Option<&str>) -> CreateStoryResult {
        // Authenticated submissions go to /stories, anonymous to /stories/guest
        let url = match token {
            Some(_) => format!("{}/stories", self.base_url),
            None => format!("{}/stories/guest", self.base_url),
        };

        let mut form = Form::new()
            .text("description", story.description.clone())
            .part(
                "photo",
                Part::bytes(story.photo.bytes.clone()).file_name(story.photo.file_name.clone()),
            );
        if let Some(lat) = story.lat {
            form = form.text("lat", lat.to_string());
        }
        if let Some(lon) = story.lon {
            form = form.text("lon", lon.to_string());
        }

        let request = self.authorize(self.client.post(&url), token).multipart(form);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Story creation failed in transit: {e}");
                return CreateStoryResult::transport(format!("Network error: {e}"));
            }
        };

        match response.json::<CreateStoryBody>().await {
            Ok(body) => {
                if body.error {
                    // The submission reached the backend and was refused;
                    // replaying it cannot succeed
                    CreateStoryResult::rejected(body.message)
                } else {
                    CreateStoryResult::ok(body.message, body.id)
                }
            }
            Err(e) => CreateStoryResult::transport(format!(
                "Unexpected response from the story service: {e}"
            )),
        }
    }
}
