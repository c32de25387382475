//! JSON bodies of the story backend.
//!
//! Field names follow the backend's camelCase wire contract; these types
//! exist only to deserialize responses before they are normalized into
//! the envelopes of [`crate::envelope`].

use serde::Deserialize;

use crate::types::Story;

/// Body of `GET /stories`.
#[derive(Debug, Deserialize)]
pub struct ListStoriesBody {
    pub error: bool,
    pub message: String,
    #[serde(rename = "listStory", default)]
    pub list_story: Vec<Story>,
}

/// Body of `GET /stories/{id}`.
#[derive(Debug, Deserialize)]
pub struct StoryDetailBody {
    pub error: bool,
    pub message: String,
    #[serde(default)]
    pub story: Option<Story>,
}

/// Body of `POST /stories` and `POST /stories/guest`.
#[derive(Debug, Deserialize)]
pub struct CreateStoryBody {
    pub error: bool,
    pub message: String,
    /// Present on newer backend versions.
    #[serde(default)]
    pub id: Option<String>,
}

/// Body of `POST /register` and other status-only responses.
#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub error: bool,
    pub message: String,
}

/// Body of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct AuthBody {
    pub error: bool,
    pub message: String,
    #[serde(rename = "loginResult", default)]
    pub login_result: Option<LoginPayload>,
}

/// The `loginResult` object of a successful login.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: String,
    pub token: String,
}
