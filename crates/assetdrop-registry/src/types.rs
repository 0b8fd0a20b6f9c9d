//! API response types for the release registry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A release as returned by `GET /repos/{owner}/{repo}/releases/tags/{tag}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    /// Release ID.
    pub id: u64,

    /// Display name. GitHub returns `null` for releases created without one.
    #[serde(default)]
    pub name: Option<String>,

    /// Tag the release points at.
    pub tag_name: String,

    /// Assets attached to the release at lookup time.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl Release {
    /// Human-readable name, falling back to the tag.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.tag_name)
    }
}

/// A binary asset attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    /// Asset ID assigned by the registry.
    pub id: u64,

    /// File name of the asset.
    pub name: String,

    /// Size in bytes.
    #[serde(default)]
    pub size: u64,

    /// Upload state (`uploaded`, `open`, ...).
    #[serde(default)]
    pub state: Option<String>,
}

/// Outcome of an upload request (exact status parity: only 201 creates).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResponse {
    /// 201 Created.
    Created(ReleaseAsset),

    /// 422: an asset with the same name already exists.
    AlreadyExists,

    /// 403: token lacks permission to upload.
    Forbidden,

    /// Any other status.
    Unexpected { status: u16 },
}

/// Registry configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Base URL for the REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL for asset uploads.
    #[serde(default = "default_upload_url")]
    pub upload_url: String,

    /// Repository owner (user or organisation).
    pub owner: String,

    /// Repository name without the owner segment.
    pub repo: String,

    /// Authentication token.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_upload_url() -> String {
    "https://uploads.github.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("api_url", &self.api_url)
            .field("upload_url", &self.upload_url)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl RegistryConfig {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            api_url: default_api_url(),
            upload_url: default_upload_url(),
            owner: owner.into(),
            repo: repo.into(),
            token: None,
            timeout_secs: default_timeout(),
        }
    }

    /// Set the token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set both the API and the upload base URL (mock servers, GHES).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.upload_url = url.clone();
        self.api_url = url;
        self
    }

    /// Set the API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the upload base URL.
    pub fn with_upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
