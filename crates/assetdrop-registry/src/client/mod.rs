//! Release client for one `owner/repo`.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.

use std::path::Path;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::auth::TokenProvider;
use crate::error::{RegistryError, RegistryResult};
use crate::types::{RegistryConfig, Release, ReleaseAsset, UploadResponse};

mod helpers;
mod http;

use helpers::endpoint;
use http::HttpBackend;

/// User-Agent sent with every request.
pub const REGISTRY_USER_AGENT: &str = concat!("assetdrop/", env!("CARGO_PKG_VERSION"));

/// Release client bound to a single repository.
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    http: HttpBackend,
}

impl ReleaseClient {
    pub fn new(config: RegistryConfig) -> RegistryResult<Self> {
        let token_provider = config
            .token
            .as_ref()
            .map(TokenProvider::static_token)
            .unwrap_or_default();

        Self::with_token_provider(config, token_provider)
    }

    fn with_token_provider(
        config: RegistryConfig,
        token_provider: TokenProvider,
    ) -> RegistryResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(REGISTRY_USER_AGENT));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| RegistryError::Network {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http: HttpBackend {
                client,
                token_provider,
                config,
            },
        })
    }

    /// Look up the release a tag points at.
    pub async fn get_release_by_tag(&self, tag: &str) -> RegistryResult<Release> {
        let url = self.api_url(&["releases", "tags", tag])?;
        debug!(url = %url, "fetching release by tag");

        self.http
            .get_json(url, &format!("release for tag '{}'", tag))
            .await
    }

    /// Upload `path` as an asset called `name`. One request, no retries.
    pub async fn upload_asset(
        &self,
        release_id: u64,
        name: &str,
        path: &Path,
    ) -> RegistryResult<UploadResponse> {
        let config = &self.http.config;
        let release_id = release_id.to_string();
        let mut url = endpoint(
            &config.upload_url,
            &[
                "repos",
                &config.owner,
                &config.repo,
                "releases",
                &release_id,
                "assets",
            ],
        )?;
        url.query_pairs_mut().append_pair("name", name);
        debug!(url = %url, asset = name, "uploading asset");

        self.http.upload(url, path).await
    }

    /// Delete an asset by id. Succeeds only on 204.
    pub async fn delete_asset(&self, asset_id: u64) -> RegistryResult<()> {
        let url = self.api_url(&["releases", "assets", &asset_id.to_string()])?;
        debug!(url = %url, asset_id, "deleting asset");

        self.http.delete(url, &format!("asset {}", asset_id)).await
    }

    /// List the assets currently attached to a release (first 100).
    pub async fn list_assets(&self, release_id: u64) -> RegistryResult<Vec<ReleaseAsset>> {
        let mut url = self.api_url(&["releases", &release_id.to_string(), "assets"])?;
        url.query_pairs_mut().append_pair("per_page", "100");
        debug!(url = %url, "listing release assets");

        self.http
            .get_json(url, &format!("assets of release {}", release_id))
            .await
    }

    pub fn owner(&self) -> &str {
        &self.http.config.owner
    }

    pub fn repo(&self) -> &str {
        &self.http.config.repo
    }

    pub fn is_authenticated(&self) -> bool {
        self.http.token_provider.is_authenticated()
    }

    fn api_url(&self, tail: &[&str]) -> RegistryResult<reqwest::Url> {
        let config = &self.http.config;
        let mut segments = vec!["repos", config.owner.as_str(), config.repo.as_str()];
        segments.extend_from_slice(tail);
        endpoint(&config.api_url, &segments)
    }
}
