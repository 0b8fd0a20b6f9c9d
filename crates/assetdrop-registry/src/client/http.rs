//! HTTP layer: request building, status mapping, UploadResponse.
//!
//! This is the ONLY place for status code handling. client/mod.rs never
//! interprets status codes. No retries happen here: every call is exactly one
//! request, callers decide whether to try again.

use std::path::Path;

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use crate::auth::TokenProvider;
use crate::error::{RegistryError, RegistryResult};
use crate::types::{RegistryConfig, ReleaseAsset, UploadResponse};

/// HTTP backend for making requests (holds reqwest client, auth, config).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) token_provider: TokenProvider,
    pub(crate) config: RegistryConfig,
}

impl HttpBackend {
    /// GET a JSON document; 2xx => parsed body, everything else => error.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        what: &str,
    ) -> RegistryResult<T> {
        let response = self.authorized(reqwest::Method::GET, url).send().await?;
        let response = Self::expect_success(response, what).await?;

        response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse {
                message: format!("failed to parse {}: {}", what, e),
            })
    }

    /// Stream a local file as the request body; maps 201/422/403 explicitly.
    pub(crate) async fn upload(&self, url: Url, path: &Path) -> RegistryResult<UploadResponse> {
        let io_err = |e: std::io::Error| RegistryError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        };
        let file = tokio::fs::File::open(path).await.map_err(io_err)?;
        let len = file.metadata().await.map_err(io_err)?.len();
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));

        let response = self
            .authorized(reqwest::Method::POST, url)
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            )
            .header(CONTENT_LENGTH, len)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), bytes = len, "upload response");

        match status {
            // The asset exists remotely even when its body cannot be read.
            StatusCode::CREATED => match response.json::<ReleaseAsset>().await {
                Ok(asset) => Ok(UploadResponse::Created(asset)),
                Err(e) => {
                    warn!(
                        error = %e,
                        "upload accepted but the response is unreadable, the asset may be orphaned"
                    );
                    Err(RegistryError::InvalidResponse {
                        message: format!("failed to parse uploaded asset: {}", e),
                    })
                }
            },
            StatusCode::UNPROCESSABLE_ENTITY => Ok(UploadResponse::AlreadyExists),
            StatusCode::FORBIDDEN => Ok(UploadResponse::Forbidden),
            other => Ok(UploadResponse::Unexpected {
                status: other.as_u16(),
            }),
        }
    }

    /// DELETE a resource; only 204 counts as deleted.
    pub(crate) async fn delete(&self, url: Url, what: &str) -> RegistryResult<()> {
        let response = self.authorized(reqwest::Method::DELETE, url).send().await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(());
        }
        Self::expect_success(response, what).await?;
        Err(RegistryError::InvalidResponse {
            message: format!("deleting {} did not return 204", what),
        })
    }

    fn authorized(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        debug!(method = %method, url = %url, "registry request");
        let mut request = self
            .client
            .request(method, url)
            .header("accept", "application/vnd.github+json")
            .header("x-github-api-version", "2022-11-28");

        if let Some(token) = self.token_provider.get_token() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        request
    }

    async fn expect_success(
        response: reqwest::Response,
        what: &str,
    ) -> RegistryResult<reqwest::Response> {
        let status = response.status();

        match status.as_u16() {
            200..=299 => Ok(response),

            401 => Err(RegistryError::Unauthorized {
                message: "invalid or expired token".to_string(),
            }),

            403 => Err(RegistryError::Forbidden {
                message: format!("token may not access {}", what),
            }),

            404 => Err(RegistryError::NotFound {
                what: what.to_string(),
            }),

            _ => {
                let message = response.text().await.unwrap_or_else(|_| status.to_string());
                Err(RegistryError::Network {
                    message: format!("HTTP {}: {}", status.as_u16(), message),
                })
            }
        }
    }
}
