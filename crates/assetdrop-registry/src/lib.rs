//! Release registry client for publishing release assets.
//!
//! This crate talks to the GitHub Releases REST API and provides:
//!
//! - Release lookup by tag
//! - Streaming asset upload
//! - Asset deletion and listing
//! - Bearer token authentication
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use assetdrop_registry::{RegistryConfig, ReleaseClient, UploadResponse};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = RegistryConfig::new("octo-org", "octo-repo").with_token("ghp_example");
//! let client = ReleaseClient::new(config)?;
//!
//! let release = client.get_release_by_tag("v1.2.0").await?;
//! let response = client
//!     .upload_asset(release.id, "app.tar.gz", Path::new("dist/app.tar.gz"))
//!     .await?;
//! if let UploadResponse::Created(asset) = response {
//!     println!("uploaded asset {}", asset.id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Field | Description |
//! |-------|-------------|
//! | `api_url` | REST API base URL (default: `https://api.github.com`) |
//! | `upload_url` | Upload API base URL (default: `https://uploads.github.com`) |
//! | `token` | Authentication token |
//! | `timeout_secs` | Request timeout in seconds (default: 30) |

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use auth::TokenProvider;
pub use client::{ReleaseClient, REGISTRY_USER_AGENT};
pub use error::{RegistryError, RegistryResult};
pub use types::{RegistryConfig, Release, ReleaseAsset, UploadResponse};
