//! Asset upload state machine.
//!
//! Locates local files, probes the release for name conflicts, uploads,
//! and rolls back this run's uploads when a later asset fails.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use assetdrop_core::{locate_assets, NullReporter, PublishOptions, Publisher};
//! use assetdrop_registry::{RegistryConfig, ReleaseClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = ReleaseClient::new(RegistryConfig::new("octo", "widgets").with_token("t"))?;
//! let release = client.get_release_by_tag("v1.0.0").await?;
//! let candidates = locate_assets(Path::new("."), &["dist/*.zip".to_string()])?;
//!
//! let mut publisher = Publisher::new(client, release, PublishOptions::default());
//! let summary = publisher.publish(&candidates, &NullReporter).await?;
//! assert!(summary.full_success);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod locator;
pub mod probe;
pub mod publisher;
pub mod report;
pub mod retry;
pub mod store;
pub mod transactor;

#[cfg(test)]
mod testing;

pub use error::{AssetError, LocateError, PublishError};
pub use locator::{locate_assets, AssetCandidate};
pub use probe::{name_tokens, probe_conflict, ProbeOutcome, PROBE_PAYLOAD};
pub use publisher::{PublishOptions, PublishSummary, Publisher};
pub use report::{NullReporter, PublishEvent, RecordingReporter, Reporter};
pub use retry::{retry_with, Attempt, RetryPolicy};
pub use store::ReleaseStore;
pub use transactor::{transact, AssetOutcome, Ledger};
