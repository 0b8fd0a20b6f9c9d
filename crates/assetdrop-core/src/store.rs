//! The remote side as the publisher sees it.

use std::path::Path;

use assetdrop_registry::{RegistryResult, ReleaseClient, UploadResponse};
use async_trait::async_trait;
use tracing::debug;

use crate::retry::{retry_with, Attempt, RetryPolicy};

/// Transactional remote store for release assets.
///
/// Each call is a single request; retrying is the caller's business.
#[async_trait]
pub trait ReleaseStore: Send + Sync {
    /// Upload `path` under `name`.
    async fn upload_asset(
        &self,
        release_id: u64,
        name: &str,
        path: &Path,
    ) -> RegistryResult<UploadResponse>;

    /// Delete an asset; `Ok` only when the registry confirmed the deletion.
    async fn delete_asset(&self, asset_id: u64) -> RegistryResult<()>;
}

#[async_trait]
impl ReleaseStore for ReleaseClient {
    async fn upload_asset(
        &self,
        release_id: u64,
        name: &str,
        path: &Path,
    ) -> RegistryResult<UploadResponse> {
        ReleaseClient::upload_asset(self, release_id, name, path).await
    }

    async fn delete_asset(&self, asset_id: u64) -> RegistryResult<()> {
        ReleaseClient::delete_asset(self, asset_id).await
    }
}

/// Delete with retries, never failing. Returns whether the delete was confirmed.
pub(crate) async fn delete_best_effort<S>(store: &S, asset_id: u64, policy: &RetryPolicy) -> bool
where
    S: ReleaseStore + ?Sized,
{
    let result = retry_with(
        policy,
        || store.delete_asset(asset_id),
        |r| match r {
            Ok(()) => Attempt::Done(()),
            Err(e) => Attempt::Retry(e),
        },
    )
    .await;

    match result {
        Ok(()) => true,
        Err(e) => {
            debug!(asset_id, error = %e, "giving up on asset deletion");
            false
        }
    }
}
