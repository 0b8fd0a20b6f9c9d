//! Real uploads and the ledger of what this run created.

use assetdrop_registry::{RegistryError, ReleaseAsset, UploadResponse};
use tracing::debug;

use crate::error::AssetError;
use crate::locator::AssetCandidate;
use crate::probe::ProbeOutcome;
use crate::retry::{retry_with, Attempt, RetryPolicy};
use crate::store::ReleaseStore;

/// Final result for one candidate that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    /// Uploaded and recorded in the ledger.
    Uploaded(ReleaseAsset),
    /// Left alone because the release already has it.
    AlreadyPresent,
}

/// Assets created during the current run, in creation order.
#[derive(Debug, Default)]
pub struct Ledger {
    assets: Vec<ReleaseAsset>,
}

impl Ledger {
    pub fn record(&mut self, asset: ReleaseAsset) {
        self.assets.push(asset);
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReleaseAsset> {
        self.assets.iter()
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, ReleaseAsset> {
        self.assets.drain(..)
    }
}

/// Turn a probe verdict into a final outcome, uploading when it is clear.
pub async fn transact<S>(
    store: &S,
    release_id: u64,
    candidate: &AssetCandidate,
    probe: Result<ProbeOutcome, AssetError>,
    ledger: &mut Ledger,
    policy: &RetryPolicy,
) -> Result<AssetOutcome, AssetError>
where
    S: ReleaseStore + ?Sized,
{
    if !probe?.valid_to_upload() {
        return Ok(AssetOutcome::AlreadyPresent);
    }

    let asset = retry_with(
        policy,
        || store.upload_asset(release_id, &candidate.name, &candidate.path),
        |r| match r {
            Ok(UploadResponse::Created(asset)) => Attempt::Done(asset),
            Ok(other) => Attempt::Retry(RegistryError::Network {
                message: format!("upload was not accepted: {}", describe(&other)),
            }),
            Err(e) => Attempt::Retry(e),
        },
    )
    .await?;

    debug!(asset = %candidate.name, id = asset.id, "asset uploaded");
    ledger.record(asset.clone());
    Ok(AssetOutcome::Uploaded(asset))
}

fn describe(response: &UploadResponse) -> String {
    match response {
        UploadResponse::Created(_) => "HTTP 201".to_string(),
        UploadResponse::AlreadyExists => "HTTP 422 (name already exists)".to_string(),
        UploadResponse::Forbidden => "HTTP 403".to_string(),
        UploadResponse::Unexpected { status } => format!("HTTP {}", status),
    }
}
