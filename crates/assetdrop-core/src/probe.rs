//! Conflict probing with a disposable, same-named payload.
//!
//! The probe uploads a tiny file under the candidate's name. A 201 means the
//! name is free (the probe asset is deleted again right away), a 422 means an
//! asset with that name is already on the release.

use assetdrop_registry::{RegistryError, Release, ReleaseAsset, UploadResponse};
use tracing::debug;

use crate::error::AssetError;
use crate::locator::AssetCandidate;
use crate::retry::{retry_with, Attempt, RetryPolicy};
use crate::store::{delete_best_effort, ReleaseStore};

/// Content of the probe file.
pub const PROBE_PAYLOAD: &[u8] = b"MOCK FILE";

/// Result of a successful probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// No asset with this name exists.
    Clear,
    /// An asset with this name existed and was deleted for overwriting.
    Replaced { previous: ReleaseAsset },
    /// An asset with this name exists and overwriting is disabled.
    AlreadyPresent,
}

impl ProbeOutcome {
    /// False only when the name is taken and must be left alone.
    pub fn valid_to_upload(&self) -> bool {
        !matches!(self, Self::AlreadyPresent)
    }
}

enum ProbeResponse {
    Created(ReleaseAsset),
    Conflict,
    Forbidden,
}

/// Alphanumeric runs of an asset name, in order.
///
/// `my-app_1.0.zip` and `my.app.1-0.zip` both yield `["my", "app", "1", "0", "zip"]`.
pub fn name_tokens(name: &str) -> Vec<&str> {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Find the snapshot asset a conflicting upload collided with.
pub fn find_conflicting<'a>(release: &'a Release, name: &str) -> Option<&'a ReleaseAsset> {
    let wanted = name_tokens(name);
    release
        .assets
        .iter()
        .find(|asset| name_tokens(&asset.name) == wanted)
}

/// Probe whether `candidate` can be uploaded to `release` without a name clash.
///
/// With `overwrite` set, a clashing asset found in the snapshot is deleted
/// and pruned from `release.assets`.
pub async fn probe_conflict<S>(
    store: &S,
    release: &mut Release,
    candidate: &AssetCandidate,
    overwrite: bool,
    policy: &RetryPolicy,
) -> Result<ProbeOutcome, AssetError>
where
    S: ReleaseStore + ?Sized,
{
    let probe_dir = tempfile::tempdir().map_err(|e| probe_io_error(candidate, e))?;
    let probe_path = probe_dir.path().join(&candidate.name);
    tokio::fs::write(&probe_path, PROBE_PAYLOAD)
        .await
        .map_err(|e| probe_io_error(candidate, e))?;

    let release_id = release.id;
    let response = retry_with(
        policy,
        || store.upload_asset(release_id, &candidate.name, &probe_path),
        |r| match r {
            Ok(UploadResponse::Created(asset)) => Attempt::Done(ProbeResponse::Created(asset)),
            Ok(UploadResponse::AlreadyExists) => Attempt::Done(ProbeResponse::Conflict),
            Ok(UploadResponse::Forbidden) => Attempt::Done(ProbeResponse::Forbidden),
            Ok(UploadResponse::Unexpected { status }) => Attempt::Retry(RegistryError::Network {
                message: format!("unexpected status {} for probe upload", status),
            }),
            Err(e) => Attempt::Retry(e),
        },
    )
    .await;

    if let Err(e) = probe_dir.close() {
        debug!(error = %e, "failed to remove probe file");
    }

    match response? {
        ProbeResponse::Created(probe_asset) => {
            debug!(asset = %candidate.name, probe_id = probe_asset.id, "name is free");
            delete_best_effort(store, probe_asset.id, policy).await;
            Ok(ProbeOutcome::Clear)
        }
        ProbeResponse::Forbidden => Err(AssetError::Forbidden),
        ProbeResponse::Conflict if !overwrite => Ok(ProbeOutcome::AlreadyPresent),
        ProbeResponse::Conflict => {
            let Some(previous) = find_conflicting(release, &candidate.name).cloned() else {
                return Err(AssetError::DuplicateNotFound {
                    name: candidate.name.clone(),
                });
            };
            debug!(
                asset = %candidate.name,
                previous_id = previous.id,
                "deleting asset to overwrite"
            );
            delete_best_effort(store, previous.id, policy).await;
            release.assets.retain(|a| a.id != previous.id);
            Ok(ProbeOutcome::Replaced { previous })
        }
    }
}

fn probe_io_error(candidate: &AssetCandidate, e: std::io::Error) -> AssetError {
    AssetError::Transient(RegistryError::Io {
        path: format!("probe file for {}", candidate.name),
        message: e.to_string(),
    })
}
