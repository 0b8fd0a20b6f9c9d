//! Error types for locating and publishing assets.

use std::path::PathBuf;

use assetdrop_registry::RegistryError;

/// The glob patterns matched nothing usable.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    #[error("there are no matching assets to upload in {}", workspace.display())]
    NoMatchingAssets { workspace: PathBuf },
}

/// Why a single asset could not be handled.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// The registry answered 403 to the probe upload.
    #[error("there is not enough permissions to upload the asset")]
    Forbidden,

    /// The name is taken on the release but no snapshot asset matches it,
    /// so there is nothing to delete before overwriting.
    #[error("the asset could not be overwritten, its id was not found")]
    DuplicateNotFound { name: String },

    /// Every attempt ended without a usable response.
    #[error(transparent)]
    Transient(#[from] RegistryError),
}

impl AssetError {
    /// Whether the asset is known to already exist on the release.
    pub fn already_uploaded(&self) -> bool {
        matches!(self, Self::DuplicateNotFound { .. })
    }
}

/// A batch aborted on its first failed asset.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("an error occurred uploading the asset {name}: {source}")]
    AssetFailed {
        name: String,
        #[source]
        source: AssetError,
    },
}

impl PublishError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
