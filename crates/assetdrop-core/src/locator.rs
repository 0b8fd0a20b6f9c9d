//! Resolve glob patterns to the local files that will be uploaded.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::LocateError;

/// A local file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCandidate {
    /// Absolute path of the file; content is read only when uploading.
    pub path: PathBuf,
    /// Base name, used as the asset name on the release.
    pub name: String,
}

impl AssetCandidate {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }
}

/// Resolve `patterns` against `workspace`, in pattern order then match order.
///
/// Only regular files are kept (symlinks are followed). A file matched by
/// several patterns is returned once per pattern.
pub fn locate_assets(
    workspace: &Path,
    patterns: &[String],
) -> Result<Vec<AssetCandidate>, LocateError> {
    let root = std::path::absolute(workspace).unwrap_or_else(|_| workspace.to_path_buf());
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());

    let mut found = Vec::new();
    for pattern in patterns {
        let full = if Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            format!(
                "{}/{}",
                escaped_root.trim_end_matches('/'),
                pattern.trim_start_matches("./")
            )
        };

        let paths = match glob::glob(&full) {
            Ok(paths) => paths,
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "ignoring invalid glob pattern");
                continue;
            }
        };

        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => found.push(AssetCandidate::new(path)),
                Ok(path) => debug!(path = %path.display(), "skipping non-file match"),
                Err(e) => debug!(error = %e, "skipping unreadable match"),
            }
        }
    }

    if found.is_empty() {
        return Err(LocateError::NoMatchingAssets { workspace: root });
    }
    Ok(found)
}
