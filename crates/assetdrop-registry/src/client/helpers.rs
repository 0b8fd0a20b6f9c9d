//! Pure helpers: endpoint construction (no HTTP, no status logic).

use reqwest::Url;

use crate::error::{RegistryError, RegistryResult};

/// Build `{base}/{segments...}` with every segment percent-encoded.
///
/// A base with a path prefix (`https://ghe.example.com/api/v3`) keeps it.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> RegistryResult<Url> {
    let mut url = Url::parse(base.trim_end_matches('/')).map_err(|e| RegistryError::Config {
        message: format!("invalid base URL '{}': {}", base, e),
    })?;

    url.path_segments_mut()
        .map_err(|_| RegistryError::Config {
            message: format!("base URL '{}' cannot carry a path", base),
        })?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}
