//! Validated run configuration.

use std::path::PathBuf;

use assetdrop_core::PublishOptions;
use assetdrop_registry::RegistryConfig;
use once_cell::sync::Lazy;
use regex::Regex;

use super::args::Cli;

/// One element of a files list: anything that is not a separator or quote.
static FILES_ELEMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[^,\[\]'"]+"#).unwrap());

const INVALID_FILES: &str =
    "There are no assets to upload. The input parameter \"files\" is not a valid string array.";

#[derive(Clone)]
pub struct Config {
    pub owner: String,
    pub token: String,
    pub repo: String,
    pub tag: String,
    pub workspace: PathBuf,
    pub overwrite: bool,
    pub revert_on_failure: bool,
    pub patterns: Vec<String>,
    pub api_url: Option<String>,
    pub upload_url: Option<String>,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("owner", &self.owner)
            .field("token", &"[REDACTED]")
            .field("repo", &self.repo)
            .field("tag", &self.tag)
            .field("workspace", &self.workspace)
            .field("overwrite", &self.overwrite)
            .field("revert_on_failure", &self.revert_on_failure)
            .field("patterns", &self.patterns)
            .field("api_url", &self.api_url)
            .field("upload_url", &self.upload_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    /// Validate parsed arguments, collecting every problem instead of stopping at the first.
    pub fn from_args(cli: Cli) -> Result<Self, Vec<String>> {
        let mut problems = Vec::new();

        let owner = required(cli.owner, "owner", "INPUT_OWNER", &mut problems);
        let token = required(cli.token, "token", "INPUT_TOKEN", &mut problems);
        let repo = required(cli.repo, "repo", "INPUT_REPO", &mut problems).map(|r| repo_name(&r));
        let tag = required(cli.tag, "tag", "INPUT_TAG", &mut problems);
        let workspace = required(
            cli.workspace.map(|p| p.to_string_lossy().into_owned()),
            "workspace",
            "INPUT_WORKSPACE",
            &mut problems,
        );
        let overwrite = required(
            cli.overwrite_assets,
            "overwrite-assets",
            "INPUT_OVERWRITE_ASSETS",
            &mut problems,
        );
        let revert = required(
            cli.revert_on_failure,
            "revert-on-failure",
            "INPUT_REVERT_ON_FAILURE",
            &mut problems,
        );
        let files = required(cli.files, "files", "INPUT_FILES", &mut problems);

        if matches!(&repo, Some(r) if r.is_empty()) {
            problems.push("The repository name is empty after removing the owner prefix.".into());
        }

        let patterns = files.as_deref().map(parse_files).unwrap_or_default();
        if files.is_some() && patterns.is_empty() {
            problems.push(INVALID_FILES.into());
        }

        if cli.timeout_secs == 0 {
            problems.push("The request timeout must be at least one second.".into());
        }

        match (owner, token, repo, tag, workspace, overwrite, revert) {
            (
                Some(owner),
                Some(token),
                Some(repo),
                Some(tag),
                Some(workspace),
                Some(overwrite),
                Some(revert),
            ) if problems.is_empty() => Ok(Self {
                owner,
                token,
                repo,
                tag,
                workspace: PathBuf::from(workspace),
                overwrite: parse_bool(&overwrite),
                revert_on_failure: parse_bool(&revert),
                patterns,
                api_url: non_empty(cli.api_url),
                upload_url: non_empty(cli.upload_url),
                timeout_secs: cli.timeout_secs,
            }),
            _ => Err(problems),
        }
    }

    pub fn registry_config(&self) -> RegistryConfig {
        let mut config = RegistryConfig::new(&self.owner, &self.repo)
            .with_token(&self.token)
            .with_timeout_secs(self.timeout_secs);
        if let Some(url) = &self.api_url {
            config = config.with_api_url(url);
        }
        if let Some(url) = &self.upload_url {
            config = config.with_upload_url(url);
        }
        config
    }

    pub fn publish_options(&self) -> PublishOptions {
        PublishOptions {
            overwrite: self.overwrite,
            ..PublishOptions::default()
        }
    }
}

fn required(
    value: Option<String>,
    flag: &str,
    env: &str,
    problems: &mut Vec<String>,
) -> Option<String> {
    match non_empty(value) {
        Some(v) => Some(v),
        None => {
            problems.push(format!(
                "The input \"--{}\" (environment variable \"{}\") was not found.",
                flag, env
            ));
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `owner/name` keeps the second segment; a bare name is kept as is.
pub fn repo_name(raw: &str) -> String {
    match raw.split('/').nth(1) {
        Some(name) => name.trim().to_string(),
        None => raw.trim().to_string(),
    }
}

/// Lenient boolean: the usual spellings of true and false, anything else is false.
pub fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim(), "1" | "t" | "T" | "TRUE" | "true" | "True")
}

/// Extract glob patterns from a list like `['dist/*.zip', "out.tar.gz"]`.
///
/// Input without the surrounding brackets is not a list and yields nothing.
pub fn parse_files(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return Vec::new();
    }
    FILES_ELEMENT
        .find_iter(trimmed)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
