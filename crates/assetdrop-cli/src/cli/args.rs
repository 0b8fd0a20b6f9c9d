use clap::Parser;
use std::path::PathBuf;

/// Every input is optional at the clap level so that all missing values can
/// be reported together by [`super::config::Config::from_args`].
#[derive(Parser, Debug, Default)]
#[command(
    name = "assetdrop",
    version,
    about = "Upload build artifacts to a GitHub release, with conflict probing and rollback"
)]
pub struct Cli {
    /// Repository owner (user or organisation)
    #[arg(long, env = "INPUT_OWNER")]
    pub owner: Option<String>,

    /// Token used to authenticate against the API
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository name; `owner/name` is accepted
    #[arg(long, env = "INPUT_REPO")]
    pub repo: Option<String>,

    /// Tag of the release that receives the assets
    #[arg(long, env = "INPUT_TAG")]
    pub tag: Option<String>,

    /// Directory the file patterns are resolved against
    #[arg(long, env = "INPUT_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Replace assets that already exist (true/false, 1/0, t/f)
    #[arg(long, env = "INPUT_OVERWRITE_ASSETS")]
    pub overwrite_assets: Option<String>,

    /// Echoed for compatibility; rollback follows --overwrite-assets
    #[arg(long, env = "INPUT_REVERT_ON_FAILURE")]
    pub revert_on_failure: Option<String>,

    /// List of glob patterns, e.g. `['dist/*.zip', "out.tar.gz"]`
    #[arg(long, env = "INPUT_FILES")]
    pub files: Option<String>,

    /// REST API base URL
    #[arg(long, env = "ASSETDROP_API_URL")]
    pub api_url: Option<String>,

    /// Upload API base URL
    #[arg(long, env = "ASSETDROP_UPLOAD_URL")]
    pub upload_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "ASSETDROP_TIMEOUT", default_value_t = 30)]
    pub timeout_secs: u64,
}
