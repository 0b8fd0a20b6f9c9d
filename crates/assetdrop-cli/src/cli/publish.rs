//! The `assetdrop` run: release lookup, asset discovery, publishing.

use anyhow::Context;
use assetdrop_core::{locate_assets, Publisher};
use assetdrop_registry::ReleaseClient;
use tracing::{error, info};

use super::config::Config;
use crate::console::{self, ConsoleReporter};
use crate::exit_codes;

pub async fn run(config: Config) -> anyhow::Result<i32> {
    print!(
        "{}",
        console::inputs(
            &config.owner,
            &config.repo,
            &config.tag,
            config.overwrite,
            config.revert_on_failure,
            &config.patterns,
        )
    );
    println!();

    let client = ReleaseClient::new(config.registry_config())
        .context("failed to build the release client")?;
    info!(
        owner = client.owner(),
        repo = client.repo(),
        authenticated = client.is_authenticated(),
        "release client ready"
    );

    println!("{}", console::searching_release(&config.tag));
    let release = match client.get_release_by_tag(&config.tag).await {
        Ok(release) => release,
        Err(e) => {
            error!(tag = %config.tag, error = %e, "release lookup failed");
            println!("{}", console::release_not_found(&e.to_string()));
            return Ok(e.exit_code());
        }
    };
    println!("{}", console::release_found(release.display_name()));

    println!("{}", console::locating_assets());
    let candidates = match locate_assets(&config.workspace, &config.patterns) {
        Ok(candidates) => candidates,
        Err(e) => {
            error!(error = %e, "asset discovery failed");
            println!("{}", console::no_matching_assets());
            return Ok(exit_codes::FAILURE);
        }
    };
    println!("{}", console::matched_assets(&candidates));

    println!("{}", console::uploading());
    let release_name = release.display_name().to_string();
    info!(release = %release_name, candidates = candidates.len(), "publishing");

    let mut publisher = Publisher::new(client, release, config.publish_options());
    match publisher.publish(&candidates, &ConsoleReporter).await {
        Ok(summary) => {
            if !summary.full_success {
                println!("{}\n", console::already_present_note());
            }
            print!("{}", console::finished(&release_name));
            Ok(exit_codes::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "publishing failed");
            println!();
            Ok(e.exit_code())
        }
    }
}
