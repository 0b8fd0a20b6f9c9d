//! Human-readable progress output.
//!
//! Not a machine contract: wording and colours may change between releases.

use assetdrop_core::{AssetCandidate, PublishEvent, Reporter};

const CYAN_BOLD_UNDERLINE: &str = "36;1;4";
const BLUE_BOLD: &str = "34;1;24";
const GREEN_BOLD_UNDERLINE: &str = "32;1;4";
const RED_BOLD_UNDERLINE: &str = "31;1;4";
const RED_BOLD: &str = "31;1;24";
const YELLOW: &str = "33;22;24";
const RED: &str = "31;22;24";

const CHECK: &str = "\u{2705}";
const CROSS: &str = "\u{274c}";
const CLOCK: &str = "\u{23f0}";
const SAD: &str = "\u{1f625}";
const SKULL: &str = "\u{2620}\u{fe0f}";

const SEARCHING_RELEASE: &str = "Searching for related release based on tag";

fn paint(style: &str, text: &str) -> String {
    format!("\x1b[{}m{}\x1b[0m", style, text)
}

pub fn banner() -> String {
    format!(
        "\n\n{} \u{1f60e}\n\n{}",
        paint(CYAN_BOLD_UNDERLINE, "UPLOADING ASSETS TO A RELEASE..."),
        paint(BLUE_BOLD, "Hello \u{1f44b}, reading input...\u{1f913}"),
    )
}

pub fn config_errors(problems: &[String]) -> String {
    let mut s = format!(
        "{}{}\n",
        SAD,
        paint(RED_BOLD_UNDERLINE, "Error, something went wrong:")
    );
    for problem in problems {
        s.push_str(&format!(
            "{} {}\n",
            paint(YELLOW, "    -"),
            paint(RED, problem)
        ));
    }
    s.push('\n');
    s
}

/// Echo of the run inputs; never includes the token.
pub fn inputs(
    owner: &str,
    repo: &str,
    tag: &str,
    overwrite: bool,
    revert_on_failure: bool,
    patterns: &[String],
) -> String {
    let mut s = String::new();
    for (label, value) in [
        ("Owner:              ", owner.to_string()),
        ("Repo:               ", repo.to_string()),
        ("Tag:                ", tag.to_string()),
        ("Overwrite assets:   ", overwrite.to_string()),
        ("Revert on failure:  ", revert_on_failure.to_string()),
    ] {
        s.push_str(&format!("{}{}\n", paint(YELLOW, label), value));
    }
    s.push_str(&format!("{}\n", paint(YELLOW, "Assets to upload:")));
    for pattern in patterns {
        s.push_str(&format!("{}{}\n", paint(YELLOW, "  - "), pattern));
    }
    s
}

pub fn searching_release(tag: &str) -> String {
    let text = format!("{} \"{}\" ...{}", SEARCHING_RELEASE, tag, CLOCK);
    paint(BLUE_BOLD, &text)
}

pub fn release_found(name: &str) -> String {
    let bullet = paint(YELLOW, "  -");
    format!("{} Release \"{}\" found {}\n", bullet, name, CHECK)
}

pub fn release_not_found(detail: &str) -> String {
    format!(
        "{} {} {}\n{}\n",
        paint(YELLOW, "  -"),
        SAD,
        paint(RED_BOLD, "Error: The release for the tag was not found."),
        paint(RED, &format!("    {}", detail)),
    )
}

pub fn locating_assets() -> String {
    let text = format!("Getting path of matching assets...{}", CLOCK);
    paint(BLUE_BOLD, &text)
}

pub fn matched_assets(candidates: &[AssetCandidate]) -> String {
    let mut s = String::new();
    for candidate in candidates {
        s.push_str(&format!(
            "{}{}\n",
            paint(YELLOW, "  - "),
            candidate.path.display()
        ));
    }
    s
}

pub fn no_matching_assets() -> String {
    format!(
        "{} {}\n",
        paint(YELLOW, "  -"),
        paint(RED_BOLD, "There are no matching assets to upload.\u{2757}")
    )
}

pub fn uploading() -> String {
    paint(BLUE_BOLD, &format!("Uploading assets...{}", CLOCK))
}

pub fn already_present_note() -> String {
    paint(
        RED_BOLD,
        "Note: Some assets were not uploaded to the release because they were already uploaded.",
    )
}

pub fn finished(release_name: &str) -> String {
    format!(
        "{}\u{1f485}\n\n",
        paint(
            GREEN_BOLD_UNDERLINE,
            &format!(
                "The assets have been uploaded to the release \"{}\" successfully.",
                release_name
            ),
        )
    )
}

/// Render one publishing event.
pub fn event(event: &PublishEvent) -> String {
    match event {
        PublishEvent::AssetStarted { name } => format!("{}{}", paint(YELLOW, "  - Asset:  "), name),
        PublishEvent::AssetUploaded { .. } => format!(
            "{}The asset has been uploaded successfully. {}\n",
            paint(YELLOW, "    Result: "),
            CHECK
        ),
        PublishEvent::AssetAlreadyPresent { .. } => format!(
            "{}The asset is already in the release. {}\n",
            paint(YELLOW, "    Result: "),
            CROSS
        ),
        PublishEvent::AssetFailed { error, .. } => format!(
            "{}The asset could not be uploaded. {}\n\n{} {}\n{}\n",
            paint(YELLOW, "    Result: "),
            CROSS,
            SAD,
            paint(RED_BOLD, "Error: An error occurred uploading the asset."),
            paint(RED_BOLD, error),
        ),
        PublishEvent::RollbackSkipped { .. } => format!(
            "\n{}",
            paint(
                GREEN_BOLD_UNDERLINE,
                "NOTE: Some assets were still uploaded to the release."
            )
        ),
        PublishEvent::RollbackStarted { .. } => format!(
            "\n{}  {}  {}",
            SKULL,
            paint(
                RED_BOLD,
                "REVERTING ALL...DELETING ASSETS THAT WERE UPLOADED TO THE RELEASE"
            ),
            SKULL
        ),
        PublishEvent::AssetReverted { name, deleted } => {
            let (label, mark) = if *deleted {
                ("  - Deleted: ", CHECK)
            } else {
                ("  - Could not delete: ", CROSS)
            };
            format!("{}{} {}", paint(YELLOW, label), name, mark)
        }
    }
}

/// Prints every event to stdout.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn emit(&self, e: &PublishEvent) {
        println!("{}", event(e));
    }
}
