//! Batch coordination: probe, upload, and roll back on the first failure.
//!
//! Candidates are handled strictly one after another. Each goes through
//! `Probing -> Uploading -> {Recorded | AlreadyPresent | Failed}`; the first
//! `Failed` stops the batch, rolls back and surfaces the error. Candidates
//! after the failed one are never touched.

use assetdrop_registry::{Release, ReleaseAsset};
use tracing::{debug, info, warn};

use crate::error::{AssetError, PublishError};
use crate::locator::AssetCandidate;
use crate::probe::probe_conflict;
use crate::report::{PublishEvent, Reporter};
use crate::retry::RetryPolicy;
use crate::store::{delete_best_effort, ReleaseStore};
use crate::transactor::{transact, AssetOutcome, Ledger};

/// Knobs for one publishing run.
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Replace assets that already exist, and delete this run's uploads on failure.
    pub overwrite: bool,
    /// Retry policy for every registry call.
    pub retry: RetryPolicy,
}

/// What a completed batch did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishSummary {
    /// False when at least one candidate was already on the release.
    pub full_success: bool,
    pub uploaded: Vec<ReleaseAsset>,
    pub already_present: Vec<String>,
}

/// Publishes candidates to one release.
pub struct Publisher<S> {
    store: S,
    release: Release,
    options: PublishOptions,
    ledger: Ledger,
}

impl<S: ReleaseStore> Publisher<S> {
    pub fn new(store: S, release: Release, options: PublishOptions) -> Self {
        Self {
            store,
            release,
            options,
            ledger: Ledger::default(),
        }
    }

    /// Release snapshot, minus assets deleted for overwriting.
    pub fn release(&self) -> &Release {
        &self.release
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Publish every candidate in order.
    ///
    /// On the first failure the ledger is rolled back and the error returned.
    pub async fn publish(
        &mut self,
        candidates: &[AssetCandidate],
        reporter: &dyn Reporter,
    ) -> Result<PublishSummary, PublishError> {
        let mut summary = PublishSummary {
            full_success: true,
            ..PublishSummary::default()
        };

        for candidate in candidates {
            reporter.emit(&PublishEvent::AssetStarted {
                name: candidate.name.clone(),
            });

            match self.publish_one(candidate).await {
                Ok(AssetOutcome::Uploaded(asset)) => {
                    reporter.emit(&PublishEvent::AssetUploaded {
                        name: candidate.name.clone(),
                        asset_id: asset.id,
                    });
                    summary.uploaded.push(asset);
                }
                Ok(AssetOutcome::AlreadyPresent) => {
                    reporter.emit(&PublishEvent::AssetAlreadyPresent {
                        name: candidate.name.clone(),
                    });
                    summary.full_success = false;
                    summary.already_present.push(candidate.name.clone());
                }
                Err(source) => {
                    warn!(
                        asset = %candidate.name,
                        already_uploaded = source.already_uploaded(),
                        error = %source,
                        "asset failed, stopping the batch"
                    );
                    reporter.emit(&PublishEvent::AssetFailed {
                        name: candidate.name.clone(),
                        error: source.to_string(),
                    });
                    self.rollback(reporter).await;
                    return Err(PublishError::AssetFailed {
                        name: candidate.name.clone(),
                        source,
                    });
                }
            }
        }

        info!(
            uploaded = summary.uploaded.len(),
            already_present = summary.already_present.len(),
            "batch finished"
        );
        Ok(summary)
    }

    async fn publish_one(
        &mut self,
        candidate: &AssetCandidate,
    ) -> Result<AssetOutcome, AssetError> {
        debug!(asset = %candidate.name, "probing");
        let probe = probe_conflict(
            &self.store,
            &mut self.release,
            candidate,
            self.options.overwrite,
            &self.options.retry,
        )
        .await;

        debug!(asset = %candidate.name, "uploading");
        transact(
            &self.store,
            self.release.id,
            candidate,
            probe,
            &mut self.ledger,
            &self.options.retry,
        )
        .await
    }

    /// Undo this run's uploads, if overwrite mode allows it.
    ///
    /// Without overwrite mode nothing is deleted. Deletion failures are
    /// swallowed; the ledger is empty afterwards in overwrite mode.
    pub async fn rollback(&mut self, reporter: &dyn Reporter) {
        if self.ledger.is_empty() {
            return;
        }

        if !self.options.overwrite {
            reporter.emit(&PublishEvent::RollbackSkipped {
                kept: self.ledger.len(),
            });
            return;
        }

        reporter.emit(&PublishEvent::RollbackStarted {
            count: self.ledger.len(),
        });
        let uploaded: Vec<ReleaseAsset> = self.ledger.drain().collect();
        for asset in uploaded {
            let deleted = delete_best_effort(&self.store, asset.id, &self.options.retry).await;
            reporter.emit(&PublishEvent::AssetReverted {
                name: asset.name,
                deleted,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RecordingReporter;
    use crate::testing::FakeStore;

    struct Workspace {
        dir: tempfile::TempDir,
    }

    impl Workspace {
        fn new(names: &[&str]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            for name in names {
                std::fs::write(dir.path().join(name), format!("content of {}", name)).unwrap();
            }
            Self { dir }
        }

        fn candidates(&self, names: &[&str]) -> Vec<AssetCandidate> {
            names
                .iter()
                .map(|n| AssetCandidate::new(self.dir.path().join(n)))
                .collect()
        }
    }

    fn release_with(assets: &[(u64, &str)]) -> Release {
        Release {
            id: 1,
            name: Some("Release 1".into()),
            tag_name: "v1".into(),
            assets: assets
                .iter()
                .map(|(id, name)| ReleaseAsset {
                    id: *id,
                    name: name.to_string(),
                    size: 0,
                    state: None,
                })
                .collect(),
        }
    }

    fn is_rollback(e: &PublishEvent) -> bool {
        matches!(e, PublishEvent::RollbackStarted { .. } | PublishEvent::RollbackSkipped { .. })
    }

    fn reverted(name: &str, deleted: bool) -> PublishEvent {
        PublishEvent::AssetReverted {
            name: name.into(),
            deleted,
        }
    }

    fn options(overwrite: bool) -> PublishOptions {
        PublishOptions {
            overwrite,
            retry: RetryPolicy::immediate(3),
        }
    }

    #[tokio::test]
    async fn test_all_uploaded_is_full_success() {
        let ws = Workspace::new(&["a.zip", "b.zip"]);
        let mut publisher = Publisher::new(FakeStore::new(), release_with(&[]), options(false));
        let reporter = RecordingReporter::default();

        let summary = publisher
            .publish(&ws.candidates(&["a.zip", "b.zip"]), &reporter)
            .await
            .unwrap();

        assert!(summary.full_success);
        assert_eq!(summary.uploaded.len(), 2);
        assert_eq!(publisher.store().remote_names(), vec!["a.zip", "b.zip"]);
        assert_eq!(publisher.ledger().len(), 2);
    }

    #[tokio::test]
    async fn test_already_present_clears_full_success_but_continues() {
        let ws = Workspace::new(&["a.zip", "b.zip"]);
        let store = FakeStore::with_remote(&[(5, "a.zip")]);
        let mut publisher = Publisher::new(store, release_with(&[(5, "a.zip")]), options(false));
        let reporter = RecordingReporter::default();

        let summary = publisher
            .publish(&ws.candidates(&["a.zip", "b.zip"]), &reporter)
            .await
            .unwrap();

        assert!(!summary.full_success);
        assert_eq!(summary.already_present, vec!["a.zip"]);
        assert_eq!(summary.uploaded[0].name, "b.zip");
        assert!(publisher.store().remote_ids().contains(&5));
        assert!(publisher.store().deleted_ids().iter().all(|id| *id != 5));
    }

    #[tokio::test]
    async fn test_overwrite_replaces_and_ledger_holds_new_asset() {
        let ws = Workspace::new(&["a.zip"]);
        let store = FakeStore::with_remote(&[(5, "a.zip")]);
        let mut publisher = Publisher::new(store, release_with(&[(5, "a.zip")]), options(true));

        let summary = publisher
            .publish(&ws.candidates(&["a.zip"]), &RecordingReporter::default())
            .await
            .unwrap();

        assert!(summary.full_success);
        let new_id = summary.uploaded[0].id;
        assert_ne!(new_id, 5);
        assert_eq!(publisher.store().remote_ids(), vec![new_id]);
        let ledger_ids: Vec<_> = publisher.ledger().iter().map(|a| a.id).collect();
        assert_eq!(ledger_ids, vec![new_id]);
        assert!(publisher.release().assets.is_empty());
    }

    #[tokio::test]
    async fn test_failure_with_overwrite_rolls_back_and_stops() {
        let ws = Workspace::new(&["a.zip", "b.zip", "c.zip"]);
        let store = FakeStore::new().failing_real_upload("b.zip");
        let mut publisher = Publisher::new(store, release_with(&[]), options(true));
        let reporter = RecordingReporter::default();

        let err = publisher
            .publish(&ws.candidates(&["a.zip", "b.zip", "c.zip"]), &reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::AssetFailed { ref name, .. } if name == "b.zip"));
        assert!(publisher.store().remote_names().is_empty());
        assert!(publisher.ledger().is_empty());

        let events = reporter.events();
        assert!(!events.contains(&PublishEvent::AssetStarted {
            name: "c.zip".into()
        }));
        assert!(events.contains(&PublishEvent::RollbackStarted { count: 1 }));
        assert!(events.contains(&PublishEvent::AssetReverted {
            name: "a.zip".into(),
            deleted: true
        }));
    }

    #[tokio::test]
    async fn test_failure_without_overwrite_keeps_uploads() {
        let ws = Workspace::new(&["a.zip", "b.zip", "c.zip"]);
        let store = FakeStore::new().failing_real_upload("b.zip");
        let mut publisher = Publisher::new(store, release_with(&[]), options(false));
        let reporter = RecordingReporter::default();

        publisher
            .publish(&ws.candidates(&["a.zip", "b.zip", "c.zip"]), &reporter)
            .await
            .unwrap_err();

        assert_eq!(publisher.store().remote_names(), vec!["a.zip"]);
        assert!(reporter
            .events()
            .contains(&PublishEvent::RollbackSkipped { kept: 1 }));
    }

    #[tokio::test]
    async fn test_first_asset_failure_has_nothing_to_roll_back() {
        let ws = Workspace::new(&["a.zip", "b.zip"]);
        let store = FakeStore::new().failing_real_upload("a.zip");
        let mut publisher = Publisher::new(store, release_with(&[]), options(true));
        let reporter = RecordingReporter::default();

        publisher
            .publish(&ws.candidates(&["a.zip", "b.zip"]), &reporter)
            .await
            .unwrap_err();

        assert!(!reporter.events().iter().any(is_rollback));
        assert!(publisher.store().remote_names().is_empty());
    }

    #[tokio::test]
    async fn test_rollback_swallows_delete_failures() {
        let ws = Workspace::new(&["a.zip", "b.zip", "c.zip"]);
        // First real upload gets id 1002 (the probe takes 1001).
        let store = FakeStore::new()
            .failing_real_upload("c.zip")
            .failing_delete(1002);
        let mut publisher = Publisher::new(store, release_with(&[]), options(true));
        let reporter = RecordingReporter::default();

        publisher
            .publish(&ws.candidates(&["a.zip", "b.zip", "c.zip"]), &reporter)
            .await
            .unwrap_err();

        assert_eq!(publisher.store().remote_names(), vec!["a.zip"]);
        let events = reporter.events();
        assert!(events.contains(&PublishEvent::AssetReverted {
            name: "a.zip".into(),
            deleted: false
        }));
        assert!(events.contains(&PublishEvent::AssetReverted {
            name: "b.zip".into(),
            deleted: true
        }));
        assert!(publisher.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_rollback_deletes_in_upload_order() {
        let names = ["a.zip", "b.zip", "c.zip", "d.zip"];
        let ws = Workspace::new(&names);
        let store = FakeStore::new().failing_real_upload("d.zip");
        let mut publisher = Publisher::new(store, release_with(&[]), options(true));
        let reporter = RecordingReporter::default();

        publisher
            .publish(&ws.candidates(&names), &reporter)
            .await
            .unwrap_err();

        let uploaded: Vec<u64> = reporter
            .events()
            .iter()
            .filter_map(|e| match e {
                PublishEvent::AssetUploaded { asset_id, .. } => Some(*asset_id),
                _ => None,
            })
            .collect();
        assert_eq!(uploaded.len(), 3);
        let deleted = publisher.store().deleted_ids();
        assert_eq!(deleted[deleted.len() - 3..], uploaded[..]);

        let events = reporter.events();
        let tail = &events[events.len() - 4..];
        assert_eq!(
            tail,
            &[
                PublishEvent::RollbackStarted { count: 3 },
                reverted("a.zip", true),
                reverted("b.zip", true),
                reverted("c.zip", true),
            ]
        );
        assert!(publisher.store().remote_names().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_not_found_fails_batch() {
        let ws = Workspace::new(&["a.zip"]);
        let store = FakeStore::with_remote(&[(5, "a.zip")]);
        let mut publisher = Publisher::new(store, release_with(&[]), options(true));

        let err = publisher
            .publish(&ws.candidates(&["a.zip"]), &RecordingReporter::default())
            .await
            .unwrap_err();

        let PublishError::AssetFailed { source, .. } = err;
        assert!(matches!(source, AssetError::DuplicateNotFound { .. }));
        assert_eq!(publisher.store().remote_ids(), vec![5]);
    }
}
