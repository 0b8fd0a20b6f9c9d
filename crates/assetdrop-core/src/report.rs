//! Progress events emitted while publishing.

/// Something a user watching the run should hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishEvent {
    /// Processing of a candidate begins.
    AssetStarted { name: String },
    /// The candidate was uploaded.
    AssetUploaded { name: String, asset_id: u64 },
    /// The release already had the candidate; nothing was changed.
    AssetAlreadyPresent { name: String },
    /// The candidate failed; the batch stops here.
    AssetFailed { name: String, error: String },
    /// Rollback kept this run's uploads (overwrite disabled).
    RollbackSkipped { kept: usize },
    /// Rollback is deleting this run's uploads.
    RollbackStarted { count: usize },
    /// One rollback deletion finished.
    AssetReverted { name: String, deleted: bool },
}

/// Trait for receiving publish events.
pub trait Reporter: Send + Sync {
    /// Handle one event.
    fn emit(&self, event: &PublishEvent);
}

/// Null reporter for testing.
pub struct NullReporter;

impl Reporter for NullReporter {
    fn emit(&self, _event: &PublishEvent) {}
}

/// Keeps every event, in order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: std::sync::Mutex<Vec<PublishEvent>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<PublishEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl Reporter for RecordingReporter {
    fn emit(&self, event: &PublishEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
