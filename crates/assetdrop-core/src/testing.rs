//! In-memory [`ReleaseStore`] for unit tests.

use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use assetdrop_registry::{RegistryError, RegistryResult, ReleaseAsset, UploadResponse};
use async_trait::async_trait;

use crate::probe::PROBE_PAYLOAD;
use crate::store::ReleaseStore;

#[derive(Default)]
struct State {
    remote: Vec<ReleaseAsset>,
    next_id: u64,
    upload_script: VecDeque<RegistryResult<UploadResponse>>,
    failing_real_uploads: HashSet<String>,
    failing_deletes: HashSet<u64>,
    upload_calls: usize,
    uploaded_payloads: Vec<Vec<u8>>,
    deleted_ids: Vec<u64>,
}

/// Behaves like a release: names are unique, uploads get fresh ids.
pub(crate) struct FakeStore {
    state: Mutex<State>,
}

impl FakeStore {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1000,
                ..State::default()
            }),
        }
    }

    pub(crate) fn with_remote(assets: &[(u64, &str)]) -> Self {
        let store = Self::new();
        store.state.lock().unwrap().remote = assets
            .iter()
            .map(|(id, name)| ReleaseAsset {
                id: *id,
                name: name.to_string(),
                size: 0,
                state: Some("uploaded".into()),
            })
            .collect();
        store
    }

    /// Responses returned (in order) before normal behaviour resumes.
    pub(crate) fn with_upload_script(self, script: Vec<RegistryResult<UploadResponse>>) -> Self {
        self.state.lock().unwrap().upload_script = script.into();
        self
    }

    /// Real (non-probe) uploads of `name` always answer 500.
    pub(crate) fn failing_real_upload(self, name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_real_uploads
            .insert(name.to_string());
        self
    }

    pub(crate) fn failing_delete(self, id: u64) -> Self {
        self.state.lock().unwrap().failing_deletes.insert(id);
        self
    }

    pub(crate) fn remote_names(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.remote.iter().map(|a| a.name.clone()).collect()
    }

    pub(crate) fn remote_ids(&self) -> Vec<u64> {
        let state = self.state.lock().unwrap();
        state.remote.iter().map(|a| a.id).collect()
    }

    pub(crate) fn deleted_ids(&self) -> Vec<u64> {
        self.state.lock().unwrap().deleted_ids.clone()
    }

    pub(crate) fn upload_calls(&self) -> usize {
        self.state.lock().unwrap().upload_calls
    }

    pub(crate) fn uploaded_payloads(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().uploaded_payloads.clone()
    }
}

#[async_trait]
impl ReleaseStore for FakeStore {
    async fn upload_asset(
        &self,
        _release_id: u64,
        name: &str,
        path: &Path,
    ) -> RegistryResult<UploadResponse> {
        let payload = std::fs::read(path).map_err(|e| RegistryError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        });

        let mut state = self.state.lock().unwrap();
        state.upload_calls += 1;
        if let Some(scripted) = state.upload_script.pop_front() {
            return scripted;
        }

        let payload = payload?;
        state.uploaded_payloads.push(payload.clone());

        if payload != PROBE_PAYLOAD && state.failing_real_uploads.contains(name) {
            return Ok(UploadResponse::Unexpected { status: 500 });
        }
        if state.remote.iter().any(|a| a.name == name) {
            return Ok(UploadResponse::AlreadyExists);
        }

        state.next_id += 1;
        let asset = ReleaseAsset {
            id: state.next_id,
            name: name.to_string(),
            size: payload.len() as u64,
            state: Some("uploaded".into()),
        };
        state.remote.push(asset.clone());
        Ok(UploadResponse::Created(asset))
    }

    async fn delete_asset(&self, asset_id: u64) -> RegistryResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.failing_deletes.contains(&asset_id) {
            return Err(RegistryError::Network {
                message: "HTTP 500: delete failed".into(),
            });
        }
        let before = state.remote.len();
        state.remote.retain(|a| a.id != asset_id);
        if state.remote.len() == before {
            return Err(RegistryError::NotFound {
                what: format!("asset {}", asset_id),
            });
        }
        state.deleted_ids.push(asset_id);
        Ok(())
    }
}
