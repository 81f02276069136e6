//! Scripted in-memory gateway for controller and desk tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fraudcheck_core::{
    AssessmentRecord, AssessmentUpdate, DatasetPayload, ExportFormat, ExtractionCriteria,
    SavedAssessment, SearchFilters,
};
use tokio::sync::Notify;

use crate::gateway::{BackendStatus, Gateway, RecertifyReport};
use crate::SyncError;

/// Replies are queued per endpoint and consumed in order. An exhausted queue
/// falls back to a benign default.
#[derive(Default)]
pub struct ScriptedGateway {
    datasets: Mutex<VecDeque<Result<DatasetPayload, SyncError>>>,
    searches: Mutex<VecDeque<Result<Vec<AssessmentRecord>, SyncError>>>,
    saves: Mutex<VecDeque<Result<SavedAssessment, SyncError>>>,
    sessions: Mutex<VecDeque<BackendStatus>>,
    initializes: Mutex<VecDeque<BackendStatus>>,
    user: Mutex<Option<String>>,
    saved: Mutex<Vec<(String, AssessmentUpdate)>>,
    hold: Mutex<Option<Arc<Notify>>>,
    dataset_called: Notify,
    dataset_calls: AtomicUsize,
    session_calls: AtomicUsize,
    initialize_calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn push_dataset(&self, reply: Result<DatasetPayload, SyncError>) {
        self.datasets.lock().unwrap().push_back(reply);
    }

    pub fn push_search(&self, reply: Result<Vec<AssessmentRecord>, SyncError>) {
        self.searches.lock().unwrap().push_back(reply);
    }

    pub fn push_save(&self, reply: Result<SavedAssessment, SyncError>) {
        self.saves.lock().unwrap().push_back(reply);
    }

    pub fn push_session(&self, status: BackendStatus) {
        self.sessions.lock().unwrap().push_back(status);
    }

    pub fn push_initialize(&self, status: BackendStatus) {
        self.initializes.lock().unwrap().push_back(status);
    }

    pub fn set_user(&self, user: &str) {
        *self.user.lock().unwrap() = Some(user.to_string());
    }

    /// Make the next dataset fetch wait until the returned handle is notified.
    pub fn hold_next_dataset(&self) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        *self.hold.lock().unwrap() = Some(release.clone());
        release
    }

    /// Resolve once a dataset fetch has started.
    pub async fn wait_for_dataset_call(&self) {
        self.dataset_called.notified().await;
    }

    pub fn saved_updates(&self) -> Vec<(String, AssessmentUpdate)> {
        self.saved.lock().unwrap().clone()
    }

    pub fn dataset_calls(&self) -> usize {
        self.dataset_calls.load(Ordering::SeqCst)
    }

    pub fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    pub fn initialize_calls(&self) -> usize {
        self.initialize_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn fetch_dataset(
        &self,
        _criteria: &ExtractionCriteria,
    ) -> Result<DatasetPayload, SyncError> {
        self.dataset_calls.fetch_add(1, Ordering::SeqCst);
        self.dataset_called.notify_one();
        let hold = self.hold.lock().unwrap().take();
        if let Some(release) = hold {
            release.notified().await;
        }
        let reply = self.datasets.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| Ok(DatasetPayload::default()))
    }

    async fn search(&self, _filters: &SearchFilters) -> Result<Vec<AssessmentRecord>, SyncError> {
        let reply = self.searches.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn save_assessment(
        &self,
        external_id: &str,
        update: &AssessmentUpdate,
    ) -> Result<SavedAssessment, SyncError> {
        self.saved
            .lock()
            .unwrap()
            .push((external_id.to_string(), update.clone()));
        let reply = self.saves.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| {
            Ok(SavedAssessment {
                assessment_result: update.assessment_result,
                reason_conclusion: update.reason_conclusion,
                assessment_date: None,
            })
        })
    }

    async fn export_artifact(&self, format: ExportFormat) -> Result<Vec<u8>, SyncError> {
        Ok(format!("artifact:{}", format.path_segment()).into_bytes())
    }

    async fn current_user(&self) -> Result<Option<String>, SyncError> {
        Ok(self.user.lock().unwrap().clone())
    }

    async fn initialize(&self) -> Result<BackendStatus, SyncError> {
        self.initialize_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.initializes.lock().unwrap().pop_front();
        Ok(reply.unwrap_or_else(|| BackendStatus::new("success", None)))
    }

    async fn check_session(&self) -> Result<BackendStatus, SyncError> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.sessions.lock().unwrap().pop_front();
        Ok(reply.unwrap_or_else(|| BackendStatus::new("active", None)))
    }

    async fn recertify(&self) -> Result<RecertifyReport, SyncError> {
        Ok(RecertifyReport {
            success: true,
            message: Some("Recertificação concluída".to_string()),
            stats: serde_json::json!({"processados": 2}),
        })
    }
}
