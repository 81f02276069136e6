//! The backend as the review tool consumes it.

use async_trait::async_trait;
use fraudcheck_core::{
    AssessmentRecord, AssessmentUpdate, DatasetPayload, ExportFormat, ExtractionCriteria,
    SavedAssessment, SearchFilters,
};
use serde::Deserialize;

use crate::SyncError;

/// Status reply of the initialise and healthcheck endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackendStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl BackendStatus {
    pub fn new(status: &str, message: Option<&str>) -> Self {
        Self {
            status: status.to_string(),
            message: message.map(str::to_string),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// A healthcheck reporting a dead or missing backend session.
    pub fn is_invalid(&self) -> bool {
        self.status == "invalid"
    }
}

/// Outcome of a recertification run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecertifyReport {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stats: serde_json::Value,
}

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Run an extraction and return the parsed response.
    async fn fetch_dataset(&self, criteria: &ExtractionCriteria)
    -> Result<DatasetPayload, SyncError>;

    async fn search(&self, filters: &SearchFilters) -> Result<Vec<AssessmentRecord>, SyncError>;

    async fn save_assessment(
        &self,
        external_id: &str,
        update: &AssessmentUpdate,
    ) -> Result<SavedAssessment, SyncError>;

    async fn export_artifact(&self, format: ExportFormat) -> Result<Vec<u8>, SyncError>;

    /// Workstation user name, if the backend can tell.
    async fn current_user(&self) -> Result<Option<String>, SyncError>;

    async fn initialize(&self) -> Result<BackendStatus, SyncError>;

    async fn check_session(&self) -> Result<BackendStatus, SyncError>;

    async fn recertify(&self) -> Result<RecertifyReport, SyncError>;
}
