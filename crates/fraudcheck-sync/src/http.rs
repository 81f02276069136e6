//! HTTP gateway to the review backend.

use async_trait::async_trait;
use fraudcheck_core::{
    AssessmentRecord, AssessmentUpdate, DatasetPayload, ExportFormat, ExtractionCriteria,
    SavedAssessment, SearchFilters,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::gateway::{BackendStatus, Gateway, RecertifyReport};
use crate::SyncError;

/// HTTP client for the backend's extraction and assessment endpoints.
///
/// Keeps a cookie jar so the backend session survives across calls.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct CurrentUser {
    #[serde(default)]
    username: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl HttpGateway {
    /// Create a gateway for the given base URL.
    ///
    /// `base_url` should be like `http://localhost:5000` (no trailing slash).
    pub fn new(base_url: String) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-2xx reply into an error.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, SyncError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(error_reply(status.as_u16(), body))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SyncError> {
        let url = self.url(path);
        let resp = Self::check(self.client.get(&url).send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, SyncError>
    where
        B: serde::Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let resp = Self::check(self.client.post(&url).json(body).send().await?).await?;
        Ok(resp.json().await?)
    }
}

/// A non-2xx reply is always a server failure. The backend's own `message`
/// or `error` replaces the raw body when the body is JSON.
fn error_reply(status: u16, body: String) -> SyncError {
    let body = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            message: Some(message),
            ..
        })
        | Ok(ErrorBody {
            message: None,
            error: Some(message),
        }) => message,
        _ => body,
    };
    SyncError::Server { status, body }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn fetch_dataset(
        &self,
        criteria: &ExtractionCriteria,
    ) -> Result<DatasetPayload, SyncError> {
        info!(
            processes = criteria.process_numbers.len(),
            start = %criteria.start_date,
            end = %criteria.end_date,
            "requesting extraction"
        );
        let payload: DatasetPayload = self.post_json("/api/extract", criteria).await?;
        info!(
            status = payload.status.as_deref().unwrap_or("-"),
            records = payload.data.as_ref().map_or(0, Vec::len),
            "extraction response"
        );
        Ok(payload)
    }

    async fn search(&self, filters: &SearchFilters) -> Result<Vec<AssessmentRecord>, SyncError> {
        let rows: Vec<AssessmentRecord> =
            self.post_json("/fraudeCheck/api/search", filters).await?;
        info!(count = rows.len(), "assessment search");
        Ok(rows)
    }

    async fn save_assessment(
        &self,
        external_id: &str,
        update: &AssessmentUpdate,
    ) -> Result<SavedAssessment, SyncError> {
        let path = format!("/fraudeCheck/api/assessment/{external_id}");
        info!(external_id, result = %update.assessment_result, "saving assessment");
        self.post_json(&path, update).await
    }

    async fn export_artifact(&self, format: ExportFormat) -> Result<Vec<u8>, SyncError> {
        let url = self.url(&format!("/fraudeCheck/api/export/{}", format.path_segment()));
        info!(url = %url, "downloading export");
        let resp = Self::check(self.client.get(&url).send().await?).await?;
        let bytes = resp.bytes().await?;
        info!(bytes = bytes.len(), "export downloaded");
        Ok(bytes.to_vec())
    }

    async fn current_user(&self) -> Result<Option<String>, SyncError> {
        let user: CurrentUser = self.get_json("/fraudeCheck/api/current_user").await?;
        Ok(user.username)
    }

    async fn initialize(&self) -> Result<BackendStatus, SyncError> {
        info!("initialising backend session");
        self.post_json("/api/initialize", &serde_json::json!({})).await
    }

    async fn check_session(&self) -> Result<BackendStatus, SyncError> {
        self.get_json("/api/healthcheck").await
    }

    async fn recertify(&self) -> Result<RecertifyReport, SyncError> {
        info!("requesting fraud recertification");
        self.post_json("/fraudeCheck/api/recertify", &serde_json::json!({}))
            .await
    }
}
