//! Assessment desk: the fraud board's search, save and export actions.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fraudcheck_core::{
    AssessmentBoard, AssessmentRecord, AssessmentResult, AssessmentUpdate, ExportFormat, Reason,
    SearchFilters,
};
use tracing::{info, warn};

use crate::gateway::{Gateway, RecertifyReport};
use crate::notice::{Notice, NoticeLevel, Notices};
use crate::SyncError;

pub const MSG_SAVED: &str = "Avaliação salva com sucesso!";
pub const MSG_SAVE_FAILED: &str = "Erro ao salvar avaliação";
pub const MSG_SEARCH_FAILED: &str = "Erro ao buscar avaliações";
pub const MSG_EXPORT_FAILED: &str = "Erro ao exportar dados";

pub struct AssessmentDesk {
    gateway: Arc<dyn Gateway>,
    board: Mutex<AssessmentBoard>,
    notices: Notices,
}

impl AssessmentDesk {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            board: Mutex::new(AssessmentBoard::default()),
            notices: Notices::default(),
        }
    }

    fn board(&self) -> MutexGuard<'_, AssessmentBoard> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn rows(&self) -> Vec<AssessmentRecord> {
        self.board().rows().to_vec()
    }

    pub fn drain_notices(&self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Replace the board with the rows matching `filters`.
    pub async fn search(&self, filters: &SearchFilters) -> Result<usize, SyncError> {
        let rows = match self.gateway.search(filters).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "assessment search failed");
                self.notices
                    .push(NoticeLevel::Error, format!("{MSG_SEARCH_FAILED}: {e}"));
                return Err(e);
            }
        };
        let count = rows.len();
        self.board().replace(rows);
        info!(count, "assessment board refreshed");
        Ok(count)
    }

    /// Save one assessment and merge the backend's echo into the board.
    ///
    /// The reviewer's name comes from the backend; a failed lookup saves the
    /// assessment unattributed.
    pub async fn save(
        &self,
        external_id: &str,
        result: AssessmentResult,
        reason: Option<Reason>,
    ) -> Result<AssessmentRecord, SyncError> {
        let process_number = self
            .board()
            .find(external_id)
            .map(|r| r.processo.clone())
            .unwrap_or_default();

        let username = match self.gateway.current_user().await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "could not resolve current user");
                None
            }
        };

        let update = AssessmentUpdate::new(process_number, result, reason, username);
        let saved = match self.gateway.save_assessment(external_id, &update).await {
            Ok(saved) => saved,
            Err(e) => {
                warn!(external_id, error = %e, "assessment save failed");
                self.notices
                    .push(NoticeLevel::Error, format!("{MSG_SAVE_FAILED}: {e}"));
                return Err(e);
            }
        };

        let row = self.board().apply_saved(external_id, saved)?.clone();
        self.notices.push(NoticeLevel::Success, MSG_SAVED);
        Ok(row)
    }

    /// Download the backend's rendering of the whole assessment table.
    pub async fn export(&self, format: ExportFormat) -> Result<Vec<u8>, SyncError> {
        self.gateway.export_artifact(format).await.inspect_err(|e| {
            self.notices
                .push(NoticeLevel::Error, format!("{MSG_EXPORT_FAILED}: {e}"));
        })
    }

    pub async fn recertify(&self) -> Result<RecertifyReport, SyncError> {
        let report = self.gateway.recertify().await?;
        let level = if report.success {
            NoticeLevel::Success
        } else {
            NoticeLevel::Error
        };
        if let Some(message) = &report.message {
            self.notices.push(level, message.clone());
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGateway;

    fn row(id: &str, processo: &str) -> AssessmentRecord {
        AssessmentRecord {
            external_id: id.into(),
            processo: processo.into(),
            assessment_date: None,
            assessment_result: AssessmentResult::Pendente,
            reason_conclusion: None,
        }
    }

    async fn desk_with_rows() -> (Arc<ScriptedGateway>, AssessmentDesk) {
        let gateway = Arc::new(ScriptedGateway::default());
        gateway.push_search(Ok(vec![row("10", "0001"), row("11", "0002")]));
        let desk = AssessmentDesk::new(gateway.clone());
        desk.search(&SearchFilters::default()).await.unwrap();
        (gateway, desk)
    }

    #[tokio::test]
    async fn search_replaces_board() {
        let (gateway, desk) = desk_with_rows().await;
        assert_eq!(desk.rows().len(), 2);

        gateway.push_search(Ok(vec![row("12", "0003")]));
        let count = desk.search(&SearchFilters::default()).await.unwrap();
        assert_eq!(count, 1);
        assert_eq!(desk.rows()[0].external_id, "12");
    }

    #[tokio::test]
    async fn save_defaults_reason_and_attributes_user() {
        let (gateway, desk) = desk_with_rows().await;
        gateway.set_user("revisor");

        let updated = desk
            .save("11", AssessmentResult::Positiva, None)
            .await
            .unwrap();
        assert_eq!(updated.assessment_result, AssessmentResult::Positiva);
        assert_eq!(updated.reason_conclusion, Some(Reason::IndividuoNaoConsta));

        let sent = gateway.saved_updates();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "11");
        assert_eq!(sent[0].1.process_number, "0002");
        assert_eq!(sent[0].1.username.as_deref(), Some("revisor"));
        assert_eq!(
            desk.drain_notices(),
            vec![Notice::new(NoticeLevel::Success, MSG_SAVED)]
        );
    }

    #[tokio::test]
    async fn pending_save_clears_reason() {
        let (_gateway, desk) = desk_with_rows().await;
        let updated = desk
            .save("10", AssessmentResult::Pendente, Some(Reason::DadosDivergentes))
            .await
            .unwrap();
        assert_eq!(updated.reason_conclusion, None);
    }

    #[tokio::test]
    async fn failed_save_leaves_row_untouched() {
        let (gateway, desk) = desk_with_rows().await;
        gateway.push_save(Err(SyncError::Backend("Avaliação não encontrada".into())));

        let err = desk
            .save("10", AssessmentResult::Negativa, Some(Reason::IndividuoConsta))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Backend(_)));
        assert_eq!(desk.rows()[0].assessment_result, AssessmentResult::Pendente);
        let notices = desk.drain_notices();
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(notices[0].message.starts_with(MSG_SAVE_FAILED));
    }

    #[tokio::test]
    async fn recertify_reports_backend_message() {
        let desk = AssessmentDesk::new(Arc::new(ScriptedGateway::default()));
        let report = desk.recertify().await.unwrap();
        assert!(report.success);
        assert_eq!(desk.drain_notices()[0].level, NoticeLevel::Success);
    }

    #[tokio::test]
    async fn export_returns_artifact_bytes() {
        let desk = AssessmentDesk::new(Arc::new(ScriptedGateway::default()));
        let bytes = desk.export(ExportFormat::Delimited).await.unwrap();
        assert_eq!(bytes, b"artifact:csv");
    }
}
