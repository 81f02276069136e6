//! Extraction controller: owns the table engine and serialises dataset loads.
//!
//! At most one extraction is in flight; a second request is rejected with a
//! warning rather than queued. Every snapshot replacement is tagged with the
//! generation current when its request started. Re-initialising the backend
//! session bumps the generation, so a response that completes afterwards is
//! discarded instead of overwriting newer state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use fraudcheck_core::{ExtractionCriteria, LoadOutcome, TabularViewEngine};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::gateway::{BackendStatus, Gateway};
use crate::notice::{Notice, NoticeLevel, Notices};
use crate::SyncError;

pub const MSG_BUSY: &str = "Uma extração já está em andamento";
pub const MSG_EMPTY: &str = "Nenhum processo encontrado";
pub const MSG_EXTRACTED: &str = "Extração concluída com sucesso!";
pub const MSG_EXTRACT_FAILED: &str = "Erro ao extrair processos";
pub const MSG_INIT_FAILED: &str = "Erro durante a inicialização";

/// Result of an extraction that reached the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    Loaded { records: usize, elapsed: Duration },
    Empty { elapsed: Duration },
    /// The session was re-initialised while the request was in flight.
    Stale,
}

#[derive(Debug, Default)]
struct State {
    engine: TabularViewEngine,
    extracting: bool,
    generation: u64,
}

pub struct ReviewController {
    gateway: Arc<dyn Gateway>,
    state: Mutex<State>,
    notices: Notices,
}

/// Clears the in-flight flag however the extraction ends, including when the
/// future is dropped mid-request.
struct ExtractionGuard<'a> {
    controller: &'a ReviewController,
}

impl Drop for ExtractionGuard<'_> {
    fn drop(&mut self) {
        self.controller.lock().extracting = false;
    }
}

impl ReviewController {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            state: Mutex::new(State::default()),
            notices: Notices::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Engine access ──

    /// Run synchronous view work (sort, filter, read) against the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut TabularViewEngine) -> R) -> R {
        f(&mut self.lock().engine)
    }

    pub fn is_extracting(&self) -> bool {
        self.lock().extracting
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn drain_notices(&self) -> Vec<Notice> {
        self.notices.drain()
    }

    // ── Extraction ──

    /// Validate criteria, fetch a dataset and replace the snapshot with it.
    ///
    /// On any failure the previous snapshot is left untouched.
    pub async fn extract(&self, criteria: &ExtractionCriteria) -> Result<ExtractOutcome, SyncError> {
        if let Err(e) = criteria.validate() {
            self.notices.push(NoticeLevel::Warning, e.to_string());
            return Err(e.into());
        }

        let generation = {
            let mut state = self.lock();
            if state.extracting {
                drop(state);
                warn!("extraction rejected: another one is in flight");
                self.notices.push(NoticeLevel::Warning, MSG_BUSY);
                return Err(SyncError::Busy);
            }
            state.extracting = true;
            state.generation
        };
        let _guard = ExtractionGuard { controller: self };

        let started = Instant::now();
        let result = self.gateway.fetch_dataset(criteria).await;
        let elapsed = started.elapsed();

        let payload = match result {
            Ok(payload) => payload,
            Err(SyncError::Backend(message)) => {
                self.notices.push(NoticeLevel::Error, message.clone());
                return Err(SyncError::Backend(message));
            }
            Err(e) => {
                warn!(error = %e, "extraction failed");
                self.notices
                    .push(NoticeLevel::Error, format!("{MSG_EXTRACT_FAILED}: {e}"));
                return Err(e);
            }
        };

        if !payload.is_success() {
            let message = payload
                .message
                .clone()
                .unwrap_or_else(|| MSG_EXTRACT_FAILED.to_string());
            warn!(message = %message, "backend rejected extraction");
            self.notices.push(NoticeLevel::Error, message.clone());
            return Err(SyncError::Backend(message));
        }

        let outcome = {
            let mut state = self.lock();
            if state.generation != generation {
                warn!(
                    started = generation,
                    current = state.generation,
                    "discarding stale extraction response"
                );
                return Ok(ExtractOutcome::Stale);
            }
            state.engine.load(payload)
        };

        info!(?outcome, elapsed_ms = elapsed.as_millis() as u64, "extraction applied");
        Ok(match outcome {
            LoadOutcome::Empty => {
                self.notices.push(NoticeLevel::Info, MSG_EMPTY);
                ExtractOutcome::Empty { elapsed }
            }
            LoadOutcome::Loaded(records) => {
                self.notices.push(NoticeLevel::Success, MSG_EXTRACTED);
                ExtractOutcome::Loaded { records, elapsed }
            }
        })
    }

    /// Drop the dataset and reset sort and filters.
    pub fn clear(&self) {
        self.lock().engine.clear();
    }

    // ── Session lifecycle ──

    /// Ask the backend to set up its session.
    pub async fn initialize(&self) -> Result<BackendStatus, SyncError> {
        match self.gateway.initialize().await {
            Ok(status) if status.is_success() => {
                info!("backend session ready");
                Ok(status)
            }
            Ok(status) => {
                let message = status
                    .message
                    .clone()
                    .unwrap_or_else(|| MSG_INIT_FAILED.to_string());
                self.notices.push(NoticeLevel::Error, message.clone());
                Err(SyncError::Backend(message))
            }
            Err(e) => {
                self.notices
                    .push(NoticeLevel::Error, format!("{MSG_INIT_FAILED}: {e}"));
                Err(e)
            }
        }
    }

    /// Check the backend session; an invalid one is re-initialised, and any
    /// extraction still in flight is marked stale.
    pub async fn check_session(&self) -> Result<BackendStatus, SyncError> {
        let status = self.gateway.check_session().await?;
        if status.is_invalid() {
            let generation = {
                let mut state = self.lock();
                state.generation += 1;
                state.generation
            };
            warn!(
                message = status.message.as_deref().unwrap_or("-"),
                generation, "backend session invalid, re-initialising"
            );
            self.initialize().await?;
        }
        Ok(status)
    }

    /// Run [`check_session`](Self::check_session) on a fixed interval until the
    /// handle is aborted.
    pub fn spawn_liveness(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = self.check_session().await {
                    warn!(error = %e, "session check failed");
                }
            }
        })
    }
}
