//! Drives one submission from `Idle` to `Succeeded` or `Failed`.

use pharmaguard_client::AnalysisService;
use pharmaguard_config::ProgressConfig;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{RequestError, WorkflowError};
use crate::failure::normalize_failure;
use crate::input::UploadCandidate;
use crate::progress::{ProgressSnapshot, ProgressTicker, LAST_STAGE};
use crate::results::ResultSet;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisPhase {
    Idle,
    /// The analysis call is outstanding.
    Submitted,
    Succeeded(ResultSet),
    /// Terminal for the submission; `reset` to start over.
    Failed(RequestError),
}

pub struct AnalysisOrchestrator {
    service: Arc<dyn AnalysisService>,
    progress_config: ProgressConfig,
    progress: Arc<watch::Sender<ProgressSnapshot>>,
    phase: AnalysisPhase,
}

impl AnalysisOrchestrator {
    pub fn new(service: Arc<dyn AnalysisService>, progress_config: ProgressConfig) -> Self {
        let (tx, _rx) = watch::channel(ProgressSnapshot::default());
        Self {
            service,
            progress_config,
            progress: Arc::new(tx),
            phase: AnalysisPhase::Idle,
        }
    }

    pub fn phase(&self) -> &AnalysisPhase {
        &self.phase
    }

    /// Follow the cosmetic stage/hint display.
    pub fn progress(&self) -> watch::Receiver<ProgressSnapshot> {
        self.progress.subscribe()
    }

    pub fn results(&self) -> Option<&ResultSet> {
        match &self.phase {
            AnalysisPhase::Succeeded(results) => Some(results),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&RequestError> {
        match &self.phase {
            AnalysisPhase::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Issue exactly one analysis call for `candidate`.
    ///
    /// Only accepted from `Idle`. No timeout is applied here; the call
    /// settles when the backend answers or the connection fails. If the
    /// returned future is dropped early, the progress ticker goes with it
    /// and the phase stays `Submitted` until `reset`.
    pub async fn submit(&mut self, candidate: UploadCandidate) -> Result<ResultSet, WorkflowError> {
        if !matches!(self.phase, AnalysisPhase::Idle) {
            return Err(WorkflowError::AlreadySubmitted);
        }

        let request_id = Uuid::new_v4();
        self.phase = AnalysisPhase::Submitted;
        info!(
            %request_id,
            file = candidate.file().name(),
            size = candidate.file().size(),
            drugs = ?candidate.drugs(),
            "Analysis submitted"
        );

        let ticker = ProgressTicker::start(&self.progress_config, self.progress.clone());
        let outcome = self
            .service
            .analyze_vcf(candidate.file(), candidate.drugs())
            .await;
        ticker.stop();

        match outcome {
            Ok(payload) => {
                let results = ResultSet::from_payload(payload);
                self.progress.send_modify(|s| {
                    s.step = LAST_STAGE;
                    s.active = false;
                });
                let stats = results.stats();
                info!(
                    %request_id,
                    total = stats.total,
                    safe = stats.safe_count,
                    adjust = stats.adjust_count,
                    high_risk = stats.toxic_or_ineffective_count,
                    "Analysis succeeded"
                );
                self.phase = AnalysisPhase::Succeeded(results.clone());
                Ok(results)
            }
            Err(err) => {
                let failure = normalize_failure(&err, self.service.base_url());
                self.progress.send_modify(|s| s.active = false);
                warn!(%request_id, error = %err, message = failure.message(), "Analysis failed");
                self.phase = AnalysisPhase::Failed(failure.clone());
                Err(WorkflowError::Request(failure))
            }
        }
    }

    /// "Try again": discard whatever the last submission left behind.
    pub fn reset(&mut self) {
        self.phase = AnalysisPhase::Idle;
        self.progress.send_replace(ProgressSnapshot::default());
    }
}
