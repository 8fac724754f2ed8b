//! Cosmetic progress display for a running analysis.
//!
//! The stage/hint indices advance on fixed timers and say nothing about how
//! far the backend really is. The ticking task is owned by `ProgressTicker`
//! and aborted when the ticker is dropped.

use pharmaguard_config::ProgressConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub const STAGES: [&str; 4] = [
    "Parsing VCF variants",
    "Matching drug–gene interactions",
    "Running pharmacogenomic analysis",
    "Generating clinical narrative",
];

pub const HINTS: [&str; 4] = [
    "Analyzing variants...",
    "Matching pharmacogenes...",
    "Computing phenotype...",
    "Preparing recommendation...",
];

pub const LAST_STAGE: usize = STAGES.len() - 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Index into [`STAGES`]; never past [`LAST_STAGE`].
    pub step: usize,
    /// Index into [`HINTS`].
    pub hint: usize,
    /// False once the request has settled (or before it starts).
    pub active: bool,
}

impl ProgressSnapshot {
    pub fn stage_label(&self) -> &'static str {
        STAGES[self.step.min(LAST_STAGE)]
    }

    pub fn hint_label(&self) -> &'static str {
        HINTS[self.hint % HINTS.len()]
    }
}

pub struct ProgressTicker {
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    /// Reset `tx` to the first stage and start ticking.
    pub fn start(config: &ProgressConfig, tx: Arc<watch::Sender<ProgressSnapshot>>) -> Self {
        tx.send_replace(ProgressSnapshot { step: 0, hint: 0, active: true });

        let step_period = Duration::from_millis(config.step_interval_ms.max(1));
        let hint_period = Duration::from_millis(config.hint_interval_ms.max(1));

        let handle = tokio::spawn(async move {
            let now = Instant::now();
            let mut steps = interval_at(now + step_period, step_period);
            let mut hints = interval_at(now + hint_period, hint_period);
            steps.set_missed_tick_behavior(MissedTickBehavior::Delay);
            hints.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = steps.tick() => {
                        tx.send_modify(|s| s.step = (s.step + 1).min(LAST_STAGE));
                    }
                    _ = hints.tick() => {
                        tx.send_modify(|s| s.hint = (s.hint + 1) % HINTS.len());
                    }
                }
            }
        });

        Self { handle }
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
