//! pharmaguard-workflow — The analysis workflow, from file and drug selection
//! through the remote analysis to the results view and exports.
//!
//! ```text
//! InputCollector ──UploadCandidate──▶ AnalysisOrchestrator ──ResultSet──▶ ResultsView
//!                                          │                                  │
//!                                   ProgressTicker                     export_json / export_pdf
//! ```

pub mod classify;
pub mod error;
pub mod export;
pub mod failure;
pub mod input;
pub mod orchestrator;
pub mod progress;
pub mod report;
pub mod results;

pub use classify::{
    phenotype_meta, risk_meta, ColorToken, GlowToken, PhenotypeCode, PhenotypeMeta, RiskLabel,
    RiskMeta,
};
pub use error::{ExportError, MissingInput, RequestError, ValidationError, WorkflowError};
pub use export::{export, export_json, export_pdf, Artifact, ExportFormat};
pub use failure::normalize_failure;
pub use input::{InputCollector, UploadCandidate, MAX_VCF_BYTES};
pub use orchestrator::{AnalysisOrchestrator, AnalysisPhase};
pub use progress::{ProgressSnapshot, ProgressTicker, HINTS, STAGES};
pub use report::{ReportView, ResultCard, ResultsView};
pub use results::{compute_stats, normalize, ResultSet, Stats};
