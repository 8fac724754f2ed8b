//! pharmaguard-common — Shared types used across all PharmaGuard crates.

pub mod drugs;
pub mod models;
pub mod upload;

// Re-export commonly used types
pub use drugs::{Drug, ParseDrugError, SUPPORTED_DRUGS};
pub use models::{
    AnalysisPayload, AnalysisResult, ClinicalRecommendation, LlmExplanation,
    PharmacogenomicProfile, RiskAssessment,
};
pub use upload::{CandidateFile, FileData};
