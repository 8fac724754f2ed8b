//! pharmaguard-client — Remote collaborators of the analysis workflow.
//! The `AnalysisService` trait is the seam the workflow depends on;
//! `HttpAnalysisService` talks to the PharmaGuard backend over HTTP.

pub mod error;
pub mod service;

pub use error::ServiceError;
pub use service::{AnalysisService, HttpAnalysisService};
