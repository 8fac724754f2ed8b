use pharmaguard_client::ServiceError;
use pharmaguard_common::Drug;
use thiserror::Error;

/// Rejected user input. Raised before anything touches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Only .vcf files are allowed.")]
    UnsupportedExtension { name: String },

    #[error("VCF file exceeds 5 MB limit.")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Supported drugs: {}", Drug::supported_list())]
    UnsupportedDrug { code: String },

    #[error("{0}")]
    IncompleteInput(MissingInput),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MissingInput {
    #[error("Please upload a VCF file.")]
    File,
    #[error("Please select at least one drug.")]
    Drug,
}

/// A failed analysis request, reduced to the one line the user gets to see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Structured `detail` returned by the backend.
    #[error("{0}")]
    ServerValidation(String),
    #[error("{0}")]
    NetworkUnreachable(String),
    #[error("{0}")]
    Unknown(String),
}

impl RequestError {
    pub fn message(&self) -> &str {
        match self {
            RequestError::ServerValidation(m)
            | RequestError::NetworkUnreachable(m)
            | RequestError::Unknown(m) => m,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to generate clinical report: {0}")]
    Report(#[source] ServiceError),

    #[error("Could not write export: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Short notice suitable for a toast or a warning line.
    pub fn user_message(&self) -> &'static str {
        match self {
            ExportError::Report(_) => "Failed to generate clinical report",
            _ => "Export failed. Please try again.",
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("An analysis has already been submitted; reset before starting another")]
    AlreadySubmitted,

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
