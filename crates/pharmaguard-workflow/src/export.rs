//! Turn a result set into a downloadable artifact.
//!
//! Exports only read the `ResultSet`; nothing here mutates it. JSON and PDF
//! exports of the same results may run concurrently.

use pharmaguard_client::AnalysisService;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::ExportError;
use crate::results::ResultSet;

pub const JSON_FILE_NAME: &str = "pharmaguard_results.json";
pub const PDF_FILE_NAME: &str = "clinical_report.pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Pdf => "pdf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Hex SHA-256 of the artifact bytes.
    pub fn sha256(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        format!("{:x}", hasher.finalize())
    }

    /// Write into `dir` under `file_name`, replacing any existing file.
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        info!(
            path = %path.display(),
            bytes = self.bytes.len(),
            sha256 = %self.sha256(),
            "Export written"
        );
        Ok(path)
    }
}

/// Pretty-printed JSON array of the results, unknown fields included.
pub fn export_json(results: &ResultSet) -> Result<Artifact, ExportError> {
    let bytes = serde_json::to_vec_pretty(results)?;
    debug!(results = results.len(), bytes = bytes.len(), "JSON export built");
    Ok(Artifact {
        file_name: JSON_FILE_NAME.to_string(),
        media_type: "application/json",
        bytes,
    })
}

/// Ask the backend to render a clinical PDF for `results`.
pub async fn export_pdf(
    service: &dyn AnalysisService,
    results: &ResultSet,
) -> Result<Artifact, ExportError> {
    let bytes = service
        .generate_clinical_report(results.as_slice())
        .await
        .map_err(|e| {
            warn!(error = %e, "Clinical report generation failed");
            ExportError::Report(e)
        })?;
    debug!(results = results.len(), bytes = bytes.len(), "PDF export received");
    Ok(Artifact {
        file_name: PDF_FILE_NAME.to_string(),
        media_type: "application/pdf",
        bytes,
    })
}

pub async fn export(
    format: ExportFormat,
    service: &dyn AnalysisService,
    results: &ResultSet,
) -> Result<Artifact, ExportError> {
    match format {
        ExportFormat::Json => export_json(results),
        ExportFormat::Pdf => export_pdf(service, results).await,
    }
}
