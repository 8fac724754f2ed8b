//! Analysis service trait and the HTTP implementation.
//!
//! Endpoints (paths configurable, see `pharmaguard_config::ApiConfig`):
//!   POST /analyze/  multipart: `file` (VCF bytes) + `drugs` (comma-joined codes)
//!   POST /report/   JSON array of results -> PDF bytes
//!   GET  /healthz

use async_trait::async_trait;
use pharmaguard_common::{AnalysisPayload, AnalysisResult, CandidateFile, Drug, FileData};
use pharmaguard_config::ApiConfig;
use reqwest::Client;
use std::time::Duration;

use crate::error::ServiceError;

const VCF_MIME: &str = "text/plain";

#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Upload one VCF and run the analysis for every requested drug.
    /// The backend answers with either a single result or an array.
    async fn analyze_vcf(
        &self,
        file: &CandidateFile,
        drugs: &[Drug],
    ) -> Result<AnalysisPayload, ServiceError>;

    /// Render a clinical PDF report for a finished result set.
    async fn generate_clinical_report(
        &self,
        results: &[AnalysisResult],
    ) -> Result<Vec<u8>, ServiceError>;

    async fn health_check(&self) -> Result<bool, ServiceError>;

    /// Where the backend is expected to live; quoted in connectivity errors.
    fn base_url(&self) -> &str;
}

pub struct HttpAnalysisService {
    base_url: String,
    analyze_path: String,
    report_path: String,
    health_path: String,
    client: Client,
}

impl HttpAnalysisService {
    pub fn new(api: &ApiConfig) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(secs) = api.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            base_url: api.base_url.trim_end_matches('/').to_string(),
            analyze_path: api.analyze_path.clone(),
            report_path: api.report_path.clone(),
            health_path: api.health_path.clone(),
            client: builder.build().map_err(ServiceError::Http)?,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

async fn read_upload(file: &CandidateFile) -> Result<Vec<u8>, ServiceError> {
    match file.data() {
        FileData::Memory(bytes) => Ok(bytes.clone()),
        FileData::Path(path) => tokio::fs::read(path)
            .await
            .map_err(|source| ServiceError::Io { path: path.clone(), source }),
    }
}

/// Turn a non-success response into `ServiceError::Api`.
async fn check_response_status(resp: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ServiceError::from_response(status.as_u16(), &body))
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze_vcf(
        &self,
        file: &CandidateFile,
        drugs: &[Drug],
    ) -> Result<AnalysisPayload, ServiceError> {
        let bytes = read_upload(file).await?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file.name().to_string())
            .mime_str(VCF_MIME)?;
        let drug_list = drugs.iter().map(Drug::as_str).collect::<Vec<_>>().join(",");
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("drugs", drug_list);

        let url = self.endpoint(&self.analyze_path);
        tracing::debug!(%url, file = file.name(), size = file.size(), "Uploading VCF");

        let resp = self.client.post(&url).multipart(form).send().await?;
        let resp = check_response_status(resp).await?;
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn generate_clinical_report(
        &self,
        results: &[AnalysisResult],
    ) -> Result<Vec<u8>, ServiceError> {
        let url = self.endpoint(&self.report_path);
        tracing::debug!(%url, results = results.len(), "Requesting clinical report");

        let resp = self.client.post(&url).json(results).send().await?;
        let resp = check_response_status(resp).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    async fn health_check(&self) -> Result<bool, ServiceError> {
        let resp = self.client.get(self.endpoint(&self.health_path)).send().await?;
        Ok(resp.status().is_success())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(base_url: &str) -> HttpAnalysisService {
        HttpAnalysisService::new(&ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let s = service("http://localhost:8000/");
        assert_eq!(s.base_url(), "http://localhost:8000");
        assert_eq!(s.endpoint("/analyze/"), "http://localhost:8000/analyze/");
        assert_eq!(s.endpoint("healthz"), "http://localhost:8000/healthz");
    }

    #[tokio::test]
    async fn test_read_upload_missing_path_is_io_error() {
        let file = CandidateFile::from_bytes("x.vcf", b"##".to_vec());
        assert_eq!(read_upload(&file).await.unwrap(), b"##".to_vec());

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.vcf");
        std::fs::write(&missing, b"").unwrap();
        let file = CandidateFile::from_path(&missing).unwrap();
        std::fs::remove_file(&missing).unwrap();
        assert!(matches!(read_upload(&file).await, Err(ServiceError::Io { .. })));
    }

    #[tokio::test]
    async fn test_refused_connection_is_network_error() {
        // Bind then drop to get a port nothing listens on.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let s = service(&format!("http://127.0.0.1:{port}"));
        let err = s.health_check().await.unwrap_err();
        assert!(err.is_network(), "expected network error, got {err:?}");
    }
}
