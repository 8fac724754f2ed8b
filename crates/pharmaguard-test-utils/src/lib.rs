//! pharmaguard-test-utils — Shared fixtures and an in-memory `AnalysisService`
//! for exercising the workflow without a backend.

pub mod fixtures;

use async_trait::async_trait;
use pharmaguard_client::{AnalysisService, ServiceError};
use pharmaguard_common::{AnalysisPayload, AnalysisResult, CandidateFile, Drug};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// One recorded `analyze_vcf` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeCall {
    pub file_name: String,
    pub file_size: u64,
    pub drugs: Vec<Drug>,
}

/// Replays queued responses in order and records every call it receives.
///
/// An exhausted queue answers with a 500 so a test that issues more calls
/// than it scripted fails loudly instead of hanging.
pub struct ScriptedService {
    base_url: String,
    delay: Option<Duration>,
    analyses: Mutex<VecDeque<Result<AnalysisPayload, ServiceError>>>,
    reports: Mutex<VecDeque<Result<Vec<u8>, ServiceError>>>,
    health: Mutex<VecDeque<Result<bool, ServiceError>>>,
    analyze_calls: Mutex<Vec<AnalyzeCall>>,
    report_calls: Mutex<Vec<Vec<AnalysisResult>>>,
}

impl Default for ScriptedService {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedService {
    pub fn new() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            delay: None,
            analyses: Mutex::new(VecDeque::new()),
            reports: Mutex::new(VecDeque::new()),
            health: Mutex::new(VecDeque::new()),
            analyze_calls: Mutex::new(Vec::new()),
            report_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Hold every `analyze_vcf` call for `delay` (tokio time) before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_analysis(self, response: Result<AnalysisPayload, ServiceError>) -> Self {
        lock(&self.analyses).push_back(response);
        self
    }

    /// Queue a successful analysis decoded from raw backend JSON.
    pub fn with_analysis_json(self, body: serde_json::Value) -> Self {
        let payload = serde_json::from_value(body).map_err(ServiceError::from);
        self.with_analysis(payload)
    }

    pub fn with_report(self, response: Result<Vec<u8>, ServiceError>) -> Self {
        lock(&self.reports).push_back(response);
        self
    }

    pub fn with_health(self, response: Result<bool, ServiceError>) -> Self {
        lock(&self.health).push_back(response);
        self
    }

    pub fn analyze_calls(&self) -> Vec<AnalyzeCall> {
        lock(&self.analyze_calls).clone()
    }

    pub fn report_calls(&self) -> Vec<Vec<AnalysisResult>> {
        lock(&self.report_calls).clone()
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn unscripted() -> ServiceError {
    ServiceError::Api {
        status: 500,
        detail: Some(serde_json::Value::String("no scripted response".to_string())),
    }
}

#[async_trait]
impl AnalysisService for ScriptedService {
    async fn analyze_vcf(
        &self,
        file: &CandidateFile,
        drugs: &[Drug],
    ) -> Result<AnalysisPayload, ServiceError> {
        lock(&self.analyze_calls).push(AnalyzeCall {
            file_name: file.name().to_string(),
            file_size: file.size(),
            drugs: drugs.to_vec(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        lock(&self.analyses).pop_front().unwrap_or_else(|| Err(unscripted()))
    }

    async fn generate_clinical_report(
        &self,
        results: &[AnalysisResult],
    ) -> Result<Vec<u8>, ServiceError> {
        lock(&self.report_calls).push(results.to_vec());
        lock(&self.reports).pop_front().unwrap_or_else(|| Err(unscripted()))
    }

    async fn health_check(&self) -> Result<bool, ServiceError> {
        lock(&self.health).pop_front().unwrap_or(Ok(true))
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
