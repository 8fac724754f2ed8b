use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The backend answered with a non-success status.
    #[error("Request failed with status code {status}")]
    Api { status: u16, detail: Option<Value> },
    /// No response was received (connection refused, reset, DNS failure).
    #[error("Network Error: {0}")]
    Network(String),
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || (err.is_request() && err.status().is_none()) {
            ServiceError::Network(err.to_string())
        } else {
            ServiceError::Http(err)
        }
    }
}

impl ServiceError {
    /// Build an API error from an error response body. FastAPI-style bodies
    /// carry the interesting part in `detail`; a null detail counts as absent.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("detail").cloned())
            .filter(|d| !d.is_null());
        ServiceError::Api { status, detail }
    }

    pub fn detail(&self) -> Option<&Value> {
        match self {
            ServiceError::Api { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ServiceError::Network(_))
    }
}
