//! Client for the remote scanning service
//!
//! The service exposes `POST /api/scan` and `GET /health`. Every way a scan
//! call can go wrong is folded into [`RequestError`], which the session turns
//! into a single user-facing message.

use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use super::types::{HealthStatus, ScanRequest, ScanResult};

const SCAN_PATH: &str = "/api/scan";
const HEALTH_PATH: &str = "/health";

/// Shown whenever the call never produced a usable answer
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check if the backend is running.";

/// Failure of one scan request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The request never reached the service, or timed out
    #[error("network failure: {reason}")]
    NetworkFailure { reason: String },

    /// The service answered with a non-2xx status
    #[error("server error {status} {status_text}")]
    ServerError {
        status: u16,
        status_text: String,
        message: Option<String>,
    },

    /// A 2xx answer whose body is not a scan result
    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },
}

impl RequestError {
    pub fn network(reason: impl Into<String>) -> Self {
        RequestError::NetworkFailure { reason: reason.into() }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        RequestError::MalformedResponse { reason: reason.into() }
    }

    /// The one line shown to the user for this failure
    pub fn user_message(&self) -> String {
        match self {
            RequestError::ServerError { message: Some(message), .. } => message.clone(),
            RequestError::ServerError { status_text, .. } => format!("Server error: {status_text}"),
            RequestError::NetworkFailure { .. } | RequestError::MalformedResponse { .. } => {
                NETWORK_ERROR_MESSAGE.to_string()
            }
        }
    }
}

/// Anything that can run a scan on behalf of the session
pub trait ScanService: Send + Sync + 'static {
    fn scan(&self, request: &ScanRequest) -> impl Future<Output = Result<ScanResult, RequestError>> + Send;
}

/// Optional error body of a failed scan, e.g. `{"error": "...", "message": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP implementation of [`ScanService`]
#[derive(Debug, Clone)]
pub struct HttpScanService {
    client: Client,
    base_url: String,
}

impl HttpScanService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RequestError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RequestError::network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Query the service's health endpoint
    pub async fn health(&self) -> Result<HealthStatus, RequestError> {
        let url = self.endpoint(HEALTH_PATH);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RequestError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(server_error(status, response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| RequestError::network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| RequestError::malformed(e.to_string()))
    }
}

impl ScanService for HttpScanService {
    async fn scan(&self, request: &ScanRequest) -> Result<ScanResult, RequestError> {
        let url = self.endpoint(SCAN_PATH);
        tracing::debug!(
            "POST {} url={} scanType={}",
            url,
            request.target_url(),
            request.scan_mode()
        );

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RequestError::network(format!("request timed out: {e}"))
                } else {
                    RequestError::network(e.to_string())
                }
            })?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(server_error(status, response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| RequestError::network(e.to_string()))?;
        parse_scan_result(&body)
    }
}

/// Decode a success body, rejecting scores the classifier cannot rank
pub fn parse_scan_result(body: &str) -> Result<ScanResult, RequestError> {
    let result: ScanResult =
        serde_json::from_str(body).map_err(|e| RequestError::malformed(e.to_string()))?;

    if !result.severity_score.is_finite() || result.severity_score < 0.0 {
        return Err(RequestError::malformed(format!(
            "severity_score must be a non-negative number, got {}",
            result.severity_score
        )));
    }

    Ok(result)
}

async fn server_error(status: StatusCode, response: reqwest::Response) -> RequestError {
    let message = match response.text().await {
        Ok(body) => serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty()),
        Err(_) => None,
    };

    RequestError::ServerError {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
        message,
    }
}
