use serde::{Deserialize, Serialize};
use std::fmt;

use super::validator::ValidUrl;

/// Depth of analysis requested from the scanning service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Fast, basic checks
    #[default]
    Quick,
    /// Thorough analysis
    Deep,
    /// Full security audit
    Comprehensive,
}

impl ScanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanMode::Quick => "quick",
            ScanMode::Deep => "deep",
            ScanMode::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form values that have not been submitted yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanForm {
    pub url: String,
    pub mode: ScanMode,
}

/// Request body sent to `POST /api/scan`
///
/// Built from a validated form at submit time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRequest {
    url: String,
    #[serde(rename = "scanType")]
    scan_type: ScanMode,
}

impl ScanRequest {
    pub fn new(target: ValidUrl, mode: ScanMode) -> Self {
        Self {
            url: target.into_inner(),
            scan_type: mode,
        }
    }

    pub fn target_url(&self) -> &str {
        &self.url
    }

    pub fn scan_mode(&self) -> ScanMode {
        self.scan_type
    }
}

/// One reported vulnerability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub vuln_type: String,
    /// Free-form label; see [`super::severity::tier_of`]
    pub severity: String,
    pub description: String,
    pub location: String,
    pub recommendation: String,
}

/// Successful response of the scanning service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Findings in the order the service reported them
    pub vulnerabilities: Vec<Finding>,
    pub severity_score: f64,
    pub scan_duration_ms: u64,
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::validator::validate;

    #[test]
    fn test_request_wire_format() {
        let request = ScanRequest::new(validate("https://example.com").unwrap(), ScanMode::Quick);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body,
            serde_json::json!({"url": "https://example.com", "scanType": "quick"})
        );
    }

    #[test]
    fn test_result_from_service_json() {
        let body = r#"{
            "vulnerabilities": [{
                "vuln_type": "Missing HSTS Header",
                "severity": "Medium",
                "description": "HSTS header not found.",
                "location": "https://example.com",
                "recommendation": "Add Strict-Transport-Security"
            }],
            "severity_score": 4,
            "scan_duration_ms": 812
        }"#;

        let result: ScanResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.vulnerabilities.len(), 1);
        assert_eq!(result.vulnerabilities[0].severity, "Medium");
        assert_eq!(result.severity_score, 4.0);
        assert_eq!(result.scan_duration_ms, 812);
    }

    #[test]
    fn test_result_requires_all_fields() {
        let body = r#"{"vulnerabilities": [], "severity_score": 0}"#;
        assert!(serde_json::from_str::<ScanResult>(body).is_err());
    }

    #[test]
    fn test_health_status() {
        let health: HealthStatus =
            serde_json::from_str(r#"{"status":"healthy","service":"vulnerability-scanner"}"#).unwrap();
        assert!(health.is_healthy());

        let degraded = HealthStatus { status: "degraded".to_string(), service: String::new() };
        assert!(!degraded.is_healthy());
    }
}
