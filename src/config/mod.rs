//! Configuration management for vulnscan
//!
//! Settings are merged from embedded defaults, user and repository config
//! files, an explicit `--config` file, `VULNSCAN_` environment variables and
//! command-line flags, in that order of increasing priority.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::scan::SessionTiming;
use crate::scan::progress::ProgressSettings;

mod core;
mod formats;
mod smart_load;

pub use self::core::CliOverrides;
pub use formats::ConfigFormat;

/// Main configuration structure for vulnscan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Scanning service connection
    pub service: ServiceConfig,

    /// Simulated progress while waiting
    pub progress: ProgressConfig,

    /// Activity log while waiting
    pub logs: LogConfig,
}

/// Where the scanning service lives and how long to wait for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base address; requests go to `<base_url>/api/scan`
    pub base_url: String,

    /// Upper bound on one scan request (seconds)
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub tick_ms: u64,
    pub max_increment: f64,
    pub plateau: f64,
    pub grace_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub cadence_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_ms: 200,
            max_increment: 15.0,
            plateau: 95.0,
            grace_ms: 500,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { cadence_ms: 400 }
    }
}

impl ClientConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base_url = self.service.base_url.trim();
        if base_url.is_empty() {
            anyhow::bail!("service.base_url cannot be empty");
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!(
                "service.base_url must start with http:// or https:// (got '{}')",
                self.service.base_url
            );
        }
        if url::Url::parse(base_url).is_err() {
            anyhow::bail!("service.base_url is not a valid URL: {}", self.service.base_url);
        }

        if self.service.timeout_secs == 0 {
            anyhow::bail!("service.timeout_secs cannot be 0");
        }

        if self.progress.tick_ms == 0 {
            anyhow::bail!("progress.tick_ms cannot be 0");
        }
        if !(self.progress.max_increment >= 0.0 && self.progress.max_increment.is_finite()) {
            anyhow::bail!("progress.max_increment must be a non-negative number");
        }
        if !(self.progress.plateau > 0.0 && self.progress.plateau < 100.0) {
            anyhow::bail!("progress.plateau must be between 0 and 100 (exclusive)");
        }

        if self.logs.cadence_ms == 0 {
            anyhow::bail!("logs.cadence_ms cannot be 0");
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_secs)
    }

    /// Session timings derived from this configuration
    pub fn timing(&self) -> SessionTiming {
        SessionTiming {
            progress: ProgressSettings {
                tick: Duration::from_millis(self.progress.tick_ms),
                max_increment: self.progress.max_increment,
                plateau: self.progress.plateau,
                grace: Duration::from_millis(self.progress.grace_ms),
            },
            log_cadence: Duration::from_millis(self.logs.cadence_ms),
            request_timeout: self.request_timeout(),
        }
    }
}
