//! # vulnscan - terminal client for a web vulnerability scanning service
//!
//! Validates a target URL, submits it to a remote scanning service, animates
//! progress and an activity log while the scan runs, and renders the findings
//! grouped by severity.
//!
//! ## Quick Start
//!
//! ```bash
//! # Point at the scanning service and run a quick scan
//! vulnscan scan https://example.com --base-url http://localhost:8080
//!
//! # Deep scan, machine-readable output, fail CI on HIGH or worse
//! vulnscan scan https://example.com --mode deep --format json --fail-on high
//! ```
//!
//! The controller behind the CLI is [`scan::ScanSession`]; any front end can
//! drive it through `set_url`, `set_mode`, `submit` and `clear` and observe it
//! through [`scan::ScanSession::subscribe`].

pub mod cli;
pub mod config;
pub mod scan;

pub use cli::{Cli, Output};
pub use config::ClientConfig;

/// Result type alias for vulnscan operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
