//! Scan workflow
//!
//! Everything between a typed-in target and a classified report: validation,
//! the call to the scanning service, simulated progress and activity while it
//! runs, and severity classification of the result.

pub mod activity;
pub mod client;
pub mod progress;
pub mod report;
pub mod session;
pub mod severity;
pub mod timer;
pub mod types;
pub mod validator;


pub use client::{HttpScanService, RequestError, ScanService};
pub use report::ScanReport;
pub use session::{ScanSession, SessionState, SessionTiming, SessionView, SubmitOutcome};
pub use severity::{ThreatLevel, Tier, threat_level_of, tier_of};
pub use types::{Finding, ScanMode, ScanRequest, ScanResult};
pub use validator::{ValidUrl, ValidationError, validate};
