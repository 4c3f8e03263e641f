//! `vulnscan scan <URL>`
//!
//! Drives one scan session: the session owns validation, the request and the
//! simulated progress, this command only watches it and renders.

use anyhow::Result;
use clap::Args;
use indicatif::ProgressBar;
use tokio::sync::watch;

use crate::cli::Output;
use crate::config::{CliOverrides, ClientConfig};
use crate::scan::{HttpScanService, ScanMode, ScanSession, SessionView, SubmitOutcome, ThreatLevel};

#[derive(Args)]
pub struct ScanArgs {
    /// Target URL (http:// or https://)
    #[arg(value_name = "URL")]
    pub url: String,

    /// Scan depth
    #[arg(short, long, value_enum, default_value_t = ScanMode::Quick)]
    pub mode: ScanMode,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Scanning service address (overrides config)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Exit non-zero when the threat level is at or above LEVEL
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub fail_on: Option<ThreatLevel>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Styled report with progress bar
    Text,
    /// Serialized report for machine processing
    Json,
}

pub async fn execute(args: ScanArgs, output: &Output, config_path: Option<&str>) -> Result<()> {
    let overrides = CliOverrides {
        base_url: args.base_url.clone(),
        timeout_secs: args.timeout,
    };
    let config = ClientConfig::load_with_overrides(config_path, &overrides)?;
    config.validate()?;

    let service = HttpScanService::new(&config.service.base_url, config.request_timeout())?;
    let session = ScanSession::new(service, config.timing());
    session.set_url(args.url.as_str());
    session.set_mode(args.mode);

    output.verbose(&format!(
        "Submitting {} ({} scan) to {}",
        args.url, args.mode, config.service.base_url
    ));

    let bar = match args.format {
        OutputFormat::Text => output.scan_progress(&args.url),
        OutputFormat::Json => ProgressBar::hidden(),
    };

    let updates = session.subscribe();
    let (outcome, ()) = tokio::join!(session.submit(), follow_progress(updates, &bar));
    bar.finish_and_clear();

    match outcome {
        SubmitOutcome::Succeeded(report) => {
            match args.format {
                OutputFormat::Text => output.report(&report),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }

            match args.fail_on {
                Some(threshold) if report.threat_level >= threshold => anyhow::bail!(
                    "Threat level {} is at or above --fail-on {}",
                    report.threat_level,
                    threshold
                ),
                _ => Ok(()),
            }
        }
        SubmitOutcome::Invalid(err) => Err(err.into()),
        SubmitOutcome::Failed(err) => {
            tracing::debug!("Scan failed: {}", err);
            anyhow::bail!("{}", err.user_message())
        }
        // Fresh session, nothing can be pending yet
        SubmitOutcome::Ignored => Ok(()),
    }
}

/// Mirror the session onto `bar` until the scan leaves the pending state
async fn follow_progress(mut updates: watch::Receiver<SessionView>, bar: &ProgressBar) {
    let mut printed = 0;

    while updates.changed().await.is_ok() {
        let view = updates.borrow_and_update();
        if !view.state.is_pending() {
            break;
        }

        bar.set_position(view.progress.round() as u64);
        for line in view.logs.iter().skip(printed) {
            bar.println(format!("  {line}"));
        }
        printed = printed.max(view.logs.len());
    }
}
