use anyhow::Result;
use clap::Args;

use crate::cli::Output;
use crate::config::{CliOverrides, ClientConfig};
use crate::scan::HttpScanService;

#[derive(Args, Default)]
pub struct HealthArgs {
    /// Scanning service address (overrides config)
    #[arg(long)]
    pub base_url: Option<String>,
}

pub async fn execute(args: HealthArgs, output: &Output, config_path: Option<&str>) -> Result<()> {
    let overrides = CliOverrides {
        base_url: args.base_url,
        timeout_secs: None,
    };
    let config = ClientConfig::load_with_overrides(config_path, &overrides)?;
    config.validate()?;

    let service = HttpScanService::new(&config.service.base_url, config.request_timeout())?;
    let status = match service.health().await {
        Ok(status) => status,
        Err(err) => {
            tracing::debug!("Health check failed: {}", err);
            anyhow::bail!("{} ({})", err.user_message(), service.base_url());
        }
    };

    if !status.is_healthy() {
        anyhow::bail!("Service at {} reports status '{}'", service.base_url(), status.status);
    }

    output.success(&format!("Service at {} is {}", service.base_url(), status.status));
    if !status.service.is_empty() {
        output.key_value("Service:", &status.service, false);
    }
    Ok(())
}
