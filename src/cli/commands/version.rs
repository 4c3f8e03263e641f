use anyhow::Result;
use clap::Args;

use crate::config::ClientConfig;

#[derive(Args)]
pub struct VersionArgs {
    /// Show detailed version information
    #[arg(short = 'd', long = "detailed")]
    pub detailed: bool,
}

pub async fn execute(args: VersionArgs, config_path: Option<&str>) -> Result<()> {
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    // A broken config should not hide the version itself
    match ClientConfig::load(config_path) {
        Ok(config) => println!("Service: {}", config.service.base_url),
        Err(err) => tracing::warn!("Could not load configuration: {:#}", err),
    }

    if args.detailed {
        println!("Rust Edition: 2024");
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Description: {}", env!("CARGO_PKG_DESCRIPTION"));
    }
    Ok(())
}
