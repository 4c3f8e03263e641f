use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use crate::cli::Output;

pub mod config;
pub mod health;
pub mod scan;
pub mod version;

#[derive(Parser)]
#[command(
    name = "vulnscan",
    version = env!("CARGO_PKG_VERSION"),
    about = "Submit web targets to a vulnerability scanning service and review the findings",
    long_about = "vulnscan validates a target URL, submits it to a remote scanning service, \
                  shows progress while the scan runs and renders the findings by severity."
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a target URL
    Scan(scan::ScanArgs),
    /// Check that the scanning service is reachable
    Health(health::HealthArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Show version information
    Version(version::VersionArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        let config = self.config.as_deref();

        match self.command {
            Some(Commands::Scan(args)) => scan::execute(args, &output, config).await,
            Some(Commands::Health(args)) => health::execute(args, &output, config).await,
            Some(Commands::Config(args)) => config::execute(args, &output, config).await,
            Some(Commands::Version(args)) => version::execute(args, config).await,
            None => {
                Cli::command().print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,hyper=warn,reqwest=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,hyper=warn,hyper_util=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
