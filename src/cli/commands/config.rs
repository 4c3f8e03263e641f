use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::Output;
use crate::config::{ClientConfig, ConfigFormat};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Display current merged configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "toml")]
        format: ConfigFormat,
    },
    /// Validate the merged configuration
    Validate,
}

pub async fn execute(args: ConfigArgs, output: &Output, custom_config: Option<&str>) -> Result<()> {
    match args.command {
        ConfigCommand::Show { format } => {
            let config = ClientConfig::load(custom_config)?;
            print!("{}", config.export_config(format)?);
        }
        ConfigCommand::Validate => {
            let config = ClientConfig::load(custom_config)?;
            config.validate()?;

            output.success("Configuration is valid");
            output.key_value("Service:", &config.service.base_url, true);
            output.key_value("Timeout:", &format!("{}s", config.service.timeout_secs), false);
            output.key_value(
                "Progress:",
                &format!(
                    "every {}ms, up to +{} per tick, plateau {}%",
                    config.progress.tick_ms, config.progress.max_increment, config.progress.plateau
                ),
                false,
            );
            output.key_value("Activity log:", &format!("every {}ms", config.logs.cadence_ms), false);
        }
    }

    Ok(())
}
