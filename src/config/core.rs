use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::Serialize;

use super::ClientConfig;
use super::smart_load;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Values given on the command line, applied on top of every other source
#[derive(Debug, Clone, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl CliOverrides {
    fn is_empty(&self) -> bool {
        self.base_url.is_none() && self.timeout_secs.is_none()
    }
}

#[derive(Serialize)]
struct OverrideLayer<'a> {
    service: &'a CliOverrides,
}

impl ClientConfig {
    pub fn load(custom_config: Option<&str>) -> Result<Self> {
        Self::load_with_overrides(custom_config, &CliOverrides::default())
    }

    pub fn load_with_overrides(custom_config: Option<&str>, overrides: &CliOverrides) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");

        let mut figment = Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG)) // Embedded defaults
            // User config - support multiple formats
            .merge(Toml::file(Self::user_config_path("toml")))
            .merge(Json::file(Self::user_config_path("json")))
            .merge(Yaml::file(Self::user_config_path("yaml")))
            .merge(Yaml::file(Self::user_config_path("yml")))
            // Repository config - support multiple formats
            .merge(Toml::file("vulnscan.toml"))
            .merge(Json::file("vulnscan.json"))
            .merge(Yaml::file("vulnscan.yaml"))
            .merge(Yaml::file("vulnscan.yml"));

        if let Some(custom_path) = custom_config {
            if !std::path::Path::new(custom_path).exists() {
                anyhow::bail!("Config file not found: {}", custom_path);
            }
            tracing::debug!("Using custom config file: {}", custom_path);
            figment = figment.merge(smart_load::auto(custom_path));
        }

        // Environment variables beat files, CLI flags beat everything
        figment = figment.merge(Env::prefixed("VULNSCAN_").split("__"));
        if !overrides.is_empty() {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides");
            figment = figment.merge(Serialized::defaults(OverrideLayer { service: overrides }));
        }

        let config: ClientConfig = figment
            .extract()
            .context("Failed to parse configuration")?;

        tracing::trace!("CONFIG LOAD: service.base_url = {}", config.service.base_url);
        Ok(config)
    }

    fn user_config_path(extension: &str) -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{}/.config/vulnscan/config.{}", home, extension),
            Err(_) => format!("~/.config/vulnscan/config.{}", extension),
        }
    }
}
