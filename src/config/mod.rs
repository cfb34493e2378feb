pub mod cli;
pub mod toml_config;

use crate::core::sink::default_output_dir;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use toml_config::TomlConfig;

pub const DEFAULT_ENDPOINT: &str = "https://crt.sh";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved settings for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    pub endpoint: String,
    pub output_dir: String,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            output_dir: default_output_dir().display().to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl HarvestConfig {
    pub fn merge_toml(mut self, toml: &TomlConfig) -> Self {
        if let Some(endpoint) = &toml.source.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(timeout) = toml.source.timeout_seconds {
            self.timeout_secs = timeout;
        }
        if let Some(user_agent) = &toml.source.user_agent {
            self.user_agent = Some(user_agent.clone());
        }
        if let Some(directory) = &toml.output.directory {
            self.output_dir = directory.clone();
        }
        self
    }
}

impl ConfigProvider for HarvestConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn user_agent(&self) -> &str {
        self.user_agent
            .as_deref()
            .unwrap_or(concat!("subhunt/", env!("CARGO_PKG_VERSION")))
    }
}

impl Validate for HarvestConfig {
    fn validate(&self) -> Result<()> {
        validate_url("endpoint", &self.endpoint)?;
        validate_path("output_dir", &self.output_dir)?;
        validate_range("timeout_secs", self.timeout_secs, 1, 600)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "subhunt")]
#[command(about = "Find subdomains of a domain through certificate transparency logs")]
pub struct CliConfig {
    #[arg(help = "Target domain; prompted for when omitted")]
    pub domain: Option<String>,

    #[arg(long, help = "Certificate transparency search endpoint [default: https://crt.sh]")]
    pub endpoint: Option<String>,

    #[arg(long, help = "Directory for the results file [default: ~/Desktop/PYSITES]")]
    pub output_dir: Option<String>,

    #[arg(long, help = "Request timeout in seconds [default: 30]")]
    pub timeout_secs: Option<u64>,

    #[arg(long, help = "TOML config file; command-line flags take precedence")]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Defaults, then the config file, then explicit flags.
    pub fn resolve(&self) -> Result<HarvestConfig> {
        let mut config = HarvestConfig::default();

        if let Some(path) = &self.config {
            let toml = TomlConfig::from_file(path)?;
            toml.validate()?;
            tracing::debug!("Loaded config file {}", path);
            config = config.merge_toml(&toml);
        }

        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            config.timeout_secs = timeout;
        }

        config.validate()?;
        Ok(config)
    }
}
