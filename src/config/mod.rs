pub mod cli;
pub mod toml_config;

use crate::adapters::http::DEFAULT_BASE_URL;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use std::time::Duration;

#[cfg(feature = "cli")]
#[derive(Clone, Default, Parser)]
#[command(name = "dog-house")]
#[command(about = "Fetch dogs and breeds, aggregate them and submit the answer")]
pub struct CliConfig {
    /// API root, e.g. http://dogs.magnet.cl
    #[arg(long, env = "DOGHOUSE_BASE_URL")]
    pub base_url: Option<String>,

    /// JWT token for the protected endpoints
    #[arg(long, env = "DOGHOUSE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Account email; used with --password when no token is given
    #[arg(long)]
    pub email: Option<String>,

    #[arg(long, env = "DOGHOUSE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory for the answer.json report
    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Compute the answer without submitting it
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, help = "Log per-phase timing and memory")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("base_url", &self.base_url())
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("email", &self.email)
            .field("config", &self.config)
            .field("output_path", &self.output_path)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("dry_run", &self.dry_run)
            .field("monitor", &self.monitor)
            .finish()
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        self.email.as_deref().zip(self.password.as_deref())
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", self.base_url())?;

        if let Some(timeout) = self.timeout_seconds {
            validation::validate_range("timeout_seconds", timeout, 1, 300)?;
        }

        if let Some(path) = &self.output_path {
            validation::validate_path("output_path", path)?;
        }

        validation::validate_credentials(self.email.as_deref(), self.password.as_deref())
    }
}
