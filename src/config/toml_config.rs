use crate::adapters::http::DEFAULT_BASE_URL;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{DogHouseError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// File form of the run settings.
///
/// ```toml
/// [api]
/// base_url = "http://dogs.magnet.cl"
/// timeout_seconds = 30
///
/// [auth]
/// token = "${DOGHOUSE_TOKEN}"
///
/// [report]
/// output_path = "./output"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    pub report: Option<ReportConfig>,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    pub token: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub output_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub monitor: bool,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DogHouseError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DOGHOUSE_TOKEN})；未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 命令列參數優先於檔案設定
    #[cfg(feature = "cli")]
    pub fn merge_cli(&mut self, cli: &crate::config::CliConfig) {
        if let Some(base_url) = &cli.base_url {
            self.api.base_url = base_url.clone();
        }
        if let Some(timeout) = cli.timeout_seconds {
            self.api.timeout_seconds = Some(timeout);
        }
        if let Some(token) = &cli.token {
            self.auth.token = Some(token.clone());
        }
        if let Some(email) = &cli.email {
            self.auth.email = Some(email.clone());
        }
        if let Some(password) = &cli.password {
            self.auth.password = Some(password.clone());
        }
        if let Some(output_path) = &cli.output_path {
            self.report = Some(ReportConfig {
                output_path: output_path.clone(),
            });
        }
        self.run.dry_run |= cli.dry_run;
        self.run.monitor |= cli.monitor;
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.run.monitor
    }
}

fn unresolved(field: &str, value: &str) -> Result<()> {
    match env_var_pattern().captures(value) {
        Some(caps) => Err(DogHouseError::ConfigValidationError {
            field: field.to_string(),
            message: format!("environment variable {} is not set", &caps[1]),
        }),
        None => Ok(()),
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        unresolved("api.base_url", &self.api.base_url)?;
        validation::validate_url("api.base_url", &self.api.base_url)?;

        if let Some(timeout) = self.api.timeout_seconds {
            validation::validate_range("api.timeout_seconds", timeout, 1, 300)?;
        }

        for (field, value) in [
            ("auth.token", &self.auth.token),
            ("auth.email", &self.auth.email),
            ("auth.password", &self.auth.password),
        ] {
            if let Some(value) = value {
                unresolved(field, value)?;
            }
        }

        validation::validate_credentials(self.auth.email.as_deref(), self.auth.password.as_deref())?;

        if let Some(report) = &self.report {
            validation::validate_path("report.output_path", &report.output_path)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.api.base_url
    }

    fn token(&self) -> Option<&str> {
        self.auth.token.as_deref().filter(|t| !t.is_empty())
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        self.auth.email.as_deref().zip(self.auth.password.as_deref())
    }

    fn timeout(&self) -> Option<Duration> {
        self.api.timeout_seconds.map(Duration::from_secs)
    }

    fn output_path(&self) -> Option<&str> {
        self.report.as_ref().map(|r| r.output_path.as_str())
    }

    fn dry_run(&self) -> bool {
        self.run.dry_run
    }
}
