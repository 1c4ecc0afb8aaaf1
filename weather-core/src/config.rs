use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::provider::weatherapi::WeatherApiProvider;

pub const API_KEY_ENV: &str = "WEATHER_API_KEY";
pub const SMTP_PASSWORD_ENV: &str = "WEATHER_SMTP_PASSWORD";

/// Weather API endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: WeatherApiProvider::DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Where the pipeline writes its output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub raw_data: PathBuf,
    pub parsed_data: PathBuf,
    pub report_log: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            raw_data: PathBuf::from("weather_data.txt"),
            parsed_data: PathBuf::from("parsed_data.json"),
            report_log: PathBuf::from("weather_forecast.txt"),
        }
    }
}

/// SMTP submission settings for the cold-weather alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub recipient_name: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from: String::new(),
            to: String::new(),
            recipient_name: String::new(),
        }
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LevelFilter,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: LevelFilter::Info, file: None }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// city = "Oslo"
/// alert_threshold_c = -10.0
///
/// [api]
/// api_key = "..."
///
/// [mail]
/// username = "alert@example.com"
/// password = "..."
/// from = "Weather Alert <alert@example.com>"
/// to = "someone@example.com"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub city: String,
    pub alert_threshold_c: f64,
    pub api: ApiConfig,
    pub files: FilesConfig,
    pub mail: Option<MailConfig>,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            city: "Oslo".to_string(),
            alert_threshold_c: -10.0,
            api: ApiConfig::default(),
            files: FilesConfig::default(),
            mail: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load config from the platform config dir, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Load config from `path`, or defaults if the file doesn't exist.
    /// Secrets from the environment take precedence over the file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            toml::from_str::<Config>(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        cfg.apply_env_overrides(|name| env::var(name).ok());
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.api.api_key = key;
        }
        let password = lookup(SMTP_PASSWORD_ENV).filter(|p| !p.is_empty());
        if let (Some(mail), Some(password)) = (self.mail.as_mut(), password) {
            mail.password = password;
        }
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-report", "weather-report")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns the API key, or an error with a hint on how to set one.
    pub fn api_key(&self) -> Result<&str> {
        if self.api.api_key.is_empty() {
            return Err(anyhow!(
                "No weather API key configured.\n\
                 Hint: run `weather-report configure` or set {API_KEY_ENV}."
            ));
        }
        Ok(&self.api.api_key)
    }
}
