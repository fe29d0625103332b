use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::{AveragingPolicy, DailyRepeatPolicy};

/// Application-level constants
pub const APP_NAME: &str = "HealthVault";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix shared by every environment variable the server reads.
pub const ENV_PREFIX: &str = "HEALTHVAULT_";

/// Hosted inference models, highest priority first.
pub const DEFAULT_INFERENCE_MODELS: &[&str] = &[
    "gemini-2.5-flash-lite-preview-09-2025",
    "gemini-2.0-flash-exp",
    "gemini-1.5-flash",
    "gemini-1.5-pro",
];

pub const DEFAULT_GENERATIVE_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
pub const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_DB_BUSY_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,healthvault=debug"
}

/// Get the application data directory
/// ~/HealthVault/ on all platforms
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
}

/// Directory holding uploaded originals (object-store root).
pub fn objects_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("objects")
}

/// Path of the SQLite database file.
pub fn database_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("healthvault.db")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    /// Base URL under which stored objects are served (`{base}/{key}`).
    pub public_base_url: String,
    pub google_api_key: Option<String>,
    pub generative_base_url: String,
    pub inference_models: Vec<String>,
    pub ollama_url: Option<String>,
    pub ollama_model: Option<String>,
    pub inference_timeout: Duration,
    pub db_busy_timeout: Duration,
    pub max_upload_bytes: usize,
    pub averaging_policy: AveragingPolicy,
    pub daily_repeat_policy: DailyRepeatPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = app_data_dir();
        Self {
            public_base_url: format!("file://{}", objects_dir(&data_dir).display()),
            data_dir,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
            google_api_key: None,
            generative_base_url: DEFAULT_GENERATIVE_BASE_URL.to_string(),
            inference_models: DEFAULT_INFERENCE_MODELS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            ollama_url: None,
            ollama_model: None,
            inference_timeout: Duration::from_secs(DEFAULT_INFERENCE_TIMEOUT_SECS),
            db_busy_timeout: Duration::from_secs(DEFAULT_DB_BUSY_TIMEOUT_SECS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            averaging_policy: AveragingPolicy::NullAsZero,
            daily_repeat_policy: DailyRepeatPolicy::AwardOncePerDay,
        }
    }
}

impl AppConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}")).filter(|v| !v.trim().is_empty())
        };
        let mut config = Self::default();

        if let Some(dir) = var("DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
            config.public_base_url =
                format!("file://{}", objects_dir(&config.data_dir).display());
        }
        if let Some(addr) = var("BIND_ADDR") {
            config.bind_addr = addr.parse().map_err(|_| invalid("BIND_ADDR", &addr))?;
        }
        if let Some(url) = var("PUBLIC_BASE_URL") {
            config.public_base_url = url.trim_end_matches('/').to_string();
        }
        // The hosted API key keeps its conventional unprefixed name.
        config.google_api_key = lookup("GOOGLE_API_KEY").filter(|v| !v.trim().is_empty());
        if let Some(url) = var("GENERATIVE_BASE_URL") {
            config.generative_base_url = url;
        }
        if let Some(models) = var("INFERENCE_MODELS") {
            config.inference_models = models
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
        }
        config.ollama_url = var("OLLAMA_URL");
        config.ollama_model = var("OLLAMA_MODEL");
        if let Some(secs) = var("INFERENCE_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| invalid("INFERENCE_TIMEOUT_SECS", &secs))?;
            config.inference_timeout = Duration::from_secs(secs);
        }
        if let Some(bytes) = var("MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = bytes
                .parse()
                .map_err(|_| invalid("MAX_UPLOAD_BYTES", &bytes))?;
        }
        if let Some(policy) = var("AVERAGING_POLICY") {
            config.averaging_policy = policy
                .parse()
                .map_err(|_| invalid("AVERAGING_POLICY", &policy))?;
        }
        if let Some(policy) = var("DAILY_REPEAT_POLICY") {
            config.daily_repeat_policy = policy
                .parse()
                .map_err(|_| invalid("DAILY_REPEAT_POLICY", &policy))?;
        }

        Ok(config)
    }

    pub fn database_path(&self) -> PathBuf {
        database_path(&self.data_dir)
    }

    pub fn objects_dir(&self) -> PathBuf {
        objects_dir(&self.data_dir)
    }
}

fn invalid(name: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: format!("{ENV_PREFIX}{name}"),
        value: value.to_string(),
    }
}
