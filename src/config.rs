use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct FlashdeckConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub generation: GenerationConfig,
    pub review: ReviewConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GenerationConfig {
    /// Base URL of an OpenAI-compatible API, without the trailing
    /// `/chat/completions`.
    pub api_base: String,
    /// Usually supplied through `OPENAI_API_KEY` rather than the file.
    pub api_key: Option<String>,
    pub model: String,
    pub max_completion_tokens: u32,
    pub temperature: f32,
    pub request_timeout_secs: u64,
}

/// Parameters of the fixed-interval review rule.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReviewConfig {
    pub correct_interval_days: i64,
    pub incorrect_interval_days: i64,
    pub default_ease_factor: f64,
    pub ease_step_up: f64,
    pub ease_step_down: f64,
    pub ease_floor: f64,
    pub ease_ceiling: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_flashdeck_dir()
            .join("cards.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".into(),
            api_key: None,
            model: "gpt-4o".into(),
            max_completion_tokens: 1000,
            temperature: 1.0,
            request_timeout_secs: 60,
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            correct_interval_days: 3,
            incorrect_interval_days: 1,
            default_ease_factor: 2.5,
            ease_step_up: 0.1,
            ease_step_down: 0.2,
            ease_floor: 1.3,
            ease_ceiling: 3.0,
        }
    }
}

/// Longest review interval accepted from configuration (about a century).
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

impl ReviewConfig {
    /// Reject settings the review policy cannot honor.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.correct_interval_days > 0 && self.incorrect_interval_days > 0,
            "review intervals must be at least one day"
        );
        ensure!(
            self.correct_interval_days <= MAX_INTERVAL_DAYS
                && self.incorrect_interval_days <= MAX_INTERVAL_DAYS,
            "review intervals must not exceed {MAX_INTERVAL_DAYS} days"
        );
        ensure!(self.ease_floor > 0.0, "ease_floor must be positive");
        ensure!(
            self.ease_floor <= self.ease_ceiling,
            "ease_floor must not exceed ease_ceiling"
        );
        ensure!(
            (self.ease_floor..=self.ease_ceiling).contains(&self.default_ease_factor),
            "default_ease_factor must lie between ease_floor and ease_ceiling"
        );
        ensure!(
            self.ease_step_up >= 0.0 && self.ease_step_down >= 0.0,
            "ease steps must not be negative"
        );
        Ok(())
    }
}

/// Returns `~/.flashdeck/`, or `./.flashdeck/` when there is no home directory.
pub fn default_flashdeck_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".flashdeck")
}

/// Returns the default config file path: `~/.flashdeck/config.toml`
pub fn default_config_path() -> PathBuf {
    default_flashdeck_dir().join("config.toml")
}

impl FlashdeckConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            FlashdeckConfig::default()
        };

        config.apply_env_overrides();
        config.review.validate().context("invalid [review] settings")?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("FLASHDECK_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("FLASHDECK_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("FLASHDECK_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                if let Ok(port) = port.parse() {
                    self.server.host = host.to_string();
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("OPENAI_API_KEY") {
            self.generation.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("OPENAI_BASE_URL") {
            self.generation.api_base = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
