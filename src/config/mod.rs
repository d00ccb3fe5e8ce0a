mod loader;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::prompt::ToolKind;

pub use loader::{apply_env_overrides, load_config};

/// Environment variable holding the upstream API key (required)
pub const API_KEY_ENV: &str = "TOGETHER_API_KEY";
/// Environment variable overriding the listen port
pub const PORT_ENV: &str = "PORT";
/// Environment variable overriding the upstream base URL
pub const API_BASE_ENV: &str = "TOGETHER_API_BASE";

pub const DEFAULT_TEXT_MODEL: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";
pub const DEFAULT_CHAT_MODEL: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";
pub const DEFAULT_CODE_MODEL: &str = "meta-llama/Llama-3-8b-chat-hf";

/// Main application configuration
///
/// Built once at startup (file, then environment, then CLI overrides) and
/// shared read-only with every request handler.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    /// Per-tool overrides of the built-in decoding profiles
    #[serde(default)]
    pub tools: HashMap<ToolKind, ToolOverride>,
    #[serde(default)]
    pub stats: StatsConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    /// Directory served for `GET /` and static assets
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_port() -> u16 {
    5000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            static_dir: default_static_dir(),
        }
    }
}

/// Upstream completion endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL of the OpenAI-compatible API (e.g., "https://api.together.xyz")
    #[serde(default = "default_backend_url")]
    pub url: String,
    /// Path of the chat completion endpoint, appended to `url`
    #[serde(default = "default_completions_path")]
    pub completions_path: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// API key for backend authentication, normally taken from `TOGETHER_API_KEY`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

fn default_backend_url() -> String {
    "https://api.together.xyz".to_string()
}

fn default_completions_path() -> String {
    "/v1/chat/completions".to_string()
}

fn default_timeout() -> u64 {
    20
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            completions_path: default_completions_path(),
            timeout_seconds: default_timeout(),
            api_key: None,
        }
    }
}

impl BackendConfig {
    /// Returns the base URL with trailing slash stripped
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Full URL of the chat completion endpoint
    pub fn completions_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url(),
            self.completions_path.trim_start_matches('/')
        )
    }

    /// Returns true if the URL uses HTTPS
    pub fn is_tls(&self) -> bool {
        self.url.to_lowercase().starts_with("https://")
    }
}

/// Model and decoding parameters used for one tool type
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ToolProfile {
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl ToolProfile {
    /// Built-in profile for a tool type
    pub fn default_for(kind: ToolKind) -> Self {
        let (model, temperature, top_p, max_tokens) = match kind {
            ToolKind::Text => (DEFAULT_TEXT_MODEL, 0.7, 0.7, 1000),
            ToolKind::Chat => (DEFAULT_CHAT_MODEL, 0.7, 0.9, 500),
            ToolKind::Code => (DEFAULT_CODE_MODEL, 0.3, 0.8, 1500),
            ToolKind::Summarize => (DEFAULT_TEXT_MODEL, 0.3, 0.8, 500),
            ToolKind::Translate => (DEFAULT_TEXT_MODEL, 0.2, 0.8, 800),
        };
        Self {
            model: model.to_string(),
            temperature,
            top_p,
            max_tokens,
        }
    }

    fn validate(&self, kind: ToolKind) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Validation(format!("tools.{}: model is empty", kind)));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Validation(format!(
                "tools.{}: temperature {} outside 0.0..=2.0",
                kind, self.temperature
            )));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "tools.{}: top_p {} outside (0.0, 1.0]",
                kind, self.top_p
            )));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Validation(format!(
                "tools.{}: max_tokens must be positive",
                kind
            )));
        }
        Ok(())
    }
}

/// Partial profile from the config file; unset fields keep the built-in value
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolOverride {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub top_p: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Stats logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatsConfig {
    #[serde(default = "default_stats_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub format: StatsFormat,
}

fn default_stats_enabled() -> bool {
    true
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            enabled: default_stats_enabled(),
            format: StatsFormat::default(),
        }
    }
}

/// Stats output format
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StatsFormat {
    Pretty,
    Json,
    #[default]
    Compact,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_config(path)
    }

    /// Load configuration from `config_path`, a default location, or built-in
    /// defaults, then apply environment overrides. Does not validate.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::load_or_default(config_path)?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration with fallback to default paths, then to defaults
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) => Self::from_file(path),
            None => {
                let default_paths = ["config.yaml", "config.yml", "./config/config.yaml"];
                for p in default_paths {
                    let path = Path::new(p);
                    if path.exists() {
                        return Self::from_file(path);
                    }
                }
                tracing::debug!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Effective profile for a tool type (built-in values plus overrides)
    pub fn tool_profile(&self, kind: ToolKind) -> ToolProfile {
        let mut profile = ToolProfile::default_for(kind);
        if let Some(o) = self.tools.get(&kind) {
            if let Some(ref model) = o.model {
                profile.model = model.clone();
            }
            if let Some(t) = o.temperature {
                profile.temperature = t;
            }
            if let Some(p) = o.top_p {
                profile.top_p = p;
            }
            if let Some(m) = o.max_tokens {
                profile.max_tokens = m;
            }
        }
        profile
    }

    /// The API key, if one is configured and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.backend
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Check the configuration is usable. Fails when no API key is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key().is_none() {
            return Err(ConfigError::MissingApiKey);
        }

        let parsed = url::Url::parse(&self.backend.url).map_err(|e| {
            ConfigError::Validation(format!("backend.url {:?}: {}", self.backend.url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "backend.url must use http or https, got {}",
                parsed.scheme()
            )));
        }

        if self.backend.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "backend.timeout_seconds must be positive".to_string(),
            ));
        }

        for kind in ToolKind::ALL {
            self.tool_profile(kind).validate(kind)?;
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Missing API key: set {API_KEY_ENV}")]
    MissingApiKey,
}
