use serde::Deserialize;
use std::env;
use std::fs;

use crate::constants::{llm, retry};
use crate::error::ConfigError;

#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            api_key: None,
            base_url: None,
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_attempts: default_max_attempts(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct DisplayConfig {
    /// Number rendered set headers from zero instead of one
    #[serde(default)]
    pub zero_based_sets: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default = "default_schema_path")]
    pub schema_path: String,

    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            server: ServerConfig::default(),
            schema_path: default_schema_path(),
            llm: LlmConfig::default(),
            retry: RetryConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config.yaml")
    }

    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;

        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

        serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            path: path.to_string(),
            source,
        })
    }

    /// API key resolution: explicit config value first, then the
    /// GROQ_API_KEY environment variable. Credentials never live in code.
    pub fn resolved_api_key(&self) -> String {
        self.llm
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| env::var("GROQ_API_KEY").ok())
            .unwrap_or_default()
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_schema_path() -> String {
    "schemas/strategy_schema.json".to_string()
}

fn default_model() -> String {
    llm::DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    llm::DEFAULT_TEMPERATURE
}

fn default_max_attempts() -> u32 {
    retry::DEFAULT_MAX_ATTEMPTS
}
