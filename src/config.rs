//! Application settings, read from an optional TOML file.
//!
//! ```toml
//! [charts]
//! primary_color = "#667eea"
//!
//! [ai]
//! model = "gpt-4o-mini"
//! api_key_env = "OPENAI_API_KEY"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{self, Rgb};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid colour '{0}', expected #rrggbb")]
    InvalidColor(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub app: AppSettings,
    pub charts: ChartSettings,
    pub loader: LoaderSettings,
    pub ai: AiSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub title: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            title: "Interactive Data Story Generator".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Fill colour for histograms and scatter points.
    pub primary_color: String,
    /// Plot height in points.
    pub height: f32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            primary_color: "#667eea".to_string(),
            height: 400.0,
        }
    }
}

impl ChartSettings {
    pub fn primary_rgb(&self) -> Rgb {
        color::parse_hex(&self.primary_color).unwrap_or(Rgb::new(0x66, 0x7e, 0xea))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    pub max_file_size_mb: u64,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            max_file_size_mb: 200,
        }
    }
}

impl LoaderSettings {
    pub fn max_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub model: String,
    pub max_tokens: u32,
    /// Chat-completions URL.
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Resolved from `api_key_env`; never read from or written to the file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 2000,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            timeout_secs: 30,
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
        }
    }
}

impl Settings {
    /// Defaults, overlaid with `path` when given, then the API key from the
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(p) => {
                let text = std::fs::read_to_string(p).map_err(|source| ConfigError::Io {
                    path: p.display().to_string(),
                    source,
                })?;
                log::info!("Loading configuration from {}", p.display());
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        settings.ai.api_key = std::env::var(&settings.ai.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Ok(settings)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(text)?;
        if color::parse_hex(&settings.charts.primary_color).is_none() {
            return Err(ConfigError::InvalidColor(settings.charts.primary_color));
        }
        Ok(settings)
    }
}
