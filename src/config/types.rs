use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub vertex: VertexConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default)]
    pub analysis_mode: AnalysisMode,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Connection settings for the Vertex AI `generateContent` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexConfig {
    #[serde(default = "default_project_id")]
    pub project_id: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Service-account key used for local development. Ignored when the
    /// file does not exist.
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,
    /// Overrides `https://{location}-aiplatform.googleapis.com`.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Response contract of `POST /analyze`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Structured six-section prompt, response carries timestamp, category
    /// and image name.
    #[default]
    Enriched,
    /// Prompt forwarded as-is, response carries only the analysis text.
    Minimal,
}

impl FromStr for AnalysisMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enriched" => Ok(Self::Enriched),
            "minimal" => Ok(Self::Minimal),
            other => Err(crate::Error::config(format!(
                "Invalid analysis mode: '{}'. Valid modes: enriched, minimal",
                other
            ))),
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enriched => f.write_str("enriched"),
            Self::Minimal => f.write_str("minimal"),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            analysis_mode: AnalysisMode::default(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for VertexConfig {
    fn default() -> Self {
        Self {
            project_id: default_project_id(),
            location: default_location(),
            model: default_model(),
            credentials_path: default_credentials_path(),
            base_url: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    64 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_project_id() -> String {
    "loyal-world-472411-s7".to_string()
}

fn default_location() -> String {
    "us-central1".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash-001".to_string()
}

fn default_credentials_path() -> String {
    "key.json".to_string()
}
