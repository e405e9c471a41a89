//! Configuration types for gasprice-admin

use crate::error::ValidationError;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable overriding `backend.api_key`
pub const API_KEY_ENV: &str = "GASPRICE_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub moderation: ModerationConfig,
    #[serde(default)]
    pub annotator: AnnotatorConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Managed backend connection
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Project URL
    pub url: String,
    /// Service key; may be left empty and supplied via `GASPRICE_API_KEY`
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

fn default_backend_timeout() -> u64 {
    10
}

/// Moderation settings
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationConfig {
    /// Threshold used when a request does not carry one
    #[serde(default = "default_deviation_threshold")]
    pub deviation_threshold: Decimal,

    /// Rows per page in list views
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Name recorded in the audit log
    #[serde(default = "default_actor")]
    pub actor: String,
}

fn default_deviation_threshold() -> Decimal {
    Decimal::new(5, 1) // 0.5 = 50%
}
fn default_page_size() -> u32 {
    crate::moderation::SUBMISSIONS_PER_PAGE
}
fn default_actor() -> String {
    "system".to_string()
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            deviation_threshold: default_deviation_threshold(),
            page_size: default_page_size(),
            actor: default_actor(),
        }
    }
}

/// Which narrative annotator to use
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnnotatorMode {
    Plain,
    #[default]
    Template,
    Http,
}

/// Narrative annotation settings
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotatorConfig {
    #[serde(default)]
    pub mode: AnnotatorMode,
    /// Text-generation endpoint, required for `http` mode
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_annotator_timeout")]
    pub timeout_secs: u64,
}

fn default_annotator_timeout() -> u64 {
    5
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            mode: AnnotatorMode::Template,
            endpoint: None,
            timeout_secs: default_annotator_timeout(),
        }
    }
}

/// Report output settings
#[derive(Debug, Clone, Deserialize)]
pub struct ReportsConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./reports")
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port; no exporter when absent
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, applying environment overrides
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse TOML text, apply environment overrides and validate
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Self::parse(content, std::env::var(API_KEY_ENV).ok())
    }

    fn parse(content: &str, api_key: Option<String>) -> anyhow::Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            config.backend.api_key = key;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject settings every command would trip over later
    pub fn validate(&self) -> Result<(), ValidationError> {
        let threshold = self.moderation.deviation_threshold;
        if threshold <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveThreshold(threshold));
        }
        if self.moderation.page_size == 0 {
            return Err(ValidationError::ZeroPageSize);
        }
        Ok(())
    }
}
