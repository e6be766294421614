//! # Application Configuration
//!
//! This module defines the configuration structure for the `lyricsense-server`
//! and the logic for loading it from an optional `config.yml` file and the
//! environment. Every field has a default, so the server starts with no file
//! at all; only the provider credential is needed to actually analyze lyrics.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use tracing::info;

/// The environment variable holding the Gemini API key.
pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates an explicitly requested configuration file was not found.
    NotFound(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_port() -> u16 {
    5000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            provider: ProviderConfig::default(),
            analysis: AnalysisConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// The AI provider used for analysis.
#[derive(Deserialize, Clone)]
pub struct ProviderConfig {
    /// The type of provider. Only "gemini" is supported.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// The API URL. Derived from `model_name` when absent.
    #[serde(default)]
    pub api_url: Option<String>,
    /// The API key. Falls back to `GOOGLE_API_KEY`; may stay unset until a request needs it.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model_name")]
    pub model_name: String,
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_model_name() -> String {
    lyricsense::providers::ai::gemini::DEFAULT_GEMINI_MODEL.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_url: None,
            api_key: None,
            model_name: default_model_name(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .finish()
    }
}

/// Knobs for validation, prompting and extraction.
#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    #[serde(default = "default_min_lyrics_chars")]
    pub min_lyrics_chars: usize,
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,
    /// Replaces the built-in prompt. Must contain `{lyrics}`.
    #[serde(default)]
    pub prompt_template: Option<String>,
    /// Keeps only the first N sentences of each extracted section.
    #[serde(default)]
    pub max_sentences: Option<usize>,
}

fn default_min_lyrics_chars() -> usize {
    lyricsense::validation::MIN_LYRICS_CHARS
}

fn default_max_prompt_chars() -> usize {
    lyricsense::prompts::MAX_PROMPT_LYRICS_CHARS
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_lyrics_chars: default_min_lyrics_chars(),
            max_prompt_chars: default_max_prompt_chars(),
            prompt_template: None,
            max_sentences: None,
        }
    }
}

/// In-memory store settings. Unbounded when `max_entries` is unset.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub max_entries: Option<usize>,
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid substitution pattern: {e}")))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// - An explicit `config_path_override` must exist; the default
///   `config.yml` next to the crate manifest is optional.
/// - `PORT` overrides the port.
/// - Nested keys are overridden by `LYRICSENSE_...` variables
///   (e.g., `LYRICSENSE_PROVIDER__MODEL_NAME`).
/// - `GOOGLE_API_KEY` fills the provider key when nothing else set it.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder();

    let main_content = match config_path_override {
        Some(path) => Some(read_and_substitute(path)?.ok_or_else(|| {
            ConfigError::NotFound(format!("Config file not found at '{path}'."))
        })?),
        None => {
            let user_config_path = format!("{base_path}/config.yml");
            let content = read_and_substitute(&user_config_path)?;
            match &content {
                Some(_) => info!("Loading configuration from '{user_config_path}'."),
                None => info!("'{user_config_path}' not found. Using built-in defaults."),
            }
            content
        }
    };
    if let Some(content) = main_content {
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        // Load environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Load prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("LYRICSENSE")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    let key_missing = config
        .provider
        .api_key
        .as_deref()
        .map_or(true, str::is_empty);
    if key_missing {
        config.provider.api_key = env::var(GOOGLE_API_KEY_VAR)
            .ok()
            .filter(|key| !key.is_empty());
    }

    Ok(config)
}
