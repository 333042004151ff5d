//! Configuration module for loading environment variables and settings.

use crate::error::ConfigError;
use crate::models::{DEFAULT_MODEL, ModelApi, ModelRegistry};
use std::path::PathBuf;

/// Environment variable holding the upstream API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Environment variable holding the default output directory.
pub const OUTPUT_DIR_VAR: &str = "OUTPUT_IMAGE_PATH";
/// Environment variable selecting the image model.
pub const MODEL_VAR: &str = "GEMINI_IMAGE_MODEL";
/// Environment variable overriding the upstream base URL.
pub const BASE_URL_VAR: &str = "GEMINI_API_BASE_URL";
/// Environment variable enabling the display step.
pub const SHOW_IMAGE_VAR: &str = "SHOW_IMAGE";

/// Default Generative Language API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration loaded from environment variables.
///
/// Read once at startup and injected into the server; never mutated.
#[derive(Clone)]
pub struct Config {
    /// Upstream API key (required)
    pub api_key: String,
    /// Canonical model identifier
    pub model: String,
    /// Upstream method the model is served by
    pub model_api: ModelApi,
    /// Base URL of the Generative Language API, without trailing slash
    pub api_base_url: String,
    /// Default destination directory for generated images
    pub output_dir: Option<PathBuf>,
    /// Whether to open saved images in the desktop viewer
    pub show_image: bool,
}

impl Config {
    /// Load configuration from environment variables and .env file.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingEnvVar` if GEMINI_API_KEY is not set, and
    /// `ConfigError::InvalidValue` for an unknown model or malformed flag.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = non_empty(API_KEY_VAR).ok_or_else(|| ConfigError::missing_env_var(API_KEY_VAR))?;

        let model_name = non_empty(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let (model, model_api) = ModelRegistry::resolve_api(&model_name).ok_or_else(|| {
            ConfigError::invalid_value(
                MODEL_VAR,
                format!("unknown model '{}', expected a gemini-* or imagen-* model", model_name),
            )
        })?;

        let api_base_url = non_empty(BASE_URL_VAR)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let output_dir = non_empty(OUTPUT_DIR_VAR).map(PathBuf::from);

        let show_image = match non_empty(SHOW_IMAGE_VAR) {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::invalid_value(SHOW_IMAGE_VAR, format!("expected a boolean, got '{}'", raw)))?,
            None => false,
        };

        Ok(Self {
            api_key,
            model,
            model_api,
            api_base_url,
            output_dir,
            show_image,
        })
    }

    /// Replace the configured model, e.g. from a command-line override.
    pub fn with_model(mut self, name: &str) -> Result<Self, ConfigError> {
        let (model, model_api) = ModelRegistry::resolve_api(name).ok_or_else(|| {
            ConfigError::invalid_value("model", format!("unknown model '{}'", name))
        })?;
        self.model = model;
        self.model_api = model_api;
        Ok(self)
    }

    /// Get the upstream endpoint URL for the configured model.
    pub fn model_endpoint(&self) -> String {
        format!(
            "{}/models/{}:{}",
            self.api_base_url,
            self.model,
            self.model_api.method()
        )
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("model_api", &self.model_api)
            .field("api_base_url", &self.api_base_url)
            .field("output_dir", &self.output_dir)
            .field("show_image", &self.show_image)
            .finish()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
