//! Image generation handler for the genimage MCP server.
//!
//! This module provides the `ImageHandler` struct and parameter types for
//! text-to-image generation through the Generative Language API. A call runs
//! request, ordered extraction, decode, save and optional display in that order.

use crate::response::{ExtractedImage, RawResponse, extract_image};
use crate::storage;
use crate::viewer::{ImageViewer, NoopViewer, SystemViewer};
use genimage_mcp_common::config::{API_KEY_VAR, Config};
use genimage_mcp_common::error::{ConfigError, Error};
use genimage_mcp_common::models::ModelApi;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Header carrying the static API key.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Number of images requested per call.
pub const IMAGES_PER_REQUEST: u8 = 1;

/// Text-to-image generation parameters.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GenerateImageParams {
    /// Text prompt describing the image to generate.
    pub prompt: String,

    /// Directory to save the image in. Created if missing.
    /// Defaults to the server's OUTPUT_IMAGE_PATH.
    #[serde(default, alias = "destinationDirectory", skip_serializing_if = "Option::is_none")]
    pub destination_directory: Option<String>,

    /// File name without directory. ".png" is appended unless present.
    /// When omitted a unique time-based name is chosen; when given, an
    /// existing file of the same name is overwritten.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Validation error details for image generation parameters.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl GenerateImageParams {
    /// Validate the parameters.
    ///
    /// # Returns
    /// - `Ok(())` if all parameters are valid
    /// - `Err(Vec<ValidationError>)` with all validation errors
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.prompt.trim().is_empty() {
            errors.push(ValidationError {
                field: "prompt".to_string(),
                message: "Prompt cannot be empty".to_string(),
            });
        }

        if let Some(name) = &self.filename {
            if let Err(message) = storage::validate_filename(name) {
                errors.push(ValidationError {
                    field: "filename".to_string(),
                    message,
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Image generation handler.
///
/// Holds the configuration it was built with; nothing is read from the
/// environment after construction.
pub struct ImageHandler {
    /// Application configuration.
    pub config: Config,
    /// HTTP client for API requests.
    pub http: reqwest::Client,
    viewer: Arc<dyn ImageViewer>,
}

impl ImageHandler {
    /// Create a new ImageHandler with the given configuration.
    ///
    /// The system viewer is used when `config.show_image` is set.
    ///
    /// # Errors
    /// Returns a configuration error if the API key is empty.
    #[instrument(level = "debug", name = "image_handler_new", skip_all)]
    pub fn new(config: Config) -> Result<Self, Error> {
        if config.api_key.trim().is_empty() {
            return Err(ConfigError::missing_env_var(API_KEY_VAR).into());
        }

        let viewer: Arc<dyn ImageViewer> = if config.show_image {
            Arc::new(SystemViewer)
        } else {
            Arc::new(NoopViewer)
        };

        info!(model = %config.model, show_image = config.show_image, "Initializing ImageHandler");

        Ok(Self {
            config,
            http: reqwest::Client::new(),
            viewer,
        })
    }

    /// Replace the display side effect.
    pub fn with_viewer(mut self, viewer: Arc<dyn ImageViewer>) -> Self {
        self.viewer = viewer;
        self
    }

    /// Upstream endpoint for the configured model.
    pub fn endpoint(&self) -> String {
        self.config.model_endpoint()
    }

    /// Generate one image from a text prompt and save it as PNG.
    ///
    /// # Returns
    /// * `Ok(StoredImageFile)` - Where the image was written and what it holds
    /// * `Err(Error)` - Validation, upstream, decode or storage failure.
    ///   No file is written unless the call succeeds.
    #[instrument(level = "info", name = "generate_image", skip(self, params), fields(model = %self.config.model))]
    pub async fn generate_image(&self, params: GenerateImageParams) -> Result<StoredImageFile, Error> {
        params.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            Error::validation(messages.join("; "))
        })?;

        let dir = storage::resolve_destination(
            params.destination_directory.as_deref(),
            self.config.output_dir.as_deref(),
        )?;
        storage::ensure_directory(&dir).await?;

        info!(prompt_len = params.prompt.len(), "Generating image");

        let response = self.request(params.prompt.trim()).await?;

        let notes: Vec<String> = response
            .text_fragments()
            .into_iter()
            .map(str::to_string)
            .collect();
        for note in &notes {
            info!(text = %note, "Model returned text");
        }

        let ExtractedImage { bytes, mime_type, shape } = extract_image(&response)?;
        debug!(shape, size = bytes.len(), "Extracted image payload");

        let (png, width, height) = tokio::task::spawn_blocking(move || -> Result<_, Error> {
            let image = image::load_from_memory(&bytes).map_err(|e| Error::decode(e.to_string()))?;
            let (width, height) = (image.width(), image.height());
            Ok((storage::encode_png(image)?, width, height))
        })
        .await
        .map_err(|e| Error::decode(e.to_string()))??;

        let target = storage::target_path(&dir, params.filename.as_deref()).await?;
        let bytes = storage::write_png(&png, &target).await?;
        let path = target.path;

        if self.config.show_image {
            if let Err(e) = self.viewer.show(&path).await {
                warn!(path = %path.display(), error = %e, "Failed to display image");
            }
        }

        info!(path = %path.display(), bytes, width, height, "Saved image");

        Ok(StoredImageFile {
            path,
            bytes,
            width,
            height,
            source_mime_type: mime_type,
            shape,
            notes,
        })
    }

    /// Send the prompt upstream and parse whatever comes back.
    async fn request(&self, prompt: &str) -> Result<RawResponse, Error> {
        let endpoint = self.endpoint();
        debug!(endpoint = %endpoint, api = ?self.config.model_api, "Calling image API");

        let builder = self
            .http
            .post(&endpoint)
            .header(API_KEY_HEADER, &self.config.api_key)
            .header("Content-Type", "application/json");
        let builder = match self.config.model_api {
            ModelApi::GenerateContent => builder.json(&GenerateContentRequest::new(prompt)),
            ModelApi::Predict => builder.json(&PredictRequest::new(prompt)),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| Error::api(&endpoint, 0, format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(&endpoint, status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::api(&endpoint, status.as_u16(), format!("Failed to read response: {}", e)))?;
        debug!(size = body.len(), "Received response");

        serde_json::from_str(&body).map_err(|e| {
            Error::api(&endpoint, status.as_u16(), format!("Failed to parse response: {}", e))
        })
    }
}

// =============================================================================
// API Request Types
// =============================================================================

/// `generateContent` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns; a single user turn here
    pub contents: Vec<GeminiContent>,
    /// Output modalities and candidate count
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Single-turn request asking for text and image output.
    pub fn new(prompt: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
                candidate_count: IMAGES_PER_REQUEST,
            },
        }
    }
}

/// One conversation turn.
#[derive(Debug, Serialize)]
pub struct GeminiContent {
    pub role: String,
    pub parts: Vec<GeminiPart>,
}

/// Text part of a turn.
#[derive(Debug, Serialize)]
pub struct GeminiPart {
    pub text: String,
}

/// Generation settings for `generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
    pub candidate_count: u8,
}

/// `predict` request body.
#[derive(Debug, Serialize)]
pub struct PredictRequest {
    /// Input instances (prompts)
    pub instances: Vec<PredictInstance>,
    /// Generation parameters
    pub parameters: PredictParameters,
}

impl PredictRequest {
    /// Request for a single image.
    pub fn new(prompt: &str) -> Self {
        Self {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: IMAGES_PER_REQUEST,
            },
        }
    }
}

/// Imagen prompt instance.
#[derive(Debug, Serialize)]
pub struct PredictInstance {
    pub prompt: String,
}

/// Imagen parameters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters {
    /// Number of images to generate
    pub sample_count: u8,
}

// =============================================================================
// Result Types
// =============================================================================

/// An image written to disk by a successful call.
#[derive(Debug, Clone)]
pub struct StoredImageFile {
    /// Path of the PNG file
    pub path: PathBuf,
    /// Size of the file in bytes
    pub bytes: u64,
    /// Decoded width in pixels
    pub width: u32,
    /// Decoded height in pixels
    pub height: u32,
    /// MIME type reported upstream, if any
    pub source_mime_type: Option<String>,
    /// Name of the response shape the image came from
    pub shape: &'static str,
    /// Text fragments the model returned alongside the image
    pub notes: Vec<String>,
}
