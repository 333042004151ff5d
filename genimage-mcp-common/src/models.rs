//! Model definitions and registry for the image generation backends.
//!
//! The Generative Language API serves two families of image models behind
//! different methods: Gemini models answer `generateContent` with inline
//! image parts, Imagen models answer `predict` with base64 predictions.

use serde::Serialize;

/// Upstream method used to call a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ModelApi {
    /// `models/{id}:generateContent`
    GenerateContent,
    /// `models/{id}:predict`
    Predict,
}

impl ModelApi {
    /// Method suffix appended to the model path.
    pub fn method(&self) -> &'static str {
        match self {
            ModelApi::GenerateContent => "generateContent",
            ModelApi::Predict => "predict",
        }
    }
}

/// Image generation model definition.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ImageModel {
    /// Full model identifier
    pub id: &'static str,
    /// Model aliases for convenience
    #[serde(skip)]
    pub aliases: &'static [&'static str],
    /// Upstream method this model is served by
    pub api: ModelApi,
    /// Human-readable description
    pub description: &'static str,
}

// =============================================================================
// Static Model Definitions
// =============================================================================

/// Gemini 2.0 Flash experimental image generation
pub const GEMINI_2_0_FLASH_EXP_IMAGE: ImageModel = ImageModel {
    id: "gemini-2.0-flash-exp-image-generation",
    aliases: &["gemini-2.0-flash-exp", "gemini-flash-image-exp"],
    api: ModelApi::GenerateContent,
    description: "Gemini 2.0 Flash with native image output (experimental)",
};

/// Gemini 2.0 Flash preview image generation
pub const GEMINI_2_0_FLASH_PREVIEW_IMAGE: ImageModel = ImageModel {
    id: "gemini-2.0-flash-preview-image-generation",
    aliases: &["gemini-2.0-flash-image"],
    api: ModelApi::GenerateContent,
    description: "Gemini 2.0 Flash with native image output (preview)",
};

/// Gemini 2.5 Flash Image
pub const GEMINI_2_5_FLASH_IMAGE: ImageModel = ImageModel {
    id: "gemini-2.5-flash-image",
    aliases: &["gemini-2.5-flash-image-preview", "gemini-flash-image"],
    api: ModelApi::GenerateContent,
    description: "Gemini 2.5 Flash Image",
};

/// Imagen 3.0 Generate model
pub const IMAGEN_3_0_GENERATE_002: ImageModel = ImageModel {
    id: "imagen-3.0-generate-002",
    aliases: &["imagen-3", "imagen-3.0", "imagen3"],
    api: ModelApi::Predict,
    description: "Imagen 3 text-to-image",
};

/// Imagen 4.0 Generate model
pub const IMAGEN_4_0_GENERATE_001: ImageModel = ImageModel {
    id: "imagen-4.0-generate-001",
    aliases: &["imagen-4", "imagen-4.0", "imagen4"],
    api: ModelApi::Predict,
    description: "Imagen 4 text-to-image",
};

/// All known image models
pub const IMAGE_MODELS: &[ImageModel] = &[
    GEMINI_2_0_FLASH_EXP_IMAGE,
    GEMINI_2_0_FLASH_PREVIEW_IMAGE,
    GEMINI_2_5_FLASH_IMAGE,
    IMAGEN_3_0_GENERATE_002,
    IMAGEN_4_0_GENERATE_001,
];

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = GEMINI_2_0_FLASH_EXP_IMAGE.id;

// =============================================================================
// Model Registry
// =============================================================================

/// Registry for resolving model names and aliases.
pub struct ModelRegistry;

impl ModelRegistry {
    /// Resolve a listed model by id or alias (case-insensitive).
    pub fn resolve(name: &str) -> Option<&'static ImageModel> {
        let name = name.trim();
        IMAGE_MODELS.iter().find(|m| {
            m.id.eq_ignore_ascii_case(name) || m.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
        })
    }

    /// Resolve a model name to its canonical id and upstream method.
    ///
    /// Unlisted ids are still accepted when their family can be inferred from
    /// the `gemini-` / `imagen-` prefix, since the upstream catalogue moves
    /// faster than this table.
    pub fn resolve_api(name: &str) -> Option<(String, ModelApi)> {
        if let Some(model) = Self::resolve(name) {
            return Some((model.id.to_string(), model.api));
        }

        let name = name.trim();
        let lower = name.to_ascii_lowercase();
        if lower.starts_with("imagen-") {
            Some((name.to_string(), ModelApi::Predict))
        } else if lower.starts_with("gemini-") {
            Some((name.to_string(), ModelApi::GenerateContent))
        } else {
            None
        }
    }

    /// List all known models.
    pub fn list() -> &'static [ImageModel] {
        IMAGE_MODELS
    }
}
