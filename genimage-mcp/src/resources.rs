//! MCP Resources for the genimage server.
//!
//! - `image://models` - List supported image generation models

use genimage_mcp_common::models::{DEFAULT_MODEL, ModelApi, ModelRegistry};
use serde::Serialize;

/// URI of the models resource.
pub const MODELS_URI: &str = "image://models";

/// Information about a supported image generation model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    /// Model identifier
    pub id: &'static str,
    /// Model aliases
    pub aliases: Vec<&'static str>,
    /// Upstream method the model is called with
    pub api: ModelApi,
    /// What the model is
    pub description: &'static str,
    /// Whether the server uses this model when none is configured
    pub is_default: bool,
}

/// List all supported image generation models.
pub fn list_models() -> Vec<ModelInfo> {
    ModelRegistry::list()
        .iter()
        .map(|m| ModelInfo {
            id: m.id,
            aliases: m.aliases.to_vec(),
            api: m.api,
            description: m.description,
            is_default: m.id == DEFAULT_MODEL,
        })
        .collect()
}

/// Get models resource as JSON string.
pub fn models_resource_json() -> String {
    serde_json::to_string_pretty(&list_models()).unwrap_or_else(|_| "[]".to_string())
}
