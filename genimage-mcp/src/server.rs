//! MCP Server implementation for the genimage server.
//!
//! This module provides the MCP server handler that exposes:
//! - `generate_image` tool for text-to-image generation
//! - `image://models` resource listing supported models

use crate::handler::{GenerateImageParams, ImageHandler, StoredImageFile};
use crate::resources;
use genimage_mcp_common::config::Config;
use genimage_mcp_common::error::Error;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{
        CallToolResult, Content, ListResourcesResult, ListToolsResult, ReadResourceResult, ResourceContents,
        ServerCapabilities, ServerInfo, Tool,
    },
};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name of the single tool this server exposes.
pub const GENERATE_IMAGE_TOOL: &str = "generate_image";

/// MCP Server for image generation.
#[derive(Clone)]
pub struct ImageServer {
    handler: Arc<ImageHandler>,
}

impl ImageServer {
    /// Create a new ImageServer with the given configuration.
    ///
    /// # Errors
    /// Fails when the configuration cannot produce a handler, e.g. an empty
    /// API key. No upstream call is made.
    pub fn new(config: Config) -> Result<Self, Error> {
        Ok(Self::from_handler(ImageHandler::new(config)?))
    }

    /// Wrap an already configured handler.
    pub fn from_handler(handler: ImageHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Run the tool and fold every failure into an error result.
    pub async fn generate_image(&self, params: GenerateImageParams) -> CallToolResult {
        match self.handler.generate_image(params).await {
            Ok(stored) => success_result(&stored),
            Err(e) => {
                warn!(category = e.category(), error = %e, "Image generation failed");
                CallToolResult::error(vec![Content::text(error_text(&e))])
            }
        }
    }

    /// Tool definition advertised by `list_tools`.
    pub fn tool() -> Tool {
        use schemars::schema_for;

        let schema = schema_for!(GenerateImageParams);
        let input_schema = match serde_json::to_value(&schema).unwrap_or_default() {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        };

        Tool {
            name: Cow::Borrowed(GENERATE_IMAGE_TOOL),
            description: Some(Cow::Borrowed(
                "Generate an image from a text prompt and save it as a PNG file. \
                 Returns the path of the saved file.",
            )),
            input_schema,
            annotations: None,
            icons: None,
            meta: None,
            output_schema: None,
            title: None,
        }
    }
}

fn success_result(stored: &StoredImageFile) -> CallToolResult {
    CallToolResult::success(vec![Content::text(stored.path.display().to_string())])
}

/// Text sent back for a failed call: the error category, then the message.
pub fn error_text(error: &Error) -> String {
    format!("{} error: {}", error.category(), error)
}

impl ServerHandler for ImageServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Image generation server. Use generate_image to turn a text prompt \
                 into a PNG file on local disk; the result is the saved path."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                tools: vec![Self::tool()],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: rmcp::model::CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            match params.name.as_ref() {
                GENERATE_IMAGE_TOOL => {
                    let tool_params: GenerateImageParams = params
                        .arguments
                        .map(|args| serde_json::from_value(serde_json::Value::Object(args)))
                        .transpose()
                        .map_err(|e| McpError::invalid_params(format!("Invalid parameters: {}", e), None))?
                        .ok_or_else(|| McpError::invalid_params("Missing parameters", None))?;

                    info!("Handling generate_image call");
                    Ok(self.generate_image(tool_params).await)
                }
                _ => Err(McpError::invalid_params(format!("Unknown tool: {}", params.name), None)),
            }
        }
    }

    fn list_resources(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        async move {
            debug!("Listing resources");

            let models_resource = rmcp::model::Resource {
                raw: rmcp::model::RawResource {
                    uri: resources::MODELS_URI.to_string(),
                    name: "Available Image Models".to_string(),
                    title: None,
                    description: Some("Image generation models this server can call".to_string()),
                    mime_type: Some("application/json".to_string()),
                    size: None,
                    icons: None,
                    meta: None,
                },
                annotations: None,
            };

            Ok(ListResourcesResult {
                resources: vec![models_resource],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn read_resource(
        &self,
        params: rmcp::model::ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            let uri = &params.uri;
            debug!(uri = %uri, "Reading resource");

            let content = match uri.as_str() {
                resources::MODELS_URI => resources::models_resource_json(),
                _ => {
                    return Err(McpError::resource_not_found(
                        format!("Unknown resource: {}", uri),
                        None,
                    ));
                }
            };

            Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(content, uri.clone())],
            })
        }
    }
}
