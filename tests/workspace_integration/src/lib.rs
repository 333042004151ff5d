//! Workspace-level integration tests for the genimage MCP server.
//!
//! These tests verify:
//! - The server builds from configuration and advertises its capabilities
//! - Tool registration and schema generation
//! - The shape of tool results on success and failure

pub mod output_format;
pub mod server_startup;
pub mod tool_schema;

/// Configuration shared by the workspace tests. Points at an unroutable
/// upstream so nothing leaves the machine.
pub fn test_config() -> genimage_mcp_common::Config {
    genimage_mcp_common::Config {
        api_key: "test-key".to_string(),
        model: genimage_mcp_common::models::DEFAULT_MODEL.to_string(),
        model_api: genimage_mcp_common::ModelApi::GenerateContent,
        api_base_url: "http://127.0.0.1:9".to_string(),
        output_dir: None,
        show_image: false,
    }
}
