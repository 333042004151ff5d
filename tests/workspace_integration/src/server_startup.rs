//! Server startup integration tests.
//!
//! Tests that the MCP server can be instantiated and provides correct server info.

#[cfg(test)]
mod tests {
    use crate::test_config;
    use genimage_mcp::ImageServer;
    use genimage_mcp_common::{Config, ConfigError, Error, McpServerBuilder, Transport, shutdown_channel};
    use rmcp::ServerHandler;
    use std::time::Duration;

    #[test]
    fn test_image_server_startup() {
        let server = ImageServer::new(test_config()).unwrap();
        let info = server.get_info();

        let instructions = info.instructions.as_ref().unwrap().to_lowercase();
        assert!(
            instructions.contains("image"),
            "Server instructions should mention 'image'"
        );
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
    }

    #[test]
    fn test_missing_credential_blocks_startup() {
        let err = Config::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));

        let mut config = test_config();
        config.api_key = "   ".to_string();
        let err = ImageServer::new(config).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_from_lookup_builds_server() {
        let config = Config::from_lookup(|name| match name {
            "GEMINI_API_KEY" => Some("k".to_string()),
            "GEMINI_IMAGE_MODEL" => Some("imagen-4".to_string()),
            _ => None,
        })
        .unwrap();
        assert!(ImageServer::new(config).is_ok());
    }

    #[tokio::test]
    async fn test_http_server_stops_on_shutdown() {
        let server = ImageServer::new(test_config()).unwrap();
        let (tx, rx) = shutdown_channel();

        let handle = tokio::spawn(
            McpServerBuilder::new(server)
                .with_transport(Transport::http(0))
                .with_shutdown(rx)
                .run(),
        );

        tokio::time::sleep(Duration::from_millis(100)).await;
        let _ = tx.send(());

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("server did not stop in time")
            .expect("server task panicked");
        assert!(result.is_ok(), "{:?}", result);
    }
}
