//! Output format tests.
//!
//! A tool call yields exactly one text content item. On success it is the
//! saved path and `is_error` is false; on failure it is a message prefixed
//! with the error category and `is_error` is true.

use rmcp::model::{CallToolResult, RawContent};

/// Extracts the single text item of a result, rejecting anything else.
fn single_text(result: &CallToolResult) -> Result<&str, String> {
    match result.content.as_slice() {
        [item] => match &item.raw {
            RawContent::Text(text) if !text.text.is_empty() => Ok(text.text.as_str()),
            RawContent::Text(_) => Err("Text content should not be empty".to_string()),
            other => Err(format!("Expected text content, got {:?}", other)),
        },
        items => Err(format!("Expected exactly one content item, got {}", items.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_config;
    use genimage_mcp::ImageServer;
    use genimage_mcp::handler::GenerateImageParams;
    use genimage_mcp_common::error::{ConfigError, Error};
    use genimage_mcp::server::error_text;
    use rmcp::model::Content;

    #[test]
    fn test_single_text_helper() {
        let ok = CallToolResult::success(vec![Content::text("/tmp/a.png")]);
        assert_eq!(single_text(&ok).unwrap(), "/tmp/a.png");

        let two = CallToolResult::success(vec![Content::text("a"), Content::text("b")]);
        assert!(single_text(&two).is_err());
    }

    #[test]
    fn test_error_text_per_category() {
        let cases: Vec<(Error, &str)> = vec![
            (ConfigError::NoDestination("OUTPUT_IMAGE_PATH".to_string()).into(), "configuration error: "),
            (Error::api("http://x", 500, "boom"), "upstream error: "),
            (Error::no_image("nothing"), "upstream error: "),
            (Error::decode("bad bytes"), "decode error: "),
            (Error::storage("/ro/a.png", std::io::Error::other("read-only")), "storage error: "),
            (Error::validation("prompt: Prompt cannot be empty"), "validation error: "),
        ];
        for (err, prefix) in cases {
            let text = error_text(&err);
            assert!(text.starts_with(prefix), "'{}' should start with '{}'", text, prefix);
        }
    }

    #[tokio::test]
    async fn test_missing_destination_is_tagged_error() {
        let server = ImageServer::new(test_config()).unwrap();
        let result = server
            .generate_image(GenerateImageParams {
                prompt: "a cat".to_string(),
                destination_directory: None,
                filename: None,
            })
            .await;

        assert_eq!(result.is_error, Some(true));
        let text = single_text(&result).unwrap();
        assert!(text.starts_with("configuration error: "), "{}", text);
        assert!(text.contains("OUTPUT_IMAGE_PATH"), "{}", text);
    }
}
