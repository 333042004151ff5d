//! Tool schema validity tests.
//!
//! Every registered tool carries a JSON schema of type object that lists its
//! required parameters with their types.

use serde_json::Value;

/// Validates that a JSON schema has the required structure.
fn validate_json_schema(schema: &Value) -> Result<(), String> {
    let obj = schema
        .as_object()
        .ok_or_else(|| "Schema must be an object".to_string())?;

    if let Some(type_val) = obj.get("type") {
        if type_val != "object" {
            return Err(format!("Expected type 'object', got {:?}", type_val));
        }
    }

    if let Some(properties) = obj.get("properties") {
        if !properties.is_object() {
            return Err("Properties must be an object".to_string());
        }
    }

    Ok(())
}

/// Validates that a tool has required fields.
fn validate_tool(tool: &rmcp::model::Tool) -> Result<(), String> {
    if tool.name.is_empty() {
        return Err("Tool name cannot be empty".to_string());
    }

    if tool.description.as_deref().is_none_or(str::is_empty) {
        return Err(format!("Tool '{}' must have a description", tool.name));
    }

    if tool.input_schema.is_empty() {
        return Err(format!("Tool '{}' must have an input schema", tool.name));
    }

    let schema_value = serde_json::to_value(&*tool.input_schema)
        .map_err(|e| format!("Failed to serialize schema: {}", e))?;
    validate_json_schema(&schema_value)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use genimage_mcp::ImageServer;
    use genimage_mcp::handler::GenerateImageParams;
    use genimage_mcp::server::GENERATE_IMAGE_TOOL;
    use proptest::prelude::*;
    use std::borrow::Cow;
    use std::sync::Arc;

    #[test]
    fn test_json_schema_validation() {
        let valid_schema = serde_json::json!({
            "type": "object",
            "properties": {"prompt": {"type": "string"}},
            "required": ["prompt"]
        });
        assert!(validate_json_schema(&valid_schema).is_ok());

        let invalid_schema = serde_json::json!({"type": "string"});
        assert!(validate_json_schema(&invalid_schema).is_err());
    }

    #[test]
    fn test_tool_validation_rejects_empty_name() {
        let invalid_tool = rmcp::model::Tool {
            name: Cow::Borrowed(""),
            description: Some(Cow::Borrowed("A test tool")),
            input_schema: Arc::new(serde_json::Map::new()),
            annotations: None,
            icons: None,
            meta: None,
            output_schema: None,
            title: None,
        };
        assert!(validate_tool(&invalid_tool).is_err());
    }

    #[test]
    fn test_generate_image_tool_is_valid() {
        let tool = ImageServer::tool();
        assert_eq!(tool.name, GENERATE_IMAGE_TOOL);
        validate_tool(&tool).unwrap();
    }

    #[test]
    fn test_generate_image_schema_types() {
        let tool = ImageServer::tool();
        let schema = serde_json::to_value(&*tool.input_schema).unwrap();

        assert_eq!(schema["properties"]["prompt"]["type"], "string");
        assert_eq!(schema["required"], serde_json::json!(["prompt"]));
        for optional in ["destination_directory", "filename"] {
            assert!(
                schema["properties"][optional].is_object(),
                "schema should describe '{}'",
                optional
            );
        }
    }

    proptest! {
        /// Any argument object carrying a prompt, with or without the
        /// optional fields, deserializes into the tool parameters.
        #[test]
        fn arguments_matching_schema_deserialize(
            prompt in "[a-zA-Z ]{1,50}",
            dir in proptest::option::of("/[a-z]{1,10}"),
            filename in proptest::option::of("[a-z]{1,10}"),
            camel in any::<bool>(),
        ) {
            let mut args = serde_json::Map::new();
            args.insert("prompt".to_string(), Value::String(prompt.clone()));
            if let Some(d) = &dir {
                let key = if camel { "destinationDirectory" } else { "destination_directory" };
                args.insert(key.to_string(), Value::String(d.clone()));
            }
            if let Some(f) = &filename {
                args.insert("filename".to_string(), Value::String(f.clone()));
            }

            let params: GenerateImageParams = serde_json::from_value(Value::Object(args)).unwrap();
            prop_assert_eq!(params.prompt, prompt);
            prop_assert_eq!(params.destination_directory, dir);
            prop_assert_eq!(params.filename, filename);
        }
    }
}
