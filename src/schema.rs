use serde_json::{Map, Value, json};

/// Adapt a tool's declared JSON input schema to the shape the completions
/// API accepts for function parameters.
///
/// Every property declared as `"array"` is rewritten to an array of plain
/// strings, discarding the original item schema — the API rejects some of
/// the richer item shapes MCP servers publish. Everything else, including
/// the `required` list, passes through untouched. Lossy by design: tools
/// with structured array items receive string-only array arguments.
pub fn adapt_input_schema(schema: &Value) -> Value {
    let mut properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Map::new);

    for property in properties.values_mut() {
        if property.get("type").and_then(Value::as_str) == Some("array") {
            *property = json!({
                "type": "array",
                "items": {"type": "string"},
            });
        }
    }

    let mut adapted = json!({
        "type": "object",
        "properties": properties,
    });
    if let Some(required) = schema.get("required") {
        adapted["required"] = required.clone();
    }

    adapted
}
