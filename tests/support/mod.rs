//! Shared fixtures for integration tests: an in-process tool executor
//! and builders for completion API response bodies.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use toolchat::executor::{DeclaredTool, ToolExecutor};

#[derive(Default)]
pub struct MockExecutor {
    tools: Vec<DeclaredTool>,
    results: HashMap<String, String>,
    failing: HashSet<String>,
}

impl MockExecutor {
    pub fn with_tool(mut self, name: &str, result: &str) -> Self {
        self.declare(name);
        self.results.insert(name.to_string(), result.to_string());
        self
    }

    pub fn with_failing_tool(mut self, name: &str) -> Self {
        self.declare(name);
        self.failing.insert(name.to_string());
        self
    }

    pub fn with_schema_tool(mut self, name: &str, input_schema: Value, result: &str) -> Self {
        self.tools.push(DeclaredTool {
            name: name.to_string(),
            description: Some(format!("mock tool {name}")),
            input_schema,
        });
        self.results.insert(name.to_string(), result.to_string());
        self
    }

    fn declare(&mut self, name: &str) {
        self.tools.push(DeclaredTool {
            name: name.to_string(),
            description: Some(format!("mock tool {name}")),
            input_schema: json!({
                "type": "object",
                "properties": {"query": {"type": "string"}},
            }),
        });
    }
}

#[async_trait]
impl ToolExecutor for MockExecutor {
    async fn list_tools(&self) -> Result<Vec<DeclaredTool>> {
        Ok(self.tools.clone())
    }

    async fn call_tool(&self, name: &str, _arguments: Value) -> Result<String> {
        if self.failing.contains(name) {
            anyhow::bail!("mock tool {name} failed");
        }
        self.results
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("mock tool {name} not registered"))
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

/// Blocking response containing plain assistant text.
pub fn content_response(text: &str) -> Value {
    json!({"choices": [{"message": {"content": text}}]})
}

/// Blocking response requesting the given `(id, name, arguments)` calls.
pub fn tool_call_response(calls: &[(&str, &str, &str)]) -> Value {
    let tool_calls: Vec<Value> = calls
        .iter()
        .map(|(id, name, arguments)| {
            json!({
                "id": id,
                "type": "function",
                "function": {"name": name, "arguments": arguments},
            })
        })
        .collect();
    json!({"choices": [{"message": {"content": null, "tool_calls": tool_calls}}]})
}

/// Chunked response body: one `data: ` event per fragment, then `[DONE]`.
pub fn sse_body(fragments: &[&str]) -> String {
    let mut body = String::new();
    for fragment in fragments {
        let event = json!({"choices": [{"delta": {"content": fragment}}]});
        body.push_str(&format!("data: {event}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}
