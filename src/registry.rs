use crate::executor::ToolExecutor;
use crate::schema::adapt_input_schema;
use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;

/// An adapted tool definition, immutable once fetched.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Session cache of the executor's tool list.
///
/// Refreshed once unconditionally at startup (so the user sees the tool
/// count immediately) and thereafter only when the cache is empty.
pub struct ToolRegistry {
    executor: Arc<dyn ToolExecutor>,
    tools: Vec<ToolDefinition>,
}

impl ToolRegistry {
    pub fn new(executor: Arc<dyn ToolExecutor>) -> Self {
        Self {
            executor,
            tools: Vec::new(),
        }
    }

    /// Re-query the executor and replace the cache.
    pub async fn refresh(&mut self) -> Result<()> {
        let declared = self.executor.list_tools().await?;
        self.tools = declared
            .into_iter()
            .map(|tool| ToolDefinition {
                parameters: adapt_input_schema(&tool.input_schema),
                name: tool.name,
                description: tool.description.unwrap_or_default(),
            })
            .collect();
        tracing::debug!(count = self.tools.len(), "tool registry refreshed");
        Ok(())
    }

    /// Fill the cache if it was never populated. Idempotent.
    pub async fn ensure_loaded(&mut self) -> Result<()> {
        if self.tools.is_empty() {
            self.refresh().await?;
        }
        Ok(())
    }

    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name.as_str()).collect()
    }
}
