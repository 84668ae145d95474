use super::content::render_contents;
use super::{DeclaredTool, ToolExecutor};
use crate::error::ToolError;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use rmcp::service::{RoleClient, RunningService};
use rmcp::transport::{ConfigureCommandExt, TokioChildProcess};
use rmcp::{ServiceExt, model::CallToolRequestParams};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::RwLock;

type McpService = RunningService<RoleClient, ()>;

/// [`ToolExecutor`] bound to an MCP server spawned as a stdio child
/// process. The service slot empties on shutdown so later calls fail
/// cleanly instead of touching a dead child.
pub struct McpToolExecutor {
    name: String,
    service: Arc<RwLock<Option<McpService>>>,
}

impl McpToolExecutor {
    /// Spawn the configured server process and complete the MCP handshake.
    pub async fn connect_stdio(
        name: impl Into<String>,
        command: &str,
        args: &[String],
        env: &HashMap<String, String>,
    ) -> Result<Self> {
        let service = ()
            .serve(TokioChildProcess::new(Command::new(command).configure(
                |cmd| {
                    cmd.args(args);
                    cmd.envs(env.iter());
                },
            ))?)
            .await
            .with_context(|| format!("failed to connect MCP server '{command}' over stdio"))?;

        Ok(Self {
            name: name.into(),
            service: Arc::new(RwLock::new(Some(service))),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[cfg(test)]
    pub(crate) fn disconnected_for_test(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            service: Arc::new(RwLock::new(None)),
        }
    }
}

#[async_trait]
impl ToolExecutor for McpToolExecutor {
    async fn list_tools(&self) -> Result<Vec<DeclaredTool>> {
        let service_guard = self.service.read().await;
        let service = service_guard
            .as_ref()
            .ok_or_else(|| anyhow!("MCP connection '{}' is not active", self.name))?;

        let tools = service
            .list_all_tools()
            .await
            .with_context(|| format!("failed to list tools for MCP server '{}'", self.name))?;

        Ok(tools
            .into_iter()
            .map(|tool| DeclaredTool {
                name: tool.name.to_string(),
                description: tool.description.as_ref().map(ToString::to_string),
                input_schema: serde_json::Value::Object(tool.input_schema.as_ref().clone()),
            })
            .collect())
    }

    async fn call_tool(&self, name: &str, arguments: serde_json::Value) -> Result<String> {
        let arguments = match arguments {
            serde_json::Value::Object(object) => Some(object),
            serde_json::Value::Null => None,
            _ => {
                return Err(anyhow!("MCP tool '{name}' requires JSON object arguments"));
            }
        };

        let request = CallToolRequestParams {
            meta: None,
            name: name.to_string().into(),
            arguments,
            task: None,
        };

        let service_guard = self.service.read().await;
        let service = service_guard
            .as_ref()
            .ok_or_else(|| anyhow!("MCP connection '{}' is not active", self.name))?;

        let result = service.call_tool(request).await.map_err(|error| {
            ToolError::Invocation {
                name: name.to_string(),
                message: error.to_string(),
            }
        })?;

        Ok(render_contents(&result.content))
    }

    async fn shutdown(&self) -> Result<()> {
        let service = self.service.write().await.take();
        if let Some(service) = service {
            service
                .cancel()
                .await
                .with_context(|| format!("failed to shut down MCP server '{}'", self.name))?;
        }
        Ok(())
    }
}
