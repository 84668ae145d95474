//! External tool executor boundary.
//!
//! The conversation loop only sees the [`ToolExecutor`] capability
//! interface; the MCP stdio binding lives in [`mcp`] and tests substitute
//! an in-process implementation.

pub mod content;
pub mod mcp;

use async_trait::async_trait;
use serde_json::Value;

pub use mcp::McpToolExecutor;

/// A tool as declared by the executor, before schema adaptation.
#[derive(Debug, Clone)]
pub struct DeclaredTool {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

/// Capability interface to the external tool executor.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// List the tools the executor currently publishes.
    async fn list_tools(&self) -> anyhow::Result<Vec<DeclaredTool>>;

    /// Invoke one tool with already-parsed arguments, returning the
    /// result rendered as text.
    async fn call_tool(&self, name: &str, arguments: Value) -> anyhow::Result<String>;

    /// Release the underlying transport. Idempotent.
    async fn shutdown(&self) -> anyhow::Result<()>;
}
