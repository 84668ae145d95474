use thiserror::Error;

/// Structured error hierarchy for `toolchat`.
///
/// Each subsystem defines its own error variant. Callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("completion: {0}")]
    Completion(#[from] CompletionError),

    #[error("tool: {0}")]
    Tool(#[from] ToolError),

    // Generic fallthrough (wraps anyhow for interop)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("no MCP server configured: set SERVER_CONFIG or add a [server] table to config.toml")]
    MissingServer,

    #[error("failed to parse {source_name}: {message}")]
    Parse {
        source_name: &'static str,
        message: String,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("completion response contained no choices")]
    EmptyChoices,
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool {name} invocation failed: {message}")]
    Invocation { name: String, message: String },

    #[error("tool {name} arguments were not valid JSON: {message}")]
    MalformedArguments { name: String, message: String },
}
