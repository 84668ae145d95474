use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use toolchat::chat::ChatSession;
use toolchat::completion::CompletionClient;
use toolchat::config::Config;
use toolchat::executor::McpToolExecutor;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Interactive chat with an LLM that can call tools from an MCP server.
#[derive(Debug, Parser)]
#[command(name = "toolchat", version, about)]
struct Cli {
    /// Completion model identifier
    #[arg(long)]
    model: Option<String>,

    /// Completions API base URL
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install default crypto provider for Rustls TLS.
    // This prevents the error: "could not automatically determine the process-level CryptoProvider"
    // when both aws-lc-rs and ring features are available (or neither is explicitly selected).
    if let Err(e) = rustls::crypto::ring::default_provider().install_default() {
        eprintln!("Warning: Failed to install default crypto provider: {e:?}");
    }

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let executor = Arc::new(
        McpToolExecutor::connect_stdio(
            "toolchat",
            &config.server.command,
            &config.server.args,
            &config.server.merged_env(),
        )
        .await?,
    );
    let completions = CompletionClient::new(&config.api_key, &config.base_url, &config.model);

    ChatSession::new(completions, executor).run().await
}
