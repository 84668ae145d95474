//! The conversation loop.
//!
//! One logical conversation thread: read a line, run blocking
//! completions while the model keeps requesting tools, then stream the
//! terminal answer. The next prompt is not shown until the whole cycle
//! settles.

pub mod dispatch;
pub mod history;

use crate::completion::CompletionClient;
use crate::executor::ToolExecutor;
use crate::registry::ToolRegistry;
use crate::ui;
use anyhow::Result;
use futures_util::StreamExt;
use history::{History, Message};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};

const SYSTEM_PROMPT: &str = "You are a helpful assistant which runs the tools at its disposal \
    to answer the user's queries. Always try to use the tools to answer the user queries. \
    If you are not sure about the answer, ask the user to clarify.";

pub struct ChatSession {
    completions: CompletionClient,
    registry: ToolRegistry,
    executor: Arc<dyn ToolExecutor>,
    history: History,
}

impl ChatSession {
    pub fn new(completions: CompletionClient, executor: Arc<dyn ToolExecutor>) -> Self {
        Self {
            completions,
            registry: ToolRegistry::new(Arc::clone(&executor)),
            executor,
            history: History::seeded(SYSTEM_PROMPT),
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Drive the interactive loop until `exit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        self.registry.refresh().await?;
        println!("{}", ui::banner("Starting chat — type \"exit\" to quit"));
        println!(
            "{}",
            ui::banner(format!(
                "Tools: {}, [{}]",
                self.registry.tools().len(),
                self.registry.names().join(", ")
            ))
        );

        let stdin = io::stdin();
        let reader = BufReader::new(stdin);
        let mut lines = reader.lines();

        loop {
            print!("{}", ui::prompt("you> "));
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            if input.eq_ignore_ascii_case("exit") {
                break;
            }

            self.handle_turn(input).await?;
        }

        self.executor.shutdown().await?;
        println!("{}", ui::dim("Chat finished — goodbye!"));
        Ok(())
    }

    /// Run one full user turn: blocking completions and tool dispatch
    /// until the model stops requesting tools, then the streamed answer.
    ///
    /// Completion and dispatch errors propagate (they abort the
    /// process); streaming errors are reported inline and leave history
    /// without a partial assistant turn.
    pub async fn handle_turn(&mut self, input: &str) -> Result<()> {
        self.history.push(Message::user(input));
        self.registry.ensure_loaded().await?;

        let mut completion = self
            .completions
            .complete(&self.history, self.registry.tools())
            .await?;

        while completion.has_tool_calls() {
            let assistant = completion.into_assistant_message();
            let calls = assistant.tool_calls.clone().unwrap_or_default();
            // The request message precedes its results in history.
            self.history.push(assistant);

            for call in &calls {
                println!(
                    "{}",
                    ui::tool_run(format!(
                        "Running tool: {} ( {} )",
                        call.function.name, call.function.arguments
                    ))
                );
            }

            let results = dispatch::dispatch_tool_calls(self.executor.as_ref(), &calls).await?;
            for result in results {
                self.history.push(result);
            }

            completion = self
                .completions
                .complete(&self.history, self.registry.tools())
                .await?;
        }

        print!("{}", ui::assistant("ai> "));
        std::io::stdout().flush()?;
        self.stream_reply().await
    }

    async fn stream_reply(&mut self) -> Result<()> {
        let mut stream = match self
            .completions
            .stream(&self.history, self.registry.tools())
            .await
        {
            Ok(stream) => stream,
            Err(error) => {
                eprintln!("{}", ui::error(format!("Stream error: {error:#}")));
                return Ok(());
            }
        };

        let mut reply = String::new();
        while let Some(next) = stream.next().await {
            match next {
                Ok(fragment) => {
                    print!("{fragment}");
                    let _ = std::io::stdout().flush();
                    reply.push_str(&fragment);
                }
                Err(error) => {
                    // Abandon the stream; the partial reply is discarded.
                    eprintln!("{}", ui::error(format!("Stream error: {error:#}")));
                    return Ok(());
                }
            }
        }

        self.history.push(Message::assistant(reply));
        println!();
        Ok(())
    }
}
