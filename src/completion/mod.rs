//! Client for the OpenAI-compatible chat-completions API.
//!
//! Two response modes: blocking (one materialized choice) and streaming
//! (a lazy, finite sequence of text fragments driven by the
//! [`decoder::StreamDecoder`]). Every request carries the full history
//! and the adapted tool list so the model may choose to invoke tools.

pub mod decoder;
pub mod sanitize;

use crate::chat::history::{History, Message, ToolCallRequest};
use crate::error::CompletionError;
use crate::registry::ToolDefinition;
use anyhow::{Context, Result};
use decoder::StreamDecoder;
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use sanitize::sanitize_api_error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::pin::Pin;

/// Lazy, non-restartable sequence of streamed text fragments.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send + 'static>>;

pub struct CompletionClient {
    /// Pre-computed `"Bearer <key>"` header value (avoids `format!` per request).
    cached_auth_header: String,
    /// Pre-computed chat completions URL.
    cached_chat_url: String,
    model: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<FunctionTool<'a>>>,
}

#[derive(Debug, Serialize)]
struct FunctionTool<'a> {
    r#type: &'static str,
    function: FunctionDefinition<'a>,
}

#[derive(Debug, Serialize)]
struct FunctionDefinition<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: CompletionMessage,
}

/// The assistant message of the first completion choice: plain text,
/// tool-call requests, or both.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionMessage {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCallRequest>>,
}

impl CompletionMessage {
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
    }

    /// Convert into the history entry that precedes any tool results.
    pub fn into_assistant_message(self) -> Message {
        match self.tool_calls {
            Some(calls) if !calls.is_empty() => {
                Message::assistant_request(self.content.unwrap_or_default(), calls)
            }
            _ => Message::assistant(self.content.unwrap_or_default()),
        }
    }
}

impl CompletionClient {
    pub fn new(api_key: &str, base_url: &str, model: impl Into<String>) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            cached_auth_header: format!("Bearer {api_key}"),
            cached_chat_url: format!("{base_url}/chat/completions"),
            model: model.into(),
            client: Client::new(),
        }
    }

    /// Blocking completion: one request, the first choice of the response.
    pub async fn complete(
        &self,
        history: &History,
        tools: &[ToolDefinition],
    ) -> Result<CompletionMessage> {
        let request = self.build_request(history, tools, false);
        let response = self.send(&request).await?;

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("completion response JSON decode failed")?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| CompletionError::EmptyChoices.into())
    }

    /// Streaming completion: an open fragment channel decoded lazily.
    ///
    /// The stream ends at the transport's end-of-channel; the `[DONE]`
    /// sentinel merely stops fragment extraction early. Transport errors
    /// surface through the stream's error channel.
    pub async fn stream(
        &self,
        history: &History,
        tools: &[ToolDefinition],
    ) -> Result<FragmentStream> {
        let request = self.build_request(history, tools, true);
        let response = self.send(&request).await?;
        let mut byte_stream = response.bytes_stream();

        let stream = async_stream::try_stream! {
            let mut decoder = StreamDecoder::new();
            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = chunk_result.context("completion stream transport error")?;
                for fragment in decoder.feed(&chunk) {
                    yield fragment;
                }
            }
            if decoder.skipped_lines() > 0 {
                tracing::debug!(
                    skipped = decoder.skipped_lines(),
                    "stream contained undecodable data lines"
                );
            }
        };

        Ok(Box::pin(stream))
    }

    async fn send(&self, request: &ChatRequest<'_>) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(&self.cached_chat_url)
            .header("Authorization", &self.cached_auth_header)
            .json(request)
            .send()
            .await
            .context("completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error body>".to_string());
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: sanitize_api_error(&body),
            }
            .into());
        }

        Ok(response)
    }

    fn build_request<'a>(
        &'a self,
        history: &'a History,
        tools: &'a [ToolDefinition],
        stream: bool,
    ) -> ChatRequest<'a> {
        // An empty tools array is rejected by the API; omit both fields
        // until the registry cache is populated.
        let function_tools = if tools.is_empty() {
            None
        } else {
            Some(
                tools
                    .iter()
                    .map(|tool| FunctionTool {
                        r#type: "function",
                        function: FunctionDefinition {
                            name: &tool.name,
                            description: &tool.description,
                            parameters: &tool.parameters,
                        },
                    })
                    .collect(),
            )
        };

        ChatRequest {
            model: &self.model,
            messages: history.messages(),
            stream,
            tool_choice: function_tools.as_ref().map(|_| "auto"),
            tools: function_tools,
        }
    }
}
