//! Full-turn tests: a `ChatSession` driven against a mocked completions
//! endpoint and an in-process tool executor.

mod support;

use serde_json::json;
use std::sync::Arc;
use support::{MockExecutor, content_response, sse_body, tool_call_response};
use toolchat::chat::ChatSession;
use toolchat::chat::history::Role;
use toolchat::completion::CompletionClient;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_for(server: &MockServer, executor: MockExecutor) -> ChatSession {
    let completions = CompletionClient::new(
        "sk-test",
        &format!("{}/v1", server.uri()),
        "gpt-4.1",
    );
    ChatSession::new(completions, Arc::new(executor))
}

async fn mount_streaming_reply(server: &MockServer, fragments: &[&str]) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body(fragments), "text/event-stream"),
        )
        .mount(server)
        .await;
}

async fn mount_blocking_reply(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn plain_turn_appends_user_then_streamed_assistant() {
    let server = MockServer::start().await;
    mount_blocking_reply(&server, content_response("direct answer")).await;
    mount_streaming_reply(&server, &["Hello", ", there"]).await;

    let mut session = session_for(&server, MockExecutor::default().with_tool("noop", "ok"));
    session.handle_turn("hello").await.unwrap();

    let messages = session.history().messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].content, "hello");
    assert_eq!(messages[2].role, Role::Assistant);
    assert_eq!(messages[2].content, "Hello, there");
}

#[tokio::test]
async fn tool_turn_interleaves_request_result_and_final_answer() {
    let server = MockServer::start().await;

    // First blocking completion requests a tool; mounted first and
    // limited to one use so the follow-up completion falls through to
    // the plain reply below.
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(tool_call_response(&[(
            "call_1",
            "get_weather",
            "{\"city\":\"Oslo\"}",
        )])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_blocking_reply(&server, content_response("all done")).await;
    mount_streaming_reply(&server, &["It is ", "sunny"]).await;

    let executor = MockExecutor::default().with_tool("get_weather", "{\"forecast\":\"sunny\"}");
    let mut session = session_for(&server, executor);
    session.handle_turn("weather in Oslo?").await.unwrap();

    let messages = session.history().messages();
    let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            Role::System,
            Role::User,
            Role::Assistant,
            Role::Tool,
            Role::Assistant,
        ]
    );

    // The assistant request precedes its correlated result.
    let request = &messages[2];
    let result = &messages[3];
    let calls = request.tool_calls.as_ref().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, "call_1");
    assert_eq!(result.tool_call_id.as_deref(), Some("call_1"));
    assert_eq!(result.tool_name.as_deref(), Some("get_weather"));
    assert_eq!(result.content, "{\"forecast\":\"sunny\"}");

    assert_eq!(messages[4].content, "It is sunny");
}

#[tokio::test]
async fn failing_batch_commits_no_tool_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(tool_call_response(&[
            ("call_1", "get_weather", "{}"),
            ("call_2", "broken_tool", "{}"),
        ])))
        .mount(&server)
        .await;

    let executor = MockExecutor::default()
        .with_tool("get_weather", "{\"forecast\":\"rain\"}")
        .with_failing_tool("broken_tool");
    let mut session = session_for(&server, executor);

    let error = session.handle_turn("break things").await.unwrap_err();
    assert!(error.to_string().contains("broken_tool"));

    // The request message is in history, but no result of the batch is.
    let messages = session.history().messages();
    assert_eq!(messages.last().unwrap().role, Role::Assistant);
    assert!(messages.last().unwrap().has_tool_calls());
    assert!(messages.iter().all(|m| m.role != Role::Tool));
}

#[tokio::test]
async fn non_success_completion_is_fatal_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let mut session = session_for(&server, MockExecutor::default().with_tool("noop", "ok"));
    let error = session.handle_turn("hello").await.unwrap_err();

    assert!(error.to_string().contains("500"));
    assert!(error.to_string().contains("upstream exploded"));
}

#[tokio::test]
async fn stream_error_leaves_history_without_partial_assistant_turn() {
    let server = MockServer::start().await;
    mount_blocking_reply(&server, content_response("direct")).await;
    // Streaming request meets a protocol error: reported inline, no commit.
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let mut session = session_for(&server, MockExecutor::default().with_tool("noop", "ok"));
    session.handle_turn("hello").await.unwrap();

    let messages = session.history().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages.last().unwrap().role, Role::User);
}

#[tokio::test]
async fn tool_schemas_are_adapted_before_reaching_the_api() {
    let server = MockServer::start().await;
    // Assert on the request shape itself: the numeric-array property must
    // have been collapsed to string items by the time it is sent.
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"stream": false})))
        .and(body_partial_json(json!({
            "tools": [{
                "type": "function",
                "function": {
                    "name": "lookup",
                    "parameters": {
                        "properties": {"ids": {"items": {"type": "string"}}}
                    }
                }
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(content_response("ok")))
        .expect(1)
        .mount(&server)
        .await;
    mount_streaming_reply(&server, &["ok"]).await;

    let executor = MockExecutor::default().with_schema_tool(
        "lookup",
        json!({
            "type": "object",
            "properties": {"ids": {"type": "array", "items": {"type": "number"}}},
            "required": ["ids"],
        }),
        "ok",
    );
    let mut session = session_for(&server, executor);
    session.handle_turn("find 1 and 2").await.unwrap();
}
