use super::history::{Message, ToolCallRequest};
use crate::error::ToolError;
use crate::executor::ToolExecutor;
use anyhow::Result;
use futures_util::future::try_join_all;
use serde_json::Value;

/// Dispatch one batch of tool-call requests concurrently.
///
/// Arguments are parsed up front; a malformed payload fails the whole
/// batch before anything is invoked. Invocations then run concurrently
/// and the batch settles all-or-nothing: any failure propagates and no
/// result message of the batch is produced. Correctness downstream
/// depends on the call-id correlation carried by each result, not on
/// ordering.
pub async fn dispatch_tool_calls(
    executor: &dyn ToolExecutor,
    calls: &[ToolCallRequest],
) -> Result<Vec<Message>> {
    let mut parsed = Vec::with_capacity(calls.len());
    for call in calls {
        let arguments: Value =
            serde_json::from_str(&call.function.arguments).map_err(|error| {
                ToolError::MalformedArguments {
                    name: call.function.name.clone(),
                    message: error.to_string(),
                }
            })?;
        parsed.push((call, arguments));
    }

    let invocations = parsed.into_iter().map(|(call, arguments)| async move {
        tracing::debug!(tool = %call.function.name, id = %call.id, "invoking tool");
        let output = executor.call_tool(&call.function.name, arguments).await?;
        Ok::<Message, anyhow::Error>(Message::tool_result(
            &call.function.name,
            &call.id,
            output,
        ))
    });

    try_join_all(invocations).await
}
