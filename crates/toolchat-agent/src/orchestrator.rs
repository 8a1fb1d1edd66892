use std::sync::Arc;

use serde_json::Value;
use toolchat_core::{Message, ToolCall};
use toolchat_llm::{CompletionService, LlmError};
use toolchat_tools::{ToolError, ToolExecutor, ToolRegistry};
use tracing::Instrument;

/// Instruction appended after tool results, before the final completion
pub const DEFAULT_SUMMARY_INSTRUCTION: &str = "Based on the previous messages and tool results, provide a clear, \
     concise, and user-friendly summary. Use natural language and avoid technical details unless necessary.";

/// Phases of a single chat run
///
/// ```text
/// Initial -> AwaitingFirstReply -> Done
///                               \-> Executing -> AwaitingFinalReply -> Done
/// ```
///
/// There is at most one `Executing` phase per run. Tool calls in the final
/// reply are returned to the caller unexecuted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initial,
    AwaitingFirstReply,
    Executing,
    AwaitingFinalReply,
    Done,
}

/// Outcome of one requested tool call, correlated to its request
#[derive(Debug)]
pub struct ToolCallResult {
    pub tool: String,
    pub call_id: String,
    pub outcome: Result<Value, ToolError>,
}

impl ToolCallResult {
    /// Fold into the tool-role message answering the call
    ///
    /// Failures become `{"error": "<message>"}` content.
    pub fn into_message(self) -> Message {
        let payload = match self.outcome {
            Ok(value) => value,
            Err(e) => e.to_payload(),
        };

        Message::tool_result(self.call_id, self.tool, payload.to_string())
    }
}

/// Drives one request through the completion service and the tool executor
pub struct Orchestrator {
    completion: Arc<dyn CompletionService>,
    executor: ToolExecutor,
    summary_instruction: String,
}

impl Orchestrator {
    pub fn new(completion: Arc<dyn CompletionService>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            completion,
            executor: ToolExecutor::new(registry),
            summary_instruction: DEFAULT_SUMMARY_INSTRUCTION.to_owned(),
        }
    }

    /// Replace the instruction appended after tool results
    #[must_use]
    pub fn with_summary_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.summary_instruction = instruction.into();
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        self.executor.registry()
    }

    /// Produce the assistant's answer to `conversation`
    ///
    /// Never fails: a completion-service error yields an assistant message
    /// describing the failure, and tool failures are reported to the model
    /// as tool results.
    pub async fn chat(&self, conversation: Vec<Message>) -> Message {
        let span = tracing::debug_span!("chat", messages = conversation.len());
        self.run(conversation).instrument(span).await
    }

    async fn run(&self, mut conversation: Vec<Message>) -> Message {
        let mut phase = Phase::Initial;
        let schemas = self.registry().export_for_model();

        phase = transition(phase, Phase::AwaitingFirstReply);
        let first = match self.completion.complete(&conversation, Some(schemas.as_slice())).await {
            Ok(reply) => reply,
            Err(e) => return degraded_reply(phase, &e),
        };

        if !first.has_tool_calls() {
            transition(phase, Phase::Done);
            return first;
        }

        phase = transition(phase, Phase::Executing);
        let calls = first.requested_tool_calls().to_vec();
        conversation.push(first);

        for call in calls {
            let result = self.execute(call).await;
            conversation.push(result.into_message());
        }

        conversation.push(Message::system(self.summary_instruction.clone()));

        phase = transition(phase, Phase::AwaitingFinalReply);
        match self.completion.complete(&conversation, None).await {
            Ok(reply) => {
                transition(phase, Phase::Done);
                reply
            }
            Err(e) => degraded_reply(phase, &e),
        }
    }

    async fn execute(&self, call: ToolCall) -> ToolCallResult {
        let ToolCall { id, function } = call;
        let outcome = self.executor.execute_raw(&function.name, &function.arguments).await;

        ToolCallResult {
            tool: function.name,
            call_id: id,
            outcome,
        }
    }
}

fn transition(from: Phase, to: Phase) -> Phase {
    tracing::debug!(?from, ?to, "chat phase");
    to
}

fn degraded_reply(phase: Phase, error: &LlmError) -> Message {
    tracing::error!(?phase, error = %error, "completion failed, returning degraded reply");
    Message::assistant(format!("Error generating response: {error}"))
}
