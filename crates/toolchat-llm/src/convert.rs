//! Conversion between the shared message model and `OpenAI` wire format

use toolchat_core::{FunctionCall, Message, ToolCall, ToolSchema};

use crate::protocol::{OpenAiChoiceMessage, OpenAiFunction, OpenAiFunctionCall, OpenAiMessage, OpenAiTool, OpenAiToolCall};

impl From<&Message> for OpenAiMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
            name: msg.name.clone(),
            tool_calls: msg
                .tool_calls
                .as_ref()
                .map(|calls| calls.iter().map(Into::into).collect()),
            tool_call_id: msg.tool_call_id.clone(),
        }
    }
}

impl From<&ToolCall> for OpenAiToolCall {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            tool_type: "function".to_owned(),
            function: OpenAiFunctionCall {
                name: call.function.name.clone(),
                arguments: call.function.arguments.clone(),
            },
        }
    }
}

impl From<&ToolSchema> for OpenAiTool {
    fn from(schema: &ToolSchema) -> Self {
        Self {
            tool_type: schema.tool_type.clone(),
            function: OpenAiFunction {
                name: schema.function.name.clone(),
                description: Some(schema.function.description.clone()),
                parameters: Some(schema.function.parameters.clone()),
            },
        }
    }
}

impl From<OpenAiToolCall> for ToolCall {
    fn from(call: OpenAiToolCall) -> Self {
        Self {
            id: call.id,
            function: FunctionCall {
                name: call.function.name,
                arguments: call.function.arguments,
            },
        }
    }
}

impl From<OpenAiChoiceMessage> for Message {
    fn from(msg: OpenAiChoiceMessage) -> Self {
        let tool_calls: Vec<ToolCall> = msg
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect();

        let mut message = if tool_calls.is_empty() {
            Self::assistant(String::new())
        } else {
            Self::assistant_tool_calls(tool_calls)
        };
        message.content = msg.content;
        message
    }
}
