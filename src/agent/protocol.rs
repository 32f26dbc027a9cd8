//! Tool-call protocol between the model and the agent.
//!
//! A reply is a tool call only when the *whole* message is a JSON object of
//! the form `{"tool": "<name>", "args": {...}}`. Anything else, including
//! prose wrapped around a JSON payload, is prose and is shown to the user
//! as-is. Decoding never fails loudly: a schema mismatch just means prose.

use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use super::message::{ToolArgs, ToolInvocation};

/// A model reply classified by the protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    Prose(String),
    ToolCall(ToolInvocation),
}

impl ModelReply {
    pub fn parse(content: &str) -> Self {
        match try_parse_tool_call(content) {
            Some(invocation) => ModelReply::ToolCall(invocation),
            None => ModelReply::Prose(content.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct WireToolCall {
    tool: String,
    #[serde(default, deserialize_with = "args_or_empty")]
    args: ToolArgs,
}

/// `args` that is not an object (a list, a string, null) becomes `{}`.
fn args_or_empty<'de, D>(deserializer: D) -> Result<ToolArgs, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => ToolArgs::new(),
    })
}

/// Decode `content` as a tool call, or `None` when it is ordinary prose.
pub fn try_parse_tool_call(content: &str) -> Option<ToolInvocation> {
    // Derived structs also accept JSON arrays; only objects count here.
    let value: Value = serde_json::from_str(content).ok()?;
    if !value.is_object() {
        return None;
    }
    let wire: WireToolCall = serde_json::from_value(value).ok()?;
    Some(ToolInvocation {
        name: wire.tool,
        args: wire.args,
    })
}

/// Content of the synthetic assistant turn that reports a tool outcome.
pub fn encode_tool_result(tool: &str, result: &str) -> String {
    json!({ "tool": tool, "result": result }).to_string()
}
