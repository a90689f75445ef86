//! Normalization of loosely shaped tool payloads
//!
//! Tool events carry whatever the backend's model runtime produced, and the
//! field names vary by producer. The normalizers here reshape those
//! payloads into stable records through a strict per-field priority chain;
//! a payload missing every candidate field degrades to placeholder values,
//! never to a failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder name when a tool request payload names no tool at all.
pub const UNKNOWN_TOOL_NAME: &str = "unknown tool";

/// Placeholder name for anonymous tool results.
pub const ANONYMOUS_TOOL_NAME: &str = "tool";

/// Tool names the backend is known to emit, used as a last-resort match
/// when a payload carries no name field but mentions one in its body.
const KNOWN_TOOLS: [&str; 6] = [
    "modifyFile",
    "readFile",
    "writeFile",
    "deleteFile",
    "listFiles",
    "executeCommand",
];

/// A `tool_request` payload reduced to its stable shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool the model wants to invoke
    pub tool_name: String,

    /// Short human-readable description of the invocation
    pub description: String,

    /// Tool arguments, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,

    /// Invocation identifier, if the backend assigned one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A `tool_executed` payload reduced to its stable shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that ran
    pub tool_name: String,

    /// Textual result of the invocation, empty if the payload carried none
    pub result: String,

    /// Invocation identifier, if the backend assigned one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Normalize the inner envelope of a `tool_request` event.
pub fn normalize_tool_request(raw: &Value) -> ToolCall {
    match resolve_name(raw) {
        Some(name) => ToolCall {
            description: format!("Invoke tool: {}", name),
            tool_name: name,
            arguments: raw.get("arguments").cloned(),
            id: resolve_id(raw),
        },
        None => ToolCall {
            tool_name: UNKNOWN_TOOL_NAME.to_string(),
            // Degraded record: surface the payload itself so the caller can
            // still show something meaningful.
            description: raw.to_string(),
            arguments: raw.get("arguments").cloned(),
            id: resolve_id(raw),
        },
    }
}

/// Normalize the inner envelope of a `tool_executed` event.
pub fn normalize_tool_result(raw: &Value) -> ToolResult {
    let result = raw
        .get("result")
        .and_then(Value::as_str)
        .or_else(|| raw.get("output").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();

    ToolResult {
        tool_name: resolve_name(raw).unwrap_or_else(|| ANONYMOUS_TOOL_NAME.to_string()),
        result,
        id: resolve_id(raw),
    }
}

/// Resolve a tool name: `name`, then `toolName`, then a scan of the
/// serialized payload for tools the backend is known to emit.
fn resolve_name(raw: &Value) -> Option<String> {
    if let Some(name) = raw.get("name").and_then(Value::as_str) {
        return Some(name.to_string());
    }
    if let Some(name) = raw.get("toolName").and_then(Value::as_str) {
        return Some(name.to_string());
    }
    let serialized = raw.to_string();
    KNOWN_TOOLS
        .iter()
        .find(|tool| serialized.contains(**tool))
        .map(|tool| tool.to_string())
}

/// Identifiers arrive as JSON strings or numbers depending on the producer.
fn resolve_id(raw: &Value) -> Option<String> {
    match raw.get("id") {
        Some(Value::String(id)) => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}
