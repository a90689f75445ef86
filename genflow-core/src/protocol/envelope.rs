//! Two-layer event envelope decoding
//!
//! Every classified frame on the wire carries a JSON object with a single
//! `d` field whose value is itself a JSON-encoded string:
//!
//! ```text
//! {"d": "{\"type\":\"ai_response\",\"data\":\"hello\"}"}
//! ```
//!
//! The inner object must carry a `type` tag; `data` is optional and
//! defaults to the empty string. Any additional inner fields are preserved
//! in [`DecodedEvent::raw`] so downstream normalizers can inspect them.

use crate::protocol::display::render_display_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Category tag distinguishing the kinds of events the backend emits.
///
/// The set is closed on the wire, but unrecognized tags are deliberately
/// classified as [`EventCategory::AiResponse`] so that newer backends can
/// introduce tags without breaking older clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Incremental natural-language text from the model
    AiResponse,
    /// The model wants to invoke a named tool with arguments
    ToolRequest,
    /// Incremental textual output produced while a tool runs
    ToolStream,
    /// Terminal result of a tool invocation
    ToolExecuted,
}

impl EventCategory {
    /// Classify a wire tag. Unknown tags fall through to `AiResponse`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "tool_request" => EventCategory::ToolRequest,
            "tool_stream" => EventCategory::ToolStream,
            "tool_executed" => EventCategory::ToolExecuted,
            _ => EventCategory::AiResponse,
        }
    }

    /// The wire tag for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::AiResponse => "ai_response",
            EventCategory::ToolRequest => "tool_request",
            EventCategory::ToolStream => "tool_stream",
            EventCategory::ToolExecuted => "tool_executed",
        }
    }
}

/// One fully decoded frame, as handed to callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEvent {
    /// Classified category of this event
    pub category: EventCategory,

    /// Inner `data` field, or empty if the frame carried none
    pub raw_text: String,

    /// Human-presentable rendering of `raw_text` for this category
    pub display_text: String,

    /// The complete inner envelope value, including category-specific
    /// fields beyond `type`/`data`
    pub raw: Value,
}

impl DecodedEvent {
    /// Build an event directly from an already-parsed inner value.
    ///
    /// Used for the generic message channel, where frames may skip the
    /// outer envelope entirely.
    pub(crate) fn synthetic(category: EventCategory, text: impl Into<String>, raw: Value) -> Self {
        let text = text.into();
        DecodedEvent {
            category,
            display_text: render_display_text(category, &text),
            raw_text: text,
            raw,
        }
    }
}

/// Reasons a frame can fail to decode.
///
/// All of these are non-fatal to the session: the frame is logged and
/// dropped, and the stream continues.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The outer payload was not a JSON object carrying a string `d` field
    #[error("frame has no `d` envelope field")]
    MissingEnvelope,

    /// The text held in `d` was not valid JSON
    #[error("envelope payload is not valid JSON: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    /// The inner object carried no `type` tag
    #[error("envelope payload has no `type` field")]
    MissingEventType,
}

/// Decode one raw wire frame into a [`DecodedEvent`].
///
/// Pure transformation, no side effects. The only failure modes are the
/// explicit [`DecodeError`] variants; this never panics on any input.
pub fn decode_frame(payload: &str) -> Result<DecodedEvent, DecodeError> {
    let outer: Value = serde_json::from_str(payload).map_err(|_| DecodeError::MissingEnvelope)?;

    let inner_text = outer
        .get("d")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingEnvelope)?;

    let inner: Value = serde_json::from_str(inner_text).map_err(DecodeError::MalformedPayload)?;

    let tag = inner
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingEventType)?;

    let category = EventCategory::from_tag(tag);
    let raw_text = inner
        .get("data")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(DecodedEvent {
        category,
        display_text: render_display_text(category, &raw_text),
        raw_text,
        raw: inner,
    })
}
