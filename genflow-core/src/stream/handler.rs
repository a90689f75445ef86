//! Caller-facing callback interface for a chat stream

use crate::protocol::{DecodedEvent, ToolCall, ToolResult};
use crate::stream::error::StreamError;

/// The fixed set of callbacks a chat stream invokes.
///
/// One method per event category plus one per terminal outcome, called
/// synchronously in delivery order from the session's driving task. All
/// methods default to no-ops so implementors only override what they need.
///
/// The session guarantees:
/// - [`on_first_chunk`](ChatEventHandler::on_first_chunk) fires exactly
///   once, before the first category callback of any kind;
/// - exactly one of [`on_done`](ChatEventHandler::on_done) /
///   [`on_error`](ChatEventHandler::on_error) fires per session, and
///   nothing fires after it;
/// - a cancelled session fires neither.
pub trait ChatEventHandler: Send {
    /// First payload of any kind has arrived (used to hide loading state).
    fn on_first_chunk(&mut self) {}

    /// Incremental AI text. Chunks are meant to be concatenated.
    fn on_ai_response(&mut self, text: &str, event: &DecodedEvent) {
        let _ = (text, event);
    }

    /// The model requested a tool invocation.
    fn on_tool_request(&mut self, call: &ToolCall, event: &DecodedEvent) {
        let _ = (call, event);
    }

    /// Incremental output produced while a tool runs.
    fn on_tool_stream(&mut self, text: &str, event: &DecodedEvent) {
        let _ = (text, event);
    }

    /// A tool invocation finished.
    fn on_tool_executed(&mut self, result: &ToolResult, event: &DecodedEvent) {
        let _ = (result, event);
    }

    /// The stream completed normally (explicit `done` or implicit closure).
    fn on_done(&mut self) {}

    /// The stream ended with a business or transport error.
    fn on_error(&mut self, error: &StreamError) {
        let _ = error;
    }
}
