//! Stream lifecycle state machine
//!
//! [`StreamSession`] owns the callback handler for one live connection and
//! arbitrates every transition the wire protocol allows:
//! per-frame dispatch while open, and exactly one terminal transition
//! (done, business error, transport failure, implicit closure, or
//! cancellation). It is deliberately transport-agnostic — the driving loop
//! in [`crate::stream::client`] feeds it frames, which keeps the machine
//! testable without a network.

use crate::protocol::{
    decode_frame, normalize_tool_request, normalize_tool_result, DecodedEvent, EventCategory,
};
use crate::stream::error::{ErrorRecord, StreamError};
use crate::stream::handler::ChatEventHandler;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

/// Wire event name signaling normal completion.
pub const EVENT_DONE: &str = "done";

/// Wire event name signaling a backend business failure.
pub const EVENT_BUSINESS_ERROR: &str = "business-error";

/// State machine for one chat stream session.
///
/// Single writer: only the owning drive loop mutates it. Once terminated,
/// every further signal is ignored — no callback ever fires twice, and no
/// two terminal callbacks fire for one session.
pub struct StreamSession<H: ChatEventHandler> {
    handler: H,
    session_id: Uuid,
    first_frame_seen: bool,
    terminated: bool,
}

impl<H: ChatEventHandler> StreamSession<H> {
    pub fn new(handler: H, session_id: Uuid) -> Self {
        StreamSession {
            handler,
            session_id,
            first_frame_seen: false,
            terminated: false,
        }
    }

    /// Whether a terminal transition has occurred.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Route one wire frame by its event name.
    pub fn dispatch(&mut self, event_name: &str, payload: &str) {
        if self.terminated {
            debug!(session_id = %self.session_id, event_name, "frame after terminal state, ignored");
            return;
        }
        match event_name {
            EVENT_DONE => self.complete(),
            EVENT_BUSINESS_ERROR => self.business_error(payload),
            "ai_response" | "tool_request" | "tool_stream" | "tool_executed" => {
                self.handle_envelope(payload)
            }
            _ => self.handle_generic(payload),
        }
    }

    /// Transport reported a failure while the stream was logically open.
    pub fn transport_failed(&mut self, message: &str) {
        if self.terminated {
            debug!(session_id = %self.session_id, "transport error after terminal state, ignored");
            return;
        }
        self.terminated = true;
        warn!(session_id = %self.session_id, error = message, "chat stream transport failed");
        self.handler
            .on_error(&StreamError::Transport(message.to_string()));
    }

    /// Transport closed without an explicit terminator. The wire protocol
    /// does not guarantee a `done` frame is always observed before closure,
    /// so this counts as normal completion.
    pub fn closed(&mut self) {
        if self.terminated {
            return;
        }
        debug!(session_id = %self.session_id, "stream closed without terminator, treating as done");
        self.terminated = true;
        self.handler.on_done();
    }

    /// Caller-initiated cancellation: latch without any callback.
    pub fn cancel(&mut self) {
        if self.terminated {
            return;
        }
        debug!(session_id = %self.session_id, "chat stream cancelled");
        self.terminated = true;
    }

    fn complete(&mut self) {
        debug!(session_id = %self.session_id, "chat stream done");
        self.terminated = true;
        self.handler.on_done();
    }

    fn business_error(&mut self, payload: &str) {
        self.terminated = true;
        let record: ErrorRecord =
            serde_json::from_str(payload).unwrap_or_else(|_| ErrorRecord::unparseable());
        warn!(session_id = %self.session_id, error = %record, "backend signaled business error");
        self.handler.on_error(&StreamError::Business(record));
    }

    /// Decode a classified frame and dispatch its callback. Decode failures
    /// drop the frame; the session continues.
    fn handle_envelope(&mut self, payload: &str) {
        match decode_frame(payload) {
            Ok(event) => self.emit(event),
            Err(err) => {
                warn!(session_id = %self.session_id, %err, payload, "dropping undecodable frame");
            }
        }
    }

    /// Frames from the generic message channel may carry the full envelope,
    /// a bare JSON object, or plain text.
    fn handle_generic(&mut self, payload: &str) {
        match serde_json::from_str::<Value>(payload) {
            Ok(value) if value.get("d").is_some() => self.handle_envelope(payload),
            Ok(value) => {
                let text = value
                    .get("data")
                    .and_then(Value::as_str)
                    .filter(|text| !text.is_empty())
                    .unwrap_or(payload)
                    .to_string();
                self.emit(DecodedEvent::synthetic(
                    EventCategory::AiResponse,
                    text,
                    value,
                ));
            }
            Err(_) => {
                let raw = serde_json::json!({ "type": "ai_response", "data": payload });
                self.emit(DecodedEvent::synthetic(
                    EventCategory::AiResponse,
                    payload,
                    raw,
                ));
            }
        }
    }

    /// Invoke the category callback for a decoded event, firing the
    /// first-frame latch ahead of the first dispatch of any kind.
    fn emit(&mut self, event: DecodedEvent) {
        if !self.first_frame_seen {
            self.first_frame_seen = true;
            self.handler.on_first_chunk();
        }
        match event.category {
            EventCategory::AiResponse => self.handler.on_ai_response(&event.display_text, &event),
            EventCategory::ToolRequest => {
                let call = normalize_tool_request(&event.raw);
                self.handler.on_tool_request(&call, &event);
            }
            EventCategory::ToolStream => self.handler.on_tool_stream(&event.display_text, &event),
            EventCategory::ToolExecuted => {
                let result = normalize_tool_result(&event.raw);
                self.handler.on_tool_executed(&result, &event);
            }
        }
    }
}
