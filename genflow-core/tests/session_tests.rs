//! State-machine tests for the stream session lifecycle
//!
//! These drive [`StreamSession`] directly, without a transport, and assert
//! the dispatch ordering and terminal-latch invariants.

use genflow_core::protocol::DecodedEvent;
use genflow_core::stream::{StreamSession, EVENT_BUSINESS_ERROR, EVENT_DONE};
use genflow_core::{ChatEventHandler, StreamError, ToolCall, ToolResult};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Every observable callback, in invocation order.
#[derive(Debug, Clone, PartialEq)]
enum Callback {
    FirstChunk,
    AiResponse(String),
    ToolRequest { tool_name: String, id: Option<String> },
    ToolStream(String),
    ToolExecuted { tool_name: String, result: String },
    Done,
    Error(String),
}

#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<Callback>>>,
}

impl Recorder {
    fn calls(&self) -> Vec<Callback> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: Callback) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ChatEventHandler for Recorder {
    fn on_first_chunk(&mut self) {
        self.push(Callback::FirstChunk);
    }

    fn on_ai_response(&mut self, text: &str, _event: &DecodedEvent) {
        self.push(Callback::AiResponse(text.to_string()));
    }

    fn on_tool_request(&mut self, call: &ToolCall, _event: &DecodedEvent) {
        self.push(Callback::ToolRequest {
            tool_name: call.tool_name.clone(),
            id: call.id.clone(),
        });
    }

    fn on_tool_stream(&mut self, text: &str, _event: &DecodedEvent) {
        self.push(Callback::ToolStream(text.to_string()));
    }

    fn on_tool_executed(&mut self, result: &ToolResult, _event: &DecodedEvent) {
        self.push(Callback::ToolExecuted {
            tool_name: result.tool_name.clone(),
            result: result.result.clone(),
        });
    }

    fn on_done(&mut self) {
        self.push(Callback::Done);
    }

    fn on_error(&mut self, error: &StreamError) {
        self.push(Callback::Error(error.to_string()));
    }
}

fn session(recorder: &Recorder) -> StreamSession<Recorder> {
    StreamSession::new(recorder.clone(), Uuid::new_v4())
}

fn envelope(inner: serde_json::Value) -> String {
    serde_json::json!({ "d": inner.to_string() }).to_string()
}

#[test]
fn first_chunk_precedes_first_dispatch() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    session.dispatch(
        "ai_response",
        r#"{"d":"{\"type\":\"ai_response\",\"data\":\"hello\"}"}"#,
    );

    assert_eq!(
        recorder.calls(),
        vec![
            Callback::FirstChunk,
            Callback::AiResponse("hello".to_string())
        ]
    );
}

#[test]
fn first_chunk_fires_only_once() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    for chunk in ["a", "b", "c"] {
        session.dispatch(
            "ai_response",
            &envelope(serde_json::json!({ "type": "ai_response", "data": chunk })),
        );
    }

    let first_chunks = recorder
        .calls()
        .iter()
        .filter(|c| **c == Callback::FirstChunk)
        .count();
    assert_eq!(first_chunks, 1);
}

#[test]
fn tool_request_is_normalized_before_dispatch() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    session.dispatch(
        "tool_request",
        &envelope(serde_json::json!({
            "type": "tool_request",
            "name": "writeFile",
            "arguments": { "path": "a.txt" },
            "id": "1",
        })),
    );

    assert_eq!(
        recorder.calls(),
        vec![
            Callback::FirstChunk,
            Callback::ToolRequest {
                tool_name: "writeFile".to_string(),
                id: Some("1".to_string()),
            },
        ]
    );
}

#[test]
fn nameless_tool_request_uses_placeholder_not_error() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    session.dispatch(
        "tool_request",
        &envelope(serde_json::json!({ "type": "tool_request", "payload": {} })),
    );

    assert_eq!(
        recorder.calls()[1],
        Callback::ToolRequest {
            tool_name: "unknown tool".to_string(),
            id: None,
        }
    );
}

#[test]
fn tool_stream_and_result_are_routed() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    session.dispatch(
        "tool_stream",
        &envelope(serde_json::json!({ "type": "tool_stream", "data": "compiling...\n" })),
    );
    session.dispatch(
        "tool_executed",
        &envelope(serde_json::json!({
            "type": "tool_executed",
            "name": "executeCommand",
            "result": "exit 0",
        })),
    );

    assert_eq!(
        recorder.calls(),
        vec![
            Callback::FirstChunk,
            Callback::ToolStream("compiling...\n".to_string()),
            Callback::ToolExecuted {
                tool_name: "executeCommand".to_string(),
                result: "exit 0".to_string(),
            },
        ]
    );
}

#[test]
fn done_latches_the_session() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    session.dispatch(EVENT_DONE, "");
    assert!(session.is_terminated());

    // Anything after the terminal frame is ignored.
    session.dispatch(
        "ai_response",
        &envelope(serde_json::json!({ "type": "ai_response", "data": "late" })),
    );
    session.dispatch(EVENT_DONE, "");

    assert_eq!(recorder.calls(), vec![Callback::Done]);
}

#[test]
fn only_first_of_two_terminal_signals_is_observed() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    session.dispatch(EVENT_DONE, "");
    session.transport_failed("connection reset");

    assert_eq!(recorder.calls(), vec![Callback::Done]);
}

#[test]
fn business_error_payload_is_decoded() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    session.dispatch(
        EVENT_BUSINESS_ERROR,
        r#"{"code":40101,"message":"not logged in"}"#,
    );

    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        Callback::Error(message) => {
            assert!(message.contains("40101"));
            assert!(message.contains("not logged in"));
        }
        other => panic!("expected error callback, got {:?}", other),
    }
    assert!(session.is_terminated());
}

#[test]
fn undecodable_business_error_substitutes_generic_record() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    session.dispatch(EVENT_BUSINESS_ERROR, "<html>gateway error</html>");

    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        Callback::Error(message) => assert!(message.contains("unparseable")),
        other => panic!("expected error callback, got {:?}", other),
    }
}

#[test]
fn transport_failure_while_open_is_an_error() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    session.transport_failed("connection reset by peer");

    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(&calls[0], Callback::Error(m) if m.contains("connection reset")));
}

#[test]
fn closure_without_terminator_counts_as_done() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    session.dispatch(
        "ai_response",
        &envelope(serde_json::json!({ "type": "ai_response", "data": "partial" })),
    );
    session.closed();

    assert_eq!(
        recorder.calls(),
        vec![
            Callback::FirstChunk,
            Callback::AiResponse("partial".to_string()),
            Callback::Done,
        ]
    );
}

#[test]
fn closure_after_done_is_ignored() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    session.dispatch(EVENT_DONE, "");
    session.closed();

    assert_eq!(recorder.calls(), vec![Callback::Done]);
}

#[test]
fn cancellation_fires_no_callbacks() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    session.cancel();
    assert!(session.is_terminated());

    session.dispatch(
        "ai_response",
        &envelope(serde_json::json!({ "type": "ai_response", "data": "late" })),
    );
    session.closed();
    session.transport_failed("reset");

    assert_eq!(recorder.calls(), vec![]);
}

#[test]
fn undecodable_frame_is_dropped_and_session_continues() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    session.dispatch("ai_response", "{ not an envelope }");
    assert_eq!(recorder.calls(), vec![]);

    session.dispatch(
        "ai_response",
        &envelope(serde_json::json!({ "type": "ai_response", "data": "recovered" })),
    );

    assert_eq!(
        recorder.calls(),
        vec![
            Callback::FirstChunk,
            Callback::AiResponse("recovered".to_string())
        ]
    );
}

#[test]
fn generic_frame_with_envelope_takes_the_full_path() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    session.dispatch(
        "message",
        &envelope(serde_json::json!({ "type": "tool_stream", "data": "out" })),
    );

    assert_eq!(
        recorder.calls(),
        vec![Callback::FirstChunk, Callback::ToolStream("out".to_string())]
    );
}

#[test]
fn generic_json_frame_falls_back_to_ai_response() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    session.dispatch("message", r#"{"data":"bare chunk"}"#);

    assert_eq!(
        recorder.calls(),
        vec![
            Callback::FirstChunk,
            Callback::AiResponse("bare chunk".to_string())
        ]
    );
}

#[test]
fn generic_json_without_data_uses_raw_payload() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    session.dispatch("message", r#"{"note":"no data field"}"#);

    assert_eq!(
        recorder.calls(),
        vec![
            Callback::FirstChunk,
            Callback::AiResponse(r#"{"note":"no data field"}"#.to_string())
        ]
    );
}

#[test]
fn generic_plain_text_frame_is_ai_response() {
    let recorder = Recorder::default();
    let mut session = session(&recorder);

    session.dispatch("message", "plain text chunk");

    assert_eq!(
        recorder.calls(),
        vec![
            Callback::FirstChunk,
            Callback::AiResponse("plain text chunk".to_string())
        ]
    );
}
