//! Display text rendering for decoded events

use crate::protocol::envelope::EventCategory;

/// Derive the human-presentable string for an event's inner `data`.
///
/// `AiResponse` and `ToolStream` chunks pass through unchanged so callers
/// can concatenate them into incremental output. Tool lifecycle events get
/// a short descriptive prefix; for `ToolRequest` this is only a fallback
/// display, superseded by [`crate::protocol::ToolCall::description`] once
/// the payload is normalized.
///
/// Total function: every category yields a string, nothing fails.
pub fn render_display_text(category: EventCategory, data: &str) -> String {
    match category {
        EventCategory::AiResponse | EventCategory::ToolStream => data.to_string(),
        EventCategory::ToolRequest => format!("Tool request: {}", data),
        EventCategory::ToolExecuted => format!("Tool finished: {}", data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(EventCategory::AiResponse, "chunk", "chunk"; "ai text passes through")]
    #[test_case(EventCategory::ToolStream, "line\n", "line\n"; "tool stream passes through")]
    #[test_case(EventCategory::ToolRequest, "writeFile", "Tool request: writeFile"; "tool request is prefixed")]
    #[test_case(EventCategory::ToolExecuted, "done", "Tool finished: done"; "tool result is prefixed")]
    fn renders_by_category(category: EventCategory, data: &str, expected: &str) {
        assert_eq!(render_display_text(category, data), expected);
    }
}
