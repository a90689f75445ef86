//! Chat Stream Demo
//!
//! Opens a live chat stream against a running backend and prints every
//! callback as it arrives:
//! - AI text chunks are concatenated onto stdout
//! - tool lifecycle events are shown as one-liners
//!
//! Run with: cargo run --example chat_stream_demo -- <app-id> "<message>"
//! The backend base URL is taken from GENFLOW_BASE_URL when set.

use anyhow::{bail, Result};
use genflow_core::{
    ChatEventHandler, ChatStreamClient, ChatStreamParams, ClientConfig, DecodedEvent, StreamError,
    ToolCall, ToolResult,
};
use std::io::Write;

struct ConsolePrinter;

impl ChatEventHandler for ConsolePrinter {
    fn on_first_chunk(&mut self) {
        println!("--- stream opened ---");
    }

    fn on_ai_response(&mut self, text: &str, _event: &DecodedEvent) {
        print!("{}", text);
        let _ = std::io::stdout().flush();
    }

    fn on_tool_request(&mut self, call: &ToolCall, _event: &DecodedEvent) {
        println!("\n[tool request] {}", call.description);
    }

    fn on_tool_stream(&mut self, text: &str, _event: &DecodedEvent) {
        print!("{}", text);
        let _ = std::io::stdout().flush();
    }

    fn on_tool_executed(&mut self, result: &ToolResult, _event: &DecodedEvent) {
        println!("\n[tool finished] {}: {}", result.tool_name, result.result);
    }

    fn on_done(&mut self) {
        println!("\n--- done ---");
    }

    fn on_error(&mut self, error: &StreamError) {
        eprintln!("\n--- stream failed: {} ---", error);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "genflow_core=debug".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let (app_id, user_message) = match (args.next(), args.next()) {
        (Some(app_id), Some(message)) => (app_id, message),
        _ => bail!("usage: chat_stream_demo <app-id> \"<message>\""),
    };

    let config = match std::env::var("GENFLOW_BASE_URL") {
        Ok(url) => ClientConfig::new(url),
        Err(_) => ClientConfig::default(),
    };

    let client = ChatStreamClient::new(config)?;
    let handle = client
        .start_chat(
            ChatStreamParams {
                app_id,
                user_message,
            },
            ConsolePrinter,
        )
        .await?;

    println!("session {}", handle.session_id());
    handle.join().await;
    Ok(())
}
