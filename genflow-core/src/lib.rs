//! Genflow Core Library
//!
//! Client for the streaming chat protocol of an AI code-generation
//! backend. A chat turn is one long-lived server-push connection; the
//! backend emits classified events (AI text, tool requests, tool output,
//! tool results) wrapped in a two-layer JSON envelope, and this crate
//! decodes, normalizes, and dispatches them to caller-supplied callbacks
//! while enforcing the session's lifecycle invariants.
//!
//! ```no_run
//! use genflow_core::{ChatEventHandler, ChatStreamClient, ChatStreamParams, ClientConfig};
//!
//! struct Printer;
//!
//! impl ChatEventHandler for Printer {
//!     fn on_ai_response(&mut self, text: &str, _event: &genflow_core::DecodedEvent) {
//!         print!("{}", text);
//!     }
//! }
//!
//! # async fn run() -> Result<(), genflow_core::StreamError> {
//! let client = ChatStreamClient::new(ClientConfig::default())?;
//! let handle = client
//!     .start_chat(
//!         ChatStreamParams {
//!             app_id: "42".to_string(),
//!             user_message: "build me a landing page".to_string(),
//!         },
//!         Printer,
//!     )
//!     .await?;
//! handle.join().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod protocol;
pub mod stream;

pub use config::{ClientConfig, ConfigError};
pub use protocol::{DecodedEvent, EventCategory, ToolCall, ToolResult};
pub use stream::{
    ChatEventHandler, ChatStreamClient, ChatStreamParams, ErrorRecord, StreamError, StreamHandle,
    StreamSession,
};

/// Returns the version of the Genflow core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
