//! Chat stream lifecycle
//!
//! This module owns everything stateful about a chat turn: the
//! [`StreamSession`] state machine that sequences callbacks and arbitrates
//! terminal transitions, the [`ChatEventHandler`] callback interface, and
//! the [`ChatStreamClient`] transport driver that binds a session to a live
//! SSE connection.
//!
//! Lifecycle guarantees:
//! - frames are dispatched strictly in delivery order;
//! - the first-frame callback fires exactly once, before any category
//!   callback;
//! - exactly one terminal callback (`on_done` or `on_error`) fires per
//!   session, and cancellation fires none;
//! - the connection is released exactly once, on whichever terminal
//!   transition occurs first.

pub mod client;
pub mod error;
pub mod handler;
pub mod session;

pub use client::{ChatStreamClient, ChatStreamParams, StreamHandle, CHAT_STREAM_PATH};
pub use error::{ErrorRecord, StreamError, StreamResult};
pub use handler::ChatEventHandler;
pub use session::{StreamSession, EVENT_BUSINESS_ERROR, EVENT_DONE};
