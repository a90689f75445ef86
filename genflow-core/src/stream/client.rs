//! SSE transport driver
//!
//! [`ChatStreamClient`] opens the long-lived push connection for a chat
//! turn and spawns the task that feeds frames into a
//! [`StreamSession`](crate::stream::session::StreamSession). The returned
//! [`StreamHandle`] is the caller's only lever over a running stream:
//! cancellation and (mostly for tests) joining the drive task.

use crate::config::ClientConfig;
use crate::stream::error::{StreamError, StreamResult};
use crate::stream::handler::ChatEventHandler;
use crate::stream::session::StreamSession;
use bytes::Bytes;
use eventsource_stream::{EventStreamError, Eventsource};
use futures::{Stream, StreamExt};
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;
use url::Url;
use uuid::Uuid;

/// Endpoint path of the streaming code-generation chat, relative to the
/// configured base URL.
pub const CHAT_STREAM_PATH: &str = "/app/chat/gen/code";

/// Parameters for starting one chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatStreamParams {
    /// Conversation (application) the turn belongs to
    pub app_id: String,

    /// The user's message text
    pub user_message: String,
}

/// Client for the streaming chat endpoint.
///
/// Holds a connection-pooled HTTP client; one instance can start any number
/// of concurrent sessions.
#[derive(Clone)]
pub struct ChatStreamClient {
    client: Client,
    config: ClientConfig,
}

impl ChatStreamClient {
    /// Create a client from the given configuration.
    ///
    /// Only a connect timeout is applied; the streaming read itself has no
    /// deadline, since a healthy generation turn can stay quiet for long
    /// stretches while the backend runs tools.
    pub fn new(config: ClientConfig) -> StreamResult<Self> {
        config
            .validate()
            .map_err(|e| StreamError::Configuration(e.to_string()))?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| StreamError::Configuration(format!("failed to create HTTP client: {}", e)))?;
        Ok(ChatStreamClient { client, config })
    }

    /// Open a chat stream and dispatch its events to `handler`.
    ///
    /// Connection failures (including non-success HTTP status) are returned
    /// here — the session never opens and no callback fires. Once this
    /// returns `Ok`, every outcome is delivered through the handler,
    /// exactly once.
    pub async fn start_chat<H>(
        &self,
        params: ChatStreamParams,
        handler: H,
    ) -> StreamResult<StreamHandle>
    where
        H: ChatEventHandler + 'static,
    {
        let url = self.build_url(&params)?;
        let session_id = Uuid::new_v4();
        info!(%session_id, app_id = %params.app_id, "opening chat stream");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(StreamError::Connect)?
            .error_for_status()
            .map_err(StreamError::Connect)?;

        let events = response.bytes_stream();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let session = StreamSession::new(handler, session_id);
        let task = tokio::spawn(drive(session, events, cancel_rx));

        Ok(StreamHandle {
            session_id,
            cancel: Some(cancel_tx),
            task,
        })
    }

    fn build_url(&self, params: &ChatStreamParams) -> StreamResult<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}{}", base, CHAT_STREAM_PATH))?;
        url.query_pairs_mut()
            .append_pair("appId", &params.app_id)
            .append_pair("message", &params.user_message);
        Ok(url)
    }
}

/// Handle to a running chat stream.
///
/// Dropping the handle detaches: the stream keeps running and the handler
/// keeps receiving events. Cancellation is always explicit via
/// [`StreamHandle::abort`].
pub struct StreamHandle {
    session_id: Uuid,
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl StreamHandle {
    /// Correlation id of this session, matching the `session_id` field on
    /// its log records.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Cancel the stream. The terminal latch flips before the next frame is
    /// processed, the connection is released, and no further callback fires.
    /// Idempotent.
    pub fn abort(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    /// Whether the drive task has finished.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the drive task to finish.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Feed SSE frames into the session until a terminal transition.
///
/// The cancel branch is polled first so a pending cancellation wins over a
/// pending frame. Returning drops `events`, which closes the underlying
/// connection — the single release of the transport handle.
async fn drive<H, S>(
    mut session: StreamSession<H>,
    events: S,
    mut cancel_rx: oneshot::Receiver<()>,
) where
    H: ChatEventHandler,
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    let mut events = Box::pin(events.eventsource());
    let mut cancel_open = true;
    loop {
        tokio::select! {
            biased;
            res = &mut cancel_rx, if cancel_open => match res {
                Ok(()) => {
                    session.cancel();
                    break;
                }
                // Handle dropped without abort: keep streaming, stop
                // polling the closed channel.
                Err(_) => cancel_open = false,
            },
            item = events.next() => match item {
                Some(Ok(frame)) => {
                    session.dispatch(&frame.event, &frame.data);
                    if session.is_terminated() {
                        break;
                    }
                }
                Some(Err(err)) => {
                    session.transport_failed(&transport_error_message(&err));
                    break;
                }
                None => {
                    session.closed();
                    break;
                }
            },
        }
    }
}

fn transport_error_message(err: &EventStreamError<reqwest::Error>) -> String {
    match err {
        EventStreamError::Transport(e) => e.to_string(),
        other => other.to_string(),
    }
}
