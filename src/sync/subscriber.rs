//! Supervised subscription to the server-pushed change feed
//!
//! The feed is a persistent, text-framed stream (one JSON payload per
//! `data:` frame). The subscriber owns the connection exclusively for the
//! controller's lifetime, reconnects with capped exponential backoff when
//! the transport drops, and forwards every parsed event to the
//! controller. Teardown is signalled through a watch channel and releases
//! the connection on every exit path, including a backoff sleep in
//! progress.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::catalog::service::CatalogService;
use crate::config::{RECONNECT_INITIAL_DELAY_MS, RECONNECT_MAX_DELAY_MS, REQUEST_TIMEOUT_SECS};
use crate::sync::controller::SyncController;
use crate::sync::notification::parse_notification;

/// Why a connection attempt or an open stream ended.
enum Disconnect {
    /// Shutdown was signalled; the run loop must exit.
    Shutdown,
    /// The server closed a healthy stream; reconnect promptly.
    StreamEnded,
}

pub struct NotificationSubscriber<S> {
    client: reqwest::Client,
    watch_url: String,
    controller: Arc<SyncController<S>>,
    initial_delay: Duration,
    max_delay: Duration,
}

impl<S: CatalogService> NotificationSubscriber<S> {
    pub fn new(watch_url: impl Into<String>, controller: Arc<SyncController<S>>) -> Self {
        Self {
            // No overall timeout here: the feed connection is expected to
            // stay open indefinitely
            client: reqwest::Client::builder()
                .user_agent("stacksync")
                .connect_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to create HTTP client"),
            watch_url: watch_url.into(),
            controller,
            initial_delay: Duration::from_millis(RECONNECT_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(RECONNECT_MAX_DELAY_MS),
        }
    }

    /// Overrides the reconnect backoff bounds.
    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_delay = initial;
        self.max_delay = max;
        self
    }

    /// Runs the subscription until `shutdown` flips to true.
    ///
    /// Transport errors are logged and answered with a reconnect; the
    /// backoff doubles per failed attempt up to the configured cap and
    /// resets after every successful connection.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut delay = self.initial_delay;

        while !*shutdown.borrow() {
            match self.stream_events(&mut shutdown).await {
                Ok(Disconnect::Shutdown) => break,
                Ok(Disconnect::StreamEnded) => {
                    debug!("Change feed ended, reconnecting");
                    delay = self.initial_delay;
                }
                Err(e) => {
                    warn!("Change feed transport error: {}, retrying in {:?}", e, delay);
                }
            }

            tokio::select! {
                _ = sleep(delay) => {}
                changed = shutdown.changed() => {
                    // Shutdown cancels a pending reconnect timer; a dropped
                    // sender counts as shutdown
                    if changed.is_err() {
                        break;
                    }
                }
            }
            delay = (delay * 2).min(self.max_delay);
        }

        info!("Change feed subscription closed");
    }

    /// Connects and pumps events until the stream ends, the transport
    /// fails, or shutdown is signalled. The response (and with it the
    /// connection) is dropped on every return.
    async fn stream_events(
        &self,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<Disconnect, reqwest::Error> {
        debug!("Connecting to change feed at {}", self.watch_url);

        let response = self
            .client
            .get(&self.watch_url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?
            .error_for_status()?;

        info!("Change feed connected");

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();

        loop {
            tokio::select! {
                chunk = stream.next() => match chunk {
                    Some(Ok(bytes)) => {
                        buffer.push_str(&String::from_utf8_lossy(&bytes));
                        while let Some(frame_end) = buffer.find("\n\n") {
                            let frame: String = buffer.drain(..frame_end + 2).collect();
                            self.dispatch_frame(frame.trim_end()).await;
                        }
                    }
                    Some(Err(e)) => return Err(e),
                    None => return Ok(Disconnect::StreamEnded),
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return Ok(Disconnect::Shutdown);
                    }
                }
            }
        }
    }

    /// Extracts the payload from one text frame and forwards the parsed
    /// event. Frames without a `data:` line (comments, retry hints) are
    /// skipped.
    async fn dispatch_frame(&self, frame: &str) {
        let payload = frame
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
            .collect::<Vec<_>>()
            .join("\n");

        if payload.is_empty() {
            return;
        }

        if let Some(notification) = parse_notification(&payload) {
            debug!("Change feed event: {:?}", notification);
            self.controller.handle_notification(notification).await;
        }
    }
}
