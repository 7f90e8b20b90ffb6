//! Real-time channel to the backend.
//!
//! One WebSocket per session, keyed by the signed-in username. The task
//! waits for a session, connects, and runs a bidirectional loop: outbound
//! chat frames from the UI handle, inbound frames parsed and fanned out
//! through the [`Dispatcher`]. Reconnects with capped exponential backoff;
//! a malformed inbound frame is logged and skipped, never fatal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;

use crate::network::dispatch::{Dispatcher, Subscription};
use crate::network::protocol::{OutboundChat, PushEvent};

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Connection issue: cannot send messages right now")]
    NotConnected,
}

/// Shared open/closed flag so senders can fail fast without touching the
/// socket.
#[derive(Clone, Default)]
pub struct ChannelStatus(Arc<AtomicBool>);

impl ChannelStatus {
    pub fn is_open(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn set(&self, open: bool) {
        self.0.store(open, Ordering::Relaxed);
    }
}

/// What the UI holds instead of a socket reference: status checks, outbound
/// sends, and event subscriptions.
#[derive(Clone)]
pub struct RealtimeHandle {
    status: ChannelStatus,
    outgoing: mpsc::UnboundedSender<OutboundChat>,
    dispatcher: Arc<Dispatcher>,
}

impl RealtimeHandle {
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Send a chat frame. Fails immediately when the channel is down;
    /// nothing is queued for later delivery.
    pub fn send_chat(&self, frame: OutboundChat) -> Result<(), ChannelError> {
        if !self.status.is_open() {
            return Err(ChannelError::NotConnected);
        }
        self.outgoing
            .send(frame)
            .map_err(|_| ChannelError::NotConnected)
    }

    pub fn subscribe<F>(&self, filter: F) -> Subscription
    where
        F: Fn(&PushEvent) -> bool + Send + Sync + 'static,
    {
        self.dispatcher.subscribe(filter)
    }

    #[cfg(test)]
    pub(crate) fn set_open_for_tests(&self, open: bool) {
        self.status.set(open);
    }
}

/// The task half; consumed by [`ChannelTask::run`] on the runtime.
pub struct ChannelTask {
    status: ChannelStatus,
    outgoing_rx: mpsc::UnboundedReceiver<OutboundChat>,
    dispatcher: Arc<Dispatcher>,
}

pub fn new_channel(dispatcher: Arc<Dispatcher>) -> (RealtimeHandle, ChannelTask) {
    let status = ChannelStatus::default();
    let (outgoing, outgoing_rx) = mpsc::unbounded_channel();
    (
        RealtimeHandle {
            status: status.clone(),
            outgoing,
            dispatcher: Arc::clone(&dispatcher),
        },
        ChannelTask {
            status,
            outgoing_rx,
            dispatcher,
        },
    )
}

enum ConnectionEnd {
    /// The session changed (login/logout); this connection is stale.
    SessionChanged,
    /// The server closed the connection or the read side failed over.
    ServerClosed,
    /// The UI handle is gone; the whole task should stop.
    Shutdown,
}

/// Reconnect delays: 1s doubling to a 30s cap. Reset whenever a connection
/// is actually established, so a drop after a long-lived healthy connection
/// retries at 1s instead of whatever an earlier flaky stretch left behind.
struct Backoff {
    current: Duration,
}

impl Backoff {
    const INITIAL: Duration = Duration::from_secs(1);
    const MAX: Duration = Duration::from_secs(30);

    fn new() -> Self {
        Self {
            current: Self::INITIAL,
        }
    }

    fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (delay * 2).min(Self::MAX);
        delay
    }

    fn reset(&mut self) {
        self.current = Self::INITIAL;
    }
}

impl ChannelTask {
    /// Run until the UI side goes away. `user_rx` carries the active
    /// session's username; `None` means signed out, so no connection is
    /// held open without a valid session.
    pub async fn run(mut self, ws_base: String, mut user_rx: watch::Receiver<Option<String>>) {
        let mut backoff = Backoff::new();

        loop {
            let user = loop {
                let current = user_rx.borrow().clone();
                if let Some(user) = current {
                    break user;
                }
                if user_rx.changed().await.is_err() {
                    return;
                }
            };

            let url = format!("{ws_base}/{user}");
            log::info!("Connecting real-time channel as {user}");

            let end = match tokio_tungstenite::connect_async(&url).await {
                Ok((ws, _response)) => {
                    backoff.reset();
                    self.drive(ws, &mut user_rx).await
                }
                Err(err) => Err(err),
            };
            self.status.set(false);

            match end {
                Ok(ConnectionEnd::SessionChanged) => continue,
                Ok(ConnectionEnd::Shutdown) => return,
                Ok(ConnectionEnd::ServerClosed) => {}
                Err(err) => {
                    log::warn!("Real-time channel error: {err}");
                }
            }

            let delay = backoff.next_delay();
            log::info!("Reconnecting in {}s", delay.as_secs());
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                changed = user_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }
    }

    async fn drive(
        &mut self,
        ws: tokio_tungstenite::WebSocketStream<
            tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
        >,
        user_rx: &mut watch::Receiver<Option<String>>,
    ) -> Result<ConnectionEnd, tokio_tungstenite::tungstenite::Error> {
        let (mut ws_tx, mut ws_rx) = ws.split();

        self.status.set(true);
        log::info!("Real-time channel open");

        loop {
            tokio::select! {
                changed = user_rx.changed() => {
                    // This connection belongs to the old session; close the
                    // socket we own rather than racing a stale close later.
                    let _ = ws_tx.send(Message::Close(None)).await;
                    return Ok(if changed.is_ok() {
                        ConnectionEnd::SessionChanged
                    } else {
                        ConnectionEnd::Shutdown
                    });
                }

                frame = self.outgoing_rx.recv() => {
                    match frame {
                        Some(frame) => {
                            match serde_json::to_string(&frame) {
                                Ok(json) => ws_tx.send(Message::Text(json.into())).await?,
                                Err(err) => log::warn!("Failed to serialize chat frame: {err}"),
                            }
                        }
                        None => {
                            let _ = ws_tx.send(Message::Close(None)).await;
                            return Ok(ConnectionEnd::Shutdown);
                        }
                    }
                }

                msg = ws_rx.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            match PushEvent::parse(&text) {
                                Ok(event) => self.dispatcher.dispatch(&event),
                                Err(err) => log::warn!("Ignoring malformed frame: {err}"),
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            log::info!("Server closed the real-time channel");
                            return Ok(ConnectionEnd::ServerClosed);
                        }
                        Some(Ok(_)) => {} // ping/pong/binary: nothing to do
                        Some(Err(err)) => return Err(err),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_fails_fast_while_channel_is_down() {
        let (handle, _task) = new_channel(Dispatcher::new());
        assert!(!handle.is_open());

        let frame = OutboundChat::new("bob".into(), "hi".into(), "r1".into());
        assert!(matches!(
            handle.send_chat(frame),
            Err(ChannelError::NotConnected)
        ));
    }

    #[test]
    fn backoff_doubles_to_the_cap_and_resets_after_a_connection() {
        let mut backoff = Backoff::new();
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
        assert_eq!(backoff.next_delay(), Duration::from_secs(2));
        assert_eq!(backoff.next_delay(), Duration::from_secs(4));
        assert_eq!(backoff.next_delay(), Duration::from_secs(8));
        assert_eq!(backoff.next_delay(), Duration::from_secs(16));
        assert_eq!(backoff.next_delay(), Duration::from_secs(30));
        assert_eq!(backoff.next_delay(), Duration::from_secs(30));

        // A successful connect resets the ladder; a later drop retries fast.
        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
    }

    #[test]
    fn send_is_accepted_once_open() {
        let (handle, mut task) = new_channel(Dispatcher::new());
        task.status.set(true);

        let frame = OutboundChat::new("bob".into(), "hi".into(), "r1".into());
        handle.send_chat(frame).expect("send while open");
        assert!(task.outgoing_rx.try_recv().is_ok());
    }
}
