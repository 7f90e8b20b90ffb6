//! Per-conversation chat state.
//!
//! A session is seeded from REST history and then appended to by live
//! events and optimistic local sends. Messages stay in append order; no
//! timestamp sort, so out-of-order delivery shows as-is.

use chrono::Utc;
use uuid::Uuid;

use crate::common::types::ChatMessage;
use crate::network::channel::{ChannelError, RealtimeHandle};
use crate::network::dispatch::Subscription;
use crate::network::protocol::{OutboundChat, PushEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    Loading,
    Ready,
}

pub struct ChatSession {
    pub request_id: String,
    pub other_user: String,
    messages: Vec<ChatMessage>,
    history: HistoryState,
    pub error: Option<String>,
    subscription: Subscription,
}

impl ChatSession {
    /// Open a conversation: attaches a live listener scoped to exactly this
    /// request id. The caller still has to ask the network task for history.
    /// Dropping the session detaches the listener, so switching
    /// conversations can never leave a stale one behind.
    pub fn open(request_id: String, other_user: String, realtime: &RealtimeHandle) -> Self {
        let scope = request_id.clone();
        let subscription = realtime.subscribe(move |event| event.is_chat_for(&scope));
        Self {
            request_id,
            other_user,
            messages: Vec::new(),
            history: HistoryState::Loading,
            error: None,
            subscription,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.history == HistoryState::Loading
    }

    /// Server history replaces whatever is held. A response for another
    /// request id is a stale in-flight fetch from a conversation the user
    /// already left; drop it.
    pub fn seed_history(&mut self, request_id: &str, messages: Vec<ChatMessage>) {
        if request_id != self.request_id {
            log::info!("Discarding stale chat history for {request_id}");
            return;
        }
        self.messages = messages;
        self.history = HistoryState::Ready;
    }

    pub fn history_failed(&mut self, request_id: &str, error: String) {
        if request_id != self.request_id {
            return;
        }
        self.history = HistoryState::Ready;
        self.error = Some(error);
    }

    /// Drain live events into the message list. Frames echoing the user's
    /// own sends are skipped; the optimistic echo already covers them.
    pub fn pump(&mut self, current_user: &str) {
        while let Some(event) = self.subscription.try_next() {
            let PushEvent::Chat {
                request_id,
                from_user,
                to_user,
                content,
                timestamp,
            } = event
            else {
                continue;
            };
            if from_user == current_user {
                continue;
            }
            self.messages.push(ChatMessage {
                id: String::new(),
                request_id,
                from_user,
                to_user,
                content,
                timestamp,
            });
        }
    }

    /// Send over the live channel and append an optimistic echo with a
    /// temporary local id. Fails without touching the list when the channel
    /// is down.
    pub fn send(
        &mut self,
        realtime: &RealtimeHandle,
        current_user: &str,
        content: String,
    ) -> Result<(), ChannelError> {
        realtime.send_chat(OutboundChat::new(
            self.other_user.clone(),
            content.clone(),
            self.request_id.clone(),
        ))?;

        self.messages.push(ChatMessage {
            id: format!("temp-{}", Uuid::new_v4()),
            request_id: self.request_id.clone(),
            from_user: current_user.to_string(),
            to_user: self.other_user.clone(),
            content,
            timestamp: Some(Utc::now()),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::channel::new_channel;
    use crate::network::dispatch::Dispatcher;
    use std::sync::Arc;

    fn chat_event(request_id: &str, from: &str, content: &str) -> PushEvent {
        PushEvent::Chat {
            request_id: request_id.to_string(),
            from_user: from.to_string(),
            to_user: "alice".to_string(),
            content: content.to_string(),
            timestamp: None,
        }
    }

    #[test]
    fn history_seeds_only_the_active_conversation() {
        let dispatcher = Dispatcher::new();
        let (handle, _task) = new_channel(dispatcher);
        let mut session = ChatSession::open("r1".into(), "bob".into(), &handle);
        assert!(session.is_loading());

        // Stale response from a conversation the user already left.
        session.seed_history(
            "r0",
            vec![ChatMessage {
                id: "m0".into(),
                request_id: "r0".into(),
                from_user: "bob".into(),
                to_user: "alice".into(),
                content: "old".into(),
                timestamp: None,
            }],
        );
        assert!(session.is_loading());
        assert!(session.messages().is_empty());

        session.seed_history("r1", Vec::new());
        assert!(!session.is_loading());
    }

    #[test]
    fn live_events_append_and_own_echo_is_skipped() {
        let dispatcher = Dispatcher::new();
        let (handle, _task) = new_channel(Arc::clone(&dispatcher));
        let mut session = ChatSession::open("r1".into(), "bob".into(), &handle);
        session.seed_history("r1", Vec::new());

        dispatcher.dispatch(&chat_event("r1", "bob", "hi"));
        dispatcher.dispatch(&chat_event("r1", "alice", "server echo"));
        dispatcher.dispatch(&chat_event("r2", "bob", "other conversation"));
        session.pump("alice");

        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].content, "hi");
    }

    #[test]
    fn switching_conversations_detaches_the_old_listener() {
        let dispatcher = Dispatcher::new();
        let (handle, _task) = new_channel(Arc::clone(&dispatcher));

        let session_a = ChatSession::open("a".into(), "bob".into(), &handle);
        drop(session_a);
        let mut session_b = ChatSession::open("b".into(), "carol".into(), &handle);
        assert_eq!(dispatcher.subscriber_count(), 1);

        dispatcher.dispatch(&chat_event("a", "bob", "lost"));
        session_b.pump("alice");
        assert!(session_b.messages().is_empty());
    }

    #[test]
    fn send_while_channel_down_fails_and_appends_nothing() {
        let dispatcher = Dispatcher::new();
        let (handle, _task) = new_channel(dispatcher);
        let mut session = ChatSession::open("r1".into(), "bob".into(), &handle);
        session.seed_history("r1", Vec::new());

        let result = session.send(&handle, "alice", "hello".into());
        assert!(matches!(result, Err(ChannelError::NotConnected)));
        assert!(session.messages().is_empty());
    }

    #[test]
    fn successful_send_appends_optimistic_echo_with_temp_id() {
        let dispatcher = Dispatcher::new();
        let (handle, _task) = new_channel(dispatcher);
        handle.set_open_for_tests(true);
        let mut session = ChatSession::open("r1".into(), "bob".into(), &handle);
        session.seed_history("r1", Vec::new());

        session.send(&handle, "alice", "hello".into()).expect("send");
        assert_eq!(session.messages().len(), 1);
        let echo = &session.messages()[0];
        assert!(echo.id.starts_with("temp-"));
        assert_eq!(echo.from_user, "alice");
    }
}
