//! Push-event fan-out.
//!
//! Consumers never touch the socket; they hold a [`Subscription`] obtained
//! from [`Dispatcher::subscribe`] with a predicate over [`PushEvent`].
//! Dropping the subscription detaches it, so a view that switches
//! conversations cannot leave a stale listener behind.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::network::protocol::PushEvent;

type Filter = Box<dyn Fn(&PushEvent) -> bool + Send + Sync>;

struct Subscriber {
    id: u64,
    filter: Filter,
    tx: mpsc::UnboundedSender<PushEvent>,
}

#[derive(Default)]
pub struct Dispatcher {
    subscribers: Mutex<Vec<Subscriber>>,
    next_id: AtomicU64,
}

impl Dispatcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Attach a listener for events matching `filter`. The subscription
    /// detaches when dropped.
    pub fn subscribe<F>(self: &Arc<Self>, filter: F) -> Subscription
    where
        F: Fn(&PushEvent) -> bool + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .expect("dispatcher lock poisoned")
            .push(Subscriber {
                id,
                filter: Box::new(filter),
                tx,
            });
        Subscription {
            id,
            dispatcher: Arc::clone(self),
            rx,
        }
    }

    /// Deliver an event to every live subscriber whose filter matches.
    /// Subscribers whose receiving end is gone are dropped on the way.
    pub fn dispatch(&self, event: &PushEvent) {
        let mut subscribers = self.subscribers.lock().expect("dispatcher lock poisoned");
        subscribers.retain(|sub| {
            if !(sub.filter)(event) {
                return !sub.tx.is_closed();
            }
            sub.tx.send(event.clone()).is_ok()
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .expect("dispatcher lock poisoned")
            .len()
    }

    fn unsubscribe(&self, id: u64) {
        self.subscribers
            .lock()
            .expect("dispatcher lock poisoned")
            .retain(|sub| sub.id != id);
    }
}

/// A live listener; receive with [`Subscription::try_next`] from the UI loop.
pub struct Subscription {
    id: u64,
    dispatcher: Arc<Dispatcher>,
    rx: mpsc::UnboundedReceiver<PushEvent>,
}

impl Subscription {
    pub fn try_next(&mut self) -> Option<PushEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispatcher.unsubscribe(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat_event(request_id: &str, from: &str) -> PushEvent {
        PushEvent::Chat {
            request_id: request_id.to_string(),
            from_user: from.to_string(),
            to_user: String::new(),
            content: "hello".to_string(),
            timestamp: None,
        }
    }

    #[test]
    fn subscriber_sees_only_matching_events() {
        let dispatcher = Dispatcher::new();
        let mut sub = dispatcher.subscribe(|e| e.is_chat_for("a"));

        dispatcher.dispatch(&chat_event("a", "bob"));
        dispatcher.dispatch(&chat_event("b", "bob"));

        assert!(sub.try_next().is_some_and(|e| e.is_chat_for("a")));
        assert!(sub.try_next().is_none());
    }

    #[test]
    fn switching_conversations_leaves_no_stale_listener() {
        let dispatcher = Dispatcher::new();

        let sub_a = dispatcher.subscribe(|e| e.is_chat_for("a"));
        assert_eq!(dispatcher.subscriber_count(), 1);

        // Detach before attaching the next conversation's listener.
        drop(sub_a);
        let mut sub_b = dispatcher.subscribe(|e| e.is_chat_for("b"));
        assert_eq!(dispatcher.subscriber_count(), 1);

        dispatcher.dispatch(&chat_event("a", "bob"));
        assert!(sub_b.try_next().is_none());

        dispatcher.dispatch(&chat_event("b", "bob"));
        assert!(sub_b.try_next().is_some());
    }

    #[test]
    fn dispatch_prunes_subscribers_with_closed_receivers() {
        let dispatcher = Dispatcher::new();
        let mut sub = dispatcher.subscribe(|_| true);

        // A consumer that stopped receiving without detaching.
        sub.rx.close();
        dispatcher.dispatch(&chat_event("a", "bob"));
        assert_eq!(dispatcher.subscriber_count(), 0);
    }
}
