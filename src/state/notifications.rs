//! Notification/request reconciliation.
//!
//! Three sources feed one list: the REST snapshot of pending incoming
//! requests, the persisted notification history, and live push events. The
//! merge is idempotent so the sources can arrive in any order and any number
//! of times: an item enters the list only if nothing already present shares
//! its identity key, and first-seen wins.
//!
//! `request_response` is the exception on purpose: it is a status update for
//! a request the user sent, so it mutates the matching sent entry and never
//! appears in the list itself.
//!
//! Optimistic actions (accept, decline, mark-read) apply locally first and
//! keep enough state to roll back if the backend call fails.

use crate::common::types::{IncomingRequest, RequestStatus, SentRequest, StoredNotification};
use crate::network::protocol::PushEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    NewRequest,
    NewSkill,
}

/// One visible notification.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    /// Persisted notification id, when the entry came from history.
    pub stored_id: Option<String>,
    /// Exchange request id, for request-kind entries.
    pub request_id: Option<String>,
    pub kind: FeedKind,
    pub from_user: String,
    pub skill_title: String,
    pub message: String,
    pub read: bool,
    /// Local accept mark; enables the chat affordance while the
    /// confirmation round trip is in flight.
    pub accepted: bool,
}

impl FeedEntry {
    /// Identity for dedup: request id for request kinds, stored id for
    /// history items, otherwise unique.
    fn shares_identity(&self, other: &FeedEntry) -> bool {
        if let (Some(a), Some(b)) = (&self.request_id, &other.request_id) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (&self.stored_id, &other.stored_id) {
            return a == b;
        }
        false
    }
}

#[derive(Debug, Clone)]
enum Pending {
    Accept {
        request_id: String,
    },
    Decline {
        request_id: String,
        index: usize,
        entry: FeedEntry,
    },
    MarkRead {
        stored_id: String,
        was_read: bool,
    },
}

/// The merged, deduplicated, append-ordered notification list plus the
/// sibling sent-requests list.
#[derive(Debug, Default)]
pub struct NotificationFeed {
    entries: Vec<FeedEntry>,
    sent: Vec<SentRequest>,
    pending: Vec<Pending>,
}

impl NotificationFeed {
    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    pub fn sent(&self) -> &[SentRequest] {
        &self.sent
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sidebar badge: unread incoming requests.
    pub fn unread_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.kind == FeedKind::NewRequest && !e.read)
            .count()
    }

    /// Append unless an existing entry shares the identity key.
    /// First-seen wins; later sources never overwrite. A request with an
    /// in-flight decline is also skipped: a snapshot fetched before the
    /// backend processed the decline must not resurrect the removed entry.
    fn insert(&mut self, entry: FeedEntry) {
        if let Some(id) = &entry.request_id {
            if self.has_pending_decline(id) {
                return;
            }
        }
        if self.entries.iter().any(|e| e.shares_identity(&entry)) {
            return;
        }
        self.entries.push(entry);
    }

    fn has_pending_decline(&self, request_id: &str) -> bool {
        self.pending
            .iter()
            .any(|p| matches!(p, Pending::Decline { request_id: id, .. } if id == request_id))
    }

    // ── Sources ─────────────────────────────────────────────────

    /// REST snapshot of currently-pending incoming requests.
    pub fn merge_incoming(&mut self, requests: Vec<IncomingRequest>) {
        for req in requests {
            self.insert(FeedEntry {
                stored_id: None,
                request_id: Some(req.id),
                kind: FeedKind::NewRequest,
                from_user: req.from_user,
                skill_title: req.skill_title,
                message: req.message,
                read: false,
                accepted: false,
            });
        }
    }

    /// Persisted notification history, possibly overlapping the snapshot.
    pub fn merge_stored(&mut self, notifications: Vec<StoredNotification>) {
        for notif in notifications {
            match notif.kind.as_str() {
                "new_request" => self.insert(FeedEntry {
                    stored_id: Some(notif.id),
                    request_id: notif.request_id,
                    kind: FeedKind::NewRequest,
                    from_user: notif.from_user,
                    skill_title: notif.skill_title,
                    message: notif.message,
                    read: notif.read,
                    accepted: false,
                }),
                "new_skill" => self.insert(FeedEntry {
                    stored_id: Some(notif.id),
                    request_id: None,
                    kind: FeedKind::NewSkill,
                    from_user: notif.from_user,
                    skill_title: notif.skill_title,
                    message: notif.message,
                    read: notif.read,
                    accepted: false,
                }),
                // A persisted response is still just a status update.
                "request_response" => {
                    if let (Some(request_id), Some(status)) = (notif.request_id, notif.status) {
                        self.update_sent_status(&request_id, status);
                    }
                }
                other => {
                    log::warn!("Ignoring stored notification of unknown kind {other:?}");
                }
            }
        }
    }

    pub fn seed_sent(&mut self, sent: Vec<SentRequest>) {
        self.sent = sent;
    }

    /// Live push event. Chat frames are not notifications and are ignored.
    pub fn apply_push(&mut self, event: &PushEvent) {
        match event {
            PushEvent::NewRequest {
                request_id,
                from_user,
                skill_title,
                message,
            } => self.insert(FeedEntry {
                stored_id: None,
                request_id: Some(request_id.clone()),
                kind: FeedKind::NewRequest,
                from_user: from_user.clone(),
                skill_title: skill_title.clone(),
                message: message.clone(),
                read: false,
                accepted: false,
            }),
            PushEvent::NewSkill { data } => self.insert(FeedEntry {
                stored_id: None,
                request_id: None,
                kind: FeedKind::NewSkill,
                from_user: data.owner.clone(),
                skill_title: data.title.clone(),
                message: String::new(),
                read: false,
                accepted: false,
            }),
            PushEvent::RequestResponse { request_id, status } => {
                self.update_sent_status(request_id, *status);
            }
            PushEvent::Chat { .. } => {}
        }
    }

    fn update_sent_status(&mut self, request_id: &str, status: RequestStatus) {
        for req in &mut self.sent {
            if req.id == request_id {
                req.status = status;
            }
        }
    }

    // ── Optimistic actions ──────────────────────────────────────

    /// Mark an incoming request accepted locally; the entry stays listed
    /// until the backend confirms. Returns false if no such entry.
    pub fn accept(&mut self, request_id: &str) -> bool {
        let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.request_id.as_deref() == Some(request_id))
        else {
            return false;
        };
        entry.accepted = true;
        self.pending.push(Pending::Accept {
            request_id: request_id.to_string(),
        });
        true
    }

    /// Remove an incoming request immediately, before the round trip
    /// resolves. Returns false if no such entry.
    pub fn decline(&mut self, request_id: &str) -> bool {
        let Some(index) = self
            .entries
            .iter()
            .position(|e| e.request_id.as_deref() == Some(request_id))
        else {
            return false;
        };
        let entry = self.entries.remove(index);
        self.pending.push(Pending::Decline {
            request_id: request_id.to_string(),
            index,
            entry,
        });
        true
    }

    /// Flip the local read flag on a persisted entry.
    pub fn mark_read(&mut self, stored_id: &str) -> bool {
        let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.stored_id.as_deref() == Some(stored_id))
        else {
            return false;
        };
        let was_read = entry.read;
        entry.read = true;
        self.pending.push(Pending::MarkRead {
            stored_id: stored_id.to_string(),
            was_read,
        });
        true
    }

    /// Backend confirmed an accept or decline; forget the rollback state.
    pub fn confirm_respond(&mut self, request_id: &str) {
        self.pending.retain(|p| !matches!(p,
            Pending::Accept { request_id: id } | Pending::Decline { request_id: id, .. }
                if id == request_id));
    }

    /// Accept failed: clear the local accepted mark.
    pub fn fail_accept(&mut self, request_id: &str) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.request_id.as_deref() == Some(request_id))
        {
            entry.accepted = false;
        }
        self.confirm_respond(request_id);
    }

    /// Decline failed: reinstate the entry at its previous position.
    pub fn fail_decline(&mut self, request_id: &str) {
        let Some(pos) = self.pending.iter().position(
            |p| matches!(p, Pending::Decline { request_id: id, .. } if id == request_id),
        ) else {
            return;
        };
        let Pending::Decline { index, entry, .. } = self.pending.remove(pos) else {
            return;
        };
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry);
    }

    pub fn confirm_mark_read(&mut self, stored_id: &str) {
        self.pending.retain(
            |p| !matches!(p, Pending::MarkRead { stored_id: id, .. } if id == stored_id),
        );
    }

    /// Mark-read failed: restore the previous read flag.
    pub fn fail_mark_read(&mut self, stored_id: &str) {
        let Some(pos) = self.pending.iter().position(
            |p| matches!(p, Pending::MarkRead { stored_id: id, .. } if id == stored_id),
        ) else {
            return;
        };
        let Pending::MarkRead { was_read, .. } = self.pending.remove(pos) else {
            return;
        };
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.stored_id.as_deref() == Some(stored_id))
        {
            entry.read = was_read;
        }
    }

    /// Fresh feed for a new session.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.sent.clear();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::Skill;
    use proptest::prelude::*;

    fn incoming(id: &str) -> IncomingRequest {
        IncomingRequest {
            id: id.to_string(),
            from_user: "bob".to_string(),
            skill_title: "Guitar".to_string(),
            message: "let's trade".to_string(),
        }
    }

    fn stored(id: &str, request_id: &str) -> StoredNotification {
        StoredNotification {
            id: id.to_string(),
            kind: "new_request".to_string(),
            request_id: Some(request_id.to_string()),
            from_user: "bob".to_string(),
            skill_title: "Guitar".to_string(),
            message: "let's trade".to_string(),
            status: None,
            read: false,
        }
    }

    fn push_request(request_id: &str) -> PushEvent {
        PushEvent::NewRequest {
            request_id: request_id.to_string(),
            from_user: "bob".to_string(),
            skill_title: "Guitar".to_string(),
            message: "let's trade".to_string(),
        }
    }

    fn sent(id: &str) -> SentRequest {
        SentRequest {
            id: id.to_string(),
            from_user: "alice".to_string(),
            to_user: "bob".to_string(),
            skill_id: "s1".to_string(),
            skill_title: "Guitar".to_string(),
            message: String::new(),
            status: RequestStatus::Pending,
        }
    }

    #[test]
    fn three_sources_same_request_yield_one_entry() {
        let mut feed = NotificationFeed::default();
        feed.merge_incoming(vec![incoming("r1")]);
        feed.merge_stored(vec![stored("n1", "r1")]);
        feed.apply_push(&push_request("r1"));

        assert_eq!(feed.len(), 1);
        assert_eq!(feed.entries()[0].request_id.as_deref(), Some("r1"));
    }

    #[test]
    fn first_seen_wins_over_later_sources() {
        let mut feed = NotificationFeed::default();
        feed.apply_push(&push_request("r1"));
        // The stored copy carries a persisted id; the live entry stays as-is.
        feed.merge_stored(vec![stored("n1", "r1")]);

        assert_eq!(feed.len(), 1);
        assert!(feed.entries()[0].stored_id.is_none());
    }

    #[test]
    fn request_response_updates_sent_and_never_enters_the_list() {
        let mut feed = NotificationFeed::default();
        feed.seed_sent(vec![sent("r9")]);
        feed.apply_push(&PushEvent::RequestResponse {
            request_id: "r9".to_string(),
            status: RequestStatus::Accepted,
        });

        assert!(feed.is_empty());
        assert_eq!(feed.sent()[0].status, RequestStatus::Accepted);
    }

    #[test]
    fn decline_removes_immediately_and_shrinks_by_one() {
        let mut feed = NotificationFeed::default();
        feed.merge_incoming(vec![incoming("r1"), incoming("r2")]);

        assert!(feed.decline("r1"));
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.entries()[0].request_id.as_deref(), Some("r2"));
    }

    #[test]
    fn failed_decline_reinstates_at_previous_position() {
        let mut feed = NotificationFeed::default();
        feed.merge_incoming(vec![incoming("r1"), incoming("r2"), incoming("r3")]);

        feed.decline("r2");
        assert_eq!(feed.len(), 2);
        feed.fail_decline("r2");

        let ids: Vec<_> = feed
            .entries()
            .iter()
            .filter_map(|e| e.request_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn stale_snapshot_does_not_resurrect_an_inflight_decline() {
        let mut feed = NotificationFeed::default();
        feed.merge_incoming(vec![incoming("r1")]);
        feed.decline("r1");

        // Snapshot fetched before the backend processed the decline.
        feed.merge_incoming(vec![incoming("r1")]);
        feed.apply_push(&push_request("r1"));
        assert!(feed.is_empty());

        // Once the decline is rolled back the entry may come back.
        feed.fail_decline("r1");
        assert_eq!(feed.len(), 1);
        feed.merge_incoming(vec![incoming("r1")]);
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn accept_keeps_entry_listed_and_failure_reverts_the_mark() {
        let mut feed = NotificationFeed::default();
        feed.merge_incoming(vec![incoming("r1")]);

        assert!(feed.accept("r1"));
        assert_eq!(feed.len(), 1);
        assert!(feed.entries()[0].accepted);

        feed.fail_accept("r1");
        assert!(!feed.entries()[0].accepted);
    }

    #[test]
    fn mark_read_is_rolled_back_on_failure() {
        let mut feed = NotificationFeed::default();
        feed.merge_stored(vec![stored("n1", "r1")]);

        assert!(feed.mark_read("n1"));
        assert!(feed.entries()[0].read);

        feed.fail_mark_read("n1");
        assert!(!feed.entries()[0].read);
    }

    #[test]
    fn unread_count_tracks_incoming_requests_only() {
        let mut feed = NotificationFeed::default();
        feed.merge_incoming(vec![incoming("r1"), incoming("r2")]);
        feed.apply_push(&PushEvent::NewSkill {
            data: Skill {
                id: "s9".to_string(),
                title: "Sourdough".to_string(),
                description: String::new(),
                category: "Food".to_string(),
                availability: "Weekends".to_string(),
                owner: "bob".to_string(),
                owner_email: String::new(),
            },
        });

        assert_eq!(feed.unread_count(), 2);
    }

    proptest! {
        /// Any interleaving (with repeats) of the three sources referencing
        /// the same request id produces exactly one entry for it.
        #[test]
        fn dedup_holds_for_any_source_ordering(
            order in proptest::sample::subsequence(vec![0u8, 1, 2, 0, 1, 2], 1..=6)
                .prop_shuffle(),
        ) {
            let mut feed = NotificationFeed::default();
            for source in order {
                match source {
                    0 => feed.merge_incoming(vec![incoming("r1")]),
                    1 => feed.merge_stored(vec![stored("n1", "r1")]),
                    _ => feed.apply_push(&push_request("r1")),
                }
            }
            let matching = feed
                .entries()
                .iter()
                .filter(|e| e.request_id.as_deref() == Some("r1"))
                .count();
            prop_assert_eq!(matching, 1);
        }
    }
}
