//! JSON frames on the real-time channel.
//!
//! Every inbound frame is an object with a `type` discriminator; the rest of
//! the fields sit flat beside it, except `new_skill` which nests the skill
//! under `data`. Unknown or malformed frames are rejected at parse time and
//! skipped by the channel loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::types::{RequestStatus, Skill};

/// A typed server push.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PushEvent {
    /// A skill was added somewhere on the platform; broadcast to everyone.
    #[serde(rename = "new_skill")]
    NewSkill { data: Skill },

    /// Someone requested an exchange with the current user.
    #[serde(rename = "new_request")]
    NewRequest {
        request_id: String,
        from_user: String,
        #[serde(default)]
        skill_title: String,
        #[serde(default)]
        message: String,
    },

    /// A request the current user sent was accepted or declined.
    #[serde(rename = "request_response")]
    RequestResponse {
        request_id: String,
        status: RequestStatus,
    },

    /// A chat message for one of the user's conversations.
    #[serde(rename = "chat_message")]
    Chat {
        request_id: String,
        from_user: String,
        #[serde(default)]
        to_user: String,
        content: String,
        #[serde(default)]
        timestamp: Option<DateTime<Utc>>,
    },
}

impl PushEvent {
    pub fn parse(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }

    /// The exchange request this event concerns, if any.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            PushEvent::NewSkill { .. } => None,
            PushEvent::NewRequest { request_id, .. }
            | PushEvent::RequestResponse { request_id, .. }
            | PushEvent::Chat { request_id, .. } => Some(request_id),
        }
    }

    pub fn is_chat_for(&self, request_id: &str) -> bool {
        matches!(self, PushEvent::Chat { request_id: id, .. } if id == request_id)
    }
}

/// Outbound chat frame, shaped the way the server expects it.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundChat {
    #[serde(rename = "type")]
    kind: &'static str,
    pub to: String,
    pub content: String,
    pub request_id: String,
}

impl OutboundChat {
    pub fn new(to: String, content: String, request_id: String) -> Self {
        Self {
            kind: "chat_message",
            to,
            content,
            request_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_skill_frame_parses_with_nested_data() {
        let frame = r#"{"type":"new_skill","data":{"id":"9","title":"Sourdough",
            "description":"Baking basics","category":"Food",
            "availability":"Weekends","owner":"Bob"}}"#;
        match PushEvent::parse(frame).expect("parse") {
            PushEvent::NewSkill { data } => {
                assert_eq!(data.owner, "Bob");
                assert_eq!(data.title, "Sourdough");
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn chat_frame_parses_flat_fields() {
        let frame = r#"{"type":"chat_message","request_id":"r1",
            "from_user":"bob","to_user":"alice","content":"hi"}"#;
        let event = PushEvent::parse(frame).expect("parse");
        assert!(event.is_chat_for("r1"));
        assert!(!event.is_chat_for("r2"));
    }

    #[test]
    fn request_response_carries_terminal_status() {
        let frame = r#"{"type":"request_response","request_id":"r7","status":"accepted"}"#;
        match PushEvent::parse(frame).expect("parse") {
            PushEvent::RequestResponse { request_id, status } => {
                assert_eq!(request_id, "r7");
                assert_eq!(status, RequestStatus::Accepted);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn unknown_or_malformed_frames_are_errors() {
        assert!(PushEvent::parse("{not json").is_err());
        assert!(PushEvent::parse(r#"{"type":"heartbeat"}"#).is_err());
        assert!(PushEvent::parse(r#"{"content":"no discriminator"}"#).is_err());
    }

    #[test]
    fn outbound_chat_serializes_with_type_tag() {
        let frame = OutboundChat::new("bob".into(), "hello".into(), "r1".into());
        let json = serde_json::to_value(&frame).expect("serialize");
        assert_eq!(json["type"], "chat_message");
        assert_eq!(json["to"], "bob");
        assert_eq!(json["request_id"], "r1");
    }
}
