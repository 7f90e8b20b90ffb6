use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A skill offered on the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub availability: String,
    pub owner: String,
    #[serde(default)]
    pub owner_email: String,
}

/// Add-skill form payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewSkill {
    pub title: String,
    pub description: String,
    pub category: String,
    pub availability: String,
}

impl NewSkill {
    /// The backend caps descriptions at 200 characters; cut before sending.
    pub const MAX_DESCRIPTION_CHARS: usize = 200;

    pub fn sanitized(mut self) -> Self {
        if self.description.chars().count() > Self::MAX_DESCRIPTION_CHARS {
            self.description = self
                .description
                .chars()
                .take(Self::MAX_DESCRIPTION_CHARS)
                .collect();
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Declined => "declined",
        }
    }
}

/// An exchange request the current user sent to a skill owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub from_user: String,
    pub to_user: String,
    #[serde(default)]
    pub skill_id: String,
    pub skill_title: String,
    #[serde(default)]
    pub message: String,
    pub status: RequestStatus,
}

/// A pending request addressed to the current user (page-load snapshot).
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub from_user: String,
    pub skill_title: String,
    #[serde(default)]
    pub message: String,
}

/// A persisted notification from history, possibly already read.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredNotification {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub from_user: String,
    #[serde(default)]
    pub skill_title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<RequestStatus>,
    #[serde(default)]
    pub read: bool,
}

/// One chat message, from history or the live channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub request_id: String,
    pub from_user: String,
    pub to_user: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A chat peer, derived from an accepted exchange request.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection {
    pub request_id: String,
    pub other_user: String,
    #[serde(default)]
    pub skill_title: String,
}

/// Dashboard summary block.
#[derive(Debug, Clone, Deserialize)]
pub struct Summary {
    pub username: String,
    pub totals: SummaryTotals,
    #[serde(default)]
    pub last_active_skill: Option<String>,
    #[serde(default)]
    pub ai_suggestion: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryTotals {
    pub all: u32,
    pub completed: u32,
    pub in_progress: u32,
}

/// Profile as returned by GET /profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills_offered: Vec<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(rename = "profileVisibility", default)]
    pub profile_visibility: Option<String>,
    #[serde(rename = "emailVisibility", default)]
    pub email_visibility: Option<String>,
    #[serde(rename = "notificationSettings", default)]
    pub notification_settings: Option<NotificationPrefs>,
    #[serde(flatten)]
    pub interests: Interests,
}

/// Learning preferences, saved as one document through PUT
/// /profile/interests and returned flat on the profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Interests {
    #[serde(rename = "learningGoals", default)]
    pub learning_goals: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub hobbies: Vec<String>,
    #[serde(rename = "preferredTimings", default)]
    pub preferred_timings: Vec<String>,
}

impl Interests {
    pub const TIMINGS: [&'static str; 4] = ["Weekdays", "Weekends", "Evenings", "Flexible"];

    /// Add a trimmed tag unless it is empty or already present.
    pub fn add_tag(list: &mut Vec<String>, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || list.iter().any(|v| v == value) {
            return false;
        }
        list.push(value.to_string());
        true
    }

    pub fn set_timing(&mut self, timing: &str, enabled: bool) {
        if enabled {
            if !self.preferred_timings.iter().any(|t| t == timing) {
                self.preferred_timings.push(timing.to_string());
            }
        } else {
            self.preferred_timings.retain(|t| t != timing);
        }
    }

    pub fn has_timing(&self, timing: &str) -> bool {
        self.preferred_timings.iter().any(|t| t == timing)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills_offered: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
}

/// Privacy settings card. Field names match the backend's camelCase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivacySettings {
    #[serde(rename = "profileVisibility")]
    pub profile_visibility: String,
    #[serde(rename = "emailVisibility")]
    pub email_visibility: String,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            profile_visibility: "public".to_string(),
            email_visibility: "hidden".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPrefs {
    #[serde(rename = "onNewRequest")]
    pub on_new_request: bool,
    #[serde(rename = "onRequestUpdate")]
    pub on_request_update: bool,
    #[serde(rename = "onNewSuggestion")]
    pub on_new_suggestion: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            on_new_request: true,
            on_request_update: true,
            on_new_suggestion: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_longer_than_cap_is_truncated_to_exactly_200() {
        let form = NewSkill {
            title: "Guitar".into(),
            description: "x".repeat(321),
            category: "Music".into(),
            availability: "Evenings".into(),
        };
        let clean = form.sanitized();
        assert_eq!(clean.description.chars().count(), 200);
    }

    #[test]
    fn short_description_is_untouched() {
        let form = NewSkill {
            description: "learn chords".into(),
            ..NewSkill::default()
        };
        assert_eq!(form.clone().sanitized().description, form.description);
    }

    #[test]
    fn truncation_respects_multibyte_chars() {
        let form = NewSkill {
            description: "é".repeat(250),
            ..NewSkill::default()
        };
        assert_eq!(form.sanitized().description.chars().count(), 200);
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        let mut goals = Vec::new();
        assert!(Interests::add_tag(&mut goals, "  Python "));
        assert!(!Interests::add_tag(&mut goals, "Python"));
        assert!(!Interests::add_tag(&mut goals, "   "));
        assert_eq!(goals, vec!["Python"]);
    }

    #[test]
    fn timing_toggle_is_idempotent() {
        let mut interests = Interests::default();
        interests.set_timing("Weekends", true);
        interests.set_timing("Weekends", true);
        assert_eq!(interests.preferred_timings, vec!["Weekends"]);

        interests.set_timing("Weekends", false);
        assert!(!interests.has_timing("Weekends"));
    }

    #[test]
    fn profile_deserializes_flat_interest_fields() {
        let body = r#"{"username":"alice","email":"a@b.c",
            "learningGoals":["Rust"],"interests":["Music"],
            "preferredTimings":["Evenings"]}"#;
        let profile: Profile = serde_json::from_str(body).unwrap();
        assert_eq!(profile.interests.learning_goals, vec!["Rust"]);
        assert!(profile.interests.has_timing("Evenings"));
        assert!(profile.interests.hobbies.is_empty());
    }
}
