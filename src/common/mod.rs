pub mod commands;
pub mod events;
pub mod types;

pub use commands::{NetworkCommand, RespondAction};
pub use events::{NetworkEvent, SettingsKind};
pub use types::{
    ChatMessage, Connection, IncomingRequest, Interests, NewSkill, NotificationPrefs,
    PrivacySettings, Profile, ProfileUpdate, RequestStatus, SentRequest, Skill,
    StoredNotification, Summary,
};
