use crate::common::commands::RespondAction;
use crate::common::types::{
    ChatMessage, Connection, IncomingRequest, Profile, SentRequest, Skill, StoredNotification,
    Summary,
};
use crate::session::Session;

/// Which settings card an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsKind {
    Profile,
    Picture,
    Interests,
    Privacy,
    NotificationPrefs,
    Password,
}

/// Events the network task sends up to the UI.
#[derive(Debug, Clone)]
pub enum NetworkEvent {
    LoggedIn(Session),
    AuthFailed(String),
    DashboardLoaded {
        summary: Summary,
        market: Vec<Skill>,
    },
    DashboardFailed(String),
    SkillAdded,
    SkillAddFailed(String),
    ExchangeRequested,
    ExchangeRequestFailed(String),
    MySkillsLoaded(Vec<Skill>),
    MySkillsFailed(String),
    SkillDeleted {
        skill_id: String,
    },
    SkillDeleteFailed(String),
    NotificationsLoaded {
        incoming: Vec<IncomingRequest>,
        stored: Vec<StoredNotification>,
        sent: Vec<SentRequest>,
    },
    NotificationsFailed(String),
    RespondConfirmed {
        request_id: String,
        action: RespondAction,
    },
    RespondFailed {
        request_id: String,
        action: RespondAction,
        error: String,
    },
    MarkReadConfirmed {
        stored_id: String,
    },
    MarkReadFailed {
        stored_id: String,
        error: String,
    },
    ConnectionsLoaded(Vec<Connection>),
    ConnectionsFailed(String),
    ChatHistoryLoaded {
        request_id: String,
        messages: Vec<ChatMessage>,
    },
    ChatHistoryFailed {
        request_id: String,
        error: String,
    },
    ProfileLoaded(Profile),
    ProfileLoadFailed(String),
    SettingsSaved {
        kind: SettingsKind,
        message: String,
    },
    SettingsSaveFailed {
        kind: SettingsKind,
        error: String,
    },
}
