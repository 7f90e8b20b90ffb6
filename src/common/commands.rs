use crate::common::types::{Interests, NewSkill, NotificationPrefs, PrivacySettings, ProfileUpdate};

/// Accept or decline an incoming exchange request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespondAction {
    Accepted,
    Declined,
}

impl RespondAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RespondAction::Accepted => "accepted",
            RespondAction::Declined => "declined",
        }
    }
}

/// Commands the UI sends down to the network task.
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    Login {
        username: String,
        password: String,
    },
    Signup {
        username: String,
        email: String,
        password: String,
    },
    Logout,
    LoadDashboard,
    AddSkill(NewSkill),
    RequestExchange {
        skill_id: String,
        message: String,
    },
    LoadMySkills,
    DeleteSkill {
        skill_id: String,
    },
    LoadNotifications,
    Respond {
        request_id: String,
        action: RespondAction,
    },
    MarkNotificationRead {
        stored_id: String,
    },
    LoadConnections,
    LoadChatHistory {
        request_id: String,
    },
    LoadProfile,
    UpdateProfile(ProfileUpdate),
    UploadProfilePicture {
        filename: String,
        bytes: Vec<u8>,
    },
    SaveInterests(Interests),
    SavePrivacy(PrivacySettings),
    SaveNotificationPrefs(NotificationPrefs),
    ChangePassword {
        current: String,
        new: String,
    },
}
