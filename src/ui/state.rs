use crate::common::types::{Connection, Interests, NotificationPrefs, PrivacySettings, Profile, Skill};
use crate::network::channel::RealtimeHandle;
use crate::session::Session;
use crate::state::{ChatSession, DashboardState, NotificationFeed};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Auth,
    Dashboard,
    MySkills,
    Notifications,
    Chats,
    Profile,
    Settings,
}

#[derive(Default)]
pub struct AuthForm {
    pub signup_mode: bool,
    pub username: String,
    pub email: String,
    pub password: String,
    pub message: Option<String>,
    pub busy: bool,
}

/// Add-skill modal fields; description is clamped to the backend cap while
/// typing, like the original form.
#[derive(Default)]
pub struct SkillModal {
    pub open: bool,
    pub title: String,
    pub description: String,
    pub category: String,
    pub availability: String,
    pub error: Option<String>,
}

impl SkillModal {
    pub fn clear(&mut self) {
        *self = SkillModal::default();
    }
}

/// Small per-skill dialog for the optional exchange-request message.
pub struct ExchangeModal {
    pub skill_id: String,
    pub skill_title: String,
    pub message: String,
}

#[derive(Default)]
pub struct MySkillsState {
    pub skills: Vec<Skill>,
    pub loading: bool,
    pub error: Option<String>,
    /// Two-step delete: first click arms, second confirms.
    pub confirm_delete: Option<String>,
}

#[derive(Default)]
pub struct NotificationsPage {
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Default)]
pub struct ChatsState {
    pub connections: Vec<Connection>,
    pub loading: bool,
    pub error: Option<String>,
    pub input: String,
    pub send_error: Option<String>,
}

/// Inline outcome line: message plus whether it is a success.
pub type StatusLine = (String, bool);

#[derive(Default)]
pub struct SettingsState {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
    pub password_status: Option<StatusLine>,
    pub privacy: PrivacySettings,
    pub privacy_status: Option<StatusLine>,
    pub prefs: NotificationPrefs,
    pub prefs_status: Option<StatusLine>,
}

#[derive(Default)]
pub struct ProfileState {
    pub profile: Option<Profile>,
    pub bio: String,
    pub skills_offered: String,
    pub picture_path: String,
    pub loading: bool,
    pub status: Option<StatusLine>,
    /// Learning preferences, edited as tag lists.
    pub interests: Interests,
    pub goal_input: String,
    pub interest_input: String,
    pub hobby_input: String,
    pub interests_status: Option<StatusLine>,
}

/// All local UI state, owned by the main thread.
pub struct AppState {
    pub page: Page,
    pub session: Option<Session>,
    pub dark_mode: bool,
    pub auth: AuthForm,
    pub dashboard: DashboardState,
    pub skill_modal: SkillModal,
    pub exchange_modal: Option<ExchangeModal>,
    pub my_skills: MySkillsState,
    pub feed: NotificationFeed,
    pub notifications: NotificationsPage,
    pub chats: ChatsState,
    pub active_chat: Option<ChatSession>,
    pub settings: SettingsState,
    pub profile: ProfileState,
    /// Transient banner for fire-and-forget outcomes (request sent, etc.).
    pub toast: Option<StatusLine>,
}

impl AppState {
    pub fn new(session: Option<Session>, dark_mode: bool) -> Self {
        let page = if session.is_some() {
            Page::Dashboard
        } else {
            Page::Auth
        };
        Self {
            page,
            session,
            dark_mode,
            auth: AuthForm::default(),
            dashboard: DashboardState::default(),
            skill_modal: SkillModal::default(),
            exchange_modal: None,
            my_skills: MySkillsState::default(),
            feed: NotificationFeed::default(),
            notifications: NotificationsPage::default(),
            chats: ChatsState::default(),
            active_chat: None,
            settings: SettingsState::default(),
            profile: ProfileState::default(),
            toast: None,
        }
    }

    pub fn username(&self) -> &str {
        self.session.as_ref().map(|s| s.username.as_str()).unwrap_or("")
    }

    /// Drop everything tied to the old session.
    pub fn reset_for_logout(&mut self) {
        let dark_mode = self.dark_mode;
        *self = AppState::new(None, dark_mode);
    }

    /// Send over the active conversation. The draft input is cleared only
    /// once the send is accepted; a failed send keeps it for retry.
    pub fn send_chat_message(&mut self, realtime: &RealtimeHandle, content: String) {
        let current_user = self
            .session
            .as_ref()
            .map(|s| s.username.clone())
            .unwrap_or_default();
        let Some(chat) = &mut self.active_chat else {
            return;
        };
        match chat.send(realtime, &current_user, content) {
            Ok(()) => {
                self.chats.input.clear();
                self.chats.send_error = None;
            }
            Err(err) => self.chats.send_error = Some(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::channel::new_channel;
    use crate::network::dispatch::Dispatcher;
    use crate::session::Session;
    use crate::state::ChatSession;

    #[test]
    fn failed_send_keeps_the_draft_for_retry() {
        let dispatcher = Dispatcher::new();
        let (handle, _task) = new_channel(dispatcher);
        let mut state = AppState::new(Some(Session::new("t".into(), "alice".into())), false);
        state.active_chat = Some(ChatSession::open("r1".into(), "bob".into(), &handle));
        state.chats.input = "hello".to_string();

        state.send_chat_message(&handle, "hello".to_string());
        assert_eq!(state.chats.input, "hello");
        assert!(state.chats.send_error.is_some());

        handle.set_open_for_tests(true);
        state.send_chat_message(&handle, "hello".to_string());
        assert!(state.chats.input.is_empty());
        assert!(state.chats.send_error.is_none());
    }
}
