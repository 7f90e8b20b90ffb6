use eframe::egui;
use std::path::Path;
use tokio::sync::mpsc;

use crate::common::{NetworkCommand, NetworkEvent, RespondAction, SettingsKind};
use crate::config;
use crate::network::channel::RealtimeHandle;
use crate::network::dispatch::Subscription;
use crate::network::protocol::PushEvent;
use crate::state::ChatSession;

use super::components::{
    auth, chats, dashboard, my_skills, notifications, profile, settings, sidebar,
};
use super::components::auth::AuthAction;
use super::components::chats::ChatsAction;
use super::components::dashboard::DashboardAction;
use super::components::my_skills::MySkillsAction;
use super::components::notifications::NotificationAction;
use super::components::profile::ProfileAction;
use super::components::settings::SettingsAction;
use super::components::sidebar::SidebarAction;
use super::state::{AppState, Page};

pub struct SkillSwapApp {
    state: AppState,
    command_sender: mpsc::Sender<NetworkCommand>,
    event_receiver: mpsc::Receiver<NetworkEvent>,
    realtime: RealtimeHandle,
    /// Listener for everything except chat frames; those go to the active
    /// `ChatSession`'s own subscription.
    push_sub: Subscription,
    config_path: String,
}

impl SkillSwapApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        state: AppState,
        command_sender: mpsc::Sender<NetworkCommand>,
        event_receiver: mpsc::Receiver<NetworkEvent>,
        realtime: RealtimeHandle,
        config_path: String,
    ) -> Self {
        let push_sub = realtime.subscribe(|event| !matches!(event, PushEvent::Chat { .. }));
        Self {
            state,
            command_sender,
            event_receiver,
            realtime,
            push_sub,
            config_path,
        }
    }

    fn send_command(&mut self, command: NetworkCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to network: {err}");
        }
    }

    fn handle_network_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            match event {
                NetworkEvent::LoggedIn(session) => {
                    config::persist_token(&self.config_path, Some(&session.token));
                    self.state.session = Some(session);
                    self.state.auth = Default::default();
                    self.state.feed.clear();
                    self.navigate(Page::Dashboard);
                    self.state.notifications.loading = true;
                    self.send_command(NetworkCommand::LoadNotifications);
                }
                NetworkEvent::AuthFailed(message) => {
                    self.state.auth.busy = false;
                    self.state.auth.message = Some(message);
                }
                NetworkEvent::DashboardLoaded { summary, market } => {
                    self.state.dashboard.loaded(summary, market);
                }
                NetworkEvent::DashboardFailed(error) => self.state.dashboard.failed(error),
                NetworkEvent::SkillAdded => {
                    // No refetch: the market picks the skill up from the
                    // new_skill broadcast.
                    self.state.skill_modal.clear();
                    self.state.toast = Some(("Skill added.".to_string(), true));
                }
                NetworkEvent::SkillAddFailed(error) => {
                    self.state.skill_modal.error = Some(error);
                }
                NetworkEvent::ExchangeRequested => {
                    self.state.toast = Some(("Request sent!".to_string(), true));
                }
                NetworkEvent::ExchangeRequestFailed(error) => {
                    self.state.toast = Some((error, false));
                }
                NetworkEvent::MySkillsLoaded(skills) => {
                    self.state.my_skills.skills = skills;
                    self.state.my_skills.loading = false;
                    self.state.my_skills.error = None;
                }
                NetworkEvent::MySkillsFailed(error) => {
                    self.state.my_skills.loading = false;
                    self.state.my_skills.error = Some(error);
                }
                NetworkEvent::SkillDeleted { skill_id } => {
                    self.state.my_skills.skills.retain(|s| s.id != skill_id);
                    self.state.my_skills.confirm_delete = None;
                }
                NetworkEvent::SkillDeleteFailed(error) => {
                    self.state.my_skills.confirm_delete = None;
                    self.state.my_skills.error = Some(error);
                }
                NetworkEvent::NotificationsLoaded {
                    incoming,
                    stored,
                    sent,
                } => {
                    self.state.notifications.loading = false;
                    self.state.notifications.error = None;
                    self.state.feed.merge_incoming(incoming);
                    self.state.feed.merge_stored(stored);
                    self.state.feed.seed_sent(sent);
                }
                NetworkEvent::NotificationsFailed(error) => {
                    self.state.notifications.loading = false;
                    self.state.notifications.error = Some(error);
                }
                NetworkEvent::RespondConfirmed { request_id, action } => {
                    self.state.feed.confirm_respond(&request_id);
                    if action == RespondAction::Accepted {
                        self.send_command(NetworkCommand::LoadConnections);
                    }
                }
                NetworkEvent::RespondFailed {
                    request_id,
                    action,
                    error,
                } => {
                    match action {
                        RespondAction::Accepted => self.state.feed.fail_accept(&request_id),
                        RespondAction::Declined => self.state.feed.fail_decline(&request_id),
                    }
                    self.state.toast = Some((error, false));
                }
                NetworkEvent::MarkReadConfirmed { stored_id } => {
                    self.state.feed.confirm_mark_read(&stored_id);
                }
                NetworkEvent::MarkReadFailed { stored_id, error } => {
                    self.state.feed.fail_mark_read(&stored_id);
                    self.state.toast = Some((error, false));
                }
                NetworkEvent::ConnectionsLoaded(connections) => {
                    self.state.chats.connections = connections;
                    self.state.chats.loading = false;
                    self.state.chats.error = None;
                }
                NetworkEvent::ConnectionsFailed(error) => {
                    self.state.chats.loading = false;
                    self.state.chats.error = Some(error);
                }
                NetworkEvent::ChatHistoryLoaded {
                    request_id,
                    messages,
                } => {
                    if let Some(chat) = &mut self.state.active_chat {
                        chat.seed_history(&request_id, messages);
                    }
                }
                NetworkEvent::ChatHistoryFailed { request_id, error } => {
                    if let Some(chat) = &mut self.state.active_chat {
                        chat.history_failed(&request_id, error);
                    }
                }
                NetworkEvent::ProfileLoaded(loaded) => {
                    self.state.profile.loading = false;
                    self.state.profile.bio = loaded.bio.clone().unwrap_or_default();
                    self.state.profile.skills_offered = loaded.skills_offered.join(", ");
                    if let Some(vis) = &loaded.profile_visibility {
                        self.state.settings.privacy.profile_visibility = vis.clone();
                    }
                    if let Some(vis) = &loaded.email_visibility {
                        self.state.settings.privacy.email_visibility = vis.clone();
                    }
                    if let Some(prefs) = &loaded.notification_settings {
                        self.state.settings.prefs = prefs.clone();
                    }
                    self.state.profile.interests = loaded.interests.clone();
                    self.state.profile.profile = Some(loaded);
                }
                NetworkEvent::ProfileLoadFailed(error) => {
                    self.state.profile.loading = false;
                    self.state.profile.status = Some((error, false));
                }
                NetworkEvent::SettingsSaved { kind, message } => {
                    self.apply_settings_outcome(kind, message, true);
                    if kind == SettingsKind::Profile || kind == SettingsKind::Picture {
                        self.send_command(NetworkCommand::LoadProfile);
                    }
                }
                NetworkEvent::SettingsSaveFailed { kind, error } => {
                    self.apply_settings_outcome(kind, error, false);
                }
            }
        }
    }

    fn apply_settings_outcome(&mut self, kind: SettingsKind, message: String, ok: bool) {
        let line = Some((message, ok));
        match kind {
            SettingsKind::Profile | SettingsKind::Picture => self.state.profile.status = line,
            SettingsKind::Interests => self.state.profile.interests_status = line,
            SettingsKind::Privacy => self.state.settings.privacy_status = line,
            SettingsKind::NotificationPrefs => self.state.settings.prefs_status = line,
            SettingsKind::Password => {
                self.state.settings.password_status = line;
                if ok {
                    self.state.settings.current_password.clear();
                    self.state.settings.new_password.clear();
                    self.state.settings.confirm_password.clear();
                }
            }
        }
    }

    fn handle_push_events(&mut self) {
        let current_user = self.state.username().to_string();
        while let Some(event) = self.push_sub.try_next() {
            self.state.feed.apply_push(&event);
            if let PushEvent::NewSkill { data } = event {
                self.state.dashboard.apply_new_skill(data, &current_user);
            }
        }
    }

    fn pump_active_chat(&mut self) {
        let current_user = self.state.username().to_string();
        if let Some(chat) = &mut self.state.active_chat {
            chat.pump(&current_user);
        }
    }

    fn navigate(&mut self, page: Page) {
        self.state.page = page;
        match page {
            Page::Dashboard => {
                self.state.dashboard.begin_load();
                self.send_command(NetworkCommand::LoadDashboard);
            }
            Page::MySkills => {
                self.state.my_skills.loading = true;
                self.state.my_skills.error = None;
                self.send_command(NetworkCommand::LoadMySkills);
            }
            Page::Notifications => {
                self.state.notifications.loading = true;
                self.state.notifications.error = None;
                self.send_command(NetworkCommand::LoadNotifications);
            }
            Page::Chats => {
                self.state.chats.loading = true;
                self.state.chats.error = None;
                self.send_command(NetworkCommand::LoadConnections);
            }
            Page::Profile | Page::Settings => {
                self.state.profile.loading = true;
                self.send_command(NetworkCommand::LoadProfile);
            }
            Page::Auth => {}
        }
    }

    fn open_chat(&mut self, request_id: String, other_user: String) {
        self.state.chats.send_error = None;
        self.state.active_chat = Some(ChatSession::open(
            request_id.clone(),
            other_user,
            &self.realtime,
        ));
        self.send_command(NetworkCommand::LoadChatHistory { request_id });
        if self.state.page != Page::Chats {
            self.navigate(Page::Chats);
        }
    }

    fn handle_sidebar(&mut self, action: SidebarAction) {
        match action {
            SidebarAction::Navigate(page) => self.navigate(page),
            SidebarAction::ToggleTheme => {
                self.state.dark_mode = !self.state.dark_mode;
                config::persist_dark_mode(&self.config_path, self.state.dark_mode);
            }
            SidebarAction::Logout => {
                self.send_command(NetworkCommand::Logout);
                config::persist_token(&self.config_path, None);
                self.state.reset_for_logout();
            }
        }
    }

    fn handle_page_action(&mut self, action: PageAction) {
        match action {
            PageAction::Auth(AuthAction::Login { username, password }) => {
                self.state.auth.busy = true;
                self.state.auth.message = None;
                self.send_command(NetworkCommand::Login { username, password });
            }
            PageAction::Auth(AuthAction::Signup {
                username,
                email,
                password,
            }) => {
                self.state.auth.busy = true;
                self.state.auth.message = None;
                self.send_command(NetworkCommand::Signup {
                    username,
                    email,
                    password,
                });
            }
            PageAction::Dashboard(DashboardAction::AddSkill(skill)) => {
                self.send_command(NetworkCommand::AddSkill(skill));
            }
            PageAction::Dashboard(DashboardAction::RequestExchange { skill_id, message }) => {
                self.send_command(NetworkCommand::RequestExchange { skill_id, message });
            }
            PageAction::MySkills(MySkillsAction::Delete { skill_id }) => {
                self.send_command(NetworkCommand::DeleteSkill { skill_id });
            }
            PageAction::MySkills(MySkillsAction::GoToDashboard) => {
                self.navigate(Page::Dashboard);
            }
            PageAction::Notifications(NotificationAction::Accept { request_id }) => {
                if self.state.feed.accept(&request_id) {
                    self.send_command(NetworkCommand::Respond {
                        request_id,
                        action: RespondAction::Accepted,
                    });
                }
            }
            PageAction::Notifications(NotificationAction::Decline { request_id }) => {
                if self.state.feed.decline(&request_id) {
                    self.send_command(NetworkCommand::Respond {
                        request_id,
                        action: RespondAction::Declined,
                    });
                }
            }
            PageAction::Notifications(NotificationAction::MarkRead { stored_id }) => {
                if self.state.feed.mark_read(&stored_id) {
                    self.send_command(NetworkCommand::MarkNotificationRead { stored_id });
                }
            }
            PageAction::Notifications(NotificationAction::OpenChat {
                request_id,
                other_user,
            })
            | PageAction::Chats(ChatsAction::OpenChat {
                request_id,
                other_user,
            }) => {
                self.open_chat(request_id, other_user);
            }
            PageAction::Chats(ChatsAction::Send { content }) => {
                self.state.send_chat_message(&self.realtime, content);
            }
            PageAction::Settings(SettingsAction::ChangePassword { current, new }) => {
                self.state.settings.password_status = None;
                self.send_command(NetworkCommand::ChangePassword { current, new });
            }
            PageAction::Settings(SettingsAction::SavePrivacy(privacy)) => {
                self.state.settings.privacy_status = None;
                self.send_command(NetworkCommand::SavePrivacy(privacy));
            }
            PageAction::Settings(SettingsAction::SavePrefs(prefs)) => {
                self.state.settings.prefs_status = None;
                self.send_command(NetworkCommand::SaveNotificationPrefs(prefs));
            }
            PageAction::Profile(ProfileAction::Save(update)) => {
                self.state.profile.status = None;
                self.send_command(NetworkCommand::UpdateProfile(update));
            }
            PageAction::Profile(ProfileAction::SaveInterests(interests)) => {
                self.state.profile.interests_status = None;
                self.send_command(NetworkCommand::SaveInterests(interests));
            }
            PageAction::Profile(ProfileAction::UploadPicture { path }) => {
                match std::fs::read(&path) {
                    Ok(bytes) => {
                        let filename = Path::new(&path)
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_else(|| "profile.png".to_string());
                        self.state.profile.status = None;
                        self.send_command(NetworkCommand::UploadProfilePicture {
                            filename,
                            bytes,
                        });
                    }
                    Err(err) => {
                        self.state.profile.status =
                            Some((format!("Could not read {path}: {err}"), false));
                    }
                }
            }
        }
    }
}

enum PageAction {
    Auth(AuthAction),
    Dashboard(DashboardAction),
    MySkills(MySkillsAction),
    Notifications(NotificationAction),
    Chats(ChatsAction),
    Settings(SettingsAction),
    Profile(ProfileAction),
}

impl eframe::App for SkillSwapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_network_events();
        self.handle_push_events();
        self.pump_active_chat();

        ctx.set_visuals(if self.state.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        if self.state.session.is_none() {
            let mut action = None;
            egui::CentralPanel::default().show(ctx, |ui| {
                action = auth::render(ui, &mut self.state.auth).map(PageAction::Auth);
            });
            if let Some(action) = action {
                self.handle_page_action(action);
            }
            ctx.request_repaint();
            return;
        }

        let mut sidebar_action = None;
        egui::SidePanel::left("nav_sidebar").show(ctx, |ui| {
            sidebar_action = sidebar::render(
                ui,
                self.state.page,
                self.state.feed.unread_count(),
                self.state.dark_mode,
            );
        });
        if let Some(action) = sidebar_action {
            self.handle_sidebar(action);
        }

        let current_user = self.state.username().to_string();
        let mut page_action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut dismiss_toast = false;
            if let Some((message, ok)) = &self.state.toast {
                let color = if *ok {
                    egui::Color32::LIGHT_GREEN
                } else {
                    egui::Color32::LIGHT_RED
                };
                ui.horizontal(|ui| {
                    ui.colored_label(color, message);
                    if ui.small_button("x").clicked() {
                        dismiss_toast = true;
                    }
                });
                ui.separator();
            }
            if dismiss_toast {
                self.state.toast = None;
            }

            page_action = match self.state.page {
                Page::Auth => None,
                Page::Dashboard => dashboard::render(
                    ui,
                    &mut self.state.dashboard,
                    &mut self.state.skill_modal,
                    &mut self.state.exchange_modal,
                    &current_user,
                )
                .map(PageAction::Dashboard),
                Page::MySkills => {
                    my_skills::render(ui, &mut self.state.my_skills).map(PageAction::MySkills)
                }
                Page::Notifications => {
                    notifications::render(ui, &self.state.feed, &self.state.notifications)
                        .map(PageAction::Notifications)
                }
                Page::Chats => chats::render(
                    ui,
                    &mut self.state.chats,
                    self.state.active_chat.as_ref(),
                    &current_user,
                )
                .map(PageAction::Chats),
                Page::Settings => {
                    settings::render(ui, &mut self.state.settings).map(PageAction::Settings)
                }
                Page::Profile => {
                    profile::render(ui, &mut self.state.profile).map(PageAction::Profile)
                }
            };
        });
        if let Some(action) = page_action {
            self.handle_page_action(action);
        }

        ctx.request_repaint();
    }
}
