use tokio::sync::{mpsc, watch};

use crate::api::{ApiClient, ApiError};
use crate::common::{NetworkCommand, NetworkEvent, SettingsKind};
use crate::session::Session;

/// The network task: executes REST calls on behalf of the UI and reports
/// outcomes back as events. Owns the `ApiClient` and the session watch that
/// gates the real-time channel.
pub struct BackendClient {
    api: ApiClient,
    event_sender: mpsc::Sender<NetworkEvent>,
    command_receiver: mpsc::Receiver<NetworkCommand>,
    user_sender: watch::Sender<Option<String>>,
}

impl BackendClient {
    pub fn new(
        api: ApiClient,
        event_sender: mpsc::Sender<NetworkEvent>,
        command_receiver: mpsc::Receiver<NetworkCommand>,
        user_sender: watch::Sender<Option<String>>,
    ) -> Self {
        Self {
            api,
            event_sender,
            command_receiver,
            user_sender,
        }
    }

    pub async fn run(mut self) {
        log::info!("Network task started");

        while let Some(command) = self.command_receiver.recv().await {
            self.handle_command(command).await;
        }

        log::info!("Network task stopped: UI side closed");
    }

    async fn emit(&self, event: NetworkEvent) {
        if self.event_sender.send(event).await.is_err() {
            log::warn!("Dropping event: UI receiver is gone");
        }
    }

    async fn handle_command(&mut self, command: NetworkCommand) {
        match command {
            NetworkCommand::Login { username, password } => {
                match self.api.login(&username, &password).await {
                    Ok(resp) => self.start_session(resp.access_token, resp.username).await,
                    Err(err) => self.emit(NetworkEvent::AuthFailed(err.message())).await,
                }
            }

            NetworkCommand::Signup {
                username,
                email,
                password,
            } => match self.api.signup(&username, &email, &password).await {
                Ok(resp) => self.start_session(resp.access_token, resp.username).await,
                Err(err) => self.emit(NetworkEvent::AuthFailed(err.message())).await,
            },

            NetworkCommand::Logout => {
                self.api.set_token(None);
                let _ = self.user_sender.send(None);
                log::info!("Session cleared");
            }

            NetworkCommand::LoadDashboard => {
                let (summary, market) =
                    tokio::join!(self.api.summary(), self.api.market_skills());
                match (summary, market) {
                    (Ok(summary), Ok(market)) => {
                        self.emit(NetworkEvent::DashboardLoaded { summary, market })
                            .await
                    }
                    (Err(err), _) | (_, Err(err)) => {
                        self.emit(NetworkEvent::DashboardFailed(err.message())).await
                    }
                }
            }

            NetworkCommand::AddSkill(skill) => match self.api.add_skill(skill).await {
                Ok(_) => self.emit(NetworkEvent::SkillAdded).await,
                Err(err) => self.emit(NetworkEvent::SkillAddFailed(err.message())).await,
            },

            NetworkCommand::RequestExchange { skill_id, message } => {
                match self.api.request_exchange(&skill_id, &message).await {
                    Ok(_) => self.emit(NetworkEvent::ExchangeRequested).await,
                    Err(err) => {
                        self.emit(NetworkEvent::ExchangeRequestFailed(err.message()))
                            .await
                    }
                }
            }

            NetworkCommand::LoadMySkills => match self.api.my_skills().await {
                Ok(skills) => self.emit(NetworkEvent::MySkillsLoaded(skills)).await,
                Err(err) => self.emit(NetworkEvent::MySkillsFailed(err.message())).await,
            },

            NetworkCommand::DeleteSkill { skill_id } => {
                match self.api.delete_skill(&skill_id).await {
                    Ok(_) => self.emit(NetworkEvent::SkillDeleted { skill_id }).await,
                    Err(err) => {
                        self.emit(NetworkEvent::SkillDeleteFailed(err.message()))
                            .await
                    }
                }
            }

            NetworkCommand::LoadNotifications => {
                let (incoming, stored, sent) = tokio::join!(
                    self.api.incoming_requests(),
                    self.api.notifications(),
                    self.api.sent_requests(),
                );
                match (incoming, stored, sent) {
                    (Ok(incoming), Ok(stored), Ok(sent)) => {
                        self.emit(NetworkEvent::NotificationsLoaded {
                            incoming,
                            stored,
                            sent,
                        })
                        .await
                    }
                    (Err(err), _, _) | (_, Err(err), _) | (_, _, Err(err)) => {
                        self.emit(NetworkEvent::NotificationsFailed(err.message()))
                            .await
                    }
                }
            }

            NetworkCommand::Respond { request_id, action } => {
                match self
                    .api
                    .respond_to_request(&request_id, action.as_str())
                    .await
                {
                    Ok(_) => {
                        self.emit(NetworkEvent::RespondConfirmed { request_id, action })
                            .await
                    }
                    Err(err) => {
                        self.emit(NetworkEvent::RespondFailed {
                            request_id,
                            action,
                            error: err.message(),
                        })
                        .await
                    }
                }
            }

            NetworkCommand::MarkNotificationRead { stored_id } => {
                match self.api.mark_notification_read(&stored_id).await {
                    Ok(_) => self.emit(NetworkEvent::MarkReadConfirmed { stored_id }).await,
                    Err(err) => {
                        self.emit(NetworkEvent::MarkReadFailed {
                            stored_id,
                            error: err.message(),
                        })
                        .await
                    }
                }
            }

            NetworkCommand::LoadConnections => match self.api.chat_connections().await {
                Ok(connections) => {
                    self.emit(NetworkEvent::ConnectionsLoaded(connections)).await
                }
                Err(err) => {
                    self.emit(NetworkEvent::ConnectionsFailed(err.message()))
                        .await
                }
            },

            NetworkCommand::LoadChatHistory { request_id } => {
                match self.api.chat_history(&request_id).await {
                    Ok(messages) => {
                        self.emit(NetworkEvent::ChatHistoryLoaded {
                            request_id,
                            messages,
                        })
                        .await
                    }
                    Err(err) => {
                        self.emit(NetworkEvent::ChatHistoryFailed {
                            request_id,
                            error: err.message(),
                        })
                        .await
                    }
                }
            }

            NetworkCommand::LoadProfile => match self.api.profile().await {
                Ok(profile) => self.emit(NetworkEvent::ProfileLoaded(profile)).await,
                Err(err) => self.emit(NetworkEvent::ProfileLoadFailed(err.message())).await,
            },

            NetworkCommand::UpdateProfile(update) => {
                let result = self.api.update_profile(&update).await;
                self.emit_settings(SettingsKind::Profile, result).await;
            }

            NetworkCommand::UploadProfilePicture { filename, bytes } => {
                let result = self.api.upload_profile_picture(filename, bytes).await;
                self.emit_settings(SettingsKind::Picture, result).await;
            }

            NetworkCommand::SaveInterests(interests) => {
                let result = self.api.save_interests(&interests).await;
                self.emit_settings(SettingsKind::Interests, result).await;
            }

            NetworkCommand::SavePrivacy(settings) => {
                let result = self.api.save_privacy(&settings).await;
                self.emit_settings(SettingsKind::Privacy, result).await;
            }

            NetworkCommand::SaveNotificationPrefs(prefs) => {
                let result = self.api.save_notification_prefs(&prefs).await;
                self.emit_settings(SettingsKind::NotificationPrefs, result).await;
            }

            NetworkCommand::ChangePassword { current, new } => {
                let result = self.api.change_password(&current, &new).await;
                self.emit_settings(SettingsKind::Password, result).await;
            }
        }
    }

    async fn start_session(&mut self, token: String, username: String) {
        let session = if username.is_empty() {
            // Older server builds omit the username; fall back to the token.
            match Session::from_token(&token) {
                Some(session) => session,
                None => {
                    self.emit(NetworkEvent::AuthFailed(
                        "Server returned an unreadable token".to_string(),
                    ))
                    .await;
                    return;
                }
            }
        } else {
            Session::new(token, username)
        };

        self.api.set_token(Some(session.token.clone()));
        let _ = self.user_sender.send(Some(session.username.clone()));
        log::info!("Signed in as {}", session.username);
        self.emit(NetworkEvent::LoggedIn(session)).await;
    }

    async fn emit_settings(
        &self,
        kind: SettingsKind,
        result: Result<crate::api::client::MessageResponse, ApiError>,
    ) {
        match result {
            Ok(resp) => {
                let message = if resp.message.is_empty() {
                    "Saved".to_string()
                } else {
                    resp.message
                };
                self.emit(NetworkEvent::SettingsSaved { kind, message }).await;
            }
            Err(err) => {
                self.emit(NetworkEvent::SettingsSaveFailed {
                    kind,
                    error: err.message(),
                })
                .await;
            }
        }
    }
}
