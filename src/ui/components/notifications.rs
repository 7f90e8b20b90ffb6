use eframe::egui;

use crate::state::notifications::{FeedKind, NotificationFeed};
use crate::ui::state::NotificationsPage;

pub enum NotificationAction {
    Accept { request_id: String },
    Decline { request_id: String },
    MarkRead { stored_id: String },
    OpenChat {
        request_id: String,
        other_user: String,
    },
}

pub fn render(
    ui: &mut egui::Ui,
    feed: &NotificationFeed,
    page: &NotificationsPage,
) -> Option<NotificationAction> {
    let mut action = None;

    ui.heading("Notifications");
    ui.separator();

    if page.loading {
        ui.spinner();
        return None;
    }
    if let Some(error) = &page.error {
        ui.colored_label(egui::Color32::LIGHT_RED, error);
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.label(egui::RichText::new("Incoming Requests").strong());
        let mut any_incoming = false;
        for entry in feed.entries() {
            if entry.kind != FeedKind::NewRequest {
                continue;
            }
            any_incoming = true;
            ui.group(|ui| {
                ui.label(format!(
                    "{} wants to connect for skill: {}.",
                    entry.from_user, entry.skill_title
                ));
                if !entry.message.is_empty() {
                    ui.label(egui::RichText::new(format!("\"{}\"", entry.message)).italics());
                }
                let Some(request_id) = entry.request_id.clone() else {
                    return;
                };
                ui.horizontal(|ui| {
                    if entry.accepted {
                        if ui.button("Want to Chat?").clicked() {
                            action = Some(NotificationAction::OpenChat {
                                request_id: request_id.clone(),
                                other_user: entry.from_user.clone(),
                            });
                        }
                    } else {
                        if ui.button("Accept").clicked() {
                            action = Some(NotificationAction::Accept {
                                request_id: request_id.clone(),
                            });
                        }
                        if ui.button("Decline").clicked() {
                            action = Some(NotificationAction::Decline {
                                request_id: request_id.clone(),
                            });
                        }
                    }
                    if !entry.read {
                        if let Some(stored_id) = entry.stored_id.clone() {
                            if ui.button("Mark read").clicked() {
                                action = Some(NotificationAction::MarkRead { stored_id });
                            }
                        }
                    }
                });
            });
        }
        if !any_incoming {
            ui.label("No new incoming requests.");
        }

        ui.add_space(8.0);
        ui.label(egui::RichText::new("New Skills").strong());
        let mut any_skill = false;
        for entry in feed.entries() {
            if entry.kind != FeedKind::NewSkill {
                continue;
            }
            any_skill = true;
            ui.horizontal(|ui| {
                ui.label(format!("{} added a new skill: {}", entry.from_user, entry.skill_title));
                if !entry.read {
                    if let Some(stored_id) = entry.stored_id.clone() {
                        if ui.small_button("Mark read").clicked() {
                            action = Some(NotificationAction::MarkRead { stored_id });
                        }
                    }
                }
            });
        }
        if !any_skill {
            ui.label(egui::RichText::new("No skill announcements.").weak());
        }

        ui.add_space(8.0);
        ui.label(egui::RichText::new("My Sent Requests").strong());
        if feed.sent().is_empty() {
            ui.label("You haven't sent any requests yet.");
        }
        for req in feed.sent() {
            ui.label(format!(
                "Your request for {} to {} is {}.",
                req.skill_title,
                req.to_user,
                req.status.as_str()
            ));
        }
    });

    action
}
