use eframe::egui;

use crate::common::types::{NotificationPrefs, PrivacySettings};
use crate::ui::state::{SettingsState, StatusLine};

pub enum SettingsAction {
    ChangePassword {
        current: String,
        new: String,
    },
    SavePrivacy(PrivacySettings),
    SavePrefs(NotificationPrefs),
}

pub fn render(ui: &mut egui::Ui, state: &mut SettingsState) -> Option<SettingsAction> {
    let mut action = None;

    ui.heading("Settings");
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        render_password(ui, state, &mut action);
        ui.add_space(12.0);
        render_privacy(ui, state, &mut action);
        ui.add_space(12.0);
        render_prefs(ui, state, &mut action);
    });

    action
}

fn status_label(ui: &mut egui::Ui, status: &Option<StatusLine>) {
    if let Some((message, ok)) = status {
        let color = if *ok {
            egui::Color32::LIGHT_GREEN
        } else {
            egui::Color32::LIGHT_RED
        };
        ui.colored_label(color, message);
    }
}

fn render_password(ui: &mut egui::Ui, state: &mut SettingsState, action: &mut Option<SettingsAction>) {
    ui.group(|ui| {
        ui.label(egui::RichText::new("Change Password").strong());
        ui.add(
            egui::TextEdit::singleline(&mut state.current_password)
                .password(true)
                .hint_text("Current password"),
        );
        ui.add(
            egui::TextEdit::singleline(&mut state.new_password)
                .password(true)
                .hint_text("New password"),
        );
        ui.add(
            egui::TextEdit::singleline(&mut state.confirm_password)
                .password(true)
                .hint_text("Confirm new password"),
        );
        if ui.button("Update Password").clicked() {
            if state.new_password != state.confirm_password {
                state.password_status =
                    Some(("New passwords do not match.".to_string(), false));
            } else if state.current_password.is_empty() || state.new_password.is_empty() {
                state.password_status =
                    Some(("All password fields are required.".to_string(), false));
            } else {
                *action = Some(SettingsAction::ChangePassword {
                    current: state.current_password.clone(),
                    new: state.new_password.clone(),
                });
            }
        }
        status_label(ui, &state.password_status);
    });
}

fn render_privacy(ui: &mut egui::Ui, state: &mut SettingsState, action: &mut Option<SettingsAction>) {
    ui.group(|ui| {
        ui.label(egui::RichText::new("Privacy").strong());
        ui.label("Profile visibility");
        ui.horizontal(|ui| {
            ui.radio_value(
                &mut state.privacy.profile_visibility,
                "public".to_string(),
                "Public",
            );
            ui.radio_value(
                &mut state.privacy.profile_visibility,
                "private".to_string(),
                "Private",
            );
        });
        ui.label("Email visibility");
        ui.horizontal(|ui| {
            ui.radio_value(
                &mut state.privacy.email_visibility,
                "visible".to_string(),
                "Visible",
            );
            ui.radio_value(
                &mut state.privacy.email_visibility,
                "hidden".to_string(),
                "Hidden",
            );
        });
        if ui.button("Save Privacy").clicked() {
            *action = Some(SettingsAction::SavePrivacy(state.privacy.clone()));
        }
        status_label(ui, &state.privacy_status);
    });
}

fn render_prefs(ui: &mut egui::Ui, state: &mut SettingsState, action: &mut Option<SettingsAction>) {
    ui.group(|ui| {
        ui.label(egui::RichText::new("Notifications").strong());
        ui.checkbox(&mut state.prefs.on_new_request, "New exchange requests");
        ui.checkbox(&mut state.prefs.on_request_update, "Responses to my requests");
        ui.checkbox(&mut state.prefs.on_new_suggestion, "Skill suggestions");
        if ui.button("Save Preferences").clicked() {
            *action = Some(SettingsAction::SavePrefs(state.prefs.clone()));
        }
        status_label(ui, &state.prefs_status);
    });
}
