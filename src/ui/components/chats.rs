use eframe::egui;

use crate::state::ChatSession;
use crate::ui::state::ChatsState;

pub enum ChatsAction {
    OpenChat {
        request_id: String,
        other_user: String,
    },
    Send { content: String },
}

pub fn render(
    ui: &mut egui::Ui,
    state: &mut ChatsState,
    active: Option<&ChatSession>,
    current_user: &str,
) -> Option<ChatsAction> {
    let mut action = None;

    ui.heading("Chats");
    ui.separator();

    if let Some(error) = &state.error {
        ui.colored_label(egui::Color32::LIGHT_RED, error);
    }

    ui.columns(2, |cols| {
        render_connections(&mut cols[0], state, active, &mut action);
        render_window(&mut cols[1], state, active, current_user, &mut action);
    });

    action
}

fn render_connections(
    ui: &mut egui::Ui,
    state: &ChatsState,
    active: Option<&ChatSession>,
    action: &mut Option<ChatsAction>,
) {
    ui.label(egui::RichText::new("Connections").strong());
    if state.loading {
        ui.spinner();
        return;
    }
    if state.connections.is_empty() {
        ui.label("No accepted exchanges yet.");
        return;
    }
    egui::ScrollArea::vertical()
        .id_salt("connections")
        .show(ui, |ui| {
            for conn in &state.connections {
                let selected = active.is_some_and(|c| c.request_id == conn.request_id);
                let label = if conn.skill_title.is_empty() {
                    conn.other_user.clone()
                } else {
                    format!("{} ({})", conn.other_user, conn.skill_title)
                };
                if ui.selectable_label(selected, label).clicked() && !selected {
                    *action = Some(ChatsAction::OpenChat {
                        request_id: conn.request_id.clone(),
                        other_user: conn.other_user.clone(),
                    });
                }
            }
        });
}

fn render_window(
    ui: &mut egui::Ui,
    state: &mut ChatsState,
    active: Option<&ChatSession>,
    current_user: &str,
    action: &mut Option<ChatsAction>,
) {
    let Some(chat) = active else {
        ui.label("Select a connection to start chatting.");
        return;
    };

    ui.label(egui::RichText::new(format!("Chat with {}", chat.other_user)).strong());
    if let Some(error) = &chat.error {
        ui.colored_label(egui::Color32::LIGHT_RED, error);
    }

    let input_height = 32.0;
    let history_height = (ui.available_height() - input_height).max(0.0);
    egui::ScrollArea::vertical()
        .id_salt("chat_history")
        .max_height(history_height)
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if chat.is_loading() {
                ui.spinner();
                return;
            }
            for msg in chat.messages() {
                let mine = msg.from_user == current_user;
                let layout = if mine {
                    egui::Layout::right_to_left(egui::Align::Min)
                } else {
                    egui::Layout::left_to_right(egui::Align::Min)
                };
                ui.with_layout(layout, |ui| {
                    ui.group(|ui| {
                        ui.vertical(|ui| {
                            ui.label(&msg.content);
                            if let Some(ts) = msg.timestamp {
                                ui.label(
                                    egui::RichText::new(ts.format("%H:%M").to_string())
                                        .weak()
                                        .small(),
                                );
                            }
                        });
                    });
                });
            }
        });

    if let Some(error) = &state.send_error {
        ui.colored_label(egui::Color32::LIGHT_RED, error);
    }
    ui.horizontal(|ui| {
        let edit = ui.add(
            egui::TextEdit::singleline(&mut state.input)
                .hint_text("Type a message")
                .desired_width(ui.available_width() - 60.0),
        );
        let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        // The input is cleared by the app once the send is accepted, so a
        // failed send keeps the draft.
        if (ui.button("Send").clicked() || submitted) && !state.input.trim().is_empty() {
            *action = Some(ChatsAction::Send {
                content: state.input.trim().to_string(),
            });
        }
    });
}
