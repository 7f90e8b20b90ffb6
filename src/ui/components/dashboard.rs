use eframe::egui;

use crate::common::types::NewSkill;
use crate::state::DashboardState;
use crate::ui::state::{ExchangeModal, SkillModal};

pub enum DashboardAction {
    AddSkill(NewSkill),
    RequestExchange { skill_id: String, message: String },
}

pub fn render(
    ui: &mut egui::Ui,
    dashboard: &mut DashboardState,
    skill_modal: &mut SkillModal,
    exchange_modal: &mut Option<ExchangeModal>,
    username: &str,
) -> Option<DashboardAction> {
    let mut action = None;

    let banner_name = dashboard
        .summary
        .as_ref()
        .map(|s| s.username.as_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(username);
    ui.heading(format!("Welcome back, {banner_name}!"));
    ui.label("Ready to boost your skills today?");
    ui.add_space(8.0);

    if let Some(error) = &dashboard.error {
        ui.colored_label(egui::Color32::LIGHT_RED, error);
    }

    if dashboard.loading {
        ui.spinner();
        return None;
    }

    if let Some(summary) = &dashboard.summary {
        ui.horizontal(|ui| {
            ui.group(|ui| {
                ui.label("Continue Learning");
                match &summary.last_active_skill {
                    Some(skill) => {
                        ui.label(format!("Pick up where you left off in \"{skill}\"."))
                    }
                    None => ui.label("Start your first skill today!"),
                };
            });
            ui.group(|ui| {
                ui.label("Your Progress");
                ui.label(format!(
                    "{} skills completed, {} in progress.",
                    summary.totals.completed, summary.totals.in_progress
                ));
            });
            ui.group(|ui| {
                ui.label("Suggestion");
                ui.label(&summary.ai_suggestion);
            });
        });
        ui.add_space(12.0);
    }

    ui.horizontal(|ui| {
        ui.heading("Skills Marketplace");
        if ui.button("+ Add Skill").clicked() {
            skill_modal.open = true;
        }
    });
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        if dashboard.market.is_empty() {
            ui.label("No skills available yet. Be the first to add one!");
        }
        for skill in &dashboard.market {
            ui.group(|ui| {
                ui.label(egui::RichText::new(&skill.title).strong());
                ui.label(
                    egui::RichText::new(format!("{} • {}", skill.category, skill.availability))
                        .weak(),
                );
                ui.label(&skill.description);
                ui.label(egui::RichText::new(format!("By: {}", skill.owner)).weak());
                // No request affordance on the user's own skills.
                if skill.owner != username && ui.button("Request Exchange").clicked() {
                    *exchange_modal = Some(ExchangeModal {
                        skill_id: skill.id.clone(),
                        skill_title: skill.title.clone(),
                        message: String::new(),
                    });
                }
            });
        }
    });

    if let Some(act) = render_skill_modal(ui.ctx(), skill_modal) {
        action = Some(act);
    }
    if let Some(act) = render_exchange_modal(ui.ctx(), exchange_modal) {
        action = Some(act);
    }

    action
}

fn render_skill_modal(ctx: &egui::Context, modal: &mut SkillModal) -> Option<DashboardAction> {
    if !modal.open {
        return None;
    }
    let mut action = None;
    let mut open = true;

    egui::Window::new("Add a New Skill")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui| {
            ui.add(egui::TextEdit::singleline(&mut modal.title).hint_text("Title"));
            ui.add(
                egui::TextEdit::multiline(&mut modal.description)
                    .hint_text("Description")
                    .desired_rows(3),
            );
            // Clamp while typing, same cap the API enforces on submit.
            if modal.description.chars().count() > NewSkill::MAX_DESCRIPTION_CHARS {
                modal.description = modal
                    .description
                    .chars()
                    .take(NewSkill::MAX_DESCRIPTION_CHARS)
                    .collect();
            }
            ui.label(
                egui::RichText::new(format!(
                    "{}/{} characters",
                    modal.description.chars().count(),
                    NewSkill::MAX_DESCRIPTION_CHARS
                ))
                .weak(),
            );
            ui.add(
                egui::TextEdit::singleline(&mut modal.category)
                    .hint_text("Category (e.g., Web Dev, Music)"),
            );
            ui.add(
                egui::TextEdit::singleline(&mut modal.availability)
                    .hint_text("Availability (e.g., Evenings, Weekends)"),
            );

            if let Some(error) = &modal.error {
                ui.colored_label(egui::Color32::LIGHT_RED, error);
            }

            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    modal.clear();
                }
                if ui.button("Save").clicked() {
                    if modal.title.trim().is_empty()
                        || modal.description.trim().is_empty()
                        || modal.category.trim().is_empty()
                        || modal.availability.trim().is_empty()
                    {
                        modal.error = Some("All fields are required".to_string());
                    } else {
                        action = Some(DashboardAction::AddSkill(NewSkill {
                            title: modal.title.trim().to_string(),
                            description: modal.description.clone(),
                            category: modal.category.trim().to_string(),
                            availability: modal.availability.trim().to_string(),
                        }));
                    }
                }
            });
        });

    if !open {
        modal.clear();
    }
    action
}

fn render_exchange_modal(
    ctx: &egui::Context,
    modal_slot: &mut Option<ExchangeModal>,
) -> Option<DashboardAction> {
    let Some(modal) = modal_slot else {
        return None;
    };
    let mut action = None;
    let mut close = false;

    egui::Window::new(format!("Request \"{}\"", modal.skill_title))
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label("Optional message for your request:");
            ui.text_edit_singleline(&mut modal.message);
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    close = true;
                }
                if ui.button("Send Request").clicked() {
                    action = Some(DashboardAction::RequestExchange {
                        skill_id: modal.skill_id.clone(),
                        message: modal.message.clone(),
                    });
                    close = true;
                }
            });
        });

    if close {
        *modal_slot = None;
    }
    action
}
