use eframe::egui;

use crate::ui::state::MySkillsState;

pub enum MySkillsAction {
    Delete { skill_id: String },
    GoToDashboard,
}

pub fn render(ui: &mut egui::Ui, state: &mut MySkillsState) -> Option<MySkillsAction> {
    let mut action = None;

    ui.heading("My Offered Skills");
    ui.separator();

    if state.loading {
        ui.spinner();
        return None;
    }
    if let Some(error) = &state.error {
        ui.colored_label(egui::Color32::LIGHT_RED, format!("Error: {error}"));
    }

    if state.skills.is_empty() {
        ui.label("You haven't offered any skills yet.");
        if ui.button("Add Your First Skill").clicked() {
            action = Some(MySkillsAction::GoToDashboard);
        }
        return action;
    }

    let mut arm_delete = None;
    egui::ScrollArea::vertical().show(ui, |ui| {
        for skill in &state.skills {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&skill.title).strong());
                    ui.label(egui::RichText::new(&skill.category).weak());
                });
                ui.label(&skill.description);
                ui.horizontal(|ui| {
                    ui.label(format!("Availability: {}", skill.availability));
                    if state.confirm_delete.as_deref() == Some(&skill.id) {
                        if ui.button("Confirm delete?").clicked() {
                            action = Some(MySkillsAction::Delete {
                                skill_id: skill.id.clone(),
                            });
                        }
                    } else if ui.button("Delete").clicked() {
                        arm_delete = Some(skill.id.clone());
                    }
                });
            });
        }
    });
    if arm_delete.is_some() {
        state.confirm_delete = arm_delete;
    }

    action
}
