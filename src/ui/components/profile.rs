use eframe::egui;

use crate::common::types::{Interests, ProfileUpdate};
use crate::ui::state::ProfileState;

pub enum ProfileAction {
    Save(ProfileUpdate),
    UploadPicture { path: String },
    SaveInterests(Interests),
}

pub fn render(ui: &mut egui::Ui, state: &mut ProfileState) -> Option<ProfileAction> {
    let mut action = None;

    ui.heading("Profile");
    ui.separator();

    if state.loading {
        ui.spinner();
        return None;
    }

    if let Some((message, ok)) = &state.status {
        let color = if *ok {
            egui::Color32::LIGHT_GREEN
        } else {
            egui::Color32::LIGHT_RED
        };
        ui.colored_label(color, message);
    }

    let Some(profile) = &state.profile else {
        ui.label("Profile not loaded.");
        return None;
    };

    ui.label(egui::RichText::new(&profile.username).strong());
    ui.label(&profile.email);
    ui.label(
        egui::RichText::new(format!("{} skills offered", profile.skills_offered.len())).weak(),
    );
    if let Some(pic) = &profile.profile_pic {
        ui.label(format!("Picture: {pic}"));
    }
    ui.add_space(8.0);

    ui.label("Bio");
    ui.add(
        egui::TextEdit::multiline(&mut state.bio)
            .desired_rows(3)
            .hint_text("Tell people about yourself"),
    );

    ui.label("Skills you offer (comma separated)");
    ui.text_edit_singleline(&mut state.skills_offered);

    if ui.button("Save Profile").clicked() {
        let skills: Vec<String> = state
            .skills_offered
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        action = Some(ProfileAction::Save(ProfileUpdate {
            bio: Some(state.bio.clone()),
            skills_offered: Some(skills),
            profile_pic: None,
        }));
    }

    ui.add_space(8.0);
    ui.label("Profile picture");
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut state.picture_path)
                .hint_text("Path to an image file"),
        );
        if ui.button("Upload").clicked() && !state.picture_path.trim().is_empty() {
            action = Some(ProfileAction::UploadPicture {
                path: state.picture_path.trim().to_string(),
            });
        }
    });

    ui.add_space(12.0);
    ui.separator();
    if let Some(act) = render_interests(ui, state) {
        action = Some(act);
    }

    action
}

fn render_interests(ui: &mut egui::Ui, state: &mut ProfileState) -> Option<ProfileAction> {
    let mut action = None;

    ui.label(egui::RichText::new("Interests & Availability").strong());

    tag_editor(
        ui,
        "What do you want to learn?",
        "e.g., Python, React, Public Speaking",
        &mut state.goal_input,
        &mut state.interests.learning_goals,
    );
    tag_editor(
        ui,
        "Your interests",
        "e.g., Technology, Music",
        &mut state.interest_input,
        &mut state.interests.interests,
    );
    tag_editor(
        ui,
        "Your hobbies",
        "e.g., Hiking, Chess",
        &mut state.hobby_input,
        &mut state.interests.hobbies,
    );

    ui.label("When are you usually available?");
    ui.horizontal(|ui| {
        for timing in Interests::TIMINGS {
            let mut checked = state.interests.has_timing(timing);
            if ui.checkbox(&mut checked, timing).changed() {
                state.interests.set_timing(timing, checked);
            }
        }
    });

    if ui.button("Save Preferences").clicked() {
        action = Some(ProfileAction::SaveInterests(state.interests.clone()));
    }
    if let Some((message, ok)) = &state.interests_status {
        let color = if *ok {
            egui::Color32::LIGHT_GREEN
        } else {
            egui::Color32::LIGHT_RED
        };
        ui.colored_label(color, message);
    }

    action
}

/// One tag list: a text input plus removable chips, like the original
/// onboarding form.
fn tag_editor(
    ui: &mut egui::Ui,
    label: &str,
    hint: &str,
    input: &mut String,
    tags: &mut Vec<String>,
) {
    ui.label(label);
    ui.horizontal(|ui| {
        ui.add(egui::TextEdit::singleline(input).hint_text(hint));
        if ui.button("Add").clicked() && Interests::add_tag(tags, input) {
            input.clear();
        }
    });
    let mut remove = None;
    ui.horizontal_wrapped(|ui| {
        for (i, tag) in tags.iter().enumerate() {
            if ui.small_button(format!("{tag} ✖")).clicked() {
                remove = Some(i);
            }
        }
    });
    if let Some(i) = remove {
        tags.remove(i);
    }
    ui.add_space(4.0);
}
