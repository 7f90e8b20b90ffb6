use eframe::egui;

use crate::ui::state::Page;

pub enum SidebarAction {
    Navigate(Page),
    ToggleTheme,
    Logout,
}

/// Navigation rail shared by every signed-in page. The notifications entry
/// carries the unread incoming-request badge.
pub fn render(
    ui: &mut egui::Ui,
    current: Page,
    unread_count: usize,
    dark_mode: bool,
) -> Option<SidebarAction> {
    let mut action = None;

    ui.heading("SkillSwap");
    ui.separator();

    let mut nav = |ui: &mut egui::Ui, label: String, page: Page| {
        if ui.selectable_label(current == page, label).clicked() {
            action = Some(SidebarAction::Navigate(page));
        }
    };

    nav(ui, "Home".to_string(), Page::Dashboard);
    nav(ui, "My Skills".to_string(), Page::MySkills);
    let notif_label = if unread_count > 0 {
        format!("Notifications ({unread_count})")
    } else {
        "Notifications".to_string()
    };
    nav(ui, notif_label, Page::Notifications);
    nav(ui, "Chats".to_string(), Page::Chats);
    nav(ui, "Profile".to_string(), Page::Profile);
    nav(ui, "Settings".to_string(), Page::Settings);

    ui.separator();
    let theme_label = if dark_mode { "Light mode" } else { "Dark mode" };
    if ui.button(theme_label).clicked() {
        action = Some(SidebarAction::ToggleTheme);
    }
    if ui.button("Logout").clicked() {
        action = Some(SidebarAction::Logout);
    }

    action
}
