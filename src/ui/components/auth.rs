use eframe::egui;

use crate::ui::state::AuthForm;

pub enum AuthAction {
    Login { username: String, password: String },
    Signup {
        username: String,
        email: String,
        password: String,
    },
}

/// Login/signup card. Validation failures block submission locally and
/// never reach the network.
pub fn render(ui: &mut egui::Ui, form: &mut AuthForm) -> Option<AuthAction> {
    let mut action = None;

    ui.vertical_centered(|ui| {
        ui.add_space(60.0);
        ui.heading(if form.signup_mode {
            "Create Account"
        } else {
            "Welcome Back"
        });
        ui.add_space(10.0);

        ui.add(egui::TextEdit::singleline(&mut form.username).hint_text("Username"));
        if form.signup_mode {
            ui.add(egui::TextEdit::singleline(&mut form.email).hint_text("Email"));
        }
        ui.add(
            egui::TextEdit::singleline(&mut form.password)
                .hint_text("Password")
                .password(true),
        );
        ui.add_space(8.0);

        let submit_label = if form.signup_mode { "Sign Up" } else { "Login" };
        let submit = ui
            .add_enabled(!form.busy, egui::Button::new(submit_label))
            .clicked();
        if submit {
            match validate(form) {
                Ok(valid) => {
                    form.message = None;
                    form.busy = true;
                    action = Some(valid);
                }
                Err(err) => form.message = Some(err),
            }
        }

        let switch_label = if form.signup_mode {
            "Already have an account? Login"
        } else {
            "Don't have an account? Sign Up"
        };
        if ui.link(switch_label).clicked() {
            form.signup_mode = !form.signup_mode;
            form.message = None;
        }

        if let Some(message) = &form.message {
            ui.add_space(8.0);
            ui.colored_label(egui::Color32::LIGHT_RED, message);
        }
    });

    action
}

fn validate(form: &AuthForm) -> Result<AuthAction, String> {
    if form.username.trim().is_empty() {
        return Err("Username is required".to_string());
    }
    if form.password.is_empty() {
        return Err("Password is required".to_string());
    }
    if form.signup_mode {
        if !form.email.contains('@') {
            return Err("A valid email is required".to_string());
        }
        if form.password.len() < 6 {
            return Err("Password must be at least 6 characters".to_string());
        }
        return Ok(AuthAction::Signup {
            username: form.username.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
        });
    }
    Ok(AuthAction::Login {
        username: form.username.trim().to_string(),
        password: form.password.clone(),
    })
}
