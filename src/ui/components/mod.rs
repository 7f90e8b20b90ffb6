pub mod auth;
pub mod chats;
pub mod dashboard;
pub mod my_skills;
pub mod notifications;
pub mod profile;
pub mod settings;
pub mod sidebar;
