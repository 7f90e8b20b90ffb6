pub mod chat;
pub mod dashboard;
pub mod notifications;

pub use chat::ChatSession;
pub use dashboard::DashboardState;
pub use notifications::{FeedEntry, FeedKind, NotificationFeed};
