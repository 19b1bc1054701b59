pub mod models;

pub use models::{Notification, NotificationKind};
