pub mod auth;
pub mod cases;
pub mod matches;
pub mod notifications;
pub mod players;
