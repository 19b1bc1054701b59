pub mod models;

pub use models::{Case, NewCase};
