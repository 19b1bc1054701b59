pub mod cases;
pub mod health;
pub mod matches;
pub mod notifications;
pub mod players;

use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

/// Standard success envelope. Errors use the mirror shape with
/// `success: false` from the error type's response conversion.
pub fn success<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}
