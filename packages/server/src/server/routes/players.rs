//! Player endpoints.

use axum::{extract::Extension, Json};
use serde_json::Value;

use crate::common::ApiError;
use crate::server::middleware::AuthPlayer;

use super::success;

/// GET /players/me
pub async fn me(
    Extension(AuthPlayer(player)): Extension<AuthPlayer>,
) -> Result<Json<Value>, ApiError> {
    Ok(success(player))
}
