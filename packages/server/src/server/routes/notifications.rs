//! Notification endpoints.

use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::{ApiError, NotificationId};
use crate::domains::notifications::Notification;
use crate::server::app::AppState;
use crate::server::middleware::AuthPlayer;

use super::success;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
}

/// GET /notifications
pub async fn list_notifications(
    Extension(state): Extension<AppState>,
    Extension(AuthPlayer(player)): Extension<AuthPlayer>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let notifications =
        Notification::list_for_player(player.id, query.unread_only, limit, &state.db_pool).await?;
    Ok(success(notifications))
}

/// GET /notifications/unread-count
pub async fn unread_count(
    Extension(state): Extension<AppState>,
    Extension(AuthPlayer(player)): Extension<AuthPlayer>,
) -> Result<Json<Value>, ApiError> {
    let count = Notification::unread_count(player.id, &state.db_pool).await?;
    Ok(success(json!({ "count": count })))
}

/// POST /notifications/:id/read
pub async fn mark_read(
    Extension(state): Extension<AppState>,
    Extension(AuthPlayer(player)): Extension<AuthPlayer>,
    Path(notification_id): Path<NotificationId>,
) -> Result<Json<Value>, ApiError> {
    let updated = Notification::mark_read(notification_id, player.id, &state.db_pool).await?;
    if !updated {
        return Err(ApiError::NotFound("notification"));
    }
    Ok(success(json!({ "read": true })))
}

/// POST /notifications/read-all
pub async fn mark_all_read(
    Extension(state): Extension<AppState>,
    Extension(AuthPlayer(player)): Extension<AuthPlayer>,
) -> Result<Json<Value>, ApiError> {
    let updated = Notification::mark_all_read(player.id, &state.db_pool).await?;
    Ok(success(json!({ "updated": updated })))
}
