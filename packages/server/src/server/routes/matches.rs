//! Match endpoints. All require authentication.

use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::common::{ApiError, MatchId};
use crate::domains::matches::service::{CreateMatchInput, SubmitStageInput};
use crate::domains::matches::Side;
use crate::server::app::AppState;
use crate::server::middleware::AuthPlayer;

use super::success;

/// POST /matches
pub async fn create_match(
    Extension(state): Extension<AppState>,
    Extension(AuthPlayer(player)): Extension<AuthPlayer>,
    Json(input): Json<CreateMatchInput>,
) -> Result<Json<Value>, ApiError> {
    let m = state.match_service.create_match(&player, input).await?;
    Ok(success(m))
}

/// GET /matches
pub async fn list_matches(
    Extension(state): Extension<AppState>,
    Extension(AuthPlayer(player)): Extension<AuthPlayer>,
) -> Result<Json<Value>, ApiError> {
    let matches = state.match_service.list_matches(player.id).await?;
    Ok(success(matches))
}

/// GET /matches/:id
pub async fn get_match(
    Extension(state): Extension<AppState>,
    Extension(AuthPlayer(player)): Extension<AuthPlayer>,
    Path(match_id): Path<MatchId>,
) -> Result<Json<Value>, ApiError> {
    let detail = state.match_service.get_match(player.id, match_id).await?;
    Ok(success(detail))
}

#[derive(Deserialize)]
pub struct SelectSideInput {
    pub side: Side,
}

/// POST /matches/:id/side
pub async fn select_side(
    Extension(state): Extension<AppState>,
    Extension(AuthPlayer(player)): Extension<AuthPlayer>,
    Path(match_id): Path<MatchId>,
    Json(input): Json<SelectSideInput>,
) -> Result<Json<Value>, ApiError> {
    let m = state
        .match_service
        .select_side(player.id, match_id, input.side)
        .await?;
    Ok(success(m))
}

/// POST /matches/:id/submissions
pub async fn submit_stage(
    Extension(state): Extension<AppState>,
    Extension(AuthPlayer(player)): Extension<AuthPlayer>,
    Path(match_id): Path<MatchId>,
    Json(input): Json<SubmitStageInput>,
) -> Result<Json<Value>, ApiError> {
    let m = state
        .match_service
        .submit_stage(player.id, match_id, input)
        .await?;
    Ok(success(m))
}

/// POST /matches/:id/judgment
///
/// Retries adjudication for a match stuck in `judgment` after a failed
/// attempt, returning the completed match or the adjudication error.
pub async fn request_judgment(
    Extension(state): Extension<AppState>,
    Extension(AuthPlayer(player)): Extension<AuthPlayer>,
    Path(match_id): Path<MatchId>,
) -> Result<Json<Value>, ApiError> {
    let m = state
        .match_service
        .request_judgment(player.id, match_id)
        .await?;
    Ok(success(m))
}
