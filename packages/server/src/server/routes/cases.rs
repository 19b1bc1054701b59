//! Case catalog endpoints.

use axum::{
    extract::{Extension, Path},
    Json,
};
use serde_json::Value;

use crate::common::{ApiError, CaseId};
use crate::domains::cases::Case;
use crate::server::app::AppState;

use super::success;

/// GET /cases
pub async fn list_cases(Extension(state): Extension<AppState>) -> Result<Json<Value>, ApiError> {
    let cases = Case::list_all(&state.db_pool).await?;
    Ok(success(cases))
}

/// GET /cases/:id
pub async fn get_case(
    Extension(state): Extension<AppState>,
    Path(case_id): Path<CaseId>,
) -> Result<Json<Value>, ApiError> {
    let case = Case::find_by_id(case_id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("case"))?;
    Ok(success(case))
}
