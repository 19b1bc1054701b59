//! Bearer-token authentication.
//!
//! Every route behind this middleware sees an `AuthPlayer` extension holding
//! the caller's player record. The player row is created on first sight of a
//! verified identity, so there is no separate registration endpoint.

use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::common::ApiError;
use crate::domains::players::Player;
use crate::server::app::AppState;

/// The authenticated caller, attached to request extensions.
#[derive(Clone, Debug)]
pub struct AuthPlayer(pub Player);

/// Rejects requests without a valid bearer token.
pub async fn require_auth(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Some(t) => t,
        None => {
            return ApiError::Unauthorized("Missing authorization token".to_string())
                .into_response()
        }
    };

    let identity = match state.identity.verify(token) {
        Ok(identity) => identity,
        Err(e) => return ApiError::Unauthorized(e.to_string()).into_response(),
    };

    let player = match Player::upsert(
        &identity.subject,
        &identity.wallet_address,
        &state.db_pool,
    )
    .await
    {
        Ok(player) => player,
        Err(e) => return ApiError::Internal(e).into_response(),
    };

    debug!(player_id = %player.id, wallet = %player.wallet_address, "authenticated");
    request.extensions_mut().insert(AuthPlayer(player));
    next.run(request).await
}

fn bearer_token(request: &Request) -> Option<&str> {
    let auth_str = request.headers().get("authorization")?.to_str().ok()?;
    Some(auth_str.strip_prefix("Bearer ").unwrap_or(auth_str))
}
