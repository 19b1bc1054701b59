//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::auth::IdentityProvider;
use crate::domains::matches::MatchService;
use crate::kernel::ServerDeps;
use crate::server::middleware::require_auth;
use crate::server::routes::{cases, health, matches, notifications, players};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: sqlx::PgPool,
    pub match_service: MatchService,
    pub identity: Arc<dyn IdentityProvider>,
}

/// Feed stake confirmations from the bridge into the match service until the
/// subscription ends.
async fn run_stake_listener(service: MatchService, deps: ServerDeps) {
    let mut rx = match deps.chain.subscribe_stakes().await {
        Ok(rx) => rx,
        Err(e) => {
            tracing::error!(error = %e, "Failed to subscribe to stake feed");
            return;
        }
    };

    tracing::info!("Stake listener running");
    while let Some(event) = rx.recv().await {
        if let Err(e) = service.on_stake(event).await {
            tracing::error!(error = %e, "Failed to process stake event");
        }
    }
    tracing::warn!("Stake feed closed");
}

/// Build the Axum application router and start the stake listener.
pub fn build_app(deps: ServerDeps, identity: Arc<dyn IdentityProvider>) -> Router {
    let match_service = MatchService::new(deps.clone());

    tokio::spawn(run_stake_listener(match_service.clone(), deps.clone()));

    let app_state = AppState {
        db_pool: deps.db_pool.clone(),
        match_service,
        identity,
    };

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let authed = Router::new()
        .route("/matches", post(matches::create_match).get(matches::list_matches))
        .route("/matches/:id", get(matches::get_match))
        .route("/matches/:id/side", post(matches::select_side))
        .route("/matches/:id/submissions", post(matches::submit_stage))
        .route("/matches/:id/judgment", post(matches::request_judgment))
        .route(
            "/notifications",
            get(notifications::list_notifications),
        )
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/:id/read", post(notifications::mark_read))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/cases", get(cases::list_cases))
        .route("/cases/:id", get(cases::get_case))
        .route("/players/me", get(players::me))
        .layer(middleware::from_fn(require_auth));

    authed
        // Health check is public
        .route("/health", get(health::health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
