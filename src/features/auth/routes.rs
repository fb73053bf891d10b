use crate::features::auth::handlers::{self, AuthState};
use axum::{
    routing::{get, post},
    Router,
};

/// Public auth routes (no authentication required)
pub fn public_routes(state: AuthState) -> Router {
    Router::new()
        .route("/api/auth/login", post(handlers::login))
        .with_state(state)
}

/// Protected auth routes (require a staff session)
pub fn protected_routes(state: AuthState) -> Router {
    Router::new()
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/session", get(handlers::get_session))
        .with_state(state)
}
