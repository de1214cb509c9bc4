use axum::Router;
use axum::middleware;
use axum::routing::post;

use crate::presentation::AppState;
use crate::presentation::http::handlers::ai::{generate, generate_and_post};
use crate::presentation::http::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate))
        .route("/generate-and-post", post(generate_and_post))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
