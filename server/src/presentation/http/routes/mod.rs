use axum::Router;

use crate::presentation::AppState;

pub(crate) mod ai;
pub(crate) mod auth;
pub(crate) mod portfolio;
pub(crate) mod posts;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth::router(state.clone()))
        .nest("/api/posts", posts::router(state.clone()))
        .nest("/api/portfolio", portfolio::router(state.clone()))
        .nest("/api/ai", ai::router(state))
}
