use axum::Router;
use axum::middleware;
use axum::routing::{get, post};

use crate::presentation::AppState;
use crate::presentation::http::handlers::auth::{
    change_password, forgot_password, login, me, refresh, register, reset_password,
};
use crate::presentation::http::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password));

    let protected = Router::new()
        .route("/me", get(me))
        .route("/change-password", post(change_password))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(protected)
}
