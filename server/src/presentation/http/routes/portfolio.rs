use axum::Router;
use axum::middleware;
use axum::routing::{get, put};

use crate::presentation::AppState;
use crate::presentation::http::handlers::portfolio::{
    get_experience, get_personal_info, get_portfolio, get_projects, get_skills, put_portfolio,
};
use crate::presentation::http::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(get_portfolio))
        .route("/info", get(get_personal_info))
        .route("/skills", get(get_skills))
        .route("/projects", get(get_projects))
        .route("/experience", get(get_experience));

    let protected = Router::new()
        .route("/", put(put_portfolio))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(protected)
}
