use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};

use crate::presentation::AppState;
use crate::presentation::http::handlers::posts::{
    create_post, delete_post, get_post, list_categories, list_posts, list_tags, update_post,
};
use crate::presentation::http::middleware::auth::{jwt_auth_middleware, optional_auth_middleware};

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_posts))
        .route("/{slug}", get(get_post))
        .route("/tags/all", get(list_tags))
        .route("/categories/all", get(list_categories))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            optional_auth_middleware,
        ));

    let protected = Router::new()
        .route("/", post(create_post))
        .route("/{slug}", put(update_post).delete(delete_post))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(protected)
}
