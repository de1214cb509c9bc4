use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::http::StatusCode;
use axum::{BoxError, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::timeout::TimeoutLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::infrastructure::settings::Settings;
use crate::presentation::http::middleware::cors::apply_cors;
use crate::presentation::http::middleware::trace::apply_trace;
use crate::presentation::http::openapi::ApiDoc;
use crate::presentation::{AppState, http};

pub(crate) async fn run_http(settings: &Settings, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);
    let app = apply_trace(app);
    let app = apply_cors(app, settings)?;
    let app = apply_limits(app, settings);

    let listener = TcpListener::bind(&settings.http_addr).await?;

    info!("HTTP server listening on {}", settings.http_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub(crate) fn build_router(state: AppState) -> Router {
    http::routes(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

fn apply_limits(router: Router, settings: &Settings) -> Router {
    router
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    settings.http_request_timeout_secs,
                )))
                .layer(GlobalConcurrencyLimitLayer::new(
                    settings.http_concurrency_limit,
                )),
        )
        .layer(RequestBodyLimitLayer::new(
            settings.http_request_body_limit_bytes,
        ))
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "request timed out".to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
    }
}
