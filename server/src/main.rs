use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

mod ai;
mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use ai::gemini::GeminiProvider;
use ai::images::{HttpImageProbe, ImageValidator};
use ai::openarena::OpenArenaProvider;
use ai::provider::DraftProvider;
use application::auth_service::AuthService;
use application::blog_service::BlogService;
use application::draft_service::DraftService;
use application::portfolio_service::PortfolioService;
use data::repositories::postgres::portfolio_repository::PostgresPortfolioRepository;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use data::repositories::postgres::user_repository::PostgresUserRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::mail::LogMailer;
use infrastructure::settings::Settings;
use infrastructure::token::TokenService;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url, settings.database_max_connections).await?;
    run_migrations(&pool).await?;

    let tokens = Arc::new(TokenService::new(
        &settings.jwt_secret,
        settings.access_token_ttl_minutes,
        settings.refresh_token_ttl_days,
    ));

    let auth_service = Arc::new(AuthService::new(
        PostgresUserRepository::new(pool.clone()),
        tokens.clone(),
        LogMailer::new(&settings.frontend_url),
    ));
    let blog_service = Arc::new(BlogService::new(PostgresPostRepository::new(pool.clone())));
    let portfolio_service = Arc::new(PortfolioService::new(PostgresPortfolioRepository::new(
        pool.clone(),
    )));

    let openarena: Arc<dyn DraftProvider> = Arc::new(OpenArenaProvider::new(&settings));
    let gemini: Arc<dyn DraftProvider> = Arc::new(GeminiProvider::new(&settings));
    let probe = HttpImageProbe::new(Duration::from_secs(settings.image_probe_timeout_secs));
    let draft_service = Arc::new(DraftService::new(
        openarena,
        gemini,
        ImageValidator::new(probe),
    ));

    let state = AppState::new(
        auth_service,
        blog_service,
        portfolio_service,
        draft_service,
        tokens,
    );

    server::run_http(&settings, state).await
}
