use std::sync::Arc;

use crate::ai::images::HttpImageProbe;
use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::application::draft_service::DraftService;
use crate::application::portfolio_service::PortfolioService;
use crate::data::repositories::postgres::portfolio_repository::PostgresPortfolioRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::infrastructure::mail::LogMailer;
use crate::infrastructure::token::TokenService;

pub(crate) mod http;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService<PostgresUserRepository, LogMailer>>,
    pub(crate) blog_service: Arc<BlogService<PostgresPostRepository>>,
    pub(crate) portfolio_service: Arc<PortfolioService<PostgresPortfolioRepository>>,
    pub(crate) draft_service: Arc<DraftService<HttpImageProbe>>,
    pub(crate) tokens: Arc<TokenService>,
}

impl AppState {
    pub(crate) fn new(
        auth_service: Arc<AuthService<PostgresUserRepository, LogMailer>>,
        blog_service: Arc<BlogService<PostgresPostRepository>>,
        portfolio_service: Arc<PortfolioService<PostgresPortfolioRepository>>,
        draft_service: Arc<DraftService<HttpImageProbe>>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            auth_service,
            blog_service,
            portfolio_service,
            draft_service,
            tokens,
        }
    }
}
