use axum::{Json, extract::State, http::StatusCode};

use crate::domain::portfolio::{Experience, PersonalInfo, Portfolio, Project, SkillCategory};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::AdminUser;

#[utoipa::path(
    get,
    path = "/api/portfolio",
    tag = "portfolio",
    responses(
        (status = 200, description = "Complete portfolio document", body = Portfolio),
        (status = 404, description = "Portfolio not seeded yet"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_portfolio(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Portfolio>)> {
    let portfolio = state.portfolio_service.portfolio().await?;

    Ok((StatusCode::OK, Json(portfolio)))
}

#[utoipa::path(
    get,
    path = "/api/portfolio/info",
    tag = "portfolio",
    responses(
        (status = 200, description = "Personal information", body = PersonalInfo),
        (status = 404, description = "Portfolio not seeded yet"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_personal_info(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<PersonalInfo>)> {
    let info = state.portfolio_service.personal_info().await?;

    Ok((StatusCode::OK, Json(info)))
}

#[utoipa::path(
    get,
    path = "/api/portfolio/skills",
    tag = "portfolio",
    responses(
        (status = 200, description = "Skill categories", body = [SkillCategory]),
        (status = 404, description = "Portfolio not seeded yet"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_skills(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<SkillCategory>>)> {
    let skills = state.portfolio_service.skills().await?;

    Ok((StatusCode::OK, Json(skills)))
}

#[utoipa::path(
    get,
    path = "/api/portfolio/projects",
    tag = "portfolio",
    responses(
        (status = 200, description = "Projects", body = [Project]),
        (status = 404, description = "Portfolio not seeded yet"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_projects(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<Project>>)> {
    let projects = state.portfolio_service.projects().await?;

    Ok((StatusCode::OK, Json(projects)))
}

#[utoipa::path(
    get,
    path = "/api/portfolio/experience",
    tag = "portfolio",
    responses(
        (status = 200, description = "Work experience", body = [Experience]),
        (status = 404, description = "Portfolio not seeded yet"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_experience(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<Experience>>)> {
    let experience = state.portfolio_service.experience().await?;

    Ok((StatusCode::OK, Json(experience)))
}

#[utoipa::path(
    put,
    path = "/api/portfolio",
    tag = "portfolio",
    security(
        ("bearer_auth" = [])
    ),
    request_body = Portfolio,
    responses(
        (status = 200, description = "Portfolio replaced", body = Portfolio),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn put_portfolio(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(portfolio): Json<Portfolio>,
) -> AppResult<(StatusCode, Json<Portfolio>)> {
    let replaced = state.portfolio_service.replace(portfolio).await?;

    Ok((StatusCode::OK, Json(replaced)))
}
