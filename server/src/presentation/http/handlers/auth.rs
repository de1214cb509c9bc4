use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::auth_service::AuthSession;
use crate::domain::user::{ChangePasswordRequest, LoginRequest, RegisterRequest, User};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct RegisterDto {
    #[validate(length(min = 3, max = 50))]
    pub(crate) username: String,
    #[validate(email)]
    pub(crate) email: String,
    #[validate(length(min = 8, max = 128))]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct LoginDto {
    #[validate(email)]
    pub(crate) email: String,
    #[validate(length(min = 1))]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct RefreshDto {
    #[validate(length(min = 1))]
    pub(crate) refresh_token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct ChangePasswordDto {
    #[validate(length(min = 1))]
    pub(crate) current_password: String,
    #[validate(length(min = 8, max = 128))]
    pub(crate) new_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct ForgotPasswordDto {
    #[validate(email)]
    pub(crate) email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct ResetPasswordDto {
    #[validate(length(min = 1))]
    pub(crate) token: String,
    #[validate(length(min = 8, max = 128))]
    pub(crate) new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) role: String,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct TokenPairDto {
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
    pub(crate) token_type: String,
    pub(crate) user: UserDto,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}

impl From<AuthSession> for TokenPairDto {
    fn from(session: AuthSession) -> Self {
        Self {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            token_type: "bearer".to_string(),
            user: session.user.into(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Registered successfully", body = TokenPairDto),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User already exists"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(dto): Json<RegisterDto>,
) -> AppResult<(StatusCode, Json<TokenPairDto>)> {
    dto.validate()?;

    let req = RegisterRequest {
        username: dto.username,
        email: dto.email,
        password: dto.password,
    };

    let session = state.auth_service.register(req).await?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = TokenPairDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginDto>,
) -> AppResult<(StatusCode, Json<TokenPairDto>)> {
    dto.validate()?;

    let req = LoginRequest {
        email: dto.email,
        password: dto.password,
    };

    let session = state.auth_service.login(req).await?;

    Ok((StatusCode::OK, Json(session.into())))
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "auth",
    request_body = RefreshDto,
    responses(
        (status = 200, description = "Fresh token pair issued", body = TokenPairDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid or expired refresh token"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn refresh(
    State(state): State<AppState>,
    Json(dto): Json<RefreshDto>,
) -> AppResult<(StatusCode, Json<TokenPairDto>)> {
    dto.validate()?;

    let session = state.auth_service.refresh(&dto.refresh_token).await?;

    Ok((StatusCode::OK, Json(session.into())))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn me(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> AppResult<(StatusCode, Json<UserDto>)> {
    let user = state.auth_service.current_user(auth.user_id).await?;

    Ok((StatusCode::OK, Json(user.into())))
}

#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    request_body = ChangePasswordDto,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized or wrong current password"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn change_password(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<ChangePasswordDto>,
) -> AppResult<StatusCode> {
    dto.validate()?;

    let req = ChangePasswordRequest {
        current_password: dto.current_password,
        new_password: dto.new_password,
    };

    state.auth_service.change_password(auth.user_id, req).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "auth",
    request_body = ForgotPasswordDto,
    responses(
        (status = 202, description = "Reset mail sent when the account exists"),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn forgot_password(
    State(state): State<AppState>,
    Json(dto): Json<ForgotPasswordDto>,
) -> AppResult<StatusCode> {
    dto.validate()?;

    state.auth_service.forgot_password(&dto.email).await?;

    Ok(StatusCode::ACCEPTED)
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "auth",
    request_body = ResetPasswordDto,
    responses(
        (status = 204, description = "Password reset"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid or expired reset token"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn reset_password(
    State(state): State<AppState>,
    Json(dto): Json<ResetPasswordDto>,
) -> AppResult<StatusCode> {
    dto.validate()?;

    state
        .auth_service
        .reset_password(&dto.token, &dto.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
