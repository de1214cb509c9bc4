use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::domain::error::DomainError;
use crate::domain::user::Role;
use crate::infrastructure::token::{SessionClaims, TokenKind};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppError;

#[derive(Debug, Clone)]
pub(crate) struct AuthenticatedUser {
    pub(crate) user_id: i64,
    pub(crate) role: Role,
    // pub(crate) email: String,
}

impl AuthenticatedUser {
    pub(crate) fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<SessionClaims> for AuthenticatedUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
            // email: claims.email,
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Authenticated user whose role claim is `admin`; anyone else is
/// rejected with a forbidden response.
#[derive(Debug, Clone)]
pub(crate) struct AdminUser(pub(crate) AuthenticatedUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Domain(DomainError::Forbidden));
        }
        Ok(AdminUser(user))
    }
}

/// Identity when the route works for anonymous visitors too; an absent or
/// invalid bearer token degrades to `None` instead of failing the request.
#[derive(Debug, Clone)]
pub(crate) struct MaybeUser(pub(crate) Option<AuthenticatedUser>);

impl MaybeUser {
    pub(crate) fn is_admin(&self) -> bool {
        self.0.as_ref().is_some_and(AuthenticatedUser::is_admin)
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<AuthenticatedUser>().cloned()))
    }
}

pub(crate) async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;

    let claims = state
        .tokens
        .verify_session(token, TokenKind::Access)
        .map_err(|_| AppError::Unauthorized)?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser::from(claims));

    Ok(next.run(request).await)
}

pub(crate) async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(claims) = bearer_token(request.headers())
        .and_then(|token| state.tokens.verify_session(token, TokenKind::Access).ok())
    {
        request
            .extensions_mut()
            .insert(AuthenticatedUser::from(claims));
    }

    next.run(request).await
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth_header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let mut parts = auth_header.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    if token.trim().is_empty() {
        return None;
    }

    Some(token.trim())
}
