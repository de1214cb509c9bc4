use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::ai::provider::ProviderKind;
use crate::domain::draft::GeneratedDraft;
use crate::domain::post::CreatePostRequest;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::handlers::posts::post_author;
use crate::presentation::http::middleware::auth::AdminUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct GenerateDraftDto {
    #[validate(length(min = 3, max = 500))]
    pub(crate) idea: String,
    /// Provider selector; defaults to openarena.
    pub(crate) model: Option<ProviderKind>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct DraftDto {
    pub(crate) title: String,
    pub(crate) excerpt: String,
    pub(crate) content: String,
    pub(crate) tags: Vec<String>,
    pub(crate) category: String,
    pub(crate) featured_image: Option<String>,
    pub(crate) images: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PublishedDraftDto {
    pub(crate) id: i64,
    pub(crate) slug: String,
    pub(crate) title: String,
}

impl From<GeneratedDraft> for DraftDto {
    fn from(draft: GeneratedDraft) -> Self {
        Self {
            title: draft.title,
            excerpt: draft.excerpt,
            content: draft.content,
            tags: draft.tags,
            category: draft.category,
            featured_image: draft.featured_image,
            images: draft.images,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/ai/generate",
    tag = "ai",
    security(
        ("bearer_auth" = [])
    ),
    request_body = GenerateDraftDto,
    responses(
        (status = 200, description = "Draft generated", body = DraftDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 502, description = "Model provider failure"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn generate(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(dto): Json<GenerateDraftDto>,
) -> AppResult<(StatusCode, Json<DraftDto>)> {
    dto.validate()?;

    let draft = state
        .draft_service
        .generate(&dto.idea, dto.model.unwrap_or_default())
        .await?;

    Ok((StatusCode::OK, Json(draft.into())))
}

#[utoipa::path(
    post,
    path = "/api/ai/generate-and-post",
    tag = "ai",
    security(
        ("bearer_auth" = [])
    ),
    request_body = GenerateDraftDto,
    responses(
        (status = 201, description = "Draft generated and published", body = PublishedDraftDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 502, description = "Model provider failure"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn generate_and_post(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(dto): Json<GenerateDraftDto>,
) -> AppResult<(StatusCode, Json<PublishedDraftDto>)> {
    dto.validate()?;

    let draft = state
        .draft_service
        .generate(&dto.idea, dto.model.unwrap_or_default())
        .await?;

    let author = post_author(&state, admin.0.user_id).await?;
    let req = CreatePostRequest {
        title: draft.title,
        excerpt: draft.excerpt,
        content: draft.content,
        featured_image: draft.featured_image,
        images: draft.images,
        tags: draft.tags,
        category: draft.category,
        published: true,
    };

    let post = state.blog_service.create_post(&author, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(PublishedDraftDto {
            id: post.id,
            slug: post.slug,
            title: post.title,
        }),
    ))
}
