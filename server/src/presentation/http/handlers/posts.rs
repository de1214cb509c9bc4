use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::blog_service::{ListPostsQuery, ListPostsResult, PostAuthor};
use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppError, AppResult};
use crate::presentation::http::middleware::auth::{AdminUser, MaybeUser};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct ListPostsQueryDto {
    #[validate(range(min = 1))]
    pub(crate) page: Option<u32>,
    #[validate(range(min = 1, max = 50))]
    pub(crate) page_size: Option<u32>,
    pub(crate) published_only: Option<bool>,
    pub(crate) category: Option<String>,
    pub(crate) tag: Option<String>,
    pub(crate) search: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostDto {
    #[validate(length(min = 3, max = 200))]
    pub(crate) title: String,
    #[validate(length(min = 10, max = 500))]
    pub(crate) excerpt: String,
    #[validate(length(min = 50))]
    pub(crate) content: String,
    pub(crate) featured_image: Option<String>,
    #[serde(default)]
    pub(crate) images: Vec<String>,
    #[serde(default)]
    pub(crate) tags: Vec<String>,
    pub(crate) category: Option<String>,
    #[serde(default)]
    pub(crate) published: bool,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdatePostDto {
    #[validate(length(min = 3, max = 200))]
    pub(crate) title: Option<String>,
    #[validate(length(min = 10, max = 500))]
    pub(crate) excerpt: Option<String>,
    #[validate(length(min = 50))]
    pub(crate) content: Option<String>,
    pub(crate) featured_image: Option<String>,
    pub(crate) images: Option<Vec<String>>,
    pub(crate) tags: Option<Vec<String>>,
    pub(crate) category: Option<String>,
    pub(crate) published: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) excerpt: String,
    pub(crate) content: String,
    pub(crate) author: String,
    pub(crate) author_id: i64,
    pub(crate) featured_image: Option<String>,
    pub(crate) images: Vec<String>,
    pub(crate) tags: Vec<String>,
    pub(crate) category: String,
    pub(crate) published: bool,
    pub(crate) views: i64,
    pub(crate) read_time: i32,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

/// List entry without the full content.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostListItemDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) excerpt: String,
    pub(crate) author: String,
    pub(crate) featured_image: Option<String>,
    pub(crate) tags: Vec<String>,
    pub(crate) category: String,
    pub(crate) published: bool,
    pub(crate) views: i64,
    pub(crate) read_time: i32,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ListPostsResponseDto {
    pub(crate) posts: Vec<PostListItemDto>,
    pub(crate) total: i64,
    pub(crate) page: u32,
    pub(crate) page_size: u32,
    pub(crate) total_pages: i64,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            excerpt: post.excerpt,
            content: post.content,
            author: post.author,
            author_id: post.author_id,
            featured_image: post.featured_image,
            images: post.images,
            tags: post.tags,
            category: post.category,
            published: post.published,
            views: post.views,
            read_time: post.read_time,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<Post> for PostListItemDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            excerpt: post.excerpt,
            author: post.author,
            featured_image: post.featured_image,
            tags: post.tags,
            category: post.category,
            published: post.published,
            views: post.views,
            read_time: post.read_time,
            created_at: post.created_at,
        }
    }
}

impl From<ListPostsResult> for ListPostsResponseDto {
    fn from(result: ListPostsResult) -> Self {
        Self {
            posts: result
                .posts
                .into_iter()
                .map(PostListItemDto::from)
                .collect(),
            total: result.total,
            page: result.page,
            page_size: result.page_size,
            total_pages: result.total_pages,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(
        ("page" = Option<u32>, Query, description = "Page number (>= 1)"),
        ("page_size" = Option<u32>, Query, description = "Items per page (1..=50)"),
        ("published_only" = Option<bool>, Query, description = "Admins may pass false to include drafts"),
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("tag" = Option<String>, Query, description = "Filter by tag"),
        ("search" = Option<String>, Query, description = "Substring match over title and excerpt")
    ),
    responses(
        (status = 200, description = "Posts listed", body = ListPostsResponseDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Query(dto): Query<ListPostsQueryDto>,
) -> AppResult<(StatusCode, Json<ListPostsResponseDto>)> {
    dto.validate()?;

    let query = ListPostsQuery {
        page: dto.page,
        page_size: dto.page_size,
        published_only: dto.published_only,
        category: dto.category,
        tag: dto.tag,
        search: dto.search,
    };

    let result = state
        .blog_service
        .list_posts(query, viewer.is_admin())
        .await?;

    Ok((StatusCode::OK, Json(result.into())))
}

#[utoipa::path(
    get,
    path = "/api/posts/{slug}",
    tag = "posts",
    params(
        ("slug" = String, Path, description = "Post slug")
    ),
    responses(
        (status = 200, description = "Post found", body = PostDto),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(slug): Path<String>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let post = state.blog_service.get_post(&slug, viewer.is_admin()).await?;

    Ok((StatusCode::OK, Json(post.into())))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(dto): Json<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;

    let author = post_author(&state, admin.0.user_id).await?;
    let req = CreatePostRequest {
        title: dto.title,
        excerpt: dto.excerpt,
        content: dto.content,
        featured_image: dto.featured_image,
        images: dto.images,
        tags: dto.tags,
        category: dto.category.unwrap_or_default(),
        published: dto.published,
    };

    let post = state.blog_service.create_post(&author, req).await?;

    Ok((StatusCode::CREATED, Json(post.into())))
}

#[utoipa::path(
    put,
    path = "/api/posts/{slug}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("slug" = String, Path, description = "Post slug")
    ),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(slug): Path<String>,
    Json(dto): Json<UpdatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;

    let req = UpdatePostRequest {
        title: dto.title,
        excerpt: dto.excerpt,
        content: dto.content,
        featured_image: dto.featured_image,
        images: dto.images,
        tags: dto.tags,
        category: dto.category,
        published: dto.published,
    };

    let post = state.blog_service.update_post(&slug, req).await?;

    Ok((StatusCode::OK, Json(post.into())))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{slug}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("slug" = String, Path, description = "Post slug")
    ),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    state.blog_service.delete_post(&slug).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/posts/tags/all",
    tag = "posts",
    responses(
        (status = 200, description = "Sorted distinct tags over published posts", body = [String]),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_tags(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<String>>)> {
    let tags = state.blog_service.tags().await?;

    Ok((StatusCode::OK, Json(tags)))
}

#[utoipa::path(
    get,
    path = "/api/posts/categories/all",
    tag = "posts",
    responses(
        (status = 200, description = "Sorted distinct categories over published posts", body = [String]),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<String>>)> {
    let categories = state.blog_service.categories().await?;

    Ok((StatusCode::OK, Json(categories)))
}

pub(crate) async fn post_author(state: &AppState, user_id: i64) -> Result<PostAuthor, AppError> {
    let user = state.auth_service.current_user(user_id).await?;
    Ok(PostAuthor {
        id: user.id,
        username: user.username,
    })
}
