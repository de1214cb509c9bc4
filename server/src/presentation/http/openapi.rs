use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::ai::provider::ProviderKind;
use crate::domain::portfolio::{Experience, PersonalInfo, Portfolio, Project, SkillCategory, SkillItem};
use crate::presentation::http::handlers::ai::{DraftDto, GenerateDraftDto, PublishedDraftDto};
use crate::presentation::http::handlers::auth::{
    ChangePasswordDto, ForgotPasswordDto, LoginDto, RefreshDto, RegisterDto, ResetPasswordDto,
    TokenPairDto, UserDto,
};
use crate::presentation::http::handlers::posts::{
    CreatePostDto, ListPostsQueryDto, ListPostsResponseDto, PostDto, PostListItemDto,
    UpdatePostDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::auth::register,
        crate::presentation::http::handlers::auth::login,
        crate::presentation::http::handlers::auth::refresh,
        crate::presentation::http::handlers::auth::me,
        crate::presentation::http::handlers::auth::change_password,
        crate::presentation::http::handlers::auth::forgot_password,
        crate::presentation::http::handlers::auth::reset_password,
        crate::presentation::http::handlers::posts::list_posts,
        crate::presentation::http::handlers::posts::get_post,
        crate::presentation::http::handlers::posts::create_post,
        crate::presentation::http::handlers::posts::update_post,
        crate::presentation::http::handlers::posts::delete_post,
        crate::presentation::http::handlers::posts::list_tags,
        crate::presentation::http::handlers::posts::list_categories,
        crate::presentation::http::handlers::portfolio::get_portfolio,
        crate::presentation::http::handlers::portfolio::get_personal_info,
        crate::presentation::http::handlers::portfolio::get_skills,
        crate::presentation::http::handlers::portfolio::get_projects,
        crate::presentation::http::handlers::portfolio::get_experience,
        crate::presentation::http::handlers::portfolio::put_portfolio,
        crate::presentation::http::handlers::ai::generate,
        crate::presentation::http::handlers::ai::generate_and_post
    ),
    components(
        schemas(
            RegisterDto,
            LoginDto,
            RefreshDto,
            ChangePasswordDto,
            ForgotPasswordDto,
            ResetPasswordDto,
            TokenPairDto,
            UserDto,
            ListPostsQueryDto,
            CreatePostDto,
            UpdatePostDto,
            PostDto,
            PostListItemDto,
            ListPostsResponseDto,
            Portfolio,
            PersonalInfo,
            SkillCategory,
            SkillItem,
            Project,
            Experience,
            GenerateDraftDto,
            DraftDto,
            PublishedDraftDto,
            ProviderKind
        )
    ),
    tags(
        (name = "auth", description = "Authentication and token lifecycle"),
        (name = "posts", description = "Blog post endpoints"),
        (name = "portfolio", description = "Portfolio document endpoints"),
        (name = "ai", description = "AI blog drafting endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
