use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
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
    pub(crate) read_time: i32,
}

/// Column-level patch; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub(crate) struct PostPatch {
    pub(crate) title: Option<String>,
    pub(crate) slug: Option<String>,
    pub(crate) excerpt: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) featured_image: Option<String>,
    pub(crate) images: Option<Vec<String>>,
    pub(crate) tags: Option<Vec<String>>,
    pub(crate) category: Option<String>,
    pub(crate) published: Option<bool>,
    pub(crate) read_time: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PostFilter {
    pub(crate) published_only: bool,
    pub(crate) category: Option<String>,
    pub(crate) tag: Option<String>,
    pub(crate) search: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Pagination {
    pub(crate) page: u32,
    pub(crate) page_size: u32,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    /// Atomic insert; a slug collision surfaces as `AlreadyExists` so the
    /// caller can retry with a different suffix.
    async fn insert_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, DomainError>;
    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError>;
    async fn delete_by_slug(&self, slug: &str) -> Result<bool, DomainError>;
    async fn list_posts(
        &self,
        filter: &PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<Post>, DomainError>;
    async fn count_posts(&self, filter: &PostFilter) -> Result<i64, DomainError>;
    async fn increment_views(&self, id: i64) -> Result<(), DomainError>;
    async fn distinct_tags(&self) -> Result<Vec<String>, DomainError>;
    async fn distinct_categories(&self) -> Result<Vec<String>, DomainError>;
}
