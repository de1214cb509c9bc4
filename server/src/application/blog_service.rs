use rand::{RngExt, distr::Alphanumeric};
use tracing::debug;

use crate::data::post_repository::{
    NewPost, Pagination, PostFilter, PostPatch, PostRepository,
};
use crate::domain::error::DomainError;
use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest, estimated_read_time};
use crate::domain::slug::{slugify, with_suffix};

const MAX_PAGE_SIZE: u32 = 50;
const DEFAULT_PAGE_SIZE: u32 = 10;
const SLUG_INSERT_ATTEMPTS: usize = 5;

/// Denormalized author fields stored with each post.
#[derive(Debug, Clone)]
pub(crate) struct PostAuthor {
    pub(crate) id: i64,
    pub(crate) username: String,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ListPostsQuery {
    pub(crate) page: Option<u32>,
    pub(crate) page_size: Option<u32>,
    pub(crate) published_only: Option<bool>,
    pub(crate) category: Option<String>,
    pub(crate) tag: Option<String>,
    pub(crate) search: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct ListPostsResult {
    pub(crate) posts: Vec<Post>,
    pub(crate) page: u32,
    pub(crate) page_size: u32,
    pub(crate) total: i64,
    pub(crate) total_pages: i64,
}

pub(crate) struct BlogService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> BlogService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Drafts stay invisible to everyone but admins; admins see them only
    /// when they ask (`published_only = false`).
    pub(crate) async fn list_posts(
        &self,
        query: ListPostsQuery,
        viewer_is_admin: bool,
    ) -> Result<ListPostsResult, DomainError> {
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let filter = PostFilter {
            published_only: !viewer_is_admin || query.published_only.unwrap_or(true),
            category: none_if_blank(query.category),
            tag: none_if_blank(query.tag),
            search: none_if_blank(query.search),
        };

        let posts = self
            .repo
            .list_posts(&filter, Pagination { page, page_size })
            .await?;
        let total = self.repo.count_posts(&filter).await?;
        let total_pages = (total + i64::from(page_size) - 1) / i64::from(page_size);

        Ok(ListPostsResult {
            posts,
            page,
            page_size,
            total,
            total_pages,
        })
    }

    /// A successful read counts as a view.
    pub(crate) async fn get_post(
        &self,
        slug: &str,
        viewer_is_admin: bool,
    ) -> Result<Post, DomainError> {
        let mut post = self
            .repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post slug: {slug}")))?;

        if !post.published && !viewer_is_admin {
            return Err(DomainError::NotFound(format!("post slug: {slug}")));
        }

        self.repo.increment_views(post.id).await?;
        post.views += 1;
        Ok(post)
    }

    pub(crate) async fn create_post(
        &self,
        author: &PostAuthor,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;
        let read_time = estimated_read_time(&req.content);

        let new_post = NewPost {
            slug: base_slug(&req.title),
            title: req.title,
            excerpt: req.excerpt,
            content: req.content,
            author: author.username.clone(),
            author_id: author.id,
            featured_image: req.featured_image,
            images: req.images,
            tags: req.tags,
            category: req.category,
            published: req.published,
            read_time,
        };

        self.insert_with_unique_slug(new_post).await
    }

    pub(crate) async fn update_post(
        &self,
        slug: &str,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;
        if req.is_empty() {
            return Err(DomainError::Validation {
                field: "body",
                message: "at least one field must be set",
            });
        }

        let post = self
            .repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post slug: {slug}")))?;

        let new_slug = req
            .title
            .as_deref()
            .map(base_slug)
            .filter(|candidate| *candidate != post.slug);

        let patch = PostPatch {
            title: req.title,
            slug: new_slug,
            excerpt: req.excerpt,
            read_time: req.content.as_deref().map(estimated_read_time),
            content: req.content,
            featured_image: req.featured_image,
            images: req.images,
            tags: req.tags,
            category: req.category,
            published: req.published,
        };

        self.apply_with_unique_slug(post.id, patch).await
    }

    pub(crate) async fn delete_post(&self, slug: &str) -> Result<(), DomainError> {
        let deleted = self.repo.delete_by_slug(slug).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("post slug: {slug}")));
        }
        Ok(())
    }

    pub(crate) async fn tags(&self) -> Result<Vec<String>, DomainError> {
        self.repo.distinct_tags().await
    }

    pub(crate) async fn categories(&self) -> Result<Vec<String>, DomainError> {
        self.repo.distinct_categories().await
    }

    /// The unique index on `slug` is the arbiter; on a conflict the insert
    /// retries with a randomized suffix instead of trusting the clock.
    async fn insert_with_unique_slug(&self, mut input: NewPost) -> Result<Post, DomainError> {
        let base = input.slug.clone();

        for attempt in 0..SLUG_INSERT_ATTEMPTS {
            match self.repo.insert_post(input.clone()).await {
                Ok(post) => {
                    if attempt > 0 {
                        debug!(slug = %post.slug, attempts = attempt + 1, "slug allocated after conflict");
                    }
                    return Ok(post);
                }
                Err(DomainError::AlreadyExists(resource)) if resource == "slug" => {
                    input.slug = with_suffix(&base, &random_suffix());
                }
                Err(err) => return Err(err),
            }
        }

        Err(DomainError::Unexpected(format!(
            "could not allocate a unique slug for '{base}'"
        )))
    }

    async fn apply_with_unique_slug(
        &self,
        post_id: i64,
        patch: PostPatch,
    ) -> Result<Post, DomainError> {
        let base = patch.slug.clone();
        let mut patch = patch;

        for _ in 0..SLUG_INSERT_ATTEMPTS {
            match self.repo.update_post(post_id, patch.clone()).await {
                Ok(Some(post)) => return Ok(post),
                Ok(None) => {
                    return Err(DomainError::NotFound(format!("post id: {post_id}")));
                }
                Err(DomainError::AlreadyExists(resource))
                    if resource == "slug" && base.is_some() =>
                {
                    let base = base.as_deref().unwrap_or_default();
                    patch.slug = Some(with_suffix(base, &random_suffix()));
                }
                Err(err) => return Err(err),
            }
        }

        Err(DomainError::Unexpected(
            "could not allocate a unique slug for update".to_string(),
        ))
    }
}

fn base_slug(title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        "post".to_string()
    } else {
        slug
    }
}

fn random_suffix() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::{BlogService, ListPostsQuery, PostAuthor};
    use crate::data::post_repository::{
        NewPost, Pagination, PostFilter, PostPatch, PostRepository,
    };
    use crate::domain::error::DomainError;
    use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};

    /// In-memory repository with a real uniqueness constraint on slug, so
    /// the conflict-retry path is exercised the way Postgres would drive it.
    #[derive(Clone, Default)]
    struct FakePostRepo {
        posts: Arc<Mutex<Vec<Post>>>,
        next_id: Arc<Mutex<i64>>,
        last_filter: Arc<Mutex<Option<PostFilter>>>,
        last_pagination: Arc<Mutex<Option<Pagination>>>,
    }

    impl FakePostRepo {
        fn slugs(&self) -> HashSet<String> {
            self.posts
                .lock()
                .expect("posts mutex poisoned")
                .iter()
                .map(|post| post.slug.clone())
                .collect()
        }

        fn insert_existing(&self, post: Post) {
            self.posts.lock().expect("posts mutex poisoned").push(post);
        }
    }

    #[async_trait]
    impl PostRepository for FakePostRepo {
        async fn insert_post(&self, input: NewPost) -> Result<Post, DomainError> {
            let mut posts = self.posts.lock().expect("posts mutex poisoned");
            if posts.iter().any(|post| post.slug == input.slug) {
                return Err(DomainError::AlreadyExists("slug".to_string()));
            }
            let mut next_id = self.next_id.lock().expect("next_id mutex poisoned");
            *next_id += 1;
            let post = Post {
                id: *next_id,
                title: input.title,
                slug: input.slug,
                excerpt: input.excerpt,
                content: input.content,
                author: input.author,
                author_id: input.author_id,
                featured_image: input.featured_image,
                images: input.images,
                tags: input.tags,
                category: input.category,
                published: input.published,
                views: 0,
                read_time: input.read_time,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            posts.push(post.clone());
            Ok(post)
        }

        async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, DomainError> {
            Ok(self
                .posts
                .lock()
                .expect("posts mutex poisoned")
                .iter()
                .find(|post| post.slug == slug)
                .cloned())
        }

        async fn update_post(
            &self,
            id: i64,
            patch: PostPatch,
        ) -> Result<Option<Post>, DomainError> {
            let mut posts = self.posts.lock().expect("posts mutex poisoned");
            if let Some(new_slug) = &patch.slug
                && posts
                    .iter()
                    .any(|post| post.id != id && post.slug == *new_slug)
            {
                return Err(DomainError::AlreadyExists("slug".to_string()));
            }
            let Some(post) = posts.iter_mut().find(|post| post.id == id) else {
                return Ok(None);
            };
            if let Some(title) = patch.title {
                post.title = title;
            }
            if let Some(slug) = patch.slug {
                post.slug = slug;
            }
            if let Some(excerpt) = patch.excerpt {
                post.excerpt = excerpt;
            }
            if let Some(content) = patch.content {
                post.content = content;
            }
            if let Some(featured_image) = patch.featured_image {
                post.featured_image = Some(featured_image);
            }
            if let Some(images) = patch.images {
                post.images = images;
            }
            if let Some(tags) = patch.tags {
                post.tags = tags;
            }
            if let Some(category) = patch.category {
                post.category = category;
            }
            if let Some(published) = patch.published {
                post.published = published;
            }
            if let Some(read_time) = patch.read_time {
                post.read_time = read_time;
            }
            post.updated_at = Utc::now();
            Ok(Some(post.clone()))
        }

        async fn delete_by_slug(&self, slug: &str) -> Result<bool, DomainError> {
            let mut posts = self.posts.lock().expect("posts mutex poisoned");
            let before = posts.len();
            posts.retain(|post| post.slug != slug);
            Ok(posts.len() < before)
        }

        async fn list_posts(
            &self,
            filter: &PostFilter,
            pagination: Pagination,
        ) -> Result<Vec<Post>, DomainError> {
            *self.last_filter.lock().expect("filter mutex poisoned") = Some(filter.clone());
            *self
                .last_pagination
                .lock()
                .expect("pagination mutex poisoned") = Some(pagination);
            Ok(self
                .posts
                .lock()
                .expect("posts mutex poisoned")
                .iter()
                .filter(|post| !filter.published_only || post.published)
                .cloned()
                .collect())
        }

        async fn count_posts(&self, filter: &PostFilter) -> Result<i64, DomainError> {
            Ok(self
                .posts
                .lock()
                .expect("posts mutex poisoned")
                .iter()
                .filter(|post| !filter.published_only || post.published)
                .count() as i64)
        }

        async fn increment_views(&self, id: i64) -> Result<(), DomainError> {
            let mut posts = self.posts.lock().expect("posts mutex poisoned");
            if let Some(post) = posts.iter_mut().find(|post| post.id == id) {
                post.views += 1;
            }
            Ok(())
        }

        async fn distinct_tags(&self) -> Result<Vec<String>, DomainError> {
            let mut tags: Vec<String> = self
                .posts
                .lock()
                .expect("posts mutex poisoned")
                .iter()
                .filter(|post| post.published)
                .flat_map(|post| post.tags.clone())
                .collect::<HashSet<_>>()
                .into_iter()
                .collect();
            tags.sort();
            Ok(tags)
        }

        async fn distinct_categories(&self) -> Result<Vec<String>, DomainError> {
            let mut categories: Vec<String> = self
                .posts
                .lock()
                .expect("posts mutex poisoned")
                .iter()
                .filter(|post| post.published)
                .map(|post| post.category.clone())
                .collect::<HashSet<_>>()
                .into_iter()
                .collect();
            categories.sort();
            Ok(categories)
        }
    }

    fn author() -> PostAuthor {
        PostAuthor {
            id: 10,
            username: "admin_user".to_string(),
        }
    }

    fn create_request(title: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_string(),
            excerpt: "an excerpt of reasonable length".to_string(),
            content: "word ".repeat(450),
            featured_image: None,
            images: Vec::new(),
            tags: vec!["rust".to_string()],
            category: "tech".to_string(),
            published: true,
        }
    }

    #[tokio::test]
    async fn create_post_derives_slug_and_read_time() {
        let repo = FakePostRepo::default();
        let service = BlogService::new(repo.clone());

        let post = service
            .create_post(&author(), create_request("Hello, World!!  Test"))
            .await
            .expect("create must succeed");

        assert_eq!(post.slug, "hello-world-test");
        assert_eq!(post.author, "admin_user");
        assert_eq!(post.author_id, 10);
        assert_eq!(post.read_time, 2);
    }

    #[tokio::test]
    async fn colliding_titles_get_distinct_slugs() {
        let repo = FakePostRepo::default();
        let service = BlogService::new(repo.clone());

        let first = service
            .create_post(&author(), create_request("Same Title"))
            .await
            .expect("first create must succeed");
        let second = service
            .create_post(&author(), create_request("Same Title"))
            .await
            .expect("second create must succeed");

        assert_eq!(first.slug, "same-title");
        assert_ne!(first.slug, second.slug);
        assert!(second.slug.starts_with("same-title-"));
        assert_eq!(repo.slugs().len(), 2);
    }

    #[tokio::test]
    async fn get_post_hides_drafts_from_non_admins_and_counts_views() {
        let repo = FakePostRepo::default();
        let service = BlogService::new(repo.clone());

        let mut req = create_request("Draft Post");
        req.published = false;
        service
            .create_post(&author(), req)
            .await
            .expect("create must succeed");

        let err = service
            .get_post("draft-post", false)
            .await
            .expect_err("draft must be hidden");
        assert!(matches!(err, DomainError::NotFound(_)));

        let post = service
            .get_post("draft-post", true)
            .await
            .expect("admin must see draft");
        assert_eq!(post.views, 1);

        let post = service
            .get_post("draft-post", true)
            .await
            .expect("second read must succeed");
        assert_eq!(post.views, 2);
    }

    #[tokio::test]
    async fn list_posts_forces_published_for_non_admins() {
        let repo = FakePostRepo::default();
        let service = BlogService::new(repo.clone());

        let query = ListPostsQuery {
            published_only: Some(false),
            ..ListPostsQuery::default()
        };
        service
            .list_posts(query, false)
            .await
            .expect("list must succeed");

        let filter = repo
            .last_filter
            .lock()
            .expect("filter mutex poisoned")
            .clone()
            .expect("filter must be captured");
        assert!(filter.published_only);

        let query = ListPostsQuery {
            published_only: Some(false),
            ..ListPostsQuery::default()
        };
        service
            .list_posts(query, true)
            .await
            .expect("list must succeed");
        let filter = repo
            .last_filter
            .lock()
            .expect("filter mutex poisoned")
            .clone()
            .expect("filter must be captured");
        assert!(!filter.published_only);
    }

    #[tokio::test]
    async fn list_posts_clamps_pagination_and_reports_totals() {
        let repo = FakePostRepo::default();
        let service = BlogService::new(repo.clone());

        for idx in 0..3 {
            service
                .create_post(&author(), create_request(&format!("Post {idx}")))
                .await
                .expect("create must succeed");
        }

        let query = ListPostsQuery {
            page: Some(0),
            page_size: Some(500),
            ..ListPostsQuery::default()
        };
        let result = service
            .list_posts(query, false)
            .await
            .expect("list must succeed");

        assert_eq!(result.page, 1);
        assert_eq!(result.page_size, 50);
        assert_eq!(result.total, 3);
        assert_eq!(result.total_pages, 1);

        let pagination = repo
            .last_pagination
            .lock()
            .expect("pagination mutex poisoned")
            .expect("pagination must be captured");
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.page_size, 50);
    }

    #[tokio::test]
    async fn update_post_reslugs_on_title_change() {
        let repo = FakePostRepo::default();
        let service = BlogService::new(repo.clone());

        service
            .create_post(&author(), create_request("Original Title"))
            .await
            .expect("create must succeed");

        let req = UpdatePostRequest {
            title: Some("Brand New Title".to_string()),
            ..UpdatePostRequest::default()
        };
        let updated = service
            .update_post("original-title", req)
            .await
            .expect("update must succeed");

        assert_eq!(updated.slug, "brand-new-title");
        assert_eq!(updated.title, "Brand New Title");
    }

    #[tokio::test]
    async fn update_post_retries_slug_conflicts() {
        let repo = FakePostRepo::default();
        let service = BlogService::new(repo.clone());

        service
            .create_post(&author(), create_request("Taken Title"))
            .await
            .expect("create must succeed");
        service
            .create_post(&author(), create_request("Other Title"))
            .await
            .expect("create must succeed");

        let req = UpdatePostRequest {
            title: Some("Taken Title".to_string()),
            ..UpdatePostRequest::default()
        };
        let updated = service
            .update_post("other-title", req)
            .await
            .expect("update must succeed");

        assert!(updated.slug.starts_with("taken-title-"));
    }

    #[tokio::test]
    async fn update_post_rejects_empty_patch() {
        let repo = FakePostRepo::default();
        let service = BlogService::new(repo);

        let err = service
            .update_post("whatever", UpdatePostRequest::default())
            .await
            .expect_err("empty patch must fail");
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn delete_post_reports_missing_slug() {
        let repo = FakePostRepo::default();
        let service = BlogService::new(repo.clone());

        service
            .create_post(&author(), create_request("To Delete"))
            .await
            .expect("create must succeed");

        service
            .delete_post("to-delete")
            .await
            .expect("delete must succeed");
        let err = service
            .delete_post("to-delete")
            .await
            .expect_err("second delete must fail");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn tags_and_categories_cover_published_posts() {
        let repo = FakePostRepo::default();
        let service = BlogService::new(repo.clone());

        let mut req = create_request("Published");
        req.tags = vec!["zeta".to_string(), "alpha".to_string()];
        service
            .create_post(&author(), req)
            .await
            .expect("create must succeed");

        let mut draft = create_request("Hidden Draft");
        draft.tags = vec!["secret".to_string()];
        draft.published = false;
        service
            .create_post(&author(), draft)
            .await
            .expect("create must succeed");

        assert_eq!(
            service.tags().await.expect("tags must succeed"),
            vec!["alpha".to_string(), "zeta".to_string()]
        );
        assert_eq!(
            service.categories().await.expect("categories must succeed"),
            vec!["tech".to_string()]
        );
    }
}
