use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::data::post_repository::{
    NewPost, Pagination, PostFilter, PostPatch, PostRepository,
};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

const POST_COLUMNS: &str = "id, title, slug, excerpt, content, author, author_id, \
     featured_image, images, tags, category, published, views, read_time, \
     created_at, updated_at";

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    slug: String,
    excerpt: String,
    content: String,
    author: String,
    author_id: i64,
    featured_image: Option<String>,
    images: Vec<String>,
    tags: Vec<String>,
    category: String,
    published: bool,
    views: i64,
    read_time: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            title: row.title,
            slug: row.slug,
            excerpt: row.excerpt,
            content: row.content,
            author: row.author,
            author_id: row.author_id,
            featured_image: row.featured_image,
            images: row.images,
            tags: row.tags,
            category: row.category,
            published: row.published,
            views: row.views,
            read_time: row.read_time,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &PostFilter) {
    if filter.published_only {
        builder.push(" AND published = TRUE");
    }
    if let Some(category) = &filter.category {
        builder.push(" AND category = ");
        builder.push_bind(category.clone());
    }
    if let Some(tag) = &filter.tag {
        builder.push(" AND ");
        builder.push_bind(tag.clone());
        builder.push(" = ANY(tags)");
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        builder.push(" AND (title ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR excerpt ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (
                title, slug, excerpt, content, author, author_id,
                featured_image, images, tags, category, published, read_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, title, slug, excerpt, content, author, author_id,
                      featured_image, images, tags, category, published, views,
                      read_time, created_at, updated_at
            "#,
        )
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.excerpt)
        .bind(&input.content)
        .bind(&input.author)
        .bind(input.author_id)
        .bind(&input.featured_image)
        .bind(&input.images)
        .bind(&input.tags)
        .bind(&input.category)
        .bind(input.published)
        .bind(input.read_time)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(row.into())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(row.map(Post::from))
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("UPDATE posts SET updated_at = now()");

        if let Some(title) = patch.title {
            builder.push(", title = ");
            builder.push_bind(title);
        }
        if let Some(slug) = patch.slug {
            builder.push(", slug = ");
            builder.push_bind(slug);
        }
        if let Some(excerpt) = patch.excerpt {
            builder.push(", excerpt = ");
            builder.push_bind(excerpt);
        }
        if let Some(content) = patch.content {
            builder.push(", content = ");
            builder.push_bind(content);
        }
        if let Some(featured_image) = patch.featured_image {
            builder.push(", featured_image = ");
            builder.push_bind(featured_image);
        }
        if let Some(images) = patch.images {
            builder.push(", images = ");
            builder.push_bind(images);
        }
        if let Some(tags) = patch.tags {
            builder.push(", tags = ");
            builder.push_bind(tags);
        }
        if let Some(category) = patch.category {
            builder.push(", category = ");
            builder.push_bind(category);
        }
        if let Some(published) = patch.published {
            builder.push(", published = ");
            builder.push_bind(published);
        }
        if let Some(read_time) = patch.read_time {
            builder.push(", read_time = ");
            builder.push_bind(read_time);
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(&format!(" RETURNING {POST_COLUMNS}"));

        let row = builder
            .build_query_as::<PostRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(row.map(Post::from))
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM posts WHERE slug = $1")
            .bind(slug)
            .execute(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<Post>, DomainError> {
        let offset = i64::from(pagination.page.saturating_sub(1)) * i64::from(pagination.page_size);

        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {POST_COLUMNS} FROM posts WHERE TRUE"));
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC LIMIT ");
        builder.push_bind(i64::from(pagination.page_size));
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn count_posts(&self, filter: &PostFilter) -> Result<i64, DomainError> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM posts WHERE TRUE");
        push_filter(&mut builder, filter);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(count)
    }

    async fn increment_views(&self, id: i64) -> Result<(), DomainError> {
        sqlx::query("UPDATE posts SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(())
    }

    async fn distinct_tags(&self) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT unnest(tags) AS tag
            FROM posts
            WHERE published = TRUE
            ORDER BY tag
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT category
            FROM posts
            WHERE published = TRUE
            ORDER BY category
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)
    }
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23505")
    {
        let resource = match db_err.constraint() {
            Some("posts_slug_key") => "slug",
            _ => "post",
        };
        return DomainError::AlreadyExists(resource.to_string());
    }
    DomainError::Unexpected(err.to_string())
}
