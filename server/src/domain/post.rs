use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Post {
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

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) excerpt: String,
    pub(crate) content: String,
    pub(crate) featured_image: Option<String>,
    pub(crate) images: Vec<String>,
    pub(crate) tags: Vec<String>,
    pub(crate) category: String,
    pub(crate) published: bool,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_title(&self.title)?,
            excerpt: normalize_excerpt(&self.excerpt)?,
            content: normalize_content(&self.content)?,
            featured_image: self.featured_image,
            images: trim_entries(self.images),
            tags: trim_entries(self.tags),
            category: normalize_category(&self.category),
            published: self.published,
        })
    }
}

/// Partial update; `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct UpdatePostRequest {
    pub(crate) title: Option<String>,
    pub(crate) excerpt: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) featured_image: Option<String>,
    pub(crate) images: Option<Vec<String>>,
    pub(crate) tags: Option<Vec<String>>,
    pub(crate) category: Option<String>,
    pub(crate) published: Option<bool>,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: self.title.as_deref().map(normalize_title).transpose()?,
            excerpt: self.excerpt.as_deref().map(normalize_excerpt).transpose()?,
            content: self.content.as_deref().map(normalize_content).transpose()?,
            featured_image: self.featured_image,
            images: self.images.map(trim_entries),
            tags: self.tags.map(trim_entries),
            category: self.category.as_deref().map(normalize_category),
            published: self.published,
        })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.excerpt.is_none()
            && self.content.is_none()
            && self.featured_image.is_none()
            && self.images.is_none()
            && self.tags.is_none()
            && self.category.is_none()
            && self.published.is_none()
    }
}

/// Estimated reading time in whole minutes at ~200 words per minute.
pub(crate) fn estimated_read_time(content: &str) -> i32 {
    let words = content.split_whitespace().count();
    (((words + 100) / 200).max(1)) as i32
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 200 {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..200 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_excerpt(excerpt: &str) -> Result<String, DomainError> {
    let excerpt = excerpt.trim();
    if excerpt.is_empty() || excerpt.chars().count() > 500 {
        return Err(DomainError::Validation {
            field: "excerpt",
            message: "must be 1..500 chars",
        });
    }
    Ok(excerpt.to_string())
}

fn normalize_content(content: &str) -> Result<String, DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::Validation {
            field: "content",
            message: "must not be empty",
        });
    }
    Ok(content.to_string())
}

fn normalize_category(category: &str) -> String {
    let category = category.trim();
    if category.is_empty() {
        "general".to_string()
    } else {
        category.to_string()
    }
}

fn trim_entries(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        CreatePostRequest, DomainError, UpdatePostRequest, estimated_read_time,
    };

    fn sample_create() -> CreatePostRequest {
        CreatePostRequest {
            title: "  Title  ".to_string(),
            excerpt: " short excerpt ".to_string(),
            content: "body text".to_string(),
            featured_image: None,
            images: vec![" a ".to_string(), "  ".to_string()],
            tags: vec![" rust ".to_string(), "".to_string()],
            category: "  ".to_string(),
            published: true,
        }
    }

    #[test]
    fn create_request_normalizes_fields() {
        let validated = sample_create().validate().expect("must validate");
        assert_eq!(validated.title, "Title");
        assert_eq!(validated.excerpt, "short excerpt");
        assert_eq!(validated.tags, vec!["rust".to_string()]);
        assert_eq!(validated.images, vec!["a".to_string()]);
        assert_eq!(validated.category, "general");
    }

    #[test]
    fn create_request_rejects_empty_title() {
        let mut req = sample_create();
        req.title = "   ".to_string();
        let err = req.validate().expect_err("title must be rejected");
        assert!(matches!(
            err,
            DomainError::Validation { field: "title", .. }
        ));
    }

    #[test]
    fn update_request_validates_only_present_fields() {
        let req = UpdatePostRequest {
            title: Some("  New title ".to_string()),
            ..UpdatePostRequest::default()
        };
        let validated = req.validate().expect("must validate");
        assert_eq!(validated.title.as_deref(), Some("New title"));
        assert!(validated.content.is_none());
    }

    #[test]
    fn update_request_reports_emptiness() {
        assert!(UpdatePostRequest::default().is_empty());
        let req = UpdatePostRequest {
            published: Some(false),
            ..UpdatePostRequest::default()
        };
        assert!(!req.is_empty());
    }

    #[test]
    fn read_time_rounds_to_nearest_minute_with_floor_of_one() {
        assert_eq!(estimated_read_time("one two three"), 1);
        let four_hundred = "word ".repeat(400);
        assert_eq!(estimated_read_time(&four_hundred), 2);
        let two_fifty = "word ".repeat(250);
        assert_eq!(estimated_read_time(&two_fifty), 1);
    }
}
