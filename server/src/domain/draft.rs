use serde::Serialize;

/// Transient blog draft recovered from a model reply. Carries no identity;
/// persistence assigns id and slug when the caller publishes it.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct GeneratedDraft {
    pub(crate) title: String,
    pub(crate) excerpt: String,
    pub(crate) content: String,
    pub(crate) tags: Vec<String>,
    pub(crate) category: String,
    pub(crate) featured_image: Option<String>,
    pub(crate) images: Vec<String>,
}

/// Tags applied when a model reply yields no usable tag data.
pub(crate) const DEFAULT_TAGS: [&str; 2] = ["AI Generated", "Blog"];

pub(crate) fn default_tags() -> Vec<String> {
    DEFAULT_TAGS.iter().map(|tag| tag.to_string()).collect()
}
