const MAX_SLUG_LEN: usize = 100;

/// Derives a URL path segment from a title: lowercase, word/space/hyphen
/// characters only, separator runs collapsed to a single hyphen, at most
/// 100 characters.
pub(crate) fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;

    for ch in lowered.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' {
            pending_separator = true;
        }
        // any other character is dropped without forcing a separator
    }

    if slug.chars().count() > MAX_SLUG_LEN {
        slug = slug.chars().take(MAX_SLUG_LEN).collect();
    }

    slug.trim_matches('-').to_string()
}

pub(crate) fn with_suffix(slug: &str, suffix: &str) -> String {
    if slug.is_empty() {
        suffix.to_string()
    } else {
        format!("{slug}-{suffix}")
    }
}
