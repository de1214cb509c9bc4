use serde_json::Value;
use tracing::debug;

use crate::domain::draft::{GeneratedDraft, default_tags};

/// Recovers a structured draft from a raw model reply. Strategies run in
/// order of preference; the first success wins. When none applies, the
/// reply itself becomes the draft body.
pub(crate) fn extract_draft(idea: &str, reply: &str) -> GeneratedDraft {
    const STRATEGIES: [(&str, fn(&str) -> Option<Value>); 3] = [
        ("direct", parse_direct),
        ("fenced_block", parse_fenced_block),
        ("brace_slice", parse_brace_slice),
    ];

    for (name, strategy) in STRATEGIES {
        if let Some(value) = strategy(reply) {
            debug!(strategy = name, "structured draft recovered from model reply");
            return draft_from_value(value, reply);
        }
    }

    debug!("no structured draft in model reply; synthesizing from raw text");
    synthesized_draft(idea, reply)
}

fn parse_direct(reply: &str) -> Option<Value> {
    parse_object(reply.trim())
}

fn parse_fenced_block(reply: &str) -> Option<Value> {
    let start = reply.find("```")?;
    let after = &reply[start + 3..];
    let (label, rest) = after.split_once('\n')?;
    if !label.trim().eq_ignore_ascii_case("json") {
        return None;
    }
    let end = rest.find("```")?;
    parse_object(&rest[..end])
}

fn parse_brace_slice(reply: &str) -> Option<Value> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    parse_object(&reply[start..=end])
}

fn parse_object(candidate: &str) -> Option<Value> {
    serde_json::from_str::<Value>(candidate)
        .ok()
        .filter(Value::is_object)
}

fn draft_from_value(value: Value, reply: &str) -> GeneratedDraft {
    let title = string_field(&value, "title").unwrap_or_else(|| "Untitled Blog Post".to_string());
    let excerpt = string_field(&value, "excerpt").unwrap_or_default();
    let content = string_field(&value, "content").unwrap_or_else(|| reply.to_string());
    let category = string_field(&value, "category").unwrap_or_else(|| "general".to_string());
    let featured_image = string_field(&value, "featured_image").filter(|url| !url.is_empty());
    let tags = normalize_list(value.get("tags"), default_tags());
    let images = normalize_list(value.get("images"), Vec::new());

    GeneratedDraft {
        title,
        excerpt,
        content,
        tags,
        category,
        featured_image,
        images,
    }
}

fn synthesized_draft(idea: &str, reply: &str) -> GeneratedDraft {
    GeneratedDraft {
        title: format!("Blog Post: {}", truncated(idea, 50)),
        excerpt: excerpt_of(reply),
        content: reply.to_string(),
        tags: default_tags(),
        category: "general".to_string(),
        featured_image: None,
        images: Vec::new(),
    }
}

/// Excerpt used when the reply carries none: a 200-char prefix, with an
/// ellipsis when the text was cut.
pub(crate) fn excerpt_of(text: &str) -> String {
    let prefix = truncated(text, 200);
    if prefix.len() < text.len() {
        format!("{prefix}...")
    } else {
        prefix.to_string()
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(|field| field.trim().to_string())
        .filter(|field| !field.is_empty())
}

/// A comma-separated string is split and trimmed; a list is trimmed
/// element-wise; anything else falls back.
fn normalize_list(value: Option<&Value>, fallback: Vec<String>) -> Vec<String> {
    match value {
        Some(Value::String(raw)) => raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(entry) => entry.trim().to_string(),
                other => other.to_string(),
            })
            .filter(|entry| !entry.is_empty())
            .collect(),
        _ => fallback,
    }
}

fn truncated(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
