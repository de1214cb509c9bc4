/// Builds the drafting prompt. The instructions pin the reply to a JSON
/// object so the extraction cascade usually succeeds on its first try.
pub(crate) fn drafting_prompt(idea: &str) -> String {
    format!(
        r#"Write a blog post about: {idea}

WRITING STYLE:
- Conversational and personal, short punchy paragraphs
- Everyday language, no corporate jargon
- Real opinions and concrete examples
- 400-600 words, markdown formatting

STRUCTURE:
- Open with a hook
- Subheadings and bullet points to break the text up
- Close with a thought or question for the reader

Reply with a single JSON object and nothing else:
{{
  "title": "catchy, conversational title",
  "excerpt": "two sentences that make the reader want more",
  "content": "full post in markdown",
  "tags": "tag1, tag2, tag3",
  "category": "category",
  "featured_image": "https://...",
  "images": ["url1", "url2"]
}}"#
    )
}
