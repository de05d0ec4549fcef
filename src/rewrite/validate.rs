use regex::Regex;
use std::sync::LazyLock;

use crate::error::ValidationError;
use crate::rewrite::GeneratedArticle;

static EXTERNAL_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\s[^>]*?href\s*=\s*"https?://[^"]+""#).unwrap()
});

/// Case-insensitive comparison after trimming surrounding whitespace.
pub fn titles_match(generated: &str, original: &str) -> bool {
    generated.trim().to_lowercase() == original.trim().to_lowercase()
}

pub fn has_external_link(html: &str) -> bool {
    EXTERNAL_LINK_REGEX.is_match(html)
}

/// Rules an assembled Medium article must satisfy before it is published.
pub fn validate_medium(article: &GeneratedArticle, original_title: &str) -> Result<(), ValidationError> {
    if titles_match(&article.title, original_title) {
        return Err(ValidationError::TitleUnchanged);
    }
    if !has_external_link(&article.body) {
        return Err(ValidationError::NoValidLinks);
    }
    Ok(())
}
