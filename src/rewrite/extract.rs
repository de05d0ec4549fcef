use regex::Regex;
use std::sync::LazyLock;

use crate::rewrite::GeneratedArticle;

/// First-line marker the prompts ask the model to put before its title.
pub const TITLE_MARKER: &str = "título:";

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Split a raw completion into title and body.
///
/// When the first line does not carry the title marker the original title is
/// reused verbatim and the whole completion is the body.
pub fn extract_article(raw: &str, original_title: &str) -> GeneratedArticle {
    let mut lines = raw.lines();

    if let Some(first) = lines.next()
        && let Some(title) = marked_title(first)
    {
        let body = lines.collect::<Vec<_>>().join("\n");
        return GeneratedArticle {
            title,
            body: body.trim().to_string(),
        };
    }

    GeneratedArticle {
        title: original_title.to_string(),
        body: raw.trim().to_string(),
    }
}

fn marked_title(line: &str) -> Option<String> {
    // Models like to bold the marker line: "**Título:** ...".
    let line = line.trim_start_matches(['*', '#', ' ']);
    if !line.to_lowercase().starts_with(TITLE_MARKER) {
        return None;
    }

    let (_, rest) = line.split_once(':')?;
    let title = TAG_REGEX.replace_all(rest, "");
    Some(title.trim().trim_matches('*').trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_marker_splits_title_and_body() {
        let article = extract_article("Título: New Name\nBody line", "Old");
        assert_eq!(article.title, "New Name");
        assert_eq!(article.body, "Body line");
    }

    #[test]
    fn test_missing_marker_reuses_original_title() {
        let raw = "  Just an article\nwith two lines  ";
        let article = extract_article(raw, "Original Title");
        assert_eq!(article.title, "Original Title");
        assert_eq!(article.body, "Just an article\nwith two lines");
    }

    #[test]
    fn test_marker_is_case_insensitive() {
        let article = extract_article("TÍTULO: Loud\nx", "Old");
        assert_eq!(article.title, "Loud");
    }

    #[test]
    fn test_title_markup_and_emphasis_removed() {
        let article = extract_article("**Título:** <strong>Rust en producción</strong>**\n\nCuerpo", "Old");
        assert_eq!(article.title, "Rust en producción");
        assert_eq!(article.body, "Cuerpo");
    }

    #[test]
    fn test_title_keeps_inner_colons() {
        let article = extract_article("Título: Rust: una guía\ncuerpo", "Old");
        assert_eq!(article.title, "Rust: una guía");
    }

    #[test]
    fn test_marker_only_in_later_line_is_ignored() {
        let raw = "Intro\nTítulo: Late";
        let article = extract_article(raw, "Old");
        assert_eq!(article.title, "Old");
        assert_eq!(article.body, raw);
    }

    #[test]
    fn test_empty_completion() {
        let article = extract_article("", "Old");
        assert_eq!(article.title, "Old");
        assert_eq!(article.body, "");
    }
}
