use crate::error::ValidationError;
use crate::rewrite::{
    GeneratedArticle, extract::extract_article, format::assemble_medium_html, normalize,
    validate::validate_medium,
};

// Mirrors what the Medium path does after the completion comes back.
fn medium_article(raw: &str, original_title: &str, image: &str) -> GeneratedArticle {
    let extracted = extract_article(raw, original_title);
    let body = assemble_medium_html(&extracted.body, image, &extracted.title);
    GeneratedArticle {
        title: extracted.title,
        body,
    }
}

#[test]
fn test_typical_completion_passes_validation() {
    let raw = "Título: **Cinco lecciones de HTTP/3 en producción**\n\
               Migrar no fue trivial.\n\
               <h2>Qué aprendimos</h2>\n\
               Según <a href=\"https://www.wired.com/story/quic\">el análisis de Wired sobre QUIC</a>, la latencia baja.\n\
               Más detalles en <a href=\"https://blog.example.com/http3\">la guía completa de migración</a>.";

    let article = medium_article(raw, "Cómo migrar a HTTP/3", "https://i.imgur.com/x.jpg");

    assert_eq!(article.title, "Cinco lecciones de HTTP/3 en producción");
    assert!(article.body.contains("<h3>Qué aprendimos</h3>"));
    assert!(article.body.contains("<p>Migrar no fue trivial.</p>"));
    assert_eq!(validate_medium(&article, "Cómo migrar a HTTP/3"), Ok(()));
}

#[test]
fn test_completion_without_marker_fails_title_gate() {
    let raw = "<p><a href=\"https://y.com\">y</a></p>";
    let article = medium_article(raw, "Original", "");

    assert_eq!(article.title, "Original");
    assert_eq!(
        validate_medium(&article, "Original"),
        Err(ValidationError::TitleUnchanged)
    );
}

#[test]
fn test_normalize_is_idempotent_on_assembled_html() {
    let article = medium_article(
        "Título: X\n<h1>Uno</h1>\n<strong>dos</strong> y <em>tres</em>",
        "Y",
        "",
    );
    assert_eq!(normalize(&article.body), article.body);
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    // Tag soup built from the tags the normalizer cares about, so that the
    // generated strings actually exercise the rewrite rules.
    fn tag_soup() -> impl Strategy<Value = String> {
        let token = prop_oneof![
            Just("<strong>".to_string()),
            Just("</strong>".to_string()),
            Just("<em>".to_string()),
            Just("</em>".to_string()),
            (1u8..=6).prop_map(|n| format!("<h{n}>")),
            (1u8..=6).prop_map(|n| format!("</h{n}>")),
            Just("\n".to_string()),
            "[a-z <>/]{0,4}",
        ];
        prop::collection::vec(token, 0..24).prop_map(|tokens| tokens.concat())
    }

    proptest! {
        #[test]
        fn test_normalize_idempotent(html in tag_soup()) {
            let once = normalize(&html);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn test_normalize_idempotent_arbitrary(html in ".*") {
            let once = normalize(&html);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn test_normalize_leaves_no_strong_pairs(html in tag_soup()) {
            let normalized = normalize(&html);
            for line in normalized.lines() {
                if let Some(open) = line.find("<strong>") {
                    prop_assert!(!line[open..].contains("</strong>"));
                }
            }
        }

        #[test]
        fn test_extract_never_panics(raw in ".*", title in ".*") {
            let article = extract_article(&raw, &title);
            prop_assert!(!article.body.starts_with(char::is_whitespace));
        }
    }
}
