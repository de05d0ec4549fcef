use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::ValidationError;
use crate::generation::Generator;
use crate::rewrite::{
    GeneratedArticle, Platform, SourceArticle, extract::extract_article,
    format::assemble_medium_html, prompt::build_prompt, validate::validate_medium,
};
use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("generation failed: {0}")]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Prompt → completion → extraction → (Medium) HTML assembly and validation.
#[derive(Clone)]
pub struct Rewriter {
    generator: Arc<dyn Generator>,
    source_brand: String,
}

impl Rewriter {
    pub fn new(generator: Arc<dyn Generator>, config: &Config) -> Self {
        Self {
            generator,
            source_brand: config.source_brand().to_string(),
        }
    }

    /// Rewrite `source` for `platform`. `image` is only used on the Medium
    /// path, where it becomes the leading figure.
    ///
    /// One generation call, no retry.
    #[instrument(skip_all, fields(platform = ?platform, url = %source.url))]
    pub async fn rewrite(
        &self,
        source: &SourceArticle<'_>,
        platform: Platform,
        image: &str,
    ) -> Result<GeneratedArticle, RewriteError> {
        let prompt = build_prompt(platform, source, &self.source_brand);
        let raw = self.generator.complete(&prompt).await?;
        let extracted = extract_article(&raw, source.title);
        debug!(title = %extracted.title, "Extracted generated article");

        match platform {
            Platform::DevTo => Ok(extracted),
            Platform::Medium => {
                let body = assemble_medium_html(&extracted.body, image, &extracted.title);
                let article = GeneratedArticle {
                    title: extracted.title,
                    body,
                };
                validate_medium(&article, source.title)?;
                Ok(article)
            }
        }
    }
}
