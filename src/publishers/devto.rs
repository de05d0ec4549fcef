use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, instrument};

use crate::config::Config;
use crate::publishers::errors::PublishError;
use crate::rewrite::GeneratedArticle;
use crate::upstream::UpstreamError;

const PLATFORM: &str = "Dev.to";
const SERVICE: &str = "devto";
const MAX_TAGS: usize = 4;

#[derive(Debug, Serialize)]
struct CreateArticle<'a> {
    article: ArticleBody<'a>,
}

#[derive(Debug, Serialize)]
struct ArticleBody<'a> {
    title: &'a str,
    // Dev.to takes the flag as-is: true goes live, false stays a draft.
    published: bool,
    body_markdown: &'a str,
    tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    canonical_url: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CreatedArticle {
    url: String,
}

/// An article accepted by Dev.to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevtoPost {
    pub url: String,
    /// `"draft"` or `"publicado"`.
    pub mode: &'static str,
}

#[derive(Clone)]
pub struct DevtoPublisher {
    http: Client,
    base_url: String,
    api_key: String,
}

impl DevtoPublisher {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.endpoints().devto.clone(),
            api_key: config.credentials().devto_token.clone(),
        }
    }

    #[instrument(skip(self, article), fields(title = %article.title))]
    pub async fn publish(
        &self,
        article: &GeneratedArticle,
        tags: &[String],
        canonical_url: &str,
        publish: bool,
    ) -> Result<DevtoPost, PublishError> {
        let payload = CreateArticle {
            article: ArticleBody {
                title: &article.title,
                published: publish,
                body_markdown: &article.body,
                tags: &tags[..tags.len().min(MAX_TAGS)],
                canonical_url: Some(canonical_url.trim()).filter(|url| !url.is_empty()),
            },
        };

        let response = self
            .http
            .post(format!("{}/api/articles", self.base_url))
            .header("api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest_error(SERVICE, e))
            .map_err(PublishError::upstream(PLATFORM))?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let text = response.text().await.unwrap_or_default();
            error!(%status, body = %text, "Dev.to rejected the article");
            return Err(PublishError::Rejected {
                platform: PLATFORM,
                details: Value::String(text),
            });
        }

        let created: CreatedArticle = response
            .json()
            .await
            .map_err(|e| UpstreamError::malformed(SERVICE, e.to_string()))
            .map_err(PublishError::upstream(PLATFORM))?;

        Ok(DevtoPost {
            url: created.url,
            mode: mode_label(publish),
        })
    }
}

pub fn mode_label(publish: bool) -> &'static str {
    if publish { "publicado" } else { "draft" }
}
