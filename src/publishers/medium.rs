use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::config::Config;
use crate::publishers::errors::PublishError;
use crate::rewrite::GeneratedArticle;
use crate::upstream::{UpstreamError, error_details};

const PLATFORM: &str = "Medium";
const SERVICE: &str = "medium";
const MAX_TAGS: usize = 5;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Profile {
    id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePost<'a> {
    title: &'a str,
    content_format: &'static str,
    content: &'a str,
    tags: &'a [String],
    publish_status: &'static str,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    url: String,
}

/// A post accepted by Medium.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediumPost {
    pub url: String,
}

#[derive(Clone)]
pub struct MediumPublisher {
    http: Client,
    base_url: String,
    token: String,
}

impl MediumPublisher {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.endpoints().medium.clone(),
            token: config.credentials().medium_token.clone(),
        }
    }

    /// Publish HTML content as the token's owner. `publish` picks between a
    /// public post and a draft.
    #[instrument(skip(self, article), fields(title = %article.title))]
    pub async fn publish(
        &self,
        article: &GeneratedArticle,
        tags: &[String],
        publish: bool,
    ) -> Result<MediumPost, PublishError> {
        let user_id = self.user_id().await?;
        debug!(%user_id, "Authenticated with Medium");

        let payload = CreatePost {
            title: &article.title,
            content_format: "html",
            content: &article.body,
            tags: &tags[..tags.len().min(MAX_TAGS)],
            publish_status: publish_status(publish),
        };

        let response = self
            .http
            .post(format!("{}/v1/users/{}/posts", self.base_url, user_id))
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest_error(SERVICE, e))
            .map_err(PublishError::upstream(PLATFORM))?;

        if response.status() != StatusCode::CREATED {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let details = error_details(&text);
            error!(%status, %details, "Medium rejected the post");
            return Err(PublishError::Rejected {
                platform: PLATFORM,
                details,
            });
        }

        let created: Envelope<CreatedPost> = response
            .json()
            .await
            .map_err(|e| UpstreamError::malformed(SERVICE, e.to_string()))
            .map_err(PublishError::upstream(PLATFORM))?;

        Ok(MediumPost {
            url: created.data.url,
        })
    }

    async fn user_id(&self) -> Result<String, PublishError> {
        let response = self
            .http
            .get(format!("{}/v1/me", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest_error(SERVICE, e))
            .map_err(PublishError::upstream(PLATFORM))?;

        if response.status() != StatusCode::OK {
            let details = response.text().await.unwrap_or_default();
            return Err(PublishError::Auth {
                platform: PLATFORM,
                details,
            });
        }

        let profile: Envelope<Profile> = response
            .json()
            .await
            .map_err(|e| UpstreamError::malformed(SERVICE, e.to_string()))
            .map_err(PublishError::upstream(PLATFORM))?;
        Ok(profile.data.id)
    }
}

fn publish_status(publish: bool) -> &'static str {
    if publish { "public" } else { "draft" }
}
