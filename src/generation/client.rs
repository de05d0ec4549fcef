use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use crate::config::Config;
use crate::generation::types::{ChatRequest, ChatResponse, ImageRequest, ImageResponse, Message};
use crate::upstream::{UpstreamError, error_details};

const SERVICE: &str = "openai";
const TEMPERATURE: f32 = 0.7;
const IMAGE_SIZE: &str = "1024x1024";

/// Text and image generation used by the rewrite pipeline and the image
/// resolver.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    /// Run one chat completion for `prompt` and return the raw text.
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError>;

    /// Generate one square image and return its temporary URL.
    async fn generate_image(&self, prompt: &str) -> Result<String, UpstreamError>;
}

/// OpenAI-compatible implementation of [`Generator`].
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
    text_model: String,
    image_model: String,
}

impl OpenAiClient {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.endpoints().openai.clone(),
            api_key: config.credentials().openai_api_key.clone(),
            text_model: config.text_model().to_string(),
            image_model: config.image_model().to_string(),
        }
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, UpstreamError>
    where
        B: serde::Serialize + Sync,
        R: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest_error(SERVICE, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                service: SERVICE,
                status,
                details: error_details(&text),
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| UpstreamError::malformed(SERVICE, e.to_string()))
    }
}

#[async_trait]
impl Generator for OpenAiClient {
    #[instrument(skip_all, fields(model = %self.text_model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
        let request = ChatRequest {
            model: &self.text_model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
        };

        let response: ChatResponse = self.post_json("/v1/chat/completions", &request).await?;
        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| UpstreamError::malformed(SERVICE, "completion without content"))?;

        debug!(chars = text.chars().count(), "Completion received");
        Ok(text)
    }

    #[instrument(skip_all, fields(model = %self.image_model))]
    async fn generate_image(&self, prompt: &str) -> Result<String, UpstreamError> {
        let request = ImageRequest {
            model: &self.image_model,
            prompt,
            n: 1,
            size: IMAGE_SIZE,
        };

        let response: ImageResponse = self.post_json("/v1/images/generations", &request).await?;
        let url = response
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .ok_or_else(|| UpstreamError::malformed(SERVICE, "image response without url"))?;

        debug!(%url, "Image generated");
        Ok(url)
    }
}
