use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::generation::Generator;
use crate::images::host::ImageHost;
use crate::images::legacy::{ensure_raster_extension, is_legacy_format, rewrite_legacy_url};
use crate::upstream::UpstreamError;

const POLL_ATTEMPTS: u32 = 3;
const POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// Picks the image that goes with a rewritten article.
///
/// Never fails: relay problems fall back to the generated URL and a failed
/// generation yields an empty string, so the article is published without a
/// picture rather than not at all.
#[derive(Clone)]
pub struct ImageResolver {
    generator: Arc<dyn Generator>,
    host: ImageHost,
    poll_attempts: u32,
    poll_interval: Duration,
}

impl ImageResolver {
    pub fn new(generator: Arc<dyn Generator>, host: ImageHost) -> Self {
        Self {
            generator,
            host,
            poll_attempts: POLL_ATTEMPTS,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Shorten the availability poll; tests only need a few milliseconds.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, source_image: &str, title: &str) -> String {
        if is_legacy_format(source_image) {
            let rewritten = rewrite_legacy_url(source_image);
            debug!(%rewritten, "Rewrote legacy image format");
            return rewritten;
        }

        if !source_image.is_empty() {
            return source_image.to_string();
        }

        let prompt = image_prompt(title);
        let generated = match self.generator.generate_image(&prompt).await {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Image generation failed, continuing without image");
                return String::new();
            }
        };

        self.relay(&generated).await
    }

    /// Copy a generated image to the image host, falling back to the
    /// generated URL on any failure.
    pub async fn relay(&self, generated_url: &str) -> String {
        match self.try_relay(generated_url).await {
            Ok(hosted) => hosted,
            Err(e) => {
                warn!(error = %e, "Image relay failed, using generated URL");
                generated_url.to_string()
            }
        }
    }

    async fn try_relay(&self, generated_url: &str) -> Result<String, UpstreamError> {
        let bytes = self.host.download(generated_url).await?;
        let hosted = self.host.upload(bytes).await?;
        debug!(%hosted, "Image uploaded to host");

        for attempt in 1..=self.poll_attempts {
            if self.host.is_available(&hosted).await {
                return Ok(ensure_raster_extension(&hosted));
            }
            debug!(attempt, "Hosted image not reachable yet");
            if attempt < self.poll_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        Err(UpstreamError::malformed(
            "imgur",
            format!(
                "hosted image not reachable after {} attempts",
                self.poll_attempts
            ),
        ))
    }
}

pub fn image_prompt(title: &str) -> String {
    format!("cinematic concept art representing: {title}, technology, internet, digital world")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Credentials, Endpoints};
    use crate::generation::MockGenerator;

    fn resolver_with(generator: MockGenerator) -> ImageResolver {
        // Nothing listens on port 9: any relay attempt fails fast.
        let config = Config::new(Credentials {
            openai_api_key: "k".into(),
            medium_token: "m".into(),
            imgur_client_id: "i".into(),
            devto_token: "d".into(),
        })
        .with_endpoints(Endpoints::all("http://127.0.0.1:9"));
        let host = ImageHost::new(reqwest::Client::new(), &config);
        ImageResolver::new(Arc::new(generator), host)
    }

    #[tokio::test]
    async fn test_legacy_image_is_rewritten_without_network() {
        let mut generator = MockGenerator::new();
        generator.expect_generate_image().never();
        let resolver = resolver_with(generator);

        let first = resolver.resolve("https://x.com/foo-300x300.webp", "T").await;
        let second = resolver.resolve("https://x.com/foo.webp", "T").await;

        assert_eq!(first, "https://x.com/foo-1024x1024.jpg");
        assert_eq!(second, "https://x.com/foo-1024x1024.jpg");
    }

    #[tokio::test]
    async fn test_regular_image_passes_through() {
        let mut generator = MockGenerator::new();
        generator.expect_generate_image().never();
        let resolver = resolver_with(generator);

        let image = resolver.resolve("https://x.com/cover.png", "T").await;
        assert_eq!(image, "https://x.com/cover.png");
    }

    #[tokio::test]
    async fn test_generation_failure_yields_empty_image() {
        let mut generator = MockGenerator::new();
        generator.expect_generate_image().times(1).returning(|_| {
            Err(UpstreamError::Status {
                service: "openai",
                status: reqwest::StatusCode::TOO_MANY_REQUESTS,
                details: serde_json::json!({"error": {"code": "insufficient_quota"}}),
            })
        });
        let resolver = resolver_with(generator);

        assert_eq!(resolver.resolve("", "Rust at scale").await, "");
    }

    #[tokio::test]
    async fn test_prompt_mentions_title() {
        let mut generator = MockGenerator::new();
        generator
            .expect_generate_image()
            .withf(|prompt: &str| prompt.contains("Rust at scale") && prompt.contains("digital world"))
            .times(1)
            .returning(|_| Err(UpstreamError::RequestTimeout { service: "openai" }));
        let resolver = resolver_with(generator);

        resolver.resolve("", "Rust at scale").await;
    }

    #[tokio::test]
    async fn test_unreachable_host_falls_back_to_generated_url() {
        let mut generator = MockGenerator::new();
        generator
            .expect_generate_image()
            .returning(|_| Ok("http://127.0.0.1:9/generated.png".to_string()));
        let resolver = resolver_with(generator);

        let image = resolver.resolve("", "T").await;
        assert_eq!(image, "http://127.0.0.1:9/generated.png");
    }
}
