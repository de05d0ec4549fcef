use std::sync::Arc;

use reqwest::Client;

use crate::{
    config::Config,
    generation::{Generator, OpenAiClient},
    images::{ImageHost, ImageResolver},
    publishers::{DevtoPublisher, MediumPublisher},
    rewrite::Rewriter,
    upstream::build_client,
};

/// Read-only collaborators shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub images: ImageResolver,
    pub rewriter: Rewriter,
    pub medium: MediumPublisher,
    pub devto: DevtoPublisher,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = build_client(config)?;
        let generator: Arc<dyn Generator> = Arc::new(OpenAiClient::new(http.clone(), config));
        Ok(Self::with_generator(config, http, generator))
    }

    /// Wire the state around an explicit generator (a mock in tests).
    pub fn with_generator(config: &Config, http: Client, generator: Arc<dyn Generator>) -> Self {
        Self {
            images: ImageResolver::new(generator.clone(), ImageHost::new(http.clone(), config)),
            rewriter: Rewriter::new(generator, config),
            medium: MediumPublisher::new(http.clone(), config),
            devto: DevtoPublisher::new(http, config),
        }
    }
}
