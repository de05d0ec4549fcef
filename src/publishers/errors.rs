use serde_json::Value;
use thiserror::Error;

use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum PublishError {
    /// The platform rejected our credentials.
    #[error("Error autenticando con {platform}")]
    Auth {
        platform: &'static str,
        details: String,
    },

    /// The platform answered with an unexpected status.
    #[error("Error al publicar en {platform}")]
    Rejected {
        platform: &'static str,
        details: Value,
    },

    #[error("Error al publicar en {platform}")]
    Upstream {
        platform: &'static str,
        #[source]
        source: UpstreamError,
    },
}

impl PublishError {
    pub fn upstream(platform: &'static str) -> impl FnOnce(UpstreamError) -> Self {
        move |source| Self::Upstream { platform, source }
    }
}
