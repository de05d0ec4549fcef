use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::error::ValidationError;
use crate::rewrite::SourceArticle;

/// Inbound article for both publish endpoints. Every field is optional at the
/// parsing stage so that missing data is reported as a validation error
/// rather than a JSON error.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PublishRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub publish: Option<bool>,
    #[serde(default)]
    pub canonical_url: Option<String>,
    /// Echoed back untouched on the Medium endpoint.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub categories: Option<Value>,
}

impl PublishRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.trim().is_empty());
        if present(&self.title) && present(&self.url) && present(&self.content) {
            Ok(())
        } else {
            Err(ValidationError::MissingFields)
        }
    }

    pub fn source(&self) -> SourceArticle<'_> {
        SourceArticle {
            title: self.title.as_deref().unwrap_or_default(),
            url: self.url.as_deref().unwrap_or_default(),
            content: self.content.as_deref().unwrap_or_default(),
            excerpt: self.excerpt(),
        }
    }

    pub fn excerpt(&self) -> &str {
        self.excerpt.as_deref().unwrap_or_default()
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    pub fn image(&self) -> &str {
        self.image.as_deref().unwrap_or_default()
    }

    pub fn publish(&self) -> bool {
        self.publish.unwrap_or(false)
    }

    pub fn canonical_url(&self) -> &str {
        self.canonical_url.as_deref().unwrap_or_default()
    }

    pub fn categories(&self) -> Value {
        self.categories.clone().unwrap_or_else(|| json!([]))
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MediumPublishResponse {
    pub titulo: String,
    pub contenido: String,
    pub medium_url: String,
    pub resumen: String,
    pub tags: Vec<String>,
    #[schema(value_type = Object)]
    pub categoria: Value,
    pub ai_image: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DevtoPublishResponse {
    pub devto_url: String,
    pub titulo: String,
    pub resumen: String,
    pub tags: Vec<String>,
    pub modo: String,
}

/// Shape of every error body; which optional fields are present depends on
/// the failure.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}
