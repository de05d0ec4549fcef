//! Error taxonomy of the HTTP boundary and the JSON envelopes it produces.

use axum::{
    Json,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::error;

use crate::publishers::PublishError;
use crate::rewrite::RewriteError;
use crate::upstream::UpstreamError;

/// Client data that is insufficient, or generated content that breaks the
/// publishing rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Faltan campos requeridos: title, url, content")]
    MissingFields,

    #[error("El título generado es igual al original. Reintenta.")]
    TitleUnchanged,

    #[error("El contenido generado no contiene enlaces válidos. Reintenta.")]
    NoValidLinks,
}

impl ValidationError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields => StatusCode::BAD_REQUEST,
            Self::TitleUnchanged | Self::NoValidLinks => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid JSON payload: {message}")]
    InvalidJson { message: String, received: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{message}")]
    Auth { message: String, details: Value },

    #[error("{message}")]
    Upstream { message: String, details: Value },

    /// The request body could not be read (too large, broken stream).
    #[error(transparent)]
    Body(#[from] BytesRejection),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn generation(err: UpstreamError) -> Self {
        Self::Upstream {
            message: "Error generando el contenido".to_string(),
            details: err.details(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson { .. } => StatusCode::BAD_REQUEST,
            Self::Validation(err) => err.status(),
            Self::Auth { .. } => StatusCode::FORBIDDEN,
            Self::Body(rejection) => rejection.status(),
            Self::Upstream { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RewriteError> for AppError {
    fn from(err: RewriteError) -> Self {
        match err {
            RewriteError::Validation(err) => Self::Validation(err),
            RewriteError::Upstream(err) => Self::generation(err),
        }
    }
}

impl From<PublishError> for AppError {
    fn from(err: PublishError) -> Self {
        let message = err.to_string();
        match err {
            PublishError::Auth { details, .. } => Self::Auth {
                message,
                details: Value::String(details),
            },
            PublishError::Rejected { details, .. } => Self::Upstream { message, details },
            PublishError::Upstream { source, .. } => Self::Upstream {
                message,
                details: source.details(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::InvalidJson { message, received } => json!({
                "error": "JSON inválido",
                "message": message,
                "received_data": received,
            }),
            AppError::Validation(err) => json!({
                "error": err.to_string(),
                "message": err.to_string(),
            }),
            AppError::Auth { message, details } | AppError::Upstream { message, details } => {
                error!(%status, %message, %details, "Upstream failure");
                json!({
                    "error": message,
                    "details": details,
                })
            }
            AppError::Body(rejection) => {
                error!(%status, reason = %rejection.body_text(), "Could not read request body");
                return envelope(
                    status,
                    status.canonical_reason().unwrap_or("Bad Request"),
                    &rejection.body_text(),
                );
            }
            AppError::Internal(err) => {
                error!(error = ?err, "Unhandled error while publishing");
                return envelope(status, "Excepción en el servidor", &err.to_string());
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Generic `{error, message, code}` envelope for anything not handled by a
/// more specific response.
pub fn envelope(status: StatusCode, error: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error": error,
            "message": message,
            "code": status.as_u16(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_validation_statuses() {
        assert_eq!(ValidationError::MissingFields.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ValidationError::TitleUnchanged.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ValidationError::NoValidLinks.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn test_auth_error_maps_to_forbidden() {
        let response = AppError::Auth {
            message: "Error autenticando con Medium".into(),
            details: json!("invalid token"),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Error autenticando con Medium");
        assert_eq!(json["details"], "invalid token");
    }

    #[tokio::test]
    async fn test_internal_error_uses_generic_envelope() {
        let response = AppError::Internal(anyhow::anyhow!("boom")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["message"], "boom");
        assert_eq!(json["code"], 500);
    }

    #[tokio::test]
    async fn test_generation_error_keeps_upstream_payload() {
        let err = UpstreamError::Status {
            service: "openai",
            status: StatusCode::TOO_MANY_REQUESTS,
            details: json!({"error": {"type": "insufficient_quota"}}),
        };
        let response = AppError::generation(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["details"]["error"]["type"], "insufficient_quota");
    }
}
