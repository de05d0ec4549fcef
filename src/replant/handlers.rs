use axum::{
    Json,
    extract::{State, rejection::BytesRejection},
};
use bytes::Bytes;
use tracing::{debug, error, info, instrument};

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    images::ensure_raster_extension,
    replant::dtos::{DevtoPublishResponse, MediumPublishResponse, PublishRequest},
    rewrite::Platform,
};

const PREVIEW_CHARS: usize = 200;
const LOG_PREVIEW_BYTES: usize = 500;

/// Parse the body as JSON whatever its declared content type.
fn parse_request(body: &Bytes) -> AppResult<PublishRequest> {
    serde_json::from_slice(body).map_err(|e| {
        let raw = String::from_utf8_lossy(&body[..body.len().min(LOG_PREVIEW_BYTES)]);
        error!(error = %e, raw = %raw, "Could not parse request JSON");
        AppError::InvalidJson {
            message: e.to_string(),
            received: preview(body),
        }
    })
}

fn preview(body: &Bytes) -> String {
    if body.is_empty() {
        return "empty".to_string();
    }
    String::from_utf8_lossy(body).chars().take(PREVIEW_CHARS).collect()
}

fn validated(body: &Bytes) -> AppResult<PublishRequest> {
    let request = parse_request(body)?;
    if let Err(e) = request.validate() {
        error!(
            title = request.title.is_some(),
            url = request.url.is_some(),
            content = request.content.is_some(),
            "Missing required fields"
        );
        return Err(e.into());
    }
    Ok(request)
}

#[utoipa::path(
    post,
    path = "/replanta-medium",
    tag = "publish",
    request_body = PublishRequest,
    responses(
        (status = 200, description = "Article rewritten and sent to Medium", body = MediumPublishResponse),
        (status = 400, description = "Malformed JSON or missing fields", body = crate::replant::dtos::ErrorResponse),
        (status = 403, description = "Medium rejected the token", body = crate::replant::dtos::ErrorResponse),
        (status = 422, description = "Generated title unchanged or no valid links", body = crate::replant::dtos::ErrorResponse),
        (status = 500, description = "Generation or publishing failed", body = crate::replant::dtos::ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn replant_medium(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<MediumPublishResponse>> {
    let body = body?;
    debug!(bytes = body.len(), "Medium publish request received");
    let request = validated(&body)?;
    let source = request.source();

    let resolved = state.images.resolve(request.image(), source.title).await;
    // Medium sniffs the type from the extension, whatever the image's origin.
    let image = ensure_raster_extension(&resolved);

    let article = state
        .rewriter
        .rewrite(&source, Platform::Medium, &image)
        .await?;
    let post = state
        .medium
        .publish(&article, request.tags(), request.publish())
        .await?;

    info!(url = %post.url, title = %article.title, "Published on Medium");

    Ok(Json(MediumPublishResponse {
        titulo: article.title,
        contenido: article.body,
        medium_url: post.url,
        resumen: request.excerpt().to_string(),
        tags: request.tags().to_vec(),
        categoria: request.categories(),
        ai_image: image,
    }))
}

#[utoipa::path(
    post,
    path = "/replanta-devto",
    tag = "publish",
    request_body = PublishRequest,
    responses(
        (status = 200, description = "Article rewritten and sent to Dev.to", body = DevtoPublishResponse),
        (status = 400, description = "Malformed JSON or missing fields", body = crate::replant::dtos::ErrorResponse),
        (status = 500, description = "Generation or publishing failed", body = crate::replant::dtos::ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn replant_devto(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<DevtoPublishResponse>> {
    let body = body?;
    debug!(bytes = body.len(), "Dev.to publish request received");
    let request = validated(&body)?;
    let source = request.source();

    let article = state.rewriter.rewrite(&source, Platform::DevTo, "").await?;
    let post = state
        .devto
        .publish(
            &article,
            request.tags(),
            request.canonical_url(),
            request.publish(),
        )
        .await?;

    info!(url = %post.url, mode = post.mode, "Published on Dev.to");

    Ok(Json(DevtoPublishResponse {
        devto_url: post.url,
        titulo: article.title,
        resumen: request.excerpt().to_string(),
        tags: request.tags().to_vec(),
        modo: post.mode.to_string(),
    }))
}
