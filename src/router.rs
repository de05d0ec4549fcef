use std::any::Any;

use axum::{
    Json, Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::{Request, StatusCode, Uri},
    response::Response,
    routing::{get, post},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info_span};
use utoipa::OpenApi;

use crate::{
    app_state::AppState,
    error::envelope,
    health::{self, PingResponse},
    replant::{
        dtos::{DevtoPublishResponse, ErrorResponse, MediumPublishResponse, PublishRequest},
        handlers::{self, replant_devto, replant_medium},
    },
};

// Long articles with inline HTML easily exceed axum's 2 MB default.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(health::ping, handlers::replant_medium, handlers::replant_devto),
    components(schemas(
        PingResponse,
        PublishRequest,
        MediumPublishResponse,
        DevtoPublishResponse,
        ErrorResponse
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "publish", description = "Rewrite and republish articles")
    )
)]
pub struct ApiDoc;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(health::ping))
        .route("/replanta-medium", post(replant_medium))
        .route("/replanta-devto", post(replant_devto))
        .route("/openapi.json", get(openapi))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn not_found(uri: Uri) -> Response {
    envelope(
        StatusCode::NOT_FOUND,
        "Not Found",
        &format!("The requested URL {} was not found on the server.", uri.path()),
    )
}

async fn method_not_allowed() -> Response {
    envelope(
        StatusCode::METHOD_NOT_ALLOWED,
        "Method Not Allowed",
        "The method is not allowed for the requested URL.",
    )
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(%message, "Request handler panicked");

    envelope(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", &message)
}
