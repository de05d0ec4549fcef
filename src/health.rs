use axum::Json;
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct PingResponse {
    pong: bool,
}

#[utoipa::path(
    get,
    path = "/ping",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = PingResponse)
    )
)]
pub async fn ping() -> Json<PingResponse> {
    debug!("Ping received");
    Json(PingResponse { pong: true })
}
