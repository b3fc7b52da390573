use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value as JsonValue;
use tracing::info;

use crate::{
    AppState, handlers,
    models::{common::RelayOutcome, relay::RelayRequest},
};

#[utoipa::path(
    post,
    path = "/relay",
    tag = "relay",
    request_body = RelayRequest,
    responses(
        (status = 200, description = "Model answered; `data` is the first candidate", body = RelayOutcome),
        (status = 400, description = "Bad Request - Invalid relay payload", body = RelayOutcome),
        (status = 502, description = "Model API call failed", body = RelayOutcome)
    )
)]
pub async fn relay(
    State(state): State<AppState>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> (StatusCode, Json<RelayOutcome>) {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            return bad_request(format!("Failed to read relay request: {}", rejection.body_text()));
        }
    };
    let req: RelayRequest = match serde_json::from_value(payload) {
        Ok(req) => req,
        Err(err) => return bad_request(format!("Failed to deserialize relay request: {err}")),
    };

    info!(
        "Incoming relay request (server={} messages={})",
        req.config.server,
        req.messages.len()
    );

    let outcome = handlers::dispatch_relay(req, &state).await;
    let status = if outcome.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, Json(outcome))
}

fn bad_request(error: String) -> (StatusCode, Json<RelayOutcome>) {
    (StatusCode::BAD_REQUEST, Json(RelayOutcome::Error { error }))
}
