use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::session::{StatusSnapshot, UserCommand};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::auth::{AppState, Authorized, Control, ViewStatus};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    /// Tail number, e.g. `N12345`.
    pub registration: String,
}

#[utoipa::path(
    post,
    path = "/api/session/search",
    request_body = SearchRequest,
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 202, description = "Search queued"),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing permission", body = ErrorResponse),
        (status = 503, description = "Controller stopped", body = ErrorResponse)
    ),
    tag = "session"
)]
pub async fn search(
    State(state): State<AppState>,
    caller: Authorized<Control>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<StatusCode> {
    let registration = request.registration.trim();
    if registration.is_empty() {
        return Err(ApiError::Validation(
            "registration must not be empty".to_string(),
        ));
    }

    log::info!("{} requested tracking of {}", caller.name, registration);
    state
        .runner
        .send(UserCommand::Search(registration.to_string()))?;
    Ok(StatusCode::ACCEPTED)
}

#[utoipa::path(
    post,
    path = "/api/session/stop",
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 202, description = "Stop queued"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing permission", body = ErrorResponse),
        (status = 503, description = "Controller stopped", body = ErrorResponse)
    ),
    tag = "session"
)]
pub async fn stop(
    State(state): State<AppState>,
    _caller: Authorized<Control>,
) -> ApiResult<StatusCode> {
    state.runner.send(UserCommand::Stop)?;
    Ok(StatusCode::ACCEPTED)
}

#[utoipa::path(
    get,
    path = "/api/status",
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 200, description = "Session, map and panel state", body = StatusSnapshot),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing permission", body = ErrorResponse)
    ),
    tag = "session"
)]
pub async fn status(
    State(state): State<AppState>,
    _caller: Authorized<ViewStatus>,
) -> ApiResult<Json<StatusSnapshot>> {
    Ok(Json(state.runner.status()))
}
