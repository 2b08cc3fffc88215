use axum::{extract::State, http::StatusCode, Json};

use crate::render::MapState;
use crate::session::UserCommand;
use crate::view::{Position, ViewMode};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::auth::{AppState, Authorized, Control, ViewStatus};

fn queue(
    state: &AppState,
    caller: &Authorized<Control>,
    command: UserCommand,
) -> ApiResult<StatusCode> {
    log::debug!("{} sent {}", caller.name, command);
    state.runner.send(command)?;
    Ok(StatusCode::ACCEPTED)
}

#[utoipa::path(
    post,
    path = "/api/view/pan",
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 202, description = "Manual pan reported"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing permission", body = ErrorResponse),
        (status = 503, description = "Controller stopped", body = ErrorResponse)
    ),
    tag = "view"
)]
pub async fn pan(
    State(state): State<AppState>,
    caller: Authorized<Control>,
) -> ApiResult<StatusCode> {
    queue(&state, &caller, UserCommand::Pan)
}

#[utoipa::path(
    post,
    path = "/api/view/center",
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 202, description = "Center on aircraft queued"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing permission", body = ErrorResponse),
        (status = 503, description = "Controller stopped", body = ErrorResponse)
    ),
    tag = "view"
)]
pub async fn center(
    State(state): State<AppState>,
    caller: Authorized<Control>,
) -> ApiResult<StatusCode> {
    queue(&state, &caller, UserCommand::CenterOnEntity)
}

#[utoipa::path(
    post,
    path = "/api/view/zoom_to_radius",
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 202, description = "Zoom to radius queued"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing permission", body = ErrorResponse),
        (status = 503, description = "Controller stopped", body = ErrorResponse)
    ),
    tag = "view"
)]
pub async fn zoom_to_radius(
    State(state): State<AppState>,
    caller: Authorized<Control>,
) -> ApiResult<StatusCode> {
    queue(&state, &caller, UserCommand::ZoomToRadius)
}

#[utoipa::path(
    post,
    path = "/api/view/reset_zoom",
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 202, description = "Reset zoom queued"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing permission", body = ErrorResponse),
        (status = 503, description = "Controller stopped", body = ErrorResponse)
    ),
    tag = "view"
)]
pub async fn reset_zoom(
    State(state): State<AppState>,
    caller: Authorized<Control>,
) -> ApiResult<StatusCode> {
    queue(&state, &caller, UserCommand::ResetZoom)
}

#[utoipa::path(
    post,
    path = "/api/view/full_trail",
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 202, description = "Full trail toggle queued"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing permission", body = ErrorResponse),
        (status = 503, description = "Controller stopped", body = ErrorResponse)
    ),
    tag = "view"
)]
pub async fn full_trail(
    State(state): State<AppState>,
    caller: Authorized<Control>,
) -> ApiResult<StatusCode> {
    queue(&state, &caller, UserCommand::ToggleFullTrail)
}

#[utoipa::path(
    get,
    path = "/api/view/mode",
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 200, description = "Current view mode", body = ViewMode),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing permission", body = ErrorResponse)
    ),
    tag = "view"
)]
pub async fn mode(
    State(state): State<AppState>,
    _caller: Authorized<ViewStatus>,
) -> ApiResult<Json<ViewMode>> {
    Ok(Json(state.runner.status().tracking.mode))
}

#[utoipa::path(
    get,
    path = "/api/view/trail",
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 200, description = "Positions of the current trail, oldest first", body = Vec<Position>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing permission", body = ErrorResponse)
    ),
    tag = "view"
)]
pub async fn trail(
    State(state): State<AppState>,
    _caller: Authorized<ViewStatus>,
) -> ApiResult<Json<Vec<Position>>> {
    Ok(Json(state.runner.status().tracking.trail))
}

#[utoipa::path(
    get,
    path = "/api/view/map",
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 200, description = "Last rendered map state", body = MapState),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing permission", body = ErrorResponse)
    ),
    tag = "view"
)]
pub async fn map(
    State(state): State<AppState>,
    _caller: Authorized<ViewStatus>,
) -> ApiResult<Json<MapState>> {
    Ok(Json(state.runner.status().map))
}
