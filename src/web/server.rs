use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::session::RunnerHandle;

use super::api::session as session_handlers;
use super::api::view as view_handlers;
use super::api_doc::ApiDoc;
use super::auth::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Session endpoints
        .route("/api/session/search", post(session_handlers::search))
        .route("/api/session/stop", post(session_handlers::stop))
        .route("/api/status", get(session_handlers::status))
        // View controls
        .route("/api/view/pan", post(view_handlers::pan))
        .route("/api/view/center", post(view_handlers::center))
        .route(
            "/api/view/zoom_to_radius",
            post(view_handlers::zoom_to_radius),
        )
        .route("/api/view/reset_zoom", post(view_handlers::reset_zoom))
        .route("/api/view/full_trail", post(view_handlers::full_trail))
        .route("/api/view/mode", get(view_handlers::mode))
        .route("/api/view/trail", get(view_handlers::trail))
        .route("/api/view/map", get(view_handlers::map))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Arc<Config>, runner: RunnerHandle) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let app = router(AppState { config, runner });

    log::info!("Starting control API on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}
