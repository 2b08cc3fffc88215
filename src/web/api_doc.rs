use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

use super::api::error::ErrorResponse;
use super::api::session::SearchRequest;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::session::search,
        super::api::session::stop,
        super::api::session::status,
        super::api::view::pan,
        super::api::view::center,
        super::api::view::zoom_to_radius,
        super::api::view::reset_zoom,
        super::api::view::full_trail,
        super::api::view::mode,
        super::api::view::trail,
        super::api::view::map,
    ),
    components(
        schemas(
            SearchRequest,
            ErrorResponse,
            crate::session::StatusSnapshot,
            crate::session::ControllerStatus,
            crate::session::Session,
            crate::render::MapState,
            crate::render::PanelState,
            crate::render::AttributePanel,
            crate::view::ViewMode,
            crate::view::Position,
            crate::view::LatLng,
            crate::view::Bounds,
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Planewatch Control API",
        description = "API for steering and inspecting a live aircraft tracking session",
        version = "0.1.0"
    ),
    tags(
        (name = "session", description = "Tracking session lifecycle"),
        (name = "view", description = "Map view controls")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
