use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::marker::PhantomData;
use std::sync::Arc;

use super::api::error::ErrorResponse;
use crate::config::{Config, Permission};
use crate::session::RunnerHandle;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub runner: RunnerHandle,
}

/// Permission an extractor demands of the caller's API key.
pub trait Scope: Send + Sync + 'static {
    const PERMISSION: Permission;
}

/// May steer the session and the map.
pub struct Control;

impl Scope for Control {
    const PERMISSION: Permission = Permission::Control;
}

/// May read the published status.
pub struct ViewStatus;

impl Scope for ViewStatus {
    const PERMISSION: Permission = Permission::ViewStatus;
}

/// A caller whose bearer key carries the permission of `S`.
pub struct Authorized<S> {
    pub name: String,
    scope: PhantomData<S>,
}

#[derive(Debug, PartialEq)]
pub enum AuthError {
    MissingAuth,
    InvalidFormat,
    InvalidKey,
    Forbidden(Permission),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AuthError::MissingAuth => (StatusCode::UNAUTHORIZED, "Missing Authorization header"),
            AuthError::InvalidFormat => (StatusCode::UNAUTHORIZED, "Invalid Authorization format"),
            AuthError::InvalidKey => (StatusCode::UNAUTHORIZED, "Invalid API key"),
            AuthError::Forbidden(_) => (StatusCode::FORBIDDEN, "Insufficient permissions"),
        };
        (status, Json(ErrorResponse::new(error))).into_response()
    }
}

/// Resolves a bearer header against the configured keys and checks `permission`.
fn authorize(
    config: &Config,
    header: Option<&str>,
    permission: Permission,
) -> Result<String, AuthError> {
    let key = header
        .ok_or(AuthError::MissingAuth)?
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?;

    let api_key = config.find_api_key(key).ok_or(AuthError::InvalidKey)?;
    if !api_key.permissions.contains(&permission) {
        log::warn!("{} lacks {:?} permission", api_key.name, permission);
        return Err(AuthError::Forbidden(permission));
    }
    Ok(api_key.name.clone())
}

impl<S: Scope> FromRequestParts<AppState> for Authorized<S> {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(header::AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| AuthError::InvalidFormat)?),
            None => None,
        };

        Ok(Authorized {
            name: authorize(&state.config, header, S::PERMISSION)?,
            scope: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::from_yaml(
            "backend:\n  base_url: http://localhost\napi_keys:\n  - key: k1\n    name: viewer\n    permissions: [view_status]\n",
        )
        .unwrap()
    }

    #[test]
    fn key_must_carry_the_scope_permission() {
        let config = config();
        assert_eq!(
            authorize(&config, Some("Bearer k1"), Permission::ViewStatus),
            Ok("viewer".to_string())
        );
        assert_eq!(
            authorize(&config, Some("Bearer k1"), Permission::Control),
            Err(AuthError::Forbidden(Permission::Control))
        );
    }

    #[test]
    fn malformed_headers_are_rejected() {
        let config = config();
        assert_eq!(
            authorize(&config, None, Permission::ViewStatus),
            Err(AuthError::MissingAuth)
        );
        assert_eq!(
            authorize(&config, Some("k1"), Permission::ViewStatus),
            Err(AuthError::InvalidFormat)
        );
        assert_eq!(
            authorize(&config, Some("Bearer k2"), Permission::ViewStatus),
            Err(AuthError::InvalidKey)
        );
    }
}
