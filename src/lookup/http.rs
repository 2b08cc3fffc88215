use reqwest::{header, Method, RequestBuilder, StatusCode};

use super::error::LookupError;
use super::{LookupRequest, LookupResponse, LookupService};
use crate::aircraft::AircraftUpdate;

const CHECK_AUTH_PATH: &str = "/api/check_auth";
const LOOKUP_PATH: &str = "/api/aircraft";
const USER_AGENT: &str = concat!("planewatch/", env!("CARGO_PKG_VERSION"));

/// Lookup client for the tracking backend's JSON API.
#[derive(Clone)]
pub struct HttpLookupClient {
    client: reqwest::Client,
    base_url: String,
    cookie: Option<String>,
}

impl HttpLookupClient {
    pub fn new(base_url: &str, cookie: Option<String>) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LookupError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }
}

impl LookupService for HttpLookupClient {
    async fn check_auth(&self) -> Result<(), LookupError> {
        let response = self
            .request(Method::GET, CHECK_AUTH_PATH)
            .send()
            .await
            .map_err(|e| LookupError::Http(format!("Request failed: {}", e)))?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(LookupError::Unauthorized),
            status if status.is_success() => Ok(()),
            status => Err(LookupError::Http(format!(
                "HTTP {} from {}",
                status, CHECK_AUTH_PATH
            ))),
        }
    }

    async fn lookup(&self, registration: &str) -> Result<AircraftUpdate, LookupError> {
        log::debug!("Looking up {}", registration);
        let response = self
            .request(Method::POST, LOOKUP_PATH)
            .json(&LookupRequest::registration(registration))
            .send()
            .await
            .map_err(|e| LookupError::Http(format!("Request failed: {}", e)))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(LookupError::Unauthorized);
        }

        // Failures still carry a JSON body with `success: false`, even on 5xx.
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Http(format!("Failed to read response: {}", e)))?;
        let reply: LookupResponse = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                LookupError::Decode(e.to_string())
            } else {
                LookupError::Http(format!("HTTP {} from {}", status, LOOKUP_PATH))
            }
        })?;

        reply.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::authenticated_lookup;
    use axum::{http::StatusCode as AxumStatus, routing::get, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn backend(authenticated: bool) -> String {
        let app = Router::new()
            .route(
                "/api/check_auth",
                get(move || async move {
                    if authenticated {
                        (AxumStatus::OK, Json(json!({"authenticated": true})))
                    } else {
                        (AxumStatus::UNAUTHORIZED, Json(json!({"authenticated": false})))
                    }
                }),
            )
            .route(
                "/api/aircraft",
                post(|Json(body): Json<Value>| async move {
                    match body["searchValue"].as_str() {
                        Some("N12345") => (
                            AxumStatus::OK,
                            Json(json!({"success": true, "data": {"r": "N12345", "lat": 40.0, "lon": -74.0}})),
                        ),
                        Some("BROKEN") => (
                            AxumStatus::INTERNAL_SERVER_ERROR,
                            Json(json!({"success": false, "message": "upstream timeout"})),
                        ),
                        _ => (
                            AxumStatus::OK,
                            Json(json!({"success": false, "message": "No aircraft found. The aircraft may not be airborne."})),
                        ),
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn finds_aircraft_after_auth_check() {
        let client = HttpLookupClient::new(&backend(true).await, None).unwrap();
        let update = authenticated_lookup(&client, "N12345").await.unwrap();
        assert_eq!(update.registration.as_deref(), Some("N12345"));
        assert_eq!(update.lat, Some(40.0));
    }

    #[tokio::test]
    async fn unauthenticated_session_is_reported() {
        let client = HttpLookupClient::new(&backend(false).await, None).unwrap();
        assert!(matches!(
            authenticated_lookup(&client, "N12345").await,
            Err(LookupError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn failure_messages_come_from_the_backend() {
        let client = HttpLookupClient::new(&backend(true).await, None).unwrap();

        match client.lookup("N00000").await {
            Err(LookupError::NotFound(message)) => assert!(message.starts_with("No aircraft found")),
            other => panic!("unexpected {other:?}"),
        }
        match client.lookup("BROKEN").await {
            Err(LookupError::NotFound(message)) => assert_eq!(message, "upstream timeout"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_backend_is_an_http_error() {
        let client = HttpLookupClient::new("http://127.0.0.1:9", None).unwrap();
        assert!(matches!(client.check_auth().await, Err(LookupError::Http(_))));
    }
}
