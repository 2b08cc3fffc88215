mod error;
mod http;

pub use error::LookupError;
pub use http::HttpLookupClient;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::aircraft::AircraftUpdate;

const NOT_FOUND_MESSAGE: &str = "No aircraft found";

/// Backend calls made on behalf of the user.
pub trait LookupService: Send + Sync {
    /// Succeeds when the current credentials are accepted.
    fn check_auth(&self) -> impl Future<Output = Result<(), LookupError>> + Send;

    /// Fetches the current snapshot of one aircraft by registration.
    fn lookup(
        &self,
        registration: &str,
    ) -> impl Future<Output = Result<AircraftUpdate, LookupError>> + Send;
}

/// Authentication check followed by the lookup itself.
///
/// Only a rejected session stops the lookup; any other failure of the check
/// is logged and the lookup goes ahead.
pub async fn authenticated_lookup<L: LookupService>(
    service: &L,
    registration: &str,
) -> Result<AircraftUpdate, LookupError> {
    match service.check_auth().await {
        Ok(()) => {}
        Err(LookupError::Unauthorized) => return Err(LookupError::Unauthorized),
        Err(e) => log::warn!("Authentication check failed, looking up anyway: {}", e),
    }
    service.lookup(registration).await
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub search_type: String,
    pub search_value: String,
}

impl LookupRequest {
    pub fn registration(value: &str) -> Self {
        Self {
            search_type: "registration".to_string(),
            search_value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LookupResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<AircraftUpdate>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LookupResponse {
    pub fn into_result(self) -> Result<AircraftUpdate, LookupError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(LookupError::NotFound(
                self.message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Auth check answers with a fixed result; every lookup finds the aircraft.
    struct CheckReturns(fn() -> Result<(), LookupError>);

    impl LookupService for CheckReturns {
        async fn check_auth(&self) -> Result<(), LookupError> {
            (self.0)()
        }

        async fn lookup(&self, registration: &str) -> Result<AircraftUpdate, LookupError> {
            Ok(AircraftUpdate {
                registration: Some(registration.to_string()),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn failing_auth_check_only_stops_on_unauthorized() {
        let flaky = CheckReturns(|| Err(LookupError::Http("HTTP 500".into())));
        let update = authenticated_lookup(&flaky, "N12345").await.unwrap();
        assert_eq!(update.registration.as_deref(), Some("N12345"));

        let rejected = CheckReturns(|| Err(LookupError::Unauthorized));
        assert!(matches!(
            authenticated_lookup(&rejected, "N12345").await,
            Err(LookupError::Unauthorized)
        ));
    }

    #[test]
    fn request_uses_camel_case_fields() {
        let json = serde_json::to_value(LookupRequest::registration("N12345")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"searchType": "registration", "searchValue": "N12345"})
        );
    }

    #[test]
    fn failed_response_without_message_reads_not_found() {
        let response: LookupResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        match response.into_result() {
            Err(LookupError::NotFound(message)) => assert_eq!(message, "No aircraft found"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn success_without_data_is_not_found() {
        let response: LookupResponse =
            serde_json::from_str(r#"{"success": true, "message": "empty"}"#).unwrap();
        assert!(matches!(
            response.into_result(),
            Err(LookupError::NotFound(m)) if m == "empty"
        ));
    }
}
