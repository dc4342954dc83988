//! Transport contract consumed by the pipeline
//!
//! A transport executes one `RequestContext` and either yields the response
//! body or fails with a `TransportError`. Non-2xx responses are failures that
//! carry the status and, when present, the decoded body.

use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;

use crate::request::RequestContext;

/// Boxed future returned by [`Transport::send`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + Send + 'a>>;

/// Executes requests on behalf of the pipeline.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
/// (`Arc<dyn Transport>`), so tests can substitute scripted transports.
pub trait Transport: Send + Sync {
    fn send(&self, request: RequestContext) -> TransportFuture<'_>;
}

/// Successful (2xx) response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Decoded JSON body; `Null` when the body was empty
    pub body: serde_json::Value,
}

impl ApiResponse {
    /// Decode the body into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| TransportError::Decode(format!("unexpected response shape: {e}")))
    }
}

/// A failed call.
///
/// Only `Status` carries a server response; every other variant means no
/// response was received or it could not be read.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("server responded with status {status}")]
    Status {
        status: u16,
        body: Option<serde_json::Value>,
    },

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl TransportError {
    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body of the failed response, if one was received.
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            TransportError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Application error code from a `{"error": {"code": "..."}}` body.
    ///
    /// Only string codes are returned; a numeric code yields `None`.
    pub fn error_code(&self) -> Option<&str> {
        self.body()?.get("error")?.get("code")?.as_str()
    }

    /// Application error message from a `{"error": {"message": "..."}}` body.
    pub fn error_message(&self) -> Option<&str> {
        self.body()?.get("error")?.get("message")?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_error_exposes_code_and_message() {
        let err = TransportError::Status {
            status: 403,
            body: Some(json!({"error": {"code": "4032", "message": "TOKEN_MALFORMED"}})),
        };
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.error_code(), Some("4032"));
        assert_eq!(err.error_message(), Some("TOKEN_MALFORMED"));
        assert_eq!(err.to_string(), "server responded with status 403");
    }

    #[test]
    fn numeric_code_is_not_a_string_code() {
        let err = TransportError::Status {
            status: 403,
            body: Some(json!({"error": {"code": 4032}})),
        };
        assert_eq!(err.error_code(), None);
    }

    #[test]
    fn transport_level_errors_have_no_response() {
        let err = TransportError::Timeout("after 10s".into());
        assert_eq!(err.status(), None);
        assert!(err.body().is_none());
        assert!(err.error_code().is_none());
        assert!(err.to_string().contains("after 10s"));
    }

    #[test]
    fn response_decodes_typed_body() {
        #[derive(serde::Deserialize)]
        struct Streak {
            days: u32,
        }
        let response = ApiResponse {
            status: 200,
            body: json!({"days": 12}),
        };
        assert_eq!(response.json::<Streak>().unwrap().days, 12);

        let err = response.json::<Vec<String>>().unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }
}
