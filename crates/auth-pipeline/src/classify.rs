//! Failure classification
//!
//! A failure is an auth failure if and only if the response body carries
//! `error.code == "4032"` as a JSON string. The HTTP status plays no part.

use crate::transport::TransportError;

/// Application error code meaning the presented credential is invalid or expired.
pub const AUTH_FAILURE_CODE: &str = "4032";

/// Outcome of inspecting a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Stored credentials must be purged and the session handler notified
    AuthFailure,
    /// Anything else; surfaced to the caller with no side effects
    Other,
}

/// Classify a failed call.
pub fn classify_failure(error: &TransportError) -> FailureClass {
    match error.error_code() {
        Some(AUTH_FAILURE_CODE) => FailureClass::AuthFailure,
        _ => FailureClass::Other,
    }
}
