//! Authenticated request pipeline for the modam API
//!
//! Decides how outgoing requests are authenticated and how a rejected
//! credential is surfaced to the rest of the app. Transport and storage are
//! collaborators behind traits (`Transport`, `credential_store::CredentialStore`);
//! this crate owns only the policy between them.
//!
//! Per call:
//! 1. `attach_credential` sets `Authorization: Bearer <accessToken>` unless
//!    the request is marked `skip_auth`
//! 2. the transport executes the request
//! 3. on failure, `classify_failure` looks for `error.code == "4032"`
//! 4. on an auth failure the stored session is purged, then the handler in
//!    `AuthFailureNotifier` runs, then the error reaches the caller

pub mod attach;
pub mod classify;
pub mod client;
pub mod http;
pub mod notifier;
pub mod request;
pub mod session;
pub mod transport;

pub use attach::attach_credential;
pub use classify::{AUTH_FAILURE_CODE, FailureClass, classify_failure};
pub use client::AuthClient;
pub use http::HttpTransport;
pub use notifier::{AuthFailHandler, AuthFailureNotifier};
pub use request::RequestContext;
pub use session::{LoginResponse, Seconds, SessionError};
pub use transport::{ApiResponse, Transport, TransportError, TransportFuture};
