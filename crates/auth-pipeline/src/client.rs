//! Authenticated client: attach, dispatch, classify
//!
//! `AuthClient` wraps a `Transport` and composes the three steps for every
//! call:
//! 1. `attach_credential` adds the stored bearer token (unless `skip_auth`)
//! 2. the transport executes the request
//! 3. on failure, `classify_failure` decides whether the credential was
//!    rejected; if so the stored session is purged and the registered handler
//!    is notified, in that order
//!
//! The original failure is always returned to the caller unchanged, after
//! those side effects have completed.

use std::sync::Arc;

use credential_store::{CredentialStore, purge};
use tracing::{debug, instrument, warn};

use crate::attach::attach_credential;
use crate::classify::{FailureClass, classify_failure};
use crate::notifier::AuthFailureNotifier;
use crate::request::RequestContext;
use crate::transport::{ApiResponse, Transport, TransportError};

/// Request pipeline shared by every API call in the app.
///
/// Cheap to clone; clones share the transport, the store and the notifier
/// slot.
#[derive(Clone)]
pub struct AuthClient {
    transport: Arc<dyn Transport>,
    store: Arc<dyn CredentialStore>,
    notifier: AuthFailureNotifier,
}

impl AuthClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
        notifier: AuthFailureNotifier,
    ) -> Self {
        Self {
            transport,
            store,
            notifier,
        }
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Run one request through the pipeline.
    #[instrument(skip_all, fields(request_id = %new_request_id(), method = %request.method, path = %request.path))]
    pub async fn execute(&self, mut request: RequestContext) -> Result<ApiResponse, TransportError> {
        let authenticated = attach_credential(self.store.as_ref(), &mut request).await;
        debug!(authenticated, "dispatching request");

        match self.transport.send(request).await {
            Ok(response) => {
                debug!(status = response.status, "request succeeded");
                Ok(response)
            }
            Err(error) => Err(self.observe_failure(error).await),
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, TransportError> {
        self.execute(RequestContext::get(path)).await
    }

    /// React to a failed call and hand the error back untouched.
    async fn observe_failure(&self, error: TransportError) -> TransportError {
        match classify_failure(&error) {
            FailureClass::AuthFailure => {
                warn!(
                    status = ?error.status(),
                    message = ?error.error_message(),
                    "credential rejected, clearing session"
                );
                let failed = purge(self.store.as_ref()).await;
                if failed > 0 {
                    warn!(failed, "session purge incomplete");
                }
                self.notifier.notify();
            }
            FailureClass::Other => {
                debug!(error = %error, "request failed");
            }
        }
        error
    }
}

fn new_request_id() -> String {
    format!("req_{}", uuid::Uuid::new_v4().simple())
}
