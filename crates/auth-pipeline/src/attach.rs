//! Credential attachment step
//!
//! Reads `accessToken` from the store and sets `Authorization: Bearer <token>`
//! on the outgoing request. A store read failure degrades to an
//! unauthenticated request instead of failing the call.

use common::Secret;
use credential_store::{ACCESS_TOKEN_KEY, CredentialStore};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use tracing::{debug, warn};

use crate::request::RequestContext;

/// Attach the stored bearer credential to `request`.
///
/// Other headers set by the caller are left as they are. Returns whether a
/// credential was attached.
pub async fn attach_credential(store: &dyn CredentialStore, request: &mut RequestContext) -> bool {
    if request.skip_auth {
        debug!(path = %request.path, "request marked unauthenticated, not attaching credential");
        return false;
    }

    let token = match store.get(ACCESS_TOKEN_KEY).await {
        Ok(Some(token)) if !token.is_empty() => Secret::new(token),
        Ok(_) => {
            debug!("no access token stored");
            return false;
        }
        Err(e) => {
            warn!(error = %e, "failed to read access token, sending request unauthenticated");
            return false;
        }
    };

    let mut value = match HeaderValue::from_str(&format!("Bearer {}", token.expose_str())) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "stored access token is not a valid header value, skipping");
            return false;
        }
    };
    value.set_sensitive(true);
    request.headers.insert(AUTHORIZATION, value);
    true
}
