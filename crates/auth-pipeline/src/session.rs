//! Login and logout on top of the request pipeline
//!
//! Login is the only unauthenticated call: it is sent with `skip_auth`, and
//! the returned tokens are written to the store as one batch. Logout purges
//! the same three keys without notifying the auth failure handler.

use common::Secret;
use credential_store::{ACCESS_TOKEN_KEY, CredentialBundle, purge, save_bundle};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::AuthClient;
use crate::request::RequestContext;
use crate::transport::TransportError;

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("credential store error: {0}")]
    Store(#[from] credential_store::Error),

    #[error("login response did not contain an access token")]
    MissingToken,
}

/// Token payload returned by the login endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: Secret<String>,
    #[serde(default)]
    pub refresh_token: Option<Secret<String>>,
    #[serde(default)]
    pub expires_in: Option<Seconds>,
}

/// Token lifetime as sent by the server: a number or a decimal string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Seconds {
    Number(u64),
    Text(String),
}

impl Seconds {
    pub fn as_secs(&self) -> Option<u64> {
        match self {
            Seconds::Number(n) => Some(*n),
            Seconds::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl LoginResponse {
    /// Convert into the bundle written to the store.
    pub fn into_bundle(self) -> Result<CredentialBundle, SessionError> {
        if self.access_token.is_empty() {
            return Err(SessionError::MissingToken);
        }
        let expires_in = match &self.expires_in {
            Some(raw) => {
                let secs = raw.as_secs();
                if secs.is_none() {
                    warn!(raw = ?raw, "login response expiry is not an integer, dropping it");
                }
                secs
            }
            None => None,
        };
        Ok(CredentialBundle {
            access_token: self.access_token,
            refresh_token: self.refresh_token.filter(|t| !t.is_empty()),
            expires_in,
        })
    }
}

impl AuthClient {
    /// Log in and persist the returned tokens.
    ///
    /// `credentials` is serialized as the JSON body of an unauthenticated POST
    /// to `path`.
    pub async fn login<B: Serialize + ?Sized>(
        &self,
        path: &str,
        credentials: &B,
    ) -> Result<CredentialBundle, SessionError> {
        let body = serde_json::to_value(credentials)
            .map_err(|e| TransportError::Request(format!("encoding login body: {e}")))?;
        let response = self
            .execute(RequestContext::post(path).json(body).without_auth())
            .await?;
        let bundle = response.json::<LoginResponse>()?.into_bundle()?;

        save_bundle(self.store().as_ref(), &bundle).await?;
        info!(
            has_refresh_token = bundle.refresh_token.is_some(),
            expires_in = ?bundle.expires_in,
            "logged in"
        );
        Ok(bundle)
    }

    /// Remove the stored session. Returns how many deletes failed.
    pub async fn logout(&self) -> usize {
        let failed = purge(self.store().as_ref()).await;
        info!(failed, "logged out");
        failed
    }

    /// Whether an access token is currently stored.
    ///
    /// A store read error counts as signed out.
    pub async fn is_authenticated(&self) -> bool {
        match self.store().get(ACCESS_TOKEN_KEY).await {
            Ok(Some(token)) => !token.is_empty(),
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "failed to read access token");
                false
            }
        }
    }
}
