//! Batch operations over the three session keys

use common::Secret;
use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::error::Result;
use crate::keys::{ACCESS_TOKEN_KEY, CREDENTIAL_KEYS, EXPIRES_IN_KEY, REFRESH_TOKEN_KEY};
use crate::store::CredentialStore;

/// The values written at login.
///
/// Only the access token is required. `Debug` never reveals token text.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialBundle {
    pub access_token: Secret<String>,
    pub refresh_token: Option<Secret<String>>,
    /// Token lifetime in seconds
    pub expires_in: Option<u64>,
}

impl CredentialBundle {
    pub fn new(access_token: impl Into<Secret<String>>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_in: None,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<Secret<String>>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    pub fn with_expires_in(mut self, seconds: u64) -> Self {
        self.expires_in = Some(seconds);
        self
    }
}

/// Write all three keys as one batch.
///
/// Missing or empty optional values are deleted rather than skipped, so a
/// refresh token from an earlier session cannot outlive a new login.
pub async fn save_bundle(store: &dyn CredentialStore, bundle: &CredentialBundle) -> Result<()> {
    let refresh = bundle
        .refresh_token
        .as_ref()
        .filter(|t| !t.is_empty())
        .map(|t| t.expose_str());
    let expires = bundle.expires_in.map(|s| s.to_string());

    let (access, refresh, expires) = tokio::join!(
        store.set(ACCESS_TOKEN_KEY, bundle.access_token.expose_str()),
        set_or_delete(store, REFRESH_TOKEN_KEY, refresh),
        set_or_delete(store, EXPIRES_IN_KEY, expires.as_deref()),
    );
    access?;
    refresh?;
    expires?;

    debug!("saved credential bundle");
    Ok(())
}

async fn set_or_delete(store: &dyn CredentialStore, key: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) => store.set(key, v).await,
        None => store.delete(key).await,
    }
}

/// Read the three keys independently.
///
/// Returns `None` when no usable access token is stored. An `expiresIn` that
/// is not a decimal integer is treated as absent.
pub async fn load_bundle(store: &dyn CredentialStore) -> Result<Option<CredentialBundle>> {
    let (access, refresh, expires) = tokio::join!(
        store.get(ACCESS_TOKEN_KEY),
        store.get(REFRESH_TOKEN_KEY),
        store.get(EXPIRES_IN_KEY),
    );

    let Some(access) = access?.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let refresh_token = refresh?.filter(|t| !t.is_empty()).map(Secret::new);
    let expires_in = match expires? {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) => Some(secs),
            Err(e) => {
                warn!(key = EXPIRES_IN_KEY, error = %e, "ignoring unparsable expiry");
                None
            }
        },
        None => None,
    };

    Ok(Some(CredentialBundle {
        access_token: Secret::new(access),
        refresh_token,
        expires_in,
    }))
}

/// Delete every session key, best-effort.
///
/// The deletes run concurrently and all of them are awaited. Failures are
/// logged and counted but never returned; the count is for callers that want
/// to report it.
pub async fn purge(store: &dyn CredentialStore) -> usize {
    let results = join_all(
        CREDENTIAL_KEYS
            .iter()
            .map(move |&key| async move { (key, store.delete(key).await) }),
    )
    .await;

    let mut failed = 0;
    for (key, result) in results {
        if let Err(e) = result {
            warn!(key, error = %e, "failed to delete credential during purge");
            failed += 1;
        }
    }
    debug!(failed, "purged stored credentials");
    failed
}
