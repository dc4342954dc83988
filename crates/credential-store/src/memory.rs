//! In-process credential store

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::debug;

use crate::store::{CredentialStore, StoreFuture};

/// Credential store backed by a `HashMap`. Never fails; nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let state = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            state: Mutex::new(state),
        }
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.state.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl CredentialStore for MemoryStore {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move { Ok(self.state.lock().await.get(key).cloned()) })
    }

    fn set<'a>(&'a self, key: &'a str, value: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.state
                .lock()
                .await
                .insert(key.to_owned(), value.to_owned());
            debug!(key, "stored credential");
            Ok(())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            if self.state.lock().await.remove(key).is_some() {
                debug!(key, "deleted credential");
            }
            Ok(())
        })
    }
}
