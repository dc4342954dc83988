//! The credential store contract
//!
//! Backends are asynchronous and every operation may fail independently.
//! Keys are plain strings; the store enforces no namespacing.

use std::future::Future;
use std::pin::Pin;

use crate::error::Result;

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Asynchronous key-value store holding session credentials.
///
/// Uses `Pin<Box<dyn Future>>` return types so the store can be shared as
/// `Arc<dyn CredentialStore>` between the request pipeline and the session
/// helpers.
pub trait CredentialStore: Send + Sync {
    /// Read a value. `Ok(None)` means the key is absent.
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>>;

    /// Write a value, replacing any previous one.
    fn set<'a>(&'a self, key: &'a str, value: &'a str) -> StoreFuture<'a, ()>;

    /// Remove a value. Deleting an absent key succeeds.
    fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()>;
}
