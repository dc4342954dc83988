//! Credential storage for the modam session
//!
//! The session is three independently stored string values keyed by
//! [`ACCESS_TOKEN_KEY`], [`REFRESH_TOKEN_KEY`] and [`EXPIRES_IN_KEY`]. There is
//! no composite record on disk: a stored access token without a refresh token
//! is a valid state.
//!
//! Lifecycle:
//! 1. Login writes all three keys as a batch via [`save_bundle`]
//! 2. Every outgoing request reads `accessToken` through [`CredentialStore::get`]
//! 3. Logout or a detected auth failure removes all three via [`purge`]

pub mod bundle;
pub mod error;
pub mod file;
pub mod keys;
pub mod memory;
pub mod store;

pub use bundle::{CredentialBundle, load_bundle, purge, save_bundle};
pub use error::{Error, Result};
pub use file::FileStore;
pub use keys::{ACCESS_TOKEN_KEY, CREDENTIAL_KEYS, EXPIRES_IN_KEY, REFRESH_TOKEN_KEY};
pub use memory::MemoryStore;
pub use store::{CredentialStore, StoreFuture};
