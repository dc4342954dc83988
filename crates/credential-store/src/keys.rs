//! Storage keys for the session credentials

/// Opaque bearer token attached to authenticated requests
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Refresh token issued at login (may be absent)
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Token lifetime in seconds, stored as a decimal string (may be absent)
pub const EXPIRES_IN_KEY: &str = "expiresIn";

/// Every key that makes up a session, in purge order.
pub const CREDENTIAL_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, EXPIRES_IN_KEY];
