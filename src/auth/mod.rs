//! Authentication module
//!
//! Moloni hands out OAuth2-style access tokens from its `/grant/` endpoint.
//! Supported grants: password, authorization code, refresh token, and a
//! pre-issued static access token.
//!
//! The `Authenticator` caches the token set and refreshes it before expiry.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{CachedToken, EXPIRY_MARGIN_SECS};
