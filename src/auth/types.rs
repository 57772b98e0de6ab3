//! Token types
//!
//! The grant endpoint answers with an OAuth2-style token document; the
//! authenticator keeps it as a `CachedToken` until it is about to expire.

use crate::types::JsonValue;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use std::fmt;

/// Tokens are treated as expired this many seconds early
pub const EXPIRY_MARGIN_SECS: i64 = 30;

/// Cached token set with expiration
#[derive(Clone)]
pub struct CachedToken {
    /// The access token
    pub access_token: String,
    /// Token for the refresh grant, when the API issued one
    pub refresh_token: Option<String>,
    /// When the access token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            expires_at,
        }
    }

    /// A token that never expires (statically configured)
    pub fn static_token(access_token: impl Into<String>) -> Self {
        Self::new(access_token, None, None)
    }

    /// Create a token that expires in N seconds from now.
    ///
    /// Non-positive lifetimes are already expired; lifetimes beyond chrono's
    /// range are treated as unbounded.
    pub fn expires_in(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        seconds: i64,
    ) -> Self {
        let now = Utc::now();
        let expires_at = if seconds <= 0 {
            Some(now)
        } else {
            TimeDelta::try_seconds(seconds).and_then(|lifetime| now.checked_add_signed(lifetime))
        };
        Self::new(access_token, refresh_token, expires_at)
    }

    /// Check if the access token is expired (with a safety margin)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                Utc::now() + chrono::Duration::seconds(EXPIRY_MARGIN_SECS) >= expires_at
            }
            None => false,
        }
    }

    /// Seconds until expiry, if known
    pub fn remaining_secs(&self) -> Option<i64> {
        self.expires_at
            .map(|at| (at - Utc::now()).num_seconds().max(0))
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Body returned by `/grant/`
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default, deserialize_with = "crate::types::de::option_i64")]
    pub expires_in: Option<i64>,
    #[serde(default)]
    #[allow(dead_code)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenResponse {
    pub(crate) fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, self.refresh_token, secs),
            None => CachedToken::new(self.access_token, self.refresh_token, None),
        }
    }
}

/// Error body returned by `/grant/` (`{"error": ..., "error_description": ...}`)
pub(crate) fn grant_error_message(body: &JsonValue) -> Option<String> {
    let error = body.get("error")?.as_str()?;
    match body.get("error_description").and_then(JsonValue::as_str) {
        Some(description) => Some(format!("{error}: {description}")),
        None => Some(error.to_string()),
    }
}
