//! Authenticator implementation
//!
//! Obtains tokens from the grant endpoint, caches them, and attaches the
//! current access token to outgoing requests.

use super::types::{grant_error_message, CachedToken, TokenResponse};
use crate::config::{AuthGrant, MoloniConfig};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use reqwest::{Client, RequestBuilder};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Authenticator handles applying authentication to HTTP requests
pub struct Authenticator {
    /// Full URL of the grant endpoint
    grant_url: String,
    client_id: String,
    client_secret: String,
    /// How the first token is obtained
    grant: AuthGrant,
    /// Cached token set
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl Authenticator {
    /// Create a new authenticator from the client config
    pub fn new(config: &MoloniConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Create an authenticator with a custom HTTP client
    pub fn with_client(config: &MoloniConfig, http_client: Client) -> Self {
        Self {
            grant_url: config.grant_url(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            grant: config.auth.clone(),
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Attach the access token to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.access_token().await?;
        Ok(req.query(&[("access_token", token)]))
    }

    /// Current access token, refreshing it if necessary
    pub async fn access_token(&self) -> Result<String> {
        Ok(self.token().await?.access_token)
    }

    /// Current token set, refreshing it if necessary
    pub async fn token(&self) -> Result<CachedToken> {
        // Check if we have a valid cached token
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.clone());
            }
        }

        let new_token = self.fetch_new_token(cached.as_ref()).await?;
        *cached = Some(new_token.clone());

        Ok(new_token)
    }

    /// Mark the cached access token as unusable, keeping its refresh token.
    ///
    /// Returns false when a new token cannot be obtained (static tokens).
    pub async fn invalidate(&self) -> bool {
        if matches!(self.grant, AuthGrant::AccessToken { .. }) {
            return false;
        }

        let mut cached = self.cached_token.write().await;
        if let Some(token) = cached.as_mut() {
            debug!("Invalidating cached access token");
            token.expires_at = Some(chrono::DateTime::<chrono::Utc>::MIN_UTC);
        }
        true
    }

    /// Clear the cached token entirely
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    /// Seed the cache with a known token set
    pub async fn set_token(&self, token: CachedToken) {
        let mut cached = self.cached_token.write().await;
        *cached = Some(token);
    }

    /// Get the configured grant
    pub fn grant(&self) -> &AuthGrant {
        &self.grant
    }

    /// Obtain a new token: refresh grant first when possible, then the
    /// configured grant
    async fn fetch_new_token(&self, previous: Option<&CachedToken>) -> Result<CachedToken> {
        if let Some(refresh_token) = previous.and_then(|t| t.refresh_token.as_deref()) {
            match self.refresh(refresh_token).await {
                Ok(token) => return Ok(token),
                Err(e) => warn!("Token refresh failed, requesting a new grant: {e}"),
            }
        }

        match &self.grant {
            AuthGrant::None => Err(Error::auth("No authentication grant configured")),

            AuthGrant::AccessToken { access_token } => {
                Ok(CachedToken::static_token(access_token.clone()))
            }

            AuthGrant::Password { username, password } => {
                info!("Requesting access token with password grant");
                self.request_grant(&[
                    ("grant_type", "password"),
                    ("client_id", self.client_id.as_str()),
                    ("client_secret", self.client_secret.as_str()),
                    ("username", username.as_str()),
                    ("password", password.as_str()),
                ])
                .await
                .map_err(into_auth_error)
            }

            AuthGrant::AuthorizationCode { code, redirect_uri } => {
                info!("Requesting access token with authorization code grant");
                self.request_grant(&[
                    ("grant_type", "authorization_code"),
                    ("client_id", self.client_id.as_str()),
                    ("client_secret", self.client_secret.as_str()),
                    ("redirect_uri", redirect_uri.as_str()),
                    ("code", code.as_str()),
                ])
                .await
                .map_err(into_auth_error)
            }

            AuthGrant::RefreshToken { refresh_token } => self.refresh(refresh_token).await,
        }
    }

    /// Exchange a refresh token for a new token set
    async fn refresh(&self, refresh_token: &str) -> Result<CachedToken> {
        info!("Refreshing access token");
        self.request_grant(&[
            ("grant_type", "refresh_token"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
        ])
        .await
        .map_err(|e| match e {
            Error::Auth { message } => Error::TokenRefresh { message },
            other => other,
        })
    }

    /// Call the grant endpoint
    async fn request_grant(&self, params: &[(&str, &str)]) -> Result<CachedToken> {
        let response = self
            .http_client
            .get(&self.grant_url)
            .query(params)
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        let text = response.text().await.map_err(Error::Http)?;
        let body: Option<JsonValue> = serde_json::from_str(&text).ok();

        if let Some(message) = body.as_ref().and_then(grant_error_message) {
            return Err(Error::auth(message));
        }

        if !status.is_success() {
            return Err(Error::auth(format!(
                "Grant request failed with status {}: {text}",
                status.as_u16()
            )));
        }

        let body = body.ok_or_else(|| Error::auth("Grant response is not JSON"))?;
        let token: TokenResponse = serde_json::from_value(body)
            .map_err(|e| Error::auth(format!("Unexpected grant response: {e}")))?;

        debug!("Access token granted, expires_in={:?}", token.expires_in);
        Ok(token.into_cached_token())
    }
}

/// Transport failures during a grant are reported as auth failures
fn into_auth_error(e: Error) -> Error {
    match e {
        Error::Http(e) => Error::auth(format!("Grant request failed: {e}")),
        other => other,
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("grant_url", &self.grant_url)
            .field("client_id", &self.client_id)
            .field("grant", &self.grant)
            .finish_non_exhaustive()
    }
}
