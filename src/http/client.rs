//! POST transport with retry and rate limiting
//!
//! Every Moloni call is a POST. Failures that prove the request never reached
//! the API (429, connect errors, a rejected token) are always resent. Server
//! errors and timeouts are resent only for read-only requests, since a write
//! may already have been committed.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::Authenticator;
use crate::error::{Error, Result};
use crate::types::BackoffType;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Transport settings, built from [`HttpSettings`](crate::config::HttpSettings)
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Prefix joined to every request path
    pub base_url: String,
    pub timeout: Duration,
    /// Resends after the first attempt
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_type: BackoffType,
    /// `None` disables client-side throttling
    pub rate_limit: Option<RateLimiterConfig>,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: crate::config::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(10),
            backoff_type: BackoffType::Exponential,
            rate_limit: Some(RateLimiterConfig::default()),
            user_agent: format!("moloni-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// One POST: query string, JSON body, and whether it may be resent
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Resend on 5xx and timeouts
    pub read_only: bool,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// HTTP client with retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Option<Arc<Authenticator>>,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            authenticator: None,
            rate_limiter,
        })
    }

    /// Attach `access_token` to every request through this authenticator
    pub fn set_authenticator(&mut self, authenticator: Arc<Authenticator>) {
        self.authenticator = Some(authenticator);
    }

    /// Underlying reqwest client, shared with the token grant
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// POST `path` (relative to the base URL), retrying what is safe to retry
    pub async fn post(&self, path: &str, request: RequestConfig) -> Result<Response> {
        let url = self.build_url(path);
        let max_retries = self.config.max_retries;

        let mut attempt = 0;
        let mut token_refreshed = false;

        loop {
            if let Some(limiter) = &self.rate_limiter {
                limiter.wait().await;
            }

            let mut req = self
                .client
                .post(&url)
                .query(&request.query)
                .timeout(self.config.timeout);
            if let Some(body) = &request.body {
                req = req.json(body);
            }
            if let Some(auth) = &self.authenticator {
                req = auth.apply(req).await?;
            }

            let can_retry = attempt < max_retries;
            let failure = match req.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        debug!("POST {path} -> {}", status.as_u16());
                        return Ok(response);
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let wait = retry_after_secs(&response);
                        if !can_retry {
                            return Err(Error::RateLimited {
                                retry_after_seconds: wait,
                            });
                        }
                        warn!(
                            "POST {path} rate limited, attempt {}/{}, waiting {wait}s",
                            attempt + 1,
                            max_retries + 1
                        );
                        tokio::time::sleep(Duration::from_secs(wait)).await;
                        attempt += 1;
                        continue;
                    }

                    // A rejected token gets one forced refresh
                    if status == StatusCode::UNAUTHORIZED && !token_refreshed && can_retry {
                        if let Some(auth) = &self.authenticator {
                            if auth.invalidate().await {
                                warn!("POST {path}: access token rejected (401), refreshing");
                                token_refreshed = true;
                                attempt += 1;
                                continue;
                            }
                        }
                    }

                    let body = response.text().await.unwrap_or_default();
                    let error = Error::http_status(status.as_u16(), body);
                    if !(request.read_only && is_server_error(status)) {
                        return Err(error);
                    }
                    error
                }
                Err(e) if e.is_connect() => Error::Http(e),
                Err(e) if e.is_timeout() => {
                    let error = Error::Timeout {
                        timeout_ms: self.config.timeout.as_millis() as u64,
                    };
                    if !request.read_only {
                        return Err(error);
                    }
                    error
                }
                Err(e) => return Err(Error::Http(e)),
            };

            if !can_retry {
                return Err(failure);
            }
            let delay = self.calculate_backoff(attempt);
            warn!(
                "POST {path} failed ({failure}), attempt {}/{}, retrying in {delay:?}",
                attempt + 1,
                max_retries + 1
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    pub(crate) fn build_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    pub(crate) fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => self
                .config
                .initial_backoff
                .saturating_mul(2u32.saturating_pow(attempt)),
        };

        delay.min(self.config.max_backoff)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_authenticator", &self.authenticator.is_some())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Gateway and origin failures, including Cloudflare's 52x range
fn is_server_error(status: StatusCode) -> bool {
    matches!(
        status.as_u16(),
        500 | 502 | 503 | 504 | 520 | 521 | 522 | 523 | 524
    )
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(60)
}
