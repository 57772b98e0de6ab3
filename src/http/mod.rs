//! HTTP client module
//!
//! Provides the transport shared by every endpoint call.
//!
//! # Features
//!
//! - **Automatic Retries**: backoff on 429 and connect errors; 5xx and
//!   timeouts are resent only for read-only requests
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Authentication**: Access token attached via the auth module

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
