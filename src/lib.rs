// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Moloni API client
//!
//! Typed async bindings for the Moloni invoicing REST API.
//!
//! ## Features
//!
//! - **Token grants**: password and refresh grants, or a static access token
//! - **Typed resources**: customers, products, invoices, receipts, taxes and more
//! - **Request validation**: models are checked before any network call
//! - **Error envelopes**: `valid: 0`, OAuth and error-array bodies become [`Error::Api`]
//! - **Pagination**: `qty`/`offset` pages walked until a short page
//! - **Retry and rate limiting**: backoff on transient failures
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use moloni::{MoloniClient, MoloniConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = MoloniConfig::with_password("client-id", "secret", "user@example.com", "pw");
//!     let client = MoloniClient::new(config)?;
//!
//!     for company in client.companies().get_all().await? {
//!         let count = client.customers().count(company.company_id).await?;
//!         println!("{}: {count} customers", company.name);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Resource handles (client.customers(), ...)      │
//! │        typed request models  →  Validate  →  typed responses    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │   Paginate    │ Endpoints │  Responses  │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Password │ POST      │ qty/offset    │ Registry  │ Envelopes   │
//! │ Refresh  │ Retry     │ Record cap    │ Templates │ Count/Ids   │
//! │ Static   │ Rate Limit│               │           │ Not found   │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and serde helpers
pub mod types;

/// Token grants and caching
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Offset pagination
pub mod pagination;

/// Request model validation
pub mod validate;

/// Client configuration
pub mod config;

/// Endpoint path templates
pub mod template;

/// Base request dispatch
pub mod client;

/// Endpoint bindings per resource
pub mod resources;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::MoloniClient;
pub use config::{AuthGrant, HttpSettings, MoloniConfig};
pub use error::{Error, Result};
pub use pagination::{Page, Paginated};
pub use resources::Endpoint;
pub use types::{Id, JsonValue};
pub use validate::Validate;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
