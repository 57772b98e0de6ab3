//! CLI module
//!
//! Command-line interface over the Moloni client.
//!
//! # Commands
//!
//! - `token` - Obtain an access token
//! - `endpoints` - List bound endpoints
//! - `companies` - List accessible companies
//! - `call` - Call any bound endpoint with raw JSON parameters

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
