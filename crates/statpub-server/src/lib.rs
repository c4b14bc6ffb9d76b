//! statpub server library
//!
//! Read-only content API for a statistics publishing platform. Consumers
//! browse themes, publications, releases and data set files.
//!
//! # Architecture
//!
//! Requests follow a CQRS layout: every operation is a query (or, for cache
//! administration, a command) living in a vertical feature slice under
//! [`features`]. Route handlers stay thin and delegate to the slice's
//! `handle` function.
//!
//! Listing queries resolve their parameters, then go through the
//! [`cache::ContentCache`] so repeated requests skip the database until the
//! next half-hourly expiry boundary.
//!
//! ## Framework stack
//!
//! - **Axum** for HTTP
//! - **SQLx** for PostgreSQL
//! - **Tower** middleware for tracing, CORS and compression
//!
//! # Example
//!
//! ```no_run
//! use statpub_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config).await
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;

pub use error::{AppError, AppResult};
