//! Statpub Common Library
//!
//! Shared types, logging, and error handling for the statpub workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`StatpubError`] and the [`Result`] alias
//! - **Logging**: tracing subscriber setup shared by every binary
//! - **Types**: domain vocabulary used by both the API and its consumers
//!   (release types, geographic levels, sort directions)
//!
//! # Example
//!
//! ```no_run
//! use statpub_common::types::GeographicLevel;
//!
//! let level: GeographicLevel = "LA".parse().unwrap();
//! assert_eq!(level.label(), "Local authority");
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{Result, StatpubError};
