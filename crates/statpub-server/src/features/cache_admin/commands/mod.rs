pub mod clear;

pub use clear::{ClearCacheCommand, ClearCacheError, ClearCacheResponse};
