//! Marker traits separating reads from writes
//!
//! Queries never modify content. Commands only act on server-local state
//! such as the response cache, since content is written by another system.

/// A read-only request
pub trait Query {}

/// A request that changes server state
pub trait Command {}
