//! Error types shared across statpub crates

use thiserror::Error;

/// Result type alias for statpub operations
pub type Result<T> = std::result::Result<T, StatpubError>;

/// Failure to interpret a piece of the shared domain vocabulary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatpubError {
    #[error("Unknown release type: {0}")]
    UnknownReleaseType(String),

    #[error("Unknown geographic level: {0}")]
    UnknownGeographicLevel(String),

    #[error("Invalid sort direction: {0}. Must be 'asc' or 'desc'")]
    InvalidSortDirection(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        let err = StatpubError::InvalidSortDirection("up".to_string());
        assert_eq!(err.to_string(), "Invalid sort direction: up. Must be 'asc' or 'desc'");
    }
}
