//! Input checks applied before a query reaches the database

use thiserror::Error;

/// Shortest search term accepted, counted in characters after trimming
pub const MIN_SEARCH_TERM_LENGTH: usize = 3;

/// Longest slug accepted in a path segment
pub const MAX_SLUG_LENGTH: usize = 200;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchTermError {
    #[error("Search term must be at least {MIN_SEARCH_TERM_LENGTH} characters")]
    TooShort,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SlugValidationError {
    #[error("Slug is required and cannot be empty")]
    Required,

    #[error("Slug must be at most {MAX_SLUG_LENGTH} characters")]
    TooLong,

    #[error("Slug can only contain lowercase letters, numbers, and hyphens")]
    InvalidFormat,
}

/// Trim a search term, treating blank input as no search at all
///
/// ```rust,ignore
/// assert_eq!(normalize_search_term(Some("  pupil absence ")), Ok(Some("pupil absence".into())));
/// assert_eq!(normalize_search_term(Some("   ")), Ok(None));
/// ```
pub fn normalize_search_term(term: Option<&str>) -> Result<Option<String>, SearchTermError> {
    let Some(trimmed) = term.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    if trimmed.chars().count() < MIN_SEARCH_TERM_LENGTH {
        return Err(SearchTermError::TooShort);
    }

    Ok(Some(trimmed.to_string()))
}

/// Validate a slug taken from a URL path
pub fn validate_slug(slug: &str) -> Result<(), SlugValidationError> {
    if slug.is_empty() {
        return Err(SlugValidationError::Required);
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(SlugValidationError::TooLong);
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(SlugValidationError::InvalidFormat);
    }
    Ok(())
}

/// Whether `slug` could name a stored resource
///
/// Lookups answer not found for slugs that fail [`validate_slug`] without
/// going to the database.
pub fn is_valid_slug(slug: &str) -> bool {
    validate_slug(slug).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_term_is_trimmed() {
        assert_eq!(
            normalize_search_term(Some("  pupil absence ")),
            Ok(Some("pupil absence".to_string()))
        );
    }

    #[test]
    fn test_blank_search_term_is_absent() {
        assert_eq!(normalize_search_term(None), Ok(None));
        assert_eq!(normalize_search_term(Some("")), Ok(None));
        assert_eq!(normalize_search_term(Some("   ")), Ok(None));
    }

    #[test]
    fn test_short_search_term_rejected() {
        assert_eq!(normalize_search_term(Some(" ab ")), Err(SearchTermError::TooShort));
        assert!(normalize_search_term(Some("abc")).is_ok());
    }

    #[test]
    fn test_search_term_length_counts_characters() {
        assert!(normalize_search_term(Some("été")).is_ok());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("pupil-absence-in-schools-in-england").is_ok());
        assert!(validate_slug("2023-24").is_ok());
        assert_eq!(validate_slug(""), Err(SlugValidationError::Required));
        assert_eq!(validate_slug("Pupil_Absence"), Err(SlugValidationError::InvalidFormat));
        assert_eq!(validate_slug(&"a".repeat(201)), Err(SlugValidationError::TooLong));
        assert!(is_valid_slug("2023-24"));
        assert!(!is_valid_slug("Pupil-Absence"));
    }
}
