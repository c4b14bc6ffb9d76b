//! Building blocks shared by the content feature slices
//!
//! - **pagination**: page/per_page handling and response metadata
//! - **validation**: search term and slug checks applied before querying
//! - **extract**: `Query`/`Path` extractors with JSON error envelopes

pub mod extract;
pub mod pagination;
pub mod validation;

pub use extract::{ApiPath, ApiQuery, InvalidRequest};
pub use pagination::{Paginated, PaginationError, PaginationMetadata, PaginationParams};
pub use validation::{
    is_valid_slug, normalize_search_term, validate_slug, SearchTermError, SlugValidationError,
    MIN_SEARCH_TERM_LENGTH,
};
