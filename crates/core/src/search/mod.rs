//! Multi-strategy search-ranking engine.
//!
//! Five independent match strategies score the filtered catalog; their output
//! is merged, deduplicated by product id, and ordered by match-type priority
//! then relevance.

mod engine;
mod types;

pub use engine::SearchEngine;
pub use types::*;

use crate::errors::DomainError;

/// Result type for search operations
pub type SearchResult<T> = Result<T, DomainError>;

/// Default result cap when the caller does not ask for a limit
pub const DEFAULT_LIMIT: usize = 10;

/// Cap on generated suggestions
pub const SUGGESTION_LIMIT: usize = 5;

/// Upper price bound applied when the caller supplies none
pub const DEFAULT_MAX_PRICE: f64 = 10_000.0;
