//! Multi-strategy recommendation engine.
//!
//! Produces a ranked, deduplicated, reason-annotated list of products for a
//! user-preference profile. Strategies are interchangeable; the hybrid mode
//! merges collaborative, content-based, and trending output.

mod engine;
mod types;

pub use engine::RecommendationEngine;
pub use types::*;

use crate::errors::DomainError;

/// Result type for recommendation operations
pub type RecommendResult<T> = Result<T, DomainError>;

/// Result cap for single-strategy modes
pub const STRATEGY_LIMIT: usize = 4;

/// Result cap for the hybrid merge
pub const HYBRID_LIMIT: usize = 8;

/// Confidence is a uniform draw in [CONFIDENCE_MIN, CONFIDENCE_MAX).
/// Placeholder for a real model score; the rng is injected so tests can pin it.
pub const CONFIDENCE_MIN: f64 = 0.7;
pub const CONFIDENCE_MAX: f64 = 1.0;
