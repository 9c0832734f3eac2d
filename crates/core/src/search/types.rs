//! Types for the search engine

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::errors::DomainError;

/// Which strategy produced a hit. Primary sort key for merged results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Artist,
    Category,
    Material,
    Semantic,
}

impl MatchType {
    /// Merge-order priority; higher wins.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Exact => 5,
            Self::Artist => 4,
            Self::Category => 3,
            Self::Material => 2,
            Self::Semantic => 1,
        }
    }
}

/// A scored catalog projection tagged with the strategy that found it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(flatten)]
    pub product: Product,
    pub relevance_score: f64,
    pub match_type: MatchType,
}

/// A validated search request: non-empty query plus optional pre-filters.
#[derive(Clone, Debug)]
pub struct SearchRequest {
    pub query: String,
    pub limit: usize,
    pub category: Option<String>,
    pub min_price: f64,
    pub max_price: f64,
}

impl SearchRequest {
    /// Build a request, rejecting empty or whitespace-only queries before
    /// any scoring happens.
    pub fn new(query: impl Into<String>) -> Result<Self, DomainError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(DomainError::EmptyQuery);
        }
        Ok(Self {
            query,
            limit: super::DEFAULT_LIMIT,
            category: None,
            min_price: 0.0,
            max_price: super::DEFAULT_MAX_PRICE,
        })
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_price_range(mut self, min: f64, max: f64) -> Result<Self, DomainError> {
        if min > max {
            return Err(DomainError::InvalidPriceRange { min, max });
        }
        self.min_price = min;
        self.max_price = max;
        Ok(self)
    }
}

/// Ranked hits plus the suggestion side-output.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    pub suggestions: Vec<String>,
}
