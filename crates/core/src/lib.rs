pub mod catalog;
pub mod config;
pub mod errors;
pub mod recommend;
pub mod search;

pub use catalog::{Catalog, Product, ProductId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use recommend::{
    PriceRange, Recommendation, RecommendationEngine, RecommendationRequest,
    RecommendationStrategy, UserPreferences,
};
pub use search::{MatchType, SearchEngine, SearchHit, SearchOutcome, SearchRequest};
