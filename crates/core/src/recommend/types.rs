//! Types for the recommendation engine

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::errors::DomainError;

/// Inclusive price window a buyer is willing to spend in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Result<Self, DomainError> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.min > self.max {
            return Err(DomainError::InvalidPriceRange { min: self.min, max: self.max });
        }
        Ok(())
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self { min: 0.0, max: 10_000.0 }
    }
}

/// Per-request taste profile. Supplied by the caller; never persisted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub categories: Vec<String>,
    pub price_range: PriceRange,
    pub materials: Vec<String>,
    pub styles: Vec<String>,
    pub purchase_history: Vec<String>,
    pub view_history: Vec<String>,
    pub favorite_artisans: Vec<String>,
}

impl UserPreferences {
    /// The fixed fallback profile used when a request carries no preferences.
    pub fn sample() -> Self {
        Self {
            categories: vec!["Ceramics".into(), "Textiles".into()],
            price_range: PriceRange { min: 50.0, max: 200.0 },
            materials: vec!["Silk".into(), "Clay".into(), "Silver".into()],
            styles: vec!["traditional".into(), "handmade".into()],
            purchase_history: vec!["1".into(), "3".into()],
            view_history: vec!["1".into(), "2".into(), "3".into(), "4".into()],
            favorite_artisans: vec!["Elena Rodriguez".into(), "Kenji Tanaka".into()],
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.price_range.validate()
    }
}

/// One interchangeable scoring algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationStrategy {
    Collaborative,
    Content,
    Trending,
    Location,
    #[default]
    Hybrid,
}

impl RecommendationStrategy {
    /// Human heading shown alongside the result list.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Collaborative => "Based on similar customers",
            Self::Content => "Personalized for you",
            Self::Trending => "Trending now",
            Self::Location => "Popular in your area",
            Self::Hybrid => "Recommended for you",
        }
    }
}

impl std::str::FromStr for RecommendationStrategy {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "collaborative" => Ok(Self::Collaborative),
            "content" => Ok(Self::Content),
            "trending" => Ok(Self::Trending),
            "location" => Ok(Self::Location),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(DomainError::UnknownStrategy(other.to_owned())),
        }
    }
}

/// A scored, reason-annotated catalog projection.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(flatten)]
    pub product: Product,
    /// Strategy-assigned score; comparable within one strategy only.
    pub score: f64,
    pub reason: String,
    /// Uniform in [0.7, 1.0). Placeholder for a real model score.
    pub confidence: f64,
}

/// Request for recommendations
#[derive(Clone, Debug)]
pub struct RecommendationRequest {
    pub strategy: RecommendationStrategy,
    pub preferences: UserPreferences,
    pub location: String,
}

impl RecommendationRequest {
    pub fn new(strategy: RecommendationStrategy) -> Self {
        Self { strategy, preferences: UserPreferences::sample(), location: "USA".to_owned() }
    }

    pub fn with_preferences(mut self, preferences: UserPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

impl Default for RecommendationRequest {
    fn default() -> Self {
        Self::new(RecommendationStrategy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parses_known_names() {
        assert_eq!(
            "trending".parse::<RecommendationStrategy>().unwrap(),
            RecommendationStrategy::Trending
        );
        assert_eq!(
            " Hybrid ".parse::<RecommendationStrategy>().unwrap(),
            RecommendationStrategy::Hybrid
        );
        assert!(matches!(
            "popular".parse::<RecommendationStrategy>(),
            Err(DomainError::UnknownStrategy(name)) if name == "popular"
        ));
    }

    #[test]
    fn price_range_is_inclusive_at_both_ends() {
        let range = PriceRange::new(50.0, 200.0).unwrap();
        assert!(range.contains(50.0));
        assert!(range.contains(200.0));
        assert!(!range.contains(200.01));
    }

    #[test]
    fn inverted_price_range_is_rejected() {
        assert!(matches!(
            PriceRange::new(300.0, 100.0),
            Err(DomainError::InvalidPriceRange { .. })
        ));
    }

    #[test]
    fn preferences_deserialize_from_partial_json() {
        let prefs: UserPreferences =
            serde_json::from_str(r#"{"categories":["Jewelry"]}"#).expect("partial body");
        assert_eq!(prefs.categories, vec!["Jewelry"]);
        assert_eq!(prefs.price_range, PriceRange::default());
        assert!(prefs.materials.is_empty());
    }
}
