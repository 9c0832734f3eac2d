//! Recommendation engine implementation

use std::cmp::Ordering;
use std::collections::HashSet;

use rand::Rng;

use super::types::*;
use super::{RecommendResult, CONFIDENCE_MAX, CONFIDENCE_MIN, HYBRID_LIMIT, STRATEGY_LIMIT};
use crate::catalog::{Catalog, Product};

/// Interim strategy output before reason/confidence annotation.
#[derive(Clone, Debug)]
struct ScoredProduct {
    product: Product,
    score: f64,
}

/// The recommendation engine. Pure over the catalog; the only non-determinism
/// (location fallback, confidence) flows through the caller-supplied rng.
#[derive(Clone, Copy, Debug)]
pub struct RecommendationEngine {
    strategy_limit: usize,
    hybrid_limit: usize,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self { strategy_limit: STRATEGY_LIMIT, hybrid_limit: HYBRID_LIMIT }
    }

    pub fn with_limits(strategy_limit: usize, hybrid_limit: usize) -> Self {
        Self { strategy_limit, hybrid_limit }
    }

    /// Run the requested strategy and annotate every result with a reason
    /// and a confidence value.
    pub fn recommend<R: Rng>(
        &self,
        request: &RecommendationRequest,
        catalog: &Catalog,
        rng: &mut R,
    ) -> RecommendResult<Vec<Recommendation>> {
        request.preferences.validate()?;

        let scored = match request.strategy {
            RecommendationStrategy::Collaborative => {
                self.collaborative(&request.preferences, catalog)
            }
            RecommendationStrategy::Content => self.content_based(&request.preferences, catalog),
            RecommendationStrategy::Trending => self.trending(catalog),
            RecommendationStrategy::Location => {
                self.location_based(&request.location, catalog, rng)
            }
            RecommendationStrategy::Hybrid => self.hybrid(&request.preferences, catalog),
        };

        Ok(scored
            .into_iter()
            .map(|entry| {
                let reason = recommendation_reason(&entry.product, &request.preferences);
                let confidence = rng.gen_range(CONFIDENCE_MIN..CONFIDENCE_MAX);
                Recommendation { product: entry.product, score: entry.score, reason, confidence }
            })
            .collect())
    }

    /// Declared-taste overlap as a stand-in for real collaborative data:
    /// keep category or material matches, rank by rating * reviews.
    fn collaborative(&self, preferences: &UserPreferences, catalog: &Catalog) -> Vec<ScoredProduct> {
        let mut picked: Vec<ScoredProduct> = catalog
            .iter()
            .filter(|product| {
                preferences.categories.contains(&product.category)
                    || product.materials.iter().any(|m| preferences.materials.contains(m))
            })
            .map(|product| ScoredProduct {
                score: product.rating * f64::from(product.reviews),
                product: product.clone(),
            })
            .collect();

        sort_by_score_desc(&mut picked);
        picked.truncate(self.strategy_limit);
        picked
    }

    /// Weighted additive attribute match. Fully deterministic.
    fn content_based(&self, preferences: &UserPreferences, catalog: &Catalog) -> Vec<ScoredProduct> {
        let mut picked: Vec<ScoredProduct> = catalog
            .iter()
            .map(|product| ScoredProduct {
                score: content_score(product, preferences),
                product: product.clone(),
            })
            .collect();

        sort_by_score_desc(&mut picked);
        picked.truncate(self.strategy_limit);
        picked
    }

    /// Popularity only; ignores preferences.
    fn trending(&self, catalog: &Catalog) -> Vec<ScoredProduct> {
        let mut picked: Vec<ScoredProduct> = catalog
            .iter()
            .map(|product| ScoredProduct {
                score: trending_score(product),
                product: product.clone(),
            })
            .collect();

        sort_by_score_desc(&mut picked);
        picked.truncate(self.strategy_limit);
        picked
    }

    /// Location substring matches are always kept; non-matching products get
    /// a 50% random inclusion. The coin flip stands in for real geolocation
    /// and is the one intentionally non-deterministic strategy.
    fn location_based<R: Rng>(
        &self,
        location: &str,
        catalog: &Catalog,
        rng: &mut R,
    ) -> Vec<ScoredProduct> {
        let mut picked: Vec<ScoredProduct> = catalog
            .iter()
            .filter(|product| product.location.contains(location) || rng.gen_bool(0.5))
            .map(|product| ScoredProduct { score: product.rating, product: product.clone() })
            .collect();

        sort_by_score_desc(&mut picked);
        picked.truncate(self.strategy_limit);
        picked
    }

    /// Collaborative ++ content ++ trending, deduplicated by product id
    /// keeping the first occurrence, capped at the hybrid limit.
    fn hybrid(&self, preferences: &UserPreferences, catalog: &Catalog) -> Vec<ScoredProduct> {
        let mut merged = self.collaborative(preferences, catalog);
        merged.extend(self.content_based(preferences, catalog));
        merged.extend(self.trending(catalog));

        let mut seen = HashSet::new();
        let mut unique: Vec<ScoredProduct> = Vec::new();
        for entry in merged {
            if seen.insert(entry.product.id.clone()) {
                unique.push(entry);
            }
        }

        unique.truncate(self.hybrid_limit);
        unique
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_by_score_desc(entries: &mut [ScoredProduct]) {
    // Stable sort keeps catalog order among equal scores.
    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

fn content_score(product: &Product, preferences: &UserPreferences) -> f64 {
    let mut score = 0.0;

    if preferences.categories.contains(&product.category) {
        score += 30.0;
    }

    if preferences.price_range.contains(product.price) {
        score += 20.0;
    }

    let material_matches =
        product.materials.iter().filter(|m| preferences.materials.contains(m)).count();
    score += material_matches as f64 * 15.0;

    let style_matches = product.tags.iter().filter(|t| preferences.styles.contains(t)).count();
    score += style_matches as f64 * 10.0;

    // Baseline quality term
    score += product.rating * f64::from(product.reviews) / 10.0;

    score
}

fn trending_score(product: &Product) -> f64 {
    product.views as f64 * 0.3
        + product.sales as f64 * 0.7
        + product.rating * f64::from(product.reviews) * 0.4
}

/// First matching rule wins, in declared priority order.
fn recommendation_reason(product: &Product, preferences: &UserPreferences) -> String {
    if preferences.categories.contains(&product.category) {
        return format!("Based on your interest in {}", product.category.to_lowercase());
    }

    if let Some(material) =
        product.materials.iter().find(|m| preferences.materials.contains(m))
    {
        return format!("You've shown interest in {} items", material.to_lowercase());
    }

    if preferences.favorite_artisans.contains(&product.artist) {
        return "From artisans you follow".to_owned();
    }

    if product.rating >= 4.8 {
        return "Highly rated by other customers".to_owned();
    }

    "Trending in your area".to_owned()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn request(strategy: RecommendationStrategy) -> RecommendationRequest {
        RecommendationRequest::new(strategy)
    }

    fn ids(results: &[Recommendation]) -> Vec<&str> {
        results.iter().map(|r| r.product.id.as_str()).collect()
    }

    #[test]
    fn content_based_is_deterministic() {
        let engine = RecommendationEngine::new();
        let catalog = Catalog::sample();
        let req = request(RecommendationStrategy::Content);

        let first = engine.recommend(&req, &catalog, &mut StdRng::seed_from_u64(7)).unwrap();
        let second = engine.recommend(&req, &catalog, &mut StdRng::seed_from_u64(7)).unwrap();

        assert_eq!(ids(&first), ids(&second));
        let first_scores: Vec<f64> = first.iter().map(|r| r.score).collect();
        let second_scores: Vec<f64> = second.iter().map(|r| r.score).collect();
        assert_eq!(first_scores, second_scores);
    }

    #[test]
    fn content_scores_follow_the_weighted_formula() {
        let catalog = Catalog::sample();
        let preferences = UserPreferences::sample();

        // Product 1: category +30, price in range +20, Clay +15,
        // handmade + traditional tags +20, quality 4.9 * 127 / 10.
        let bowl = catalog.find("1").unwrap();
        let expected = 30.0 + 20.0 + 15.0 + 20.0 + 4.9 * 127.0 / 10.0;
        assert!((content_score(bowl, &preferences) - expected).abs() < 1e-9);

        // Product 4 matches nothing but the handmade style tag.
        let sculpture = catalog.find("4").unwrap();
        let expected = 20.0 + 10.0 + 4.7 * 73.0 / 10.0;
        assert!((content_score(sculpture, &preferences) - expected).abs() < 1e-9);
    }

    #[test]
    fn trending_ranks_wall_hanging_above_bowl() {
        let engine = RecommendationEngine::new();
        let catalog = Catalog::sample();
        let results = engine
            .recommend(&request(RecommendationStrategy::Trending), &catalog, &mut StdRng::seed_from_u64(1))
            .unwrap();

        let order = ids(&results);
        let wall_hanging = order.iter().position(|id| *id == "3").unwrap();
        let bowl = order.iter().position(|id| *id == "1").unwrap();
        assert!(wall_hanging < bowl);
    }

    #[test]
    fn collaborative_keeps_only_taste_overlap() {
        let engine = RecommendationEngine::new();
        let catalog = Catalog::sample();
        let results = engine
            .recommend(
                &request(RecommendationStrategy::Collaborative),
                &catalog,
                &mut StdRng::seed_from_u64(1),
            )
            .unwrap();

        // Product 4 (Woodwork, no preferred materials) must be excluded.
        assert!(!ids(&results).contains(&"4"));
        // Ordering follows rating * reviews: 3 (764.4) > 1 (622.3) > 2 (427.2).
        assert_eq!(ids(&results), vec!["3", "1", "2"]);
    }

    #[test]
    fn hybrid_deduplicates_keeping_first_occurrence() {
        let engine = RecommendationEngine::new();
        let catalog = Catalog::sample();
        let results = engine
            .recommend(&request(RecommendationStrategy::Hybrid), &catalog, &mut StdRng::seed_from_u64(1))
            .unwrap();

        let mut seen = HashSet::new();
        for result in &results {
            assert!(seen.insert(result.product.id.clone()), "duplicate id in hybrid output");
        }
        assert!(results.len() <= HYBRID_LIMIT);
        // Collaborative output leads the merge, so its winner stays first.
        assert_eq!(results[0].product.id.as_str(), "3");
    }

    #[test]
    fn location_matches_are_always_included() {
        let engine = RecommendationEngine::new();
        let catalog = Catalog::sample();

        // Whatever the coin flips do, the Portland product matches "USA".
        for seed in 0..16 {
            let results = engine
                .recommend(
                    &request(RecommendationStrategy::Location),
                    &catalog,
                    &mut StdRng::seed_from_u64(seed),
                )
                .unwrap();
            assert!(ids(&results).contains(&"4"), "seed {seed} dropped the exact match");
        }
    }

    #[test]
    fn reasons_follow_priority_order() {
        let catalog = Catalog::sample();
        let preferences = UserPreferences::sample();

        // Category match outranks everything else.
        assert_eq!(
            recommendation_reason(catalog.find("1").unwrap(), &preferences),
            "Based on your interest in ceramics"
        );

        // Material match when the category is not preferred.
        assert_eq!(
            recommendation_reason(catalog.find("2").unwrap(), &preferences),
            "You've shown interest in silver items"
        );

        // High rating fallback when nothing personal matches.
        let empty = UserPreferences::default();
        assert_eq!(
            recommendation_reason(catalog.find("3").unwrap(), &empty),
            "Highly rated by other customers"
        );

        // Artisan follow outranks the rating rule.
        let follower = UserPreferences {
            favorite_artisans: vec!["Elena Rodriguez".into()],
            ..UserPreferences::default()
        };
        assert_eq!(
            recommendation_reason(catalog.find("3").unwrap(), &follower),
            "From artisans you follow"
        );

        // Final fallback.
        assert_eq!(
            recommendation_reason(catalog.find("4").unwrap(), &empty),
            "Trending in your area"
        );
    }

    #[test]
    fn confidence_stays_in_range() {
        let engine = RecommendationEngine::new();
        let catalog = Catalog::sample();
        let mut rng = StdRng::seed_from_u64(99);

        let results =
            engine.recommend(&request(RecommendationStrategy::Hybrid), &catalog, &mut rng).unwrap();
        assert!(!results.is_empty());
        for result in &results {
            assert!((CONFIDENCE_MIN..CONFIDENCE_MAX).contains(&result.confidence));
        }
    }

    #[test]
    fn invalid_price_range_is_rejected_before_scoring() {
        let engine = RecommendationEngine::new();
        let catalog = Catalog::sample();
        let preferences = UserPreferences {
            price_range: PriceRange { min: 500.0, max: 100.0 },
            ..UserPreferences::sample()
        };
        let req = request(RecommendationStrategy::Content).with_preferences(preferences);

        let result = engine.recommend(&req, &catalog, &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(crate::errors::DomainError::InvalidPriceRange { .. })));
    }
}
