//! Search engine implementation

use std::cmp::Ordering;
use std::collections::HashSet;

use super::types::*;
use super::{SearchResult, SUGGESTION_LIMIT};
use crate::catalog::{Catalog, Product};

/// Synonym expansion for a small dictionary of domain terms. Stands in for a
/// real embedding model.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("bowl", &["dish", "vessel", "container"]),
    ("necklace", &["jewelry", "pendant", "chain"]),
    ("handmade", &["crafted", "artisan", "handcrafted"]),
    ("traditional", &["classic", "heritage", "cultural"]),
    ("modern", &["contemporary", "current", "new"]),
];

const CATEGORY_KEYWORDS: &[&str] =
    &["ceramics", "pottery", "jewelry", "textiles", "woodwork", "sculpture"];

const MATERIAL_KEYWORDS: &[&str] =
    &["silk", "cotton", "silver", "gold", "clay", "wood", "glass", "leather"];

/// Keyword-triggered suggestion lists.
const SUGGESTION_TRIGGERS: &[(&str, &[&str])] = &[
    ("ceramic", &["ceramic bowls", "ceramic vases", "pottery"]),
    ("jewelry", &["silver jewelry", "handmade necklaces", "artisan rings"]),
    ("textile", &["woven textiles", "silk scarves", "wall hangings"]),
];

/// The search engine. Pure and deterministic over the catalog.
#[derive(Clone, Copy, Debug)]
pub struct SearchEngine {
    suggestion_limit: usize,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self { suggestion_limit: SUGGESTION_LIMIT }
    }

    pub fn with_suggestion_limit(suggestion_limit: usize) -> Self {
        Self { suggestion_limit }
    }

    /// Filter, score with every strategy, merge, and rank.
    pub fn search(&self, request: &SearchRequest, catalog: &Catalog) -> SearchResult<SearchOutcome> {
        let filtered = self.apply_filters(request, catalog);
        let query = request.query.to_lowercase();

        // Strategy outputs are independent; concatenation order fixes which
        // tag survives deduplication.
        let mut merged = exact_matches(&query, &filtered);
        merged.extend(semantic_matches(&query, &filtered));
        merged.extend(category_matches(&query, &filtered));
        merged.extend(material_matches(&query, &filtered));
        merged.extend(artist_matches(&query, &filtered));

        let mut seen = HashSet::new();
        let mut unique: Vec<SearchHit> = Vec::new();
        for hit in merged {
            if seen.insert(hit.product.id.clone()) {
                unique.push(hit);
            }
        }

        unique.sort_by(|a, b| {
            b.match_type
                .priority()
                .cmp(&a.match_type.priority())
                .then_with(|| {
                    b.relevance_score.partial_cmp(&a.relevance_score).unwrap_or(Ordering::Equal)
                })
        });
        unique.truncate(request.limit);

        // Suggestions look at the whole catalog, not the filtered subset.
        let suggestions = self.suggestions(&query, catalog);

        Ok(SearchOutcome { hits: unique, suggestions })
    }

    fn apply_filters<'a>(&self, request: &SearchRequest, catalog: &'a Catalog) -> Vec<&'a Product> {
        catalog
            .iter()
            .filter(|product| match &request.category {
                Some(category) => product.category.eq_ignore_ascii_case(category),
                None => true,
            })
            .filter(|product| {
                product.price >= request.min_price && product.price <= request.max_price
            })
            .collect()
    }

    /// Fixed keyword-triggered suggestion lists plus matching artist names.
    pub fn suggestions(&self, query: &str, catalog: &Catalog) -> Vec<String> {
        let query = query.to_lowercase();
        let mut suggestions: Vec<String> = Vec::new();

        for (trigger, canned) in SUGGESTION_TRIGGERS {
            if query.contains(trigger) {
                suggestions.extend(canned.iter().map(|s| (*s).to_owned()));
            }
        }

        for artist in catalog.artists() {
            if artist.to_lowercase().contains(&query) {
                suggestions.push(artist);
            }
        }

        suggestions.truncate(self.suggestion_limit);
        suggestions
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Substring test against name and artist; additive multi-field score.
fn exact_matches(query: &str, products: &[&Product]) -> Vec<SearchHit> {
    products
        .iter()
        .filter(|product| {
            product.name.to_lowercase().contains(query)
                || product.artist.to_lowercase().contains(query)
        })
        .map(|product| SearchHit {
            product: (*product).clone(),
            relevance_score: exact_score(product, query),
            match_type: MatchType::Exact,
        })
        .collect()
}

fn exact_score(product: &Product, query: &str) -> f64 {
    let mut score = 0.0;
    if product.name.to_lowercase().contains(query) {
        score += 1.0;
    }
    if product.artist.to_lowercase().contains(query) {
        score += 0.8;
    }
    if product.description.to_lowercase().contains(query) {
        score += 0.6;
    }
    if product.tags.iter().any(|tag| tag.to_lowercase().contains(query)) {
        score += 0.4;
    }
    score
}

/// Keyword-expansion scoring; keeps only products with a positive score.
fn semantic_matches(query: &str, products: &[&Product]) -> Vec<SearchHit> {
    let keywords = expand_keywords(query);

    products
        .iter()
        .map(|product| SearchHit {
            product: (*product).clone(),
            relevance_score: semantic_score(product, &keywords),
            match_type: MatchType::Semantic,
        })
        .filter(|hit| hit.relevance_score > 0.0)
        .collect()
}

fn semantic_score(product: &Product, keywords: &[String]) -> f64 {
    let name = product.name.to_lowercase();
    let description = product.description.to_lowercase();

    let mut score = 0.0;
    for keyword in keywords {
        if name.contains(keyword.as_str()) {
            score += 0.3;
        }
        if description.contains(keyword.as_str()) {
            score += 0.2;
        }
        if product.tags.iter().any(|tag| tag.to_lowercase().contains(keyword.as_str())) {
            score += 0.1;
        }
    }
    score
}

fn expand_keywords(query: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    let mut push_unique = |word: &str| {
        if !keywords.iter().any(|k| k == word) {
            keywords.push(word.to_owned());
        }
    };

    for word in query.split_whitespace() {
        push_unique(word);
        if let Some((_, expansions)) = SYNONYMS.iter().find(|(term, _)| *term == word) {
            for expansion in *expansions {
                push_unique(expansion);
            }
        }
    }

    keywords
}

/// A fixed keyword matches when the query contains it, or when a query token
/// is a prefix of it, so "ceramic" still triggers the "ceramics" category.
/// Tokens shorter than four characters are ignored to keep stop words out.
fn matched_keyword(query: &str, keywords: &[&'static str]) -> Option<&'static str> {
    keywords
        .iter()
        .find(|keyword| {
            query.contains(*keyword)
                || query
                    .split_whitespace()
                    .any(|token| token.len() >= 4 && keyword.starts_with(token))
        })
        .copied()
}

fn category_matches(query: &str, products: &[&Product]) -> Vec<SearchHit> {
    let Some(keyword) = matched_keyword(query, CATEGORY_KEYWORDS) else {
        return Vec::new();
    };

    products
        .iter()
        .filter(|product| {
            product.category.to_lowercase().contains(keyword)
                || product.subcategory.to_lowercase().contains(keyword)
        })
        .map(|product| SearchHit {
            product: (*product).clone(),
            relevance_score: 0.8,
            match_type: MatchType::Category,
        })
        .collect()
}

fn material_matches(query: &str, products: &[&Product]) -> Vec<SearchHit> {
    let Some(keyword) = matched_keyword(query, MATERIAL_KEYWORDS) else {
        return Vec::new();
    };

    products
        .iter()
        .filter(|product| {
            product.materials.iter().any(|material| material.to_lowercase().contains(keyword))
        })
        .map(|product| SearchHit {
            product: (*product).clone(),
            relevance_score: 0.7,
            match_type: MatchType::Material,
        })
        .collect()
}

fn artist_matches(query: &str, products: &[&Product]) -> Vec<SearchHit> {
    products
        .iter()
        .filter(|product| product.artist.to_lowercase().contains(query))
        .map(|product| SearchHit {
            product: (*product).clone(),
            relevance_score: 0.9,
            match_type: MatchType::Artist,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::sample()
    }

    fn run(query: &str) -> SearchOutcome {
        let engine = SearchEngine::new();
        let request = SearchRequest::new(query).unwrap();
        engine.search(&request, &sample()).unwrap()
    }

    #[test]
    fn ceramic_query_finds_the_bowl_with_suggestions() {
        let outcome = run("ceramic");

        assert!(outcome.hits.iter().any(|hit| hit.product.id.as_str() == "1"));
        assert!(outcome.suggestions.contains(&"ceramic bowls".to_owned()));
        assert!(outcome.suggestions.len() <= SUGGESTION_LIMIT);
    }

    #[test]
    fn category_strategy_scores_the_bowl_at_fixed_relevance() {
        let catalog = sample();
        let filtered: Vec<&Product> = catalog.iter().collect();

        let hits = category_matches("ceramic", &filtered);
        let bowl = hits.iter().find(|hit| hit.product.id.as_str() == "1").expect("bowl hit");
        assert_eq!(bowl.match_type, MatchType::Category);
        assert_eq!(bowl.relevance_score, 0.8);
    }

    #[test]
    fn results_are_sorted_by_priority_then_score() {
        // "silver" hits exact (name), artist (none), material, semantic paths.
        let outcome = run("silver");
        assert!(!outcome.hits.is_empty());

        for pair in outcome.hits.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.match_type.priority() >= b.match_type.priority());
            if a.match_type.priority() == b.match_type.priority() {
                assert!(a.relevance_score >= b.relevance_score);
            }
        }
    }

    #[test]
    fn results_never_repeat_a_product_id() {
        let outcome = run("handmade traditional silver");

        let mut seen = HashSet::new();
        for hit in &outcome.hits {
            assert!(seen.insert(hit.product.id.clone()), "duplicate {}", hit.product.id);
        }
    }

    #[test]
    fn first_strategy_in_merge_order_keeps_the_tag() {
        // The necklace matches exact (name) and material (silver); the exact
        // tag must survive deduplication.
        let outcome = run("silver");
        let necklace =
            outcome.hits.iter().find(|hit| hit.product.id.as_str() == "2").expect("necklace");
        assert_eq!(necklace.match_type, MatchType::Exact);
    }

    #[test]
    fn exact_score_is_additive_across_fields() {
        let catalog = sample();
        let bowl = catalog.find("1").unwrap();
        // name 1.0 + description 0.6 for "ceramic"
        assert!((exact_score(bowl, "ceramic") - 1.6).abs() < 1e-9);
    }

    #[test]
    fn semantic_expansion_covers_synonyms() {
        let keywords = expand_keywords("handmade bowl");
        for expected in ["handmade", "crafted", "artisan", "handcrafted", "bowl", "dish"] {
            assert!(keywords.iter().any(|k| k == expected), "missing {expected}");
        }
        // No duplicates even when expansions overlap.
        let mut deduped = keywords.clone();
        deduped.dedup();
        assert_eq!(keywords.len(), deduped.len());
    }

    #[test]
    fn semantic_only_queries_skip_zero_score_products() {
        let catalog = sample();
        let filtered: Vec<&Product> = catalog.iter().collect();

        // "traditional" never appears in the sculpture's text.
        let hits = semantic_matches("traditional", &filtered);
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|hit| hit.product.id.as_str() != "4"));
        assert!(hits.iter().all(|hit| hit.relevance_score > 0.0));
    }

    #[test]
    fn artist_name_queries_resolve_through_the_exact_path() {
        // "maya" hits both the exact strategy (artist substring) and the
        // artist strategy; merge order keeps the exact tag.
        let outcome = run("maya");
        let first = outcome.hits.first().expect("artist hit");
        assert_eq!(first.product.id.as_str(), "2");
        assert_eq!(first.match_type, MatchType::Exact);
        assert_eq!(first.relevance_score, 0.8);
    }

    #[test]
    fn artist_strategy_assigns_fixed_relevance() {
        let catalog = sample();
        let filtered: Vec<&Product> = catalog.iter().collect();

        let hits = artist_matches("maya", &filtered);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].product.id.as_str(), "2");
        assert_eq!(hits[0].match_type, MatchType::Artist);
        assert_eq!(hits[0].relevance_score, 0.9);
    }

    #[test]
    fn category_filter_narrows_before_scoring() {
        let engine = SearchEngine::new();
        let request = SearchRequest::new("handmade").unwrap().with_category("Jewelry");
        let outcome = engine.search(&request, &sample()).unwrap();

        assert!(!outcome.hits.is_empty());
        assert!(outcome.hits.iter().all(|hit| hit.product.category == "Jewelry"));
    }

    #[test]
    fn price_filter_is_inclusive() {
        let engine = SearchEngine::new();
        let request =
            SearchRequest::new("handmade").unwrap().with_price_range(78.0, 120.0).unwrap();
        let outcome = engine.search(&request, &sample()).unwrap();

        let ids: Vec<&str> = outcome.hits.iter().map(|hit| hit.product.id.as_str()).collect();
        assert!(ids.contains(&"1"), "lower bound is inclusive");
        assert!(ids.contains(&"3"), "upper bound is inclusive");
        assert!(!ids.contains(&"2"), "165 exceeds the window");
    }

    #[test]
    fn limit_truncates_after_ranking() {
        let engine = SearchEngine::new();
        let request = SearchRequest::new("handmade").unwrap().with_limit(2);
        let outcome = engine.search(&request, &sample()).unwrap();
        assert_eq!(outcome.hits.len(), 2);
    }

    #[test]
    fn artist_names_appear_in_suggestions() {
        let outcome = run("elena");
        assert!(outcome.suggestions.contains(&"Elena Rodriguez".to_owned()));
    }
}
