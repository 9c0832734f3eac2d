use artisan_core::catalog::Catalog;
use artisan_core::recommend::{
    RecommendationEngine, RecommendationRequest, RecommendationStrategy,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct RecommendReport {
    command: &'static str,
    status: &'static str,
    strategy: String,
    label: &'static str,
    results: Vec<RecommendRow>,
}

#[derive(Debug, Serialize)]
struct RecommendRow {
    id: String,
    name: String,
    artist: String,
    score: f64,
    reason: String,
    confidence: f64,
}

pub fn run(strategy: &str, location: &str, seed: Option<u64>, json_output: bool) -> CommandResult {
    let strategy: RecommendationStrategy = match strategy.parse() {
        Ok(strategy) => strategy,
        Err(error) => {
            return CommandResult::failure("recommend", "invalid_strategy", error.to_string(), 2)
        }
    };

    let catalog = Catalog::sample();
    let engine = RecommendationEngine::new();
    let request = RecommendationRequest::new(strategy).with_location(location);

    // Seeded runs are reproducible; unseeded runs draw from the OS.
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let recommendations = match engine.recommend(&request, &catalog, &mut rng) {
        Ok(recommendations) => recommendations,
        Err(error) => return CommandResult::failure("recommend", "domain", error.to_string(), 2),
    };

    let report = RecommendReport {
        command: "recommend",
        status: "ok",
        strategy: format!("{strategy:?}").to_lowercase(),
        label: strategy.label(),
        results: recommendations
            .iter()
            .map(|rec| RecommendRow {
                id: rec.product.id.to_string(),
                name: rec.product.name.clone(),
                artist: rec.product.artist.clone(),
                score: rec.score,
                reason: rec.reason.clone(),
                confidence: rec.confidence,
            })
            .collect(),
    };

    if json_output {
        let output = serde_json::to_string_pretty(&report)
            .unwrap_or_else(|error| format!("{{\"status\":\"error\",\"message\":\"{error}\"}}"));
        return CommandResult { exit_code: 0, output };
    }

    let mut lines = vec![format!("{} ({} results):", report.label, report.results.len())];
    for row in &report.results {
        lines.push(format!(
            "  [{}] {} by {} | score {:.1} | {:.0}% match: {}",
            row.id,
            row.name,
            row.artist,
            row.score,
            row.confidence * 100.0,
            row.reason
        ));
    }
    CommandResult { exit_code: 0, output: lines.join("\n") }
}
