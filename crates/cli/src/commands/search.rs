use artisan_core::catalog::Catalog;
use artisan_core::search::{SearchEngine, SearchRequest};
use serde::Serialize;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct SearchReport {
    command: &'static str,
    status: &'static str,
    query: String,
    results: Vec<SearchRow>,
    suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SearchRow {
    id: String,
    name: String,
    artist: String,
    match_type: String,
    relevance_score: f64,
}

pub fn run(query: &str, limit: usize, category: Option<&str>, json_output: bool) -> CommandResult {
    let catalog = Catalog::sample();
    let engine = SearchEngine::new();

    let request = match SearchRequest::new(query) {
        Ok(request) => request,
        Err(error) => return CommandResult::failure("search", "invalid_query", error.to_string(), 2),
    };
    let mut request = request.with_limit(limit);
    if let Some(category) = category {
        request = request.with_category(category);
    }

    let outcome = match engine.search(&request, &catalog) {
        Ok(outcome) => outcome,
        Err(error) => return CommandResult::failure("search", "domain", error.to_string(), 2),
    };

    let report = SearchReport {
        command: "search",
        status: "ok",
        query: query.to_owned(),
        results: outcome
            .hits
            .iter()
            .map(|hit| SearchRow {
                id: hit.product.id.to_string(),
                name: hit.product.name.clone(),
                artist: hit.product.artist.clone(),
                match_type: serde_json::to_value(hit.match_type)
                    .ok()
                    .and_then(|value| value.as_str().map(str::to_owned))
                    .unwrap_or_default(),
                relevance_score: hit.relevance_score,
            })
            .collect(),
        suggestions: outcome.suggestions,
    };

    if json_output {
        let output = serde_json::to_string_pretty(&report)
            .unwrap_or_else(|error| format!("{{\"status\":\"error\",\"message\":\"{error}\"}}"));
        return CommandResult { exit_code: 0, output };
    }

    let mut lines = vec![format!("{} results for \"{}\":", report.results.len(), report.query)];
    for row in &report.results {
        lines.push(format!(
            "  [{}] {} by {} | {} match | relevance {:.2}",
            row.id, row.name, row.artist, row.match_type, row.relevance_score
        ));
    }
    if !report.suggestions.is_empty() {
        lines.push(format!("suggestions: {}", report.suggestions.join(", ")));
    }
    CommandResult { exit_code: 0, output: lines.join("\n") }
}
