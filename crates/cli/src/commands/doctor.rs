use artisan_core::catalog::Catalog;
use artisan_core::config::{AppConfig, LoadOptions};
use artisan_core::recommend::{
    RecommendationEngine, RecommendationRequest, RecommendationStrategy,
};
use artisan_core::search::{SearchEngine, SearchRequest};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed: {error}\"}}"
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(_) => checks.push(DoctorCheck {
            name: "config_validation",
            status: CheckStatus::Pass,
            details: "configuration loaded and validated".to_string(),
        }),
        Err(error) => checks.push(DoctorCheck {
            name: "config_validation",
            status: CheckStatus::Fail,
            details: error.to_string(),
        }),
    }

    checks.push(check_catalog_integrity());
    checks.push(check_engine_smoke());

    let overall = if checks.iter().all(|check| check.status == CheckStatus::Pass) {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    };
    let summary = match overall {
        CheckStatus::Pass => "all checks passed".to_string(),
        CheckStatus::Fail => "one or more checks failed".to_string(),
    };

    DoctorReport { overall_status: overall, summary, checks }
}

fn check_catalog_integrity() -> DoctorCheck {
    let catalog = Catalog::sample();

    if catalog.is_empty() {
        return DoctorCheck {
            name: "catalog_integrity",
            status: CheckStatus::Fail,
            details: "catalog has no products".to_string(),
        };
    }

    let mut ids: Vec<&str> = catalog.iter().map(|product| product.id.as_str()).collect();
    ids.sort_unstable();
    let before = ids.len();
    ids.dedup();
    if ids.len() != before {
        return DoctorCheck {
            name: "catalog_integrity",
            status: CheckStatus::Fail,
            details: "catalog contains duplicate product ids".to_string(),
        };
    }

    for product in catalog.iter() {
        if product.price < 0.0 || !(0.0..=5.0).contains(&product.rating) {
            return DoctorCheck {
                name: "catalog_integrity",
                status: CheckStatus::Fail,
                details: format!("product {} has out-of-range fields", product.id),
            };
        }
    }

    DoctorCheck {
        name: "catalog_integrity",
        status: CheckStatus::Pass,
        details: format!("{} products with unique ids and sane ranges", before),
    }
}

fn check_engine_smoke() -> DoctorCheck {
    let catalog = Catalog::sample();

    let engine = RecommendationEngine::new();
    let request = RecommendationRequest::new(RecommendationStrategy::Content);
    let first = engine.recommend(&request, &catalog, &mut StdRng::seed_from_u64(0));
    let second = engine.recommend(&request, &catalog, &mut StdRng::seed_from_u64(0));
    match (first, second) {
        (Ok(a), Ok(b)) => {
            let a_ids: Vec<String> = a.iter().map(|r| r.product.id.to_string()).collect();
            let b_ids: Vec<String> = b.iter().map(|r| r.product.id.to_string()).collect();
            if a_ids != b_ids {
                return DoctorCheck {
                    name: "engine_smoke",
                    status: CheckStatus::Fail,
                    details: "content strategy was not reproducible".to_string(),
                };
            }
        }
        _ => {
            return DoctorCheck {
                name: "engine_smoke",
                status: CheckStatus::Fail,
                details: "recommendation engine returned an error".to_string(),
            }
        }
    }

    let search = SearchEngine::new();
    let request = match SearchRequest::new("ceramic") {
        Ok(request) => request,
        Err(error) => {
            return DoctorCheck {
                name: "engine_smoke",
                status: CheckStatus::Fail,
                details: error.to_string(),
            }
        }
    };
    match search.search(&request, &catalog) {
        Ok(outcome) if !outcome.hits.is_empty() => DoctorCheck {
            name: "engine_smoke",
            status: CheckStatus::Pass,
            details: "both engines produced results over the sample catalog".to_string(),
        },
        Ok(_) => DoctorCheck {
            name: "engine_smoke",
            status: CheckStatus::Fail,
            details: "search returned no hits for a known-good query".to_string(),
        },
        Err(error) => DoctorCheck {
            name: "engine_smoke",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![format!("doctor: {}", report.summary)];
    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
        };
        lines.push(format!("  [{marker}] {}: {}", check.name, check.details));
    }
    lines.join("\n")
}
