use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use artisan_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    let entries: [(&str, String, Option<&str>); 9] = [
        ("server.bind_address", config.server.bind_address.clone(), Some("ARTISAN_BIND_ADDRESS")),
        ("server.port", config.server.port.to_string(), Some("ARTISAN_PORT")),
        (
            "server.health_check_port",
            config.server.health_check_port.to_string(),
            Some("ARTISAN_HEALTH_CHECK_PORT"),
        ),
        (
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            Some("ARTISAN_GRACEFUL_SHUTDOWN_SECS"),
        ),
        ("engine.default_limit", config.engine.default_limit.to_string(), None),
        ("engine.hybrid_limit", config.engine.hybrid_limit.to_string(), None),
        ("engine.suggestion_limit", config.engine.suggestion_limit.to_string(), None),
        ("logging.level", config.logging.level.clone(), Some("ARTISAN_LOG_LEVEL")),
        ("logging.format", format!("{:?}", config.logging.format), Some("ARTISAN_LOG_FORMAT")),
    ];

    for (key, value, env_var) in entries {
        lines.push(render_line(
            key,
            &value,
            field_source(key, env_var, config_file_doc.as_ref(), config_file_path.as_deref()),
        ));
    }

    lines.join("\n")
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("  {key} = {value}  ({source})")
}

fn field_source(
    key: &str,
    env_var: Option<&str>,
    file_doc: Option<&Value>,
    file_path: Option<&Path>,
) -> String {
    if let Some(var) = env_var {
        if env::var(var).map(|value| !value.trim().is_empty()).unwrap_or(false) {
            return format!("env {var}");
        }
    }

    if let (Some(doc), Some(path)) = (file_doc, file_path) {
        if file_doc_contains(doc, key) {
            return format!("file {}", path.display());
        }
    }

    "default".to_string()
}

fn file_doc_contains(doc: &Value, dotted_key: &str) -> bool {
    let mut current = doc;
    for part in dotted_key.split('.') {
        match current.get(part) {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}

fn detect_config_path() -> Option<PathBuf> {
    if let Ok(explicit) = env::var("ARTISAN_CONFIG") {
        let path = PathBuf::from(explicit);
        if path.exists() {
            return Some(path);
        }
    }

    let default = PathBuf::from("artisan.toml");
    default.exists().then_some(default)
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}
