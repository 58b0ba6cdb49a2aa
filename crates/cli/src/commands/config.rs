use std::env;
use std::fs;
use std::path::Path;

use advisor_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let catalog_path = config
        .catalog
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<builtin>".to_string());

    let lines = vec![
        "effective config (source precedence: env > file > default):".to_string(),
        render_line("catalog.path", &catalog_path, source("catalog.path", &["ADVISOR_CATALOG_PATH"])),
        render_line(
            "recommendation.alternative_window",
            &config.recommendation.alternative_window.to_string(),
            source(
                "recommendation.alternative_window",
                &["ADVISOR_RECOMMENDATION_ALTERNATIVE_WINDOW"],
            ),
        ),
        render_line(
            "recommendation.near_tie_window",
            &config.recommendation.near_tie_window.to_string(),
            source("recommendation.near_tie_window", &["ADVISOR_RECOMMENDATION_NEAR_TIE_WINDOW"]),
        ),
        render_line(
            "presentation.enabled",
            &config.presentation.enabled.to_string(),
            source("presentation.enabled", &["ADVISOR_PRESENTATION_ENABLED"]),
        ),
        render_line(
            "presentation.typing_delay_ms",
            &config.presentation.typing_delay_ms.to_string(),
            source("presentation.typing_delay_ms", &["ADVISOR_PRESENTATION_TYPING_DELAY_MS"]),
        ),
        render_line(
            "presentation.typing_jitter_ms",
            &config.presentation.typing_jitter_ms.to_string(),
            source("presentation.typing_jitter_ms", &["ADVISOR_PRESENTATION_TYPING_JITTER_MS"]),
        ),
        render_line(
            "presentation.brand",
            &config.presentation.brand,
            source("presentation.brand", &["ADVISOR_PRESENTATION_BRAND"]),
        ),
        render_line(
            "logging.level",
            &config.logging.level,
            source("logging.level", &["ADVISOR_LOGGING_LEVEL", "ADVISOR_LOG_LEVEL"]),
        ),
        render_line(
            "logging.format",
            &format!("{:?}", config.logging.format),
            source("logging.format", &["ADVISOR_LOGGING_FORMAT", "ADVISOR_LOG_FORMAT"]),
        ),
    ];

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
