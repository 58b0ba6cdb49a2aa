pub mod catalog;
pub mod chat;
pub mod config;
pub mod simulate;

use std::path::PathBuf;

use advisor_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use advisor_core::RecommendationEngine;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with_data(command, message, None)
    }

    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Result of a command that already wrote its own output.
    pub fn interactive(exit_code: u8) -> Self {
        Self { exit_code, output: String::new() }
    }
}

/// A command setup failure: error class, message and exit code.
pub(crate) type SetupFailure = (&'static str, String, u8);

pub(crate) fn load_config(overrides: ConfigOverrides) -> Result<AppConfig, SetupFailure> {
    AppConfig::load(LoadOptions { overrides, ..LoadOptions::default() })
        .map_err(|error| ("config_validation", format!("configuration issue: {error}"), 2))
}

pub(crate) fn load_engine(config: &AppConfig) -> Result<RecommendationEngine, SetupFailure> {
    let source = config.catalog_source();
    let (catalog, questionnaire) = source.load().map_err(|error| {
        ("catalog_load", format!("could not load catalog from {}: {error}", source.describe()), 3)
    })?;

    tracing::debug!(
        event_name = "advisor.catalog.loaded",
        source = %source.describe(),
        products = catalog.len(),
        questions = questionnaire.len(),
        "catalog loaded"
    );

    Ok(RecommendationEngine::new(catalog, questionnaire).with_policy(config.alternative_policy()))
}

pub(crate) fn catalog_overrides(catalog: Option<PathBuf>) -> ConfigOverrides {
    ConfigOverrides { catalog_path: catalog, ..ConfigOverrides::default() }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
