use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogSource;
use crate::recommend::{AlternativePolicy, DEFAULT_ALTERNATIVE_POLICY};
use crate::script::DEFAULT_BRAND;

pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["advisor.toml", "config/advisor.toml"];

const MAX_WINDOW: u32 = 1_000;
const MAX_TYPING_MS: u64 = 10_000;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub recommendation: RecommendationConfig,
    pub presentation: PresentationConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Default)]
pub struct CatalogConfig {
    /// TOML catalog to load instead of the built-in scanners.
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct RecommendationConfig {
    pub alternative_window: u32,
    pub near_tie_window: u32,
}

#[derive(Clone, Debug)]
pub struct PresentationConfig {
    pub enabled: bool,
    pub typing_delay_ms: u64,
    pub typing_jitter_ms: u64,
    pub brand: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub catalog_path: Option<PathBuf>,
    pub alternative_window: Option<u32>,
    pub near_tie_window: Option<u32>,
    pub presentation_enabled: Option<bool>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            recommendation: RecommendationConfig {
                alternative_window: DEFAULT_ALTERNATIVE_POLICY.price_tier_window,
                near_tie_window: DEFAULT_ALTERNATIVE_POLICY.near_tie_window,
            },
            presentation: PresentationConfig {
                enabled: true,
                typing_delay_ms: 1_000,
                typing_jitter_ms: 500,
                brand: DEFAULT_BRAND.to_string(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch, path.parent());
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILES[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn alternative_policy(&self) -> AlternativePolicy {
        AlternativePolicy {
            price_tier_window: self.recommendation.alternative_window,
            near_tie_window: self.recommendation.near_tie_window,
        }
    }

    pub fn catalog_source(&self) -> CatalogSource {
        match &self.catalog.path {
            Some(path) => CatalogSource::File(path.clone()),
            None => CatalogSource::Builtin,
        }
    }

    /// Relative `catalog.path` values are taken from the config file's directory.
    fn apply_patch(&mut self, patch: ConfigPatch, base_dir: Option<&Path>) {
        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = Some(match base_dir {
                    Some(base) if path.is_relative() && !path.as_os_str().is_empty() => {
                        base.join(path)
                    }
                    _ => path,
                });
            }
        }

        if let Some(recommendation) = patch.recommendation {
            if let Some(window) = recommendation.alternative_window {
                self.recommendation.alternative_window = window;
            }
            if let Some(window) = recommendation.near_tie_window {
                self.recommendation.near_tie_window = window;
            }
        }

        if let Some(presentation) = patch.presentation {
            if let Some(enabled) = presentation.enabled {
                self.presentation.enabled = enabled;
            }
            if let Some(delay) = presentation.typing_delay_ms {
                self.presentation.typing_delay_ms = delay;
            }
            if let Some(jitter) = presentation.typing_jitter_ms {
                self.presentation.typing_jitter_ms = jitter;
            }
            if let Some(brand) = presentation.brand {
                self.presentation.brand = brand;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("ADVISOR_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("ADVISOR_RECOMMENDATION_ALTERNATIVE_WINDOW") {
            self.recommendation.alternative_window =
                parse_u32("ADVISOR_RECOMMENDATION_ALTERNATIVE_WINDOW", &value)?;
        }
        if let Some(value) = read_env("ADVISOR_RECOMMENDATION_NEAR_TIE_WINDOW") {
            self.recommendation.near_tie_window =
                parse_u32("ADVISOR_RECOMMENDATION_NEAR_TIE_WINDOW", &value)?;
        }

        if let Some(value) = read_env("ADVISOR_PRESENTATION_ENABLED") {
            self.presentation.enabled = parse_bool("ADVISOR_PRESENTATION_ENABLED", &value)?;
        }
        if let Some(value) = read_env("ADVISOR_PRESENTATION_TYPING_DELAY_MS") {
            self.presentation.typing_delay_ms =
                parse_u64("ADVISOR_PRESENTATION_TYPING_DELAY_MS", &value)?;
        }
        if let Some(value) = read_env("ADVISOR_PRESENTATION_TYPING_JITTER_MS") {
            self.presentation.typing_jitter_ms =
                parse_u64("ADVISOR_PRESENTATION_TYPING_JITTER_MS", &value)?;
        }
        if let Some(value) = read_env("ADVISOR_PRESENTATION_BRAND") {
            self.presentation.brand = value;
        }

        let log_level =
            read_env("ADVISOR_LOGGING_LEVEL").or_else(|| read_env("ADVISOR_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("ADVISOR_LOGGING_FORMAT").or_else(|| read_env("ADVISOR_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.catalog_path {
            self.catalog.path = Some(path);
        }
        if let Some(window) = overrides.alternative_window {
            self.recommendation.alternative_window = window;
        }
        if let Some(window) = overrides.near_tie_window {
            self.recommendation.near_tie_window = window;
        }
        if let Some(enabled) = overrides.presentation_enabled {
            self.presentation.enabled = enabled;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_catalog(&self.catalog)?;
        validate_recommendation(&self.recommendation)?;
        validate_presentation(&self.presentation)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// First config file that exists, explicit path first.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    DEFAULT_CONFIG_FILES.iter().map(PathBuf::from).find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if let Some(path) = &catalog.path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "catalog.path must not be empty (leave it unset for the built-in catalog)"
                    .to_string(),
            ));
        }
        if path.extension().and_then(|extension| extension.to_str()) != Some("toml") {
            return Err(ConfigError::Validation(format!(
                "catalog.path must point to a `.toml` file, got `{}`",
                path.display()
            )));
        }
    }

    Ok(())
}

fn validate_recommendation(recommendation: &RecommendationConfig) -> Result<(), ConfigError> {
    if recommendation.alternative_window > MAX_WINDOW {
        return Err(ConfigError::Validation(format!(
            "recommendation.alternative_window must be in range 0..={MAX_WINDOW}"
        )));
    }
    if recommendation.near_tie_window > MAX_WINDOW {
        return Err(ConfigError::Validation(format!(
            "recommendation.near_tie_window must be in range 0..={MAX_WINDOW}"
        )));
    }

    Ok(())
}

fn validate_presentation(presentation: &PresentationConfig) -> Result<(), ConfigError> {
    if presentation.typing_delay_ms > MAX_TYPING_MS {
        return Err(ConfigError::Validation(format!(
            "presentation.typing_delay_ms must be in range 0..={MAX_TYPING_MS}"
        )));
    }
    if presentation.typing_jitter_ms > MAX_TYPING_MS {
        return Err(ConfigError::Validation(format!(
            "presentation.typing_jitter_ms must be in range 0..={MAX_TYPING_MS}"
        )));
    }
    if presentation.brand.trim().is_empty() {
        return Err(ConfigError::Validation("presentation.brand must not be empty".to_string()));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    recommendation: Option<RecommendationPatch>,
    presentation: Option<PresentationPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct RecommendationPatch {
    alternative_window: Option<u32>,
    near_tie_window: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct PresentationPatch {
    enabled: Option<bool>,
    typing_delay_ms: Option<u64>,
    typing_jitter_ms: Option<u64>,
    brand: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
