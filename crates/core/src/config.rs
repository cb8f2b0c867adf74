use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::replenish::batch::BatchMode;
use crate::replenish::policy::PolicyConfig;

pub const DEFAULT_QUANTITY_COLUMN: &str = "Manual Required Qty";
pub const PLAN_DAYS_RANGE: std::ops::RangeInclusive<u32> = 15..=60;
pub const ROUNDING_THRESHOLD_RANGE: std::ops::RangeInclusive<f64> = 0.5..=1.0;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub policy: PolicyConfig,
    pub batch: BatchConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    pub parallel: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputConfig {
    pub quantity_column: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
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
    pub rounding_threshold: Option<f64>,
    pub plan_days_top: Option<u32>,
    pub plan_days_positive: Option<u32>,
    pub plan_days_default: Option<u32>,
    pub batch_parallel: Option<bool>,
    pub quantity_column: Option<String>,
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
            policy: PolicyConfig::default(),
            batch: BatchConfig { parallel: true },
            output: OutputConfig { quantity_column: DEFAULT_QUANTITY_COLUMN.to_string() },
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

impl BatchConfig {
    pub fn mode(&self) -> BatchMode {
        if self.parallel {
            BatchMode::Parallel
        } else {
            BatchMode::Sequential
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("replenish.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(policy) = patch.policy {
            if let Some(weights) = policy.weight_incl {
                let target = &mut self.policy.weight_incl;
                apply_weight(&mut target.w7, weights.w7);
                apply_weight(&mut target.w15, weights.w15);
                apply_weight(&mut target.w30, weights.w30);
                apply_weight(&mut target.w45, weights.w45);
                apply_weight(&mut target.w60, weights.w60);
            }
            if let Some(weights) = policy.weight_excl {
                let target = &mut self.policy.weight_excl;
                apply_weight(&mut target.w15, weights.w15);
                apply_weight(&mut target.w30, weights.w30);
                apply_weight(&mut target.w45, weights.w45);
                apply_weight(&mut target.w60, weights.w60);
            }
            if let Some(rounding_threshold) = policy.rounding_threshold {
                self.policy.rounding_threshold = rounding_threshold;
            }
            if let Some(plan_days_top) = policy.plan_days_top {
                self.policy.plan_days_top = plan_days_top;
            }
            if let Some(plan_days_positive) = policy.plan_days_positive {
                self.policy.plan_days_positive = plan_days_positive;
            }
            if let Some(plan_days_default) = policy.plan_days_default {
                self.policy.plan_days_default = plan_days_default;
            }
        }

        if let Some(batch) = patch.batch {
            if let Some(parallel) = batch.parallel {
                self.batch.parallel = parallel;
            }
        }

        if let Some(output) = patch.output {
            if let Some(quantity_column) = output.quantity_column {
                self.output.quantity_column = quantity_column;
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
        let incl = &mut self.policy.weight_incl;
        for (key, slot) in [
            ("REPLENISH_WEIGHT_INCL_7", &mut incl.w7),
            ("REPLENISH_WEIGHT_INCL_15", &mut incl.w15),
            ("REPLENISH_WEIGHT_INCL_30", &mut incl.w30),
            ("REPLENISH_WEIGHT_INCL_45", &mut incl.w45),
            ("REPLENISH_WEIGHT_INCL_60", &mut incl.w60),
        ] {
            if let Some(value) = read_env(key) {
                *slot = parse_f64(key, &value)?;
            }
        }

        let excl = &mut self.policy.weight_excl;
        for (key, slot) in [
            ("REPLENISH_WEIGHT_EXCL_15", &mut excl.w15),
            ("REPLENISH_WEIGHT_EXCL_30", &mut excl.w30),
            ("REPLENISH_WEIGHT_EXCL_45", &mut excl.w45),
            ("REPLENISH_WEIGHT_EXCL_60", &mut excl.w60),
        ] {
            if let Some(value) = read_env(key) {
                *slot = parse_f64(key, &value)?;
            }
        }

        if let Some(value) = read_env("REPLENISH_ROUNDING_THRESHOLD") {
            self.policy.rounding_threshold = parse_f64("REPLENISH_ROUNDING_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("REPLENISH_PLAN_DAYS_TOP") {
            self.policy.plan_days_top = parse_u32("REPLENISH_PLAN_DAYS_TOP", &value)?;
        }
        if let Some(value) = read_env("REPLENISH_PLAN_DAYS_POSITIVE") {
            self.policy.plan_days_positive = parse_u32("REPLENISH_PLAN_DAYS_POSITIVE", &value)?;
        }
        if let Some(value) = read_env("REPLENISH_PLAN_DAYS_DEFAULT") {
            self.policy.plan_days_default = parse_u32("REPLENISH_PLAN_DAYS_DEFAULT", &value)?;
        }

        if let Some(value) = read_env("REPLENISH_BATCH_PARALLEL") {
            self.batch.parallel = parse_bool("REPLENISH_BATCH_PARALLEL", &value)?;
        }
        if let Some(value) = read_env("REPLENISH_OUTPUT_QUANTITY_COLUMN") {
            self.output.quantity_column = value;
        }

        let log_level =
            read_env("REPLENISH_LOGGING_LEVEL").or_else(|| read_env("REPLENISH_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("REPLENISH_LOGGING_FORMAT").or_else(|| read_env("REPLENISH_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(rounding_threshold) = overrides.rounding_threshold {
            self.policy.rounding_threshold = rounding_threshold;
        }
        if let Some(plan_days_top) = overrides.plan_days_top {
            self.policy.plan_days_top = plan_days_top;
        }
        if let Some(plan_days_positive) = overrides.plan_days_positive {
            self.policy.plan_days_positive = plan_days_positive;
        }
        if let Some(plan_days_default) = overrides.plan_days_default {
            self.policy.plan_days_default = plan_days_default;
        }
        if let Some(parallel) = overrides.batch_parallel {
            self.batch.parallel = parallel;
        }
        if let Some(quantity_column) = overrides.quantity_column {
            self.output.quantity_column = quantity_column;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_policy(&self.policy)?;
        validate_output(&self.output)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// Explicit path if it exists, else `replenish.toml`, else `config/replenish.toml`.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("replenish.toml"), PathBuf::from("config/replenish.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn apply_weight(slot: &mut f64, value: Option<f64>) {
    if let Some(value) = value {
        *slot = value;
    }
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

fn validate_policy(policy: &PolicyConfig) -> Result<(), ConfigError> {
    let incl = &policy.weight_incl;
    let excl = &policy.weight_excl;
    let weights = [
        ("policy.weight_incl.w7", incl.w7),
        ("policy.weight_incl.w15", incl.w15),
        ("policy.weight_incl.w30", incl.w30),
        ("policy.weight_incl.w45", incl.w45),
        ("policy.weight_incl.w60", incl.w60),
        ("policy.weight_excl.w15", excl.w15),
        ("policy.weight_excl.w30", excl.w30),
        ("policy.weight_excl.w45", excl.w45),
        ("policy.weight_excl.w60", excl.w60),
    ];
    for (key, weight) in weights {
        if !(0.0..=1.0).contains(&weight) {
            return Err(ConfigError::Validation(format!(
                "{key} must be in range 0.0..=1.0 (got {weight})"
            )));
        }
    }

    if !ROUNDING_THRESHOLD_RANGE.contains(&policy.rounding_threshold) {
        return Err(ConfigError::Validation(format!(
            "policy.rounding_threshold must be in range 0.5..=1.0 (got {})",
            policy.rounding_threshold
        )));
    }

    for (key, days) in [
        ("policy.plan_days_top", policy.plan_days_top),
        ("policy.plan_days_positive", policy.plan_days_positive),
        ("policy.plan_days_default", policy.plan_days_default),
    ] {
        if !PLAN_DAYS_RANGE.contains(&days) {
            return Err(ConfigError::Validation(format!(
                "{key} must be in range 15..=60 (got {days})"
            )));
        }
    }

    Ok(())
}

fn validate_output(output: &OutputConfig) -> Result<(), ConfigError> {
    if output.quantity_column.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output.quantity_column must not be empty".to_string(),
        ));
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

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.trim().parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    policy: Option<PolicyPatch>,
    batch: Option<BatchPatch>,
    output: Option<OutputPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct PolicyPatch {
    weight_incl: Option<InclusiveWeightsPatch>,
    weight_excl: Option<ExclusiveWeightsPatch>,
    rounding_threshold: Option<f64>,
    plan_days_top: Option<u32>,
    plan_days_positive: Option<u32>,
    plan_days_default: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct InclusiveWeightsPatch {
    w7: Option<f64>,
    w15: Option<f64>,
    w30: Option<f64>,
    w45: Option<f64>,
    w60: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ExclusiveWeightsPatch {
    w15: Option<f64>,
    w30: Option<f64>,
    w45: Option<f64>,
    w60: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct BatchPatch {
    parallel: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputPatch {
    quantity_column: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
