use std::env;
use std::fs;
use std::path::Path;

use replenish_core::config::{resolve_config_path, AppConfig};
use replenish_core::ConfigOverrides;
use serde::Serialize;
use serde_json::json;
use toml::Value;

use crate::commands::{load_config, CommandResult, EXIT_CONFIG};

const COMMAND: &str = "config";

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run(config_path: Option<&Path>) -> CommandResult {
    let config = match load_config(config_path, ConfigOverrides::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "config_validation",
                format!("config validation failed: {error}"),
                EXIT_CONFIG,
            );
        }
    };

    let file_path = resolve_config_path(config_path);
    let file_doc = load_config_file_doc(file_path.as_deref());
    let entries = effective_entries(&config)
        .into_iter()
        .map(|(key, env_keys, value)| ConfigEntry {
            key,
            value,
            source: field_source(key, env_keys, file_doc.as_ref(), file_path.as_deref()),
        })
        .collect::<Vec<_>>();

    let details = json!({
        "config_file": file_path.map(|path| path.display().to_string()),
        "policy_checksum": config.policy.checksum(),
        "entries": entries,
    });
    CommandResult::success_with_details(
        COMMAND,
        None,
        "effective config (source precedence: env > file > default)",
        details,
    )
}

type EntryRow = (&'static str, &'static [&'static str], String);

fn entry(key: &'static str, env_keys: &'static [&'static str], value: String) -> EntryRow {
    (key, env_keys, value)
}

fn effective_entries(config: &AppConfig) -> Vec<EntryRow> {
    let policy = &config.policy;
    let incl = &policy.weight_incl;
    let excl = &policy.weight_excl;

    vec![
        entry("policy.weight_incl.w7", &["REPLENISH_WEIGHT_INCL_7"], incl.w7.to_string()),
        entry("policy.weight_incl.w15", &["REPLENISH_WEIGHT_INCL_15"], incl.w15.to_string()),
        entry("policy.weight_incl.w30", &["REPLENISH_WEIGHT_INCL_30"], incl.w30.to_string()),
        entry("policy.weight_incl.w45", &["REPLENISH_WEIGHT_INCL_45"], incl.w45.to_string()),
        entry("policy.weight_incl.w60", &["REPLENISH_WEIGHT_INCL_60"], incl.w60.to_string()),
        entry("policy.weight_excl.w15", &["REPLENISH_WEIGHT_EXCL_15"], excl.w15.to_string()),
        entry("policy.weight_excl.w30", &["REPLENISH_WEIGHT_EXCL_30"], excl.w30.to_string()),
        entry("policy.weight_excl.w45", &["REPLENISH_WEIGHT_EXCL_45"], excl.w45.to_string()),
        entry("policy.weight_excl.w60", &["REPLENISH_WEIGHT_EXCL_60"], excl.w60.to_string()),
        entry(
            "policy.rounding_threshold",
            &["REPLENISH_ROUNDING_THRESHOLD"],
            policy.rounding_threshold.to_string(),
        ),
        entry(
            "policy.plan_days_top",
            &["REPLENISH_PLAN_DAYS_TOP"],
            policy.plan_days_top.to_string(),
        ),
        entry(
            "policy.plan_days_positive",
            &["REPLENISH_PLAN_DAYS_POSITIVE"],
            policy.plan_days_positive.to_string(),
        ),
        entry(
            "policy.plan_days_default",
            &["REPLENISH_PLAN_DAYS_DEFAULT"],
            policy.plan_days_default.to_string(),
        ),
        entry("batch.parallel", &["REPLENISH_BATCH_PARALLEL"], config.batch.parallel.to_string()),
        entry(
            "output.quantity_column",
            &["REPLENISH_OUTPUT_QUANTITY_COLUMN"],
            config.output.quantity_column.clone(),
        ),
        entry(
            "logging.level",
            &["REPLENISH_LOGGING_LEVEL", "REPLENISH_LOG_LEVEL"],
            config.logging.level.clone(),
        ),
        entry(
            "logging.format",
            &["REPLENISH_LOGGING_FORMAT", "REPLENISH_LOG_FORMAT"],
            format!("{:?}", config.logging.format).to_ascii_lowercase(),
        ),
    ]
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
    for env_key in env_keys {
        let set = env::var(env_key).map(|value| !value.trim().is_empty()).unwrap_or(false);
        if set {
            return format!("env ({env_key})");
        }
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
