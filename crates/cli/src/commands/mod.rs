pub mod config;
pub mod doctor;
pub mod explain;
pub mod recommend;

use std::path::Path;

use replenish_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use replenish_core::{ApplicationError, ConfigError};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};
use uuid::Uuid;

use crate::logging::init_logging;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_INGESTION: u8 = 3;
pub const EXIT_EXPORT: u8 = 4;
pub const EXIT_BAD_ARGUMENTS: u8 = 5;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    run_id: Option<String>,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl CommandResult {
    pub fn success_with_details(
        command: &str,
        run_id: Option<&str>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            run_id: run_id.map(str::to_string),
            error_class: None,
            message: message.into(),
            hint: None,
            details: Some(details),
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
            run_id: None,
            error_class: Some(error_class.to_string()),
            message: message.into(),
            hint: None,
            details: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Failure payload for a run that already has a run id.
    pub fn from_error(command: &str, run_id: &str, error: ApplicationError) -> Self {
        let exit_code = exit_code_for(&error);
        let error_class = error.class();
        let message = error.to_string();
        let interface = error.into_interface(run_id);

        error!(
            event_name = "cli.command.failed",
            correlation_id = interface.correlation_id(),
            command,
            error_class,
            error = %message,
            "command failed"
        );

        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            run_id: Some(run_id.to_string()),
            error_class: Some(error_class.to_string()),
            message,
            hint: Some(interface.user_message().to_string()),
            details: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

pub fn exit_code_for(error: &ApplicationError) -> u8 {
    match error {
        ApplicationError::Configuration(_) => EXIT_CONFIG,
        ApplicationError::Ingestion(_) => EXIT_INGESTION,
        ApplicationError::Export(_) => EXIT_EXPORT,
        ApplicationError::Domain(_) => EXIT_BAD_ARGUMENTS,
    }
}

/// An explicit `--config` path must exist; otherwise the default locations are optional.
pub(crate) fn load_config(
    config_path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<AppConfig, ConfigError> {
    AppConfig::load(LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        require_file: config_path.is_some(),
        overrides,
    })
}

/// Installs logging for this run and hands back its correlation id.
pub(crate) fn start_run(config: &AppConfig, command: &str) -> String {
    if let Err(error) = init_logging(config) {
        debug!(event_name = "cli.logging.reused", error = %error, "keeping existing subscriber");
    }

    let run_id = Uuid::new_v4().to_string();
    debug!(event_name = "cli.run.start", correlation_id = %run_id, command, "run started");
    run_id
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
