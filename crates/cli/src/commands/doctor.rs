use std::path::Path;

use replenish_core::config::ConfigOverrides;
use replenish_ingest::{load_records, REQUIRED_COLUMNS};
use serde::Serialize;

use crate::commands::{load_config, CommandResult, EXIT_CONFIG, EXIT_INGESTION};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Warn,
    Fail,
    Skipped,
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

pub fn run(input: Option<&Path>, config_path: Option<&Path>, json_output: bool) -> CommandResult {
    let report = build_report(input, config_path);
    let exit_code = exit_code(&report);

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report(input: Option<&Path>, config_path: Option<&Path>) -> DoctorReport {
    let mut checks = Vec::new();

    match load_config(config_path, ConfigOverrides::default()) {
        Ok(config) => checks.push(DoctorCheck {
            name: "config_validation",
            status: CheckStatus::Pass,
            details: format!(
                "configuration loaded and validated (policy {})",
                config.policy.checksum()
            ),
        }),
        Err(error) => checks.push(DoctorCheck {
            name: "config_validation",
            status: CheckStatus::Fail,
            details: error.to_string(),
        }),
    }

    match input {
        Some(path) => checks.extend(check_input(path)),
        None => {
            let details = "no --input given".to_string();
            checks.push(DoctorCheck {
                name: "input_parse",
                status: CheckStatus::Skipped,
                details: details.clone(),
            });
            checks.push(DoctorCheck {
                name: "column_readiness",
                status: CheckStatus::Skipped,
                details,
            });
        }
    }

    let overall_status = if checks.iter().any(|check| check.status == CheckStatus::Fail) {
        CheckStatus::Fail
    } else if checks.iter().any(|check| check.status == CheckStatus::Warn) {
        CheckStatus::Warn
    } else {
        CheckStatus::Pass
    };
    let summary = match overall_status {
        CheckStatus::Fail => "doctor: one or more readiness checks failed",
        CheckStatus::Warn => "doctor: ready with warnings",
        _ => "doctor: all readiness checks passed",
    }
    .to_string();

    DoctorReport { overall_status, summary, checks }
}

fn check_input(path: &Path) -> Vec<DoctorCheck> {
    let loaded = match load_records(path, false) {
        Ok(loaded) => loaded,
        Err(error) => {
            return vec![
                DoctorCheck {
                    name: "input_parse",
                    status: CheckStatus::Fail,
                    details: error.to_string(),
                },
                DoctorCheck {
                    name: "column_readiness",
                    status: CheckStatus::Skipped,
                    details: "skipped because the input did not parse".to_string(),
                },
            ];
        }
    };

    let parse = DoctorCheck {
        name: "input_parse",
        status: CheckStatus::Pass,
        details: format!("{} data rows in `{}`", loaded.records.len(), path.display()),
    };

    let columns = if loaded.columns.is_complete() {
        DoctorCheck {
            name: "column_readiness",
            status: CheckStatus::Pass,
            details: format!("all {} required columns present", REQUIRED_COLUMNS.len()),
        }
    } else {
        DoctorCheck {
            name: "column_readiness",
            status: CheckStatus::Warn,
            details: format!(
                "missing {} (rows will use defaults)",
                loaded.columns.missing.join(", ")
            ),
        }
    };

    vec![parse, columns]
}

fn exit_code(report: &DoctorReport) -> u8 {
    let failed = |name: &str| {
        report.checks.iter().any(|check| check.name == name && check.status == CheckStatus::Fail)
    };

    if failed("config_validation") {
        EXIT_CONFIG
    } else if failed("input_parse") {
        EXIT_INGESTION
    } else {
        0
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Warn => "warn",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
