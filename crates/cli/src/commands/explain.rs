use replenish_core::config::ConfigOverrides;
use replenish_core::{
    ApplicationError, DeterministicReplenishmentEngine, DomainError, Recommendation,
    ReplenishmentEngine, SkuRecord,
};
use replenish_ingest::load_records;
use serde::Serialize;
use tracing::info;

use crate::commands::{load_config, start_run, CommandResult, EXIT_CONFIG};
use crate::ExplainArgs;

const COMMAND: &str = "explain";

#[derive(Debug, Serialize)]
struct ExplainReport<'a> {
    row: usize,
    record: &'a SkuRecord,
    recommendation: &'a Recommendation,
    policy_checksum: String,
}

pub fn run(args: &ExplainArgs) -> CommandResult {
    let config = match load_config(args.config.as_deref(), ConfigOverrides::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "config_validation",
                format!("configuration issue: {error}"),
                EXIT_CONFIG,
            );
        }
    };

    let run_id = start_run(&config, COMMAND);

    let loaded = match load_records(&args.input, false) {
        Ok(loaded) => loaded,
        Err(error) => return CommandResult::from_error(COMMAND, &run_id, error.into()),
    };

    let rows = loaded.records.len();
    let Some(record) = args.row.checked_sub(1).and_then(|index| loaded.records.get(index)) else {
        let error = DomainError::RowOutOfRange { row: args.row, rows };
        return CommandResult::from_error(COMMAND, &run_id, ApplicationError::from(error));
    };

    let recommendation = DeterministicReplenishmentEngine.evaluate(record, &config.policy);
    info!(
        event_name = "cli.explain.evaluated",
        correlation_id = %run_id,
        row = args.row,
        quantity = recommendation.quantity,
        "row explained"
    );

    let report = ExplainReport {
        row: args.row,
        record,
        recommendation: &recommendation,
        policy_checksum: config.policy.checksum(),
    };
    let details = match serde_json::to_value(&report) {
        Ok(details) => details,
        Err(error) => {
            return CommandResult::failure(COMMAND, "serialization", error.to_string(), 1);
        }
    };

    let message = format!(
        "row {} recommends {} units ({:?})",
        args.row, recommendation.quantity, recommendation.trace.decision.outcome
    );
    CommandResult::success_with_details(COMMAND, Some(&run_id), message, details)
}
