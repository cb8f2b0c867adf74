use std::time::Instant;

use replenish_core::config::ConfigOverrides;
use replenish_core::{ApplicationError, BatchMode, BatchRunner, BatchSummary};
use replenish_ingest::{export_csv, load_records, ColumnReport};
use serde::Serialize;
use tracing::info;

use crate::commands::{load_config, start_run, CommandResult, EXIT_CONFIG};
use crate::RecommendArgs;

const COMMAND: &str = "recommend";

#[derive(Debug, Serialize)]
struct RecommendReport<'a> {
    input: String,
    output: String,
    quantity_column: &'a str,
    batch_mode: BatchMode,
    elapsed_ms: u64,
    columns: &'a ColumnReport,
    summary: &'a BatchSummary,
}

pub fn run(args: &RecommendArgs) -> CommandResult {
    let overrides = ConfigOverrides {
        rounding_threshold: args.threshold,
        plan_days_top: args.plan_days_top,
        plan_days_positive: args.plan_days_positive,
        plan_days_default: args.plan_days_default,
        batch_parallel: args.sequential.then_some(false),
        ..ConfigOverrides::default()
    };

    let config = match load_config(args.config.as_deref(), overrides) {
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
    let started = Instant::now();

    let loaded = match load_records(&args.input, args.strict) {
        Ok(loaded) => loaded,
        Err(error) => return CommandResult::from_error(COMMAND, &run_id, error.into()),
    };

    let runner = BatchRunner::new(config.batch.mode());
    let outcome = runner.run(&loaded.records, &config.policy);

    let quantity_column = config.output.quantity_column.as_str();
    if let Err(error) =
        export_csv(&loaded.sheet, &outcome.quantities(), quantity_column, &args.output)
    {
        return CommandResult::from_error(COMMAND, &run_id, ApplicationError::from(error));
    }

    let summary = &outcome.summary;
    let elapsed_ms = started.elapsed().as_millis() as u64;
    info!(
        event_name = "cli.recommend.completed",
        correlation_id = %run_id,
        rows = summary.rows,
        ordered_rows = summary.ordered_rows,
        total_units = summary.total_units,
        policy_checksum = %summary.policy_checksum,
        elapsed_ms,
        "replenishment run exported"
    );

    let report = RecommendReport {
        input: args.input.display().to_string(),
        output: args.output.display().to_string(),
        quantity_column,
        batch_mode: runner.mode(),
        elapsed_ms,
        columns: &loaded.columns,
        summary,
    };
    let details = match serde_json::to_value(&report) {
        Ok(details) => details,
        Err(error) => {
            return CommandResult::failure(COMMAND, "serialization", error.to_string(), 1);
        }
    };

    let message = format!(
        "{} of {} rows need an order ({} units)",
        summary.ordered_rows, summary.rows, summary.total_units
    );
    CommandResult::success_with_details(COMMAND, Some(&run_id), message, details)
}
