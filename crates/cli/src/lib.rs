pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "replenish",
    about = "SKU replenishment operator CLI",
    long_about = "Compute purchase-order quantities for an inventory sheet, explain single rows, \
                  and inspect the effective replenishment policy.",
    after_help = "Examples:\n  replenish recommend --input stock.xlsx --output po.csv\n  \
                  replenish explain --input stock.xlsx --row 12\n  replenish config\n  \
                  replenish doctor --input stock.csv --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Evaluate every row of a sheet and export the recommended quantities")]
    Recommend(RecommendArgs),
    #[command(about = "Show the classification and quantity trace for one data row")]
    Explain(ExplainArgs),
    #[command(about = "Inspect effective policy values with source attribution")]
    Config {
        #[arg(long, help = "Path to a replenish.toml file")]
        config: Option<PathBuf>,
    },
    #[command(about = "Validate configuration and input sheet readiness")]
    Doctor {
        #[arg(long, help = "Input sheet to check for required columns")]
        input: Option<PathBuf>,
        #[arg(long, help = "Path to a replenish.toml file")]
        config: Option<PathBuf>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

#[derive(Clone, Debug, Default, Args)]
pub struct RecommendArgs {
    #[arg(long, help = "Input sheet (.xlsx, .xls or .csv)")]
    pub input: PathBuf,
    #[arg(long, help = "Destination CSV file")]
    pub output: PathBuf,
    #[arg(long, help = "Path to a replenish.toml file")]
    pub config: Option<PathBuf>,
    #[arg(long, help = "Rounding threshold in 0.5..=1.0")]
    pub threshold: Option<f64>,
    #[arg(long, help = "Plan days for top-ranked and hotcake SKUs")]
    pub plan_days_top: Option<u32>,
    #[arg(long, help = "Plan days for positively reviewed SKUs")]
    pub plan_days_positive: Option<u32>,
    #[arg(long, help = "Plan days for every other SKU")]
    pub plan_days_default: Option<u32>,
    #[arg(long, help = "Evaluate rows on the current thread only")]
    pub sequential: bool,
    #[arg(long, help = "Fail when any required column is missing")]
    pub strict: bool,
}

#[derive(Clone, Debug, Default, Args)]
pub struct ExplainArgs {
    #[arg(long, help = "Input sheet (.xlsx, .xls or .csv)")]
    pub input: PathBuf,
    #[arg(long, help = "1-based data row number")]
    pub row: usize,
    #[arg(long, help = "Path to a replenish.toml file")]
    pub config: Option<PathBuf>,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Recommend(args) => commands::recommend::run(&args),
        Command::Explain(args) => commands::explain::run(&args),
        Command::Config { config } => commands::config::run(config.as_deref()),
        Command::Doctor { input, config, json } => {
            commands::doctor::run(input.as_deref(), config.as_deref(), json)
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
