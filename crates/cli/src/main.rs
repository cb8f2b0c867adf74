use std::process::ExitCode;

fn main() -> ExitCode {
    replenish_cli::run()
}
