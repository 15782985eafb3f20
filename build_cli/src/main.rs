//! build_cli - Loads a scenario, runs the optimizers and prints a report

use build_cli::scenario::Scenario;
use build_cli::{parse_args, report, run, CliError, USAGE};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn execute() -> Result<(), CliError> {
    let args = parse_args(std::env::args().skip(1))?;
    info!(scenario = %args.scenario.display(), mode = ?args.mode, "starting");

    let scenario = Scenario::load(&args.scenario)?;
    let prepared = scenario.prepare()?;
    let result = run(&prepared, args.mode)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", report::render(&result));
    }
    Ok(())
}

fn main() -> ExitCode {
    // Logging setup; reports go to stdout, logs to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Usage(message)) => {
            eprintln!("{message}\n{USAGE}");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
