use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;

use hexcheck::cli::{Cli, OutputFormat};
use hexcheck::engine::{FileOutcome, check_files};
use hexcheck::logging::init_logging;
use hexcheck::report::{self, EXIT_FATAL};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.config();

    init_logging(config.debug).context("Failed to initialise logging")?;

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let paths = match config.input.resolve(&cwd) {
        Ok(paths) => paths,
        Err(e) => {
            let outcome = FileOutcome {
                path: cwd,
                result: Err(e),
            };
            emit(config.output, std::slice::from_ref(&outcome))?;
            return Ok(ExitCode::from(EXIT_FATAL));
        }
    };

    let outcomes = check_files(&paths, config.mode, config.decode_policy());
    emit(config.output, &outcomes)?;

    Ok(ExitCode::from(report::exit_code(&outcomes)))
}

fn emit(output: OutputFormat, outcomes: &[FileOutcome]) -> Result<()> {
    match output {
        OutputFormat::Text => report::print_outcomes(outcomes),
        OutputFormat::Json => {
            let json = report::render_json(outcomes).context("Failed to serialise report")?;
            println!("{json}");
        }
    }
    Ok(())
}
