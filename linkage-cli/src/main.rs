//! Entry point of the `linkage` binary.
//!
//! Installs logging, runs the parsed command and prints the summary to
//! stdout. Failures are logged with their stable error code and turn into a
//! non-zero exit status.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use linkage_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("clustering command failed")?;
    let mut writer = BufWriter::new(io::stdout().lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush stdout")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_error(&err);
        return ExitCode::FAILURE;
    }

    let Err(err) = try_main() else {
        return ExitCode::SUCCESS;
    };
    let (code, data_source_code) = match err.downcast_ref::<CliError>() {
        Some(CliError::Core(core)) => (Some(core.code()), core.data_source_code()),
        _ => (None, None),
    };
    error!(
        error = %format_args!("{err:#}"),
        code = code.map(|code| field::display(code.as_str())),
        data_source_code = data_source_code.map(|code| field::display(code.as_str())),
        "command execution failed"
    );
    ExitCode::FAILURE
}

fn report_logging_error(err: &LoggingError) {
    eprintln!("failed to initialise logging: {err}");
}
