//! `carg`: converts a CARG dataset exported as GeoJSON into the standardized
//! deliverables and per-sheet geometry reports.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use carg_cli::logging::{LogConfig, LogFormat, init_logging};
use carg_core::PipelineError;
use carg_output::SUMMARY_FILE_NAME;
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_conversion, run_layers};
use crate::summary::print_summary;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&log_config(&cli)) {
        eprintln!("carg: cannot set up logging: {error}");
        return ExitCode::FAILURE;
    }

    match cli.command {
        Command::Run(args) => match run_conversion(&args) {
            Ok(result) => {
                print_summary(&result);
                if result.summary.has_failures() {
                    let outputs = &result.summary.outputs;
                    let failed = outputs.len() - result.summary.emitted();
                    eprintln!(
                        "carg: {failed} of {} deliverables not written, see {}",
                        outputs.len(),
                        result.settings.output_dir.join(SUMMARY_FILE_NAME).display()
                    );
                    ExitCode::FAILURE
                } else {
                    ExitCode::SUCCESS
                }
            }
            Err(error) => report_abort(&error),
        },
        Command::Layers => match run_layers() {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => report_abort(&error),
        },
    }
}

/// Run-level aborts leave the output directory untouched; say so.
fn report_abort(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<PipelineError>() {
        Some(abort) => eprintln!("carg: run aborted, nothing written: {abort}"),
        None => eprintln!("carg: {error:#}"),
    }
    ExitCode::FAILURE
}

/// `--log-level` wins over `-v`/`-q`; with neither, `RUST_LOG` applies.
fn log_config(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        level_filter,
        use_env_filter: !(cli.verbosity.is_present() || cli.log_level.is_some()),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        },
        log_file: cli.log_file.clone(),
        with_ansi,
        ..LogConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("valid arguments")
    }

    #[test]
    fn explicit_level_disables_rust_log() {
        let cli = parse(&["carg", "--log-level", "debug", "--log-format", "json", "layers"]);
        let config = log_config(&cli);
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn defaults_defer_to_rust_log() {
        let cli = parse(&["carg", "--color", "never", "run", "data"]);
        let config = log_config(&cli);
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
        assert!(!config.with_ansi);
    }
}
