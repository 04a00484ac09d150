//! CLI argument definitions for the CARG converter.

use std::path::PathBuf;

use carg_standards::RingConvention;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "carg",
    version,
    about = "CARG layer standardization - convert geological survey layers to the delivery schema",
    long_about = "Convert CARG-coded geological survey layers into the seven standardized\n\
                  delivery layers.\n\n\
                  Decodes domain codes, merges fault and fold lines, checks geometries\n\
                  and writes one issue report per map sheet."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a dataset directory and write the deliverables.
    Run(RunArgs),

    /// List the declared CARG layers and their deliverables.
    Layers,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Dataset directory holding one GeoJSON file per CARG layer.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output directory (default: <INPUT>/output).
    #[arg(long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Domain table directory (default: $CARG_DOMINI_DIR, then <INPUT>/domini).
    #[arg(long = "domini", value_name = "DIR")]
    pub domini: Option<PathBuf>,

    /// TOML run configuration.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Sheet identifier for records without one.
    #[arg(long = "sheet", value_name = "ID")]
    pub sheet: Option<String>,

    /// Expected polygon ring winding.
    #[arg(long = "ring-convention", value_enum)]
    pub ring_convention: Option<RingConventionArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RingConventionArg {
    /// Exterior rings clockwise, holes counter-clockwise.
    Esri,
    /// Exterior rings counter-clockwise, holes clockwise.
    Ogc,
}

impl From<RingConventionArg> for RingConvention {
    fn from(value: RingConventionArg) -> Self {
        match value {
            RingConventionArg::Esri => RingConvention::Esri,
            RingConventionArg::Ogc => RingConvention::Ogc,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
