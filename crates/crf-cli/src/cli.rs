//! CLI argument definitions for the CRF definition tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "crf",
    version,
    about = "Validate and inspect clinical case report form definitions",
    long_about = "Check case report form (CRF) definitions against the worksheet\n\
                  field constraints, and inspect the items, response sets, and\n\
                  conditional display rules they declare."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a CRF definition file.
    Validate(ValidateArgs),

    /// List the items a CRF definition declares.
    Items(ItemsArgs),
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Path to the CRF definition (JSON).
    #[arg(value_name = "FORM")]
    pub form: PathBuf,

    /// Fail on warnings as well as errors.
    #[arg(long = "strict")]
    pub strict: bool,
}

#[derive(Parser)]
pub struct ItemsArgs {
    /// Path to the CRF definition (JSON).
    #[arg(value_name = "FORM")]
    pub form: PathBuf,

    /// Only list items from this section.
    #[arg(long = "section", value_name = "LABEL")]
    pub section: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
