//! CLI argument definitions for the notice pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use notice_model::SdkVersion;

#[derive(Parser)]
#[command(
    name = "notice-pipeline",
    version,
    about = "Prune, sort and annotate eForms notices",
    long_about = "Transform eForms notice documents.\n\n\
                  Prunes unused optional groups from visual models, sorts notice XML\n\
                  into SDK schema order and annotates rule-validation (SVRL) reports."
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

    /// Resource directory with prune rules and SDK versions
    /// (default: $NOTICE_RESOURCES_DIR, else the bundled resources).
    #[arg(long = "resources", value_name = "DIR", global = true)]
    pub resources: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Remove unused optional groups from a visual model (JSON).
    Prune(PruneArgs),

    /// Reorder the elements of a notice to the SDK schema order.
    Sort(SortArgs),

    /// Annotate a rule-validation (SVRL) report with field labels.
    Report(ReportArgs),

    /// List SDK versions available under the resource directory.
    Versions,
}

#[derive(Parser)]
pub struct PruneArgs {
    /// Visual model JSON file.
    #[arg(value_name = "VISUAL_JSON")]
    pub input: PathBuf,

    /// Notice subtype (default: the noticeSubType key of the model root).
    #[arg(long = "subtype", value_name = "ID")]
    pub subtype: Option<String>,

    /// Write the pruned model here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct SortArgs {
    /// Notice XML file.
    #[arg(value_name = "NOTICE_XML")]
    pub input: PathBuf,

    /// SDK version the notice was written for, e.g. 1.10.
    #[arg(long = "sdk-version", value_name = "VERSION")]
    pub sdk_version: SdkVersion,

    /// Document type id or root element (default: the notice root element).
    #[arg(long = "document-type", value_name = "TYPE")]
    pub document_type: Option<String>,

    /// Write the sorted notice here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ReportArgs {
    /// SVRL report produced by the validation service.
    #[arg(value_name = "SVRL_XML")]
    pub input: PathBuf,

    /// SDK version of the validated notice.
    #[arg(long = "sdk-version", value_name = "VERSION")]
    pub sdk_version: SdkVersion,

    /// Language of the legend labels, e.g. en or it.
    #[arg(long = "lang", value_name = "LANG", default_value = "en")]
    pub lang: String,

    /// Validated notice; attached to the output when nothing failed.
    #[arg(long = "notice", value_name = "PATH")]
    pub notice: Option<PathBuf>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: ReportFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Json,
    Table,
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
