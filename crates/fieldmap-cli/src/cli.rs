//! CLI argument definitions for the field mapper.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use fieldmap_cli::setup::PipelineSources;
use fieldmap_model::{Category, ConfidenceThresholds};

#[derive(Parser)]
#[command(
    name = "fieldmap",
    version,
    about = "Map spreadsheet headers onto canonical company fields",
    long_about = "Map the headers of a company-information spreadsheet onto canonical fields.\n\n\
                  Accepts comma, semicolon or tab separated uploads in Spanish or English,\n\
                  extracts the company record and its shareholders, and flags weak mappings\n\
                  for review."
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
    /// Process an upload and print the mapping result.
    Process(ProcessArgs),

    /// List the canonical fields of the synonym dictionary.
    Dictionary(DictionaryArgs),

    /// Manage organization mapping profiles.
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Process an upload and save its mappings as the organization's profile.
    Save(ProfileSaveArgs),

    /// Print the latest profile of an organization.
    Show(ProfileShowArgs),

    /// List stored profiles by organization.
    List(ProfileListArgs),
}

/// Dictionary and tuning sources shared by the commands that map headers.
#[derive(Args, Clone, Default)]
pub struct PipelineArgs {
    /// Alternate synonym dictionary CSV (default: $FIELDMAP_DICTIONARY, then built-in).
    #[arg(long = "dictionary", value_name = "CSV")]
    pub dictionary: Option<PathBuf>,

    /// Pipeline options in TOML (thresholds, size ceiling).
    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Confidence threshold preset; replaces any thresholds from --config.
    #[arg(long = "thresholds", value_enum, value_name = "PRESET")]
    pub thresholds: Option<ThresholdPresetArg>,
}

impl PipelineArgs {
    /// Sources for a pipeline consulting `profiles`, if given.
    pub fn sources(&self, profiles: Option<PathBuf>) -> PipelineSources {
        PipelineSources {
            dictionary: self.dictionary.clone(),
            config: self.config.clone(),
            thresholds: self.thresholds.map(ThresholdPresetArg::thresholds),
            profiles,
        }
    }
}

#[derive(Parser)]
pub struct ProcessArgs {
    /// Spreadsheet export to process (CSV, semicolon or tab separated).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Organization the upload belongs to.
    #[arg(long = "org", value_name = "ID")]
    pub org: String,

    /// Directory of saved mapping profiles to consult.
    #[arg(long = "profiles", value_name = "DIR")]
    pub profiles: Option<PathBuf>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,

    /// Correlation id echoed in error responses.
    #[arg(long = "request-id", value_name = "ID")]
    pub request_id: Option<String>,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Parser)]
pub struct DictionaryArgs {
    /// Only list fields of one category.
    #[arg(long = "category", value_name = "CATEGORY")]
    pub category: Option<Category>,

    /// Alternate synonym dictionary CSV.
    #[arg(long = "dictionary", value_name = "CSV")]
    pub dictionary: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ProfileSaveArgs {
    /// Upload whose mappings should be approved.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[arg(long = "org", value_name = "ID")]
    pub org: String,

    /// Profile store directory (created if missing).
    #[arg(long = "profiles", value_name = "DIR")]
    pub profiles: PathBuf,

    /// Profile identifier (default: derived from the current time).
    #[arg(long = "profile-id", value_name = "ID")]
    pub profile_id: Option<String>,

    /// Free-text note stored with the profile.
    #[arg(long = "description", value_name = "TEXT")]
    pub description: Option<String>,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Parser)]
pub struct ProfileShowArgs {
    #[arg(long = "org", value_name = "ID")]
    pub org: String,

    #[arg(long = "profiles", value_name = "DIR")]
    pub profiles: PathBuf,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Parser)]
pub struct ProfileListArgs {
    #[arg(long = "profiles", value_name = "DIR")]
    pub profiles: PathBuf,

    /// Only list profiles of one organization.
    #[arg(long = "org", value_name = "ID")]
    pub org: Option<String>,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ThresholdPresetArg {
    Default,
    Strict,
    Relaxed,
}

impl ThresholdPresetArg {
    fn thresholds(self) -> ConfidenceThresholds {
        match self {
            Self::Default => ConfidenceThresholds::default(),
            Self::Strict => ConfidenceThresholds::strict(),
            Self::Relaxed => ConfidenceThresholds::relaxed(),
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
