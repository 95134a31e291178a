//! Module describing all possible commands and sub-commands to the `airdata-etl` main driver
//!
//! - `run` does one invocation and exits (local ad-hoc mode)
//! - `schedule` does one invocation every `interval` until interrupted
//! - `schema` dumps the JSON schema of the input, output or configuration
//! - `completion` is here just to configure the various shells completion system.
//!

use std::path::PathBuf;

use clap::{
    crate_authors, crate_description, crate_name, crate_version, Parser, ValueEnum,
};
use clap_complete::shells::Shell;

/// CLI options
#[derive(Debug, Parser)]
#[command(disable_version_flag = true)]
#[clap(name = crate_name!(), about = crate_description!())]
#[clap(version = crate_version!(), author = crate_authors!())]
pub struct Opts {
    /// configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// debug mode, print results in logs.
    #[clap(short = 'D', long = "debug")]
    pub debug: bool,
    /// Air Data API token.
    #[clap(short = 't', long, env = "AIRDATA_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
    /// Output file (overrides the configured sink).
    #[clap(short = 'o', long)]
    pub output: Option<PathBuf>,
    /// Hierarchical logging output.
    #[clap(long)]
    pub tree: bool,
    /// Also log into this directory.
    #[clap(long)]
    pub log_dir: Option<PathBuf>,
    /// Sub-commands (see below).
    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

// ------

/// All sub-commands:
///
/// `run`
/// `schedule [-e DURATION] [-n COUNT]`
/// `schema (input|output|config)`
/// `completion SHELL`
/// `version`
///
#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Fetch, convert and submit once
    Run,
    /// Run periodically until interrupted
    Schedule(ScheduleOpts),
    /// Display JSON schemas
    Schema(SchemaOpts),
    /// Generate Completion stuff
    Completion(ComplOpts),
    /// List all package versions
    Version,
}

// ------

/// Options for the scheduled mode
///
#[derive(Debug, Parser)]
pub struct ScheduleOpts {
    /// Interval between runs (`30s`, `5m`, ...), overrides the configuration.
    #[clap(short = 'e', long)]
    pub every: Option<String>,
    /// Stop after this many runs.
    #[clap(short = 'n', long)]
    pub count: Option<usize>,
}

// ------

/// Which schema to display
///
#[derive(Debug, Parser)]
pub struct SchemaOpts {
    #[clap(value_parser)]
    pub kind: SchemaKind,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaKind {
    /// What the Air Data API sends
    Input,
    /// What we submit
    Output,
    /// The configuration file
    Config,
}

// ------

/// Options to generate completion files at runtime
///
#[derive(Debug, Parser)]
pub struct ComplOpts {
    #[clap(value_parser)]
    pub shell: Shell,
}
