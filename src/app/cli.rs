//! This module implements the definition of the command line app.

use std::path::PathBuf;

use crate::logging;
use clap::{Parser, Subcommand, ValueHint};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const ABOUT: &str = "Builds a per-country IPv4 blocklist file.";

#[derive(Parser, Debug)]
#[clap(
    name = "country-blocklist",
    version = VERSION,
    about = ABOUT,
    disable_help_subcommand = true,
    subcommand_required = true,
)]
pub struct CliApp {
    #[clap(
        short,
        long,
        global = true,
        help = "The path to the config file.",
        value_hint = ValueHint::FilePath
    )]
    pub config: Option<PathBuf>,

    #[clap(
        short = 'C',
        long,
        global = true,
        value_name = "CODE",
        help = "The two-letter country code to fetch ranges for."
    )]
    pub country: Option<String>,

    #[clap(
        short,
        long,
        global = true,
        value_name = "PATH",
        help = "Where to write the blocklist file.",
        value_hint = ValueHint::FilePath
    )]
    pub output: Option<PathBuf>,

    #[clap(
        short,
        long,
        global = true,
        value_name = "LEVEL",
        help = "Set the log level filter.",
        value_enum
    )]
    pub log_level: Option<logging::Level>,

    #[clap(
        long,
        global = true,
        value_name = "FORMAT",
        help = "Set the logging output format.",
        value_enum
    )]
    pub log_format: Option<logging::LogFormat>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the blocklist
    #[clap(
        about = "Build the blocklist",
        after_help = "This fetches the country's ranges from every provider, expands them \
                      to individual addresses and rewrites the output file, then exits."
    )]
    Run,
}
