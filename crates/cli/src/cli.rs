//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Timezone-aware calendars driven by text commands.
#[derive(Debug, Parser)]
#[command(name = "zonecal")]
#[command(about = "Timezone-aware calendars driven by text commands", long_about = None)]
pub struct Cli {
    /// Name of the calendar in use at start-up.
    #[arg(long, global = true)]
    pub calendar: Option<String>,

    /// IANA timezone of the start-up calendar.
    #[arg(long, global = true)]
    pub timezone: Option<String>,

    /// Output format for event listings.
    #[arg(long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub mode: Mode,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON arrays of events.
    Json,
    /// One line per event.
    #[default]
    Pretty,
}

/// How commands are read.
#[derive(Debug, Subcommand)]
pub enum Mode {
    /// Read commands from stdin, reporting errors and carrying on.
    Interactive,
    /// Run a script of commands, stopping at the first error.
    Headless {
        /// Script file with one command per line.
        file: PathBuf,
    },
}
