use std::path::PathBuf;

use clap::Parser;

use super::logging::LogDestination;

/// Find out what your pet is thinking.
///
/// With FILE or --paste the image is analyzed once and the verdict printed.
/// Without either an interactive session starts; type `help` for commands.
#[derive(Debug, Parser)]
#[command(name = "petsight", version)]
pub struct Cli {
    /// Image to analyze (png, jpeg or webp).
    pub file: Option<PathBuf>,

    /// Analyze the image currently on the clipboard.
    #[arg(long, conflicts_with = "file")]
    pub paste: bool,

    /// Base URL of the analysis service; `/api/upload` is appended.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Give up on the analysis request after this many seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Configuration file (RON).
    #[arg(long, default_value = "petsight.ron")]
    pub config: PathBuf,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}
