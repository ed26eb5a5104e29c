use clap::{Args, Parser, Subcommand};
use propah::FilterPreset;
use std::path::PathBuf;
use terrain::DEFAULT_BATCH_SIZE;

/// Radio line of sight, interference, and heatmap analysis.
///
/// Every command reads a JSON request from FILE ('-' for stdin) and
/// prints a JSON response to stdout.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pretty-print output.
    #[arg(short, long, default_value_t = false)]
    pub pretty: bool,

    /// Coordinates per elevation lookup.
    #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Terrain-aware line of sight between two components.
    Los(Los),

    /// Carriers and intermodulation products at a receiver.
    Interference(Interference),

    /// Carrier power sampled around a point.
    Heatmap(Heatmap),

    /// Every intermodulation product of a component list.
    Intermod(Intermod),

    /// List the named filter curves.
    Presets,
}

#[derive(Debug, Clone, Args)]
pub struct Los {
    /// LOS request.
    pub input: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct Interference {
    /// Receiver id, when the input is a bare component list (defaults
    /// to the first receiver).
    #[arg(short, long)]
    pub receiver: Option<String>,

    /// Replace the request's filter curve.
    #[arg(short, long)]
    pub filter: Option<FilterPreset>,

    /// Interference request, or a component list.
    pub input: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct Heatmap {
    /// Replace the request's filter curve.
    #[arg(short, long)]
    pub filter: Option<FilterPreset>,

    /// Heatmap request.
    pub input: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct Intermod {
    /// Highest product order (2..=5).
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(2..=5))]
    pub max_order: u8,

    /// Component list.
    pub input: PathBuf,
}
