use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sportforged")]
#[command(author, version, about = "Match sports recordings to show metadata")]
pub struct Cli {
    /// Config file (defaults to ./sportforged.toml, then the user and system locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Trace-level logging for every sportforged crate
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match files to seasons and episodes of a sport's show
    Match {
        /// Sport id from the config
        #[arg(short, long)]
        sport: String,

        /// Show snapshot JSON (overrides the sport's configured show)
        #[arg(long)]
        show: Option<PathBuf>,

        /// JSON file of prior quality scores keyed by destination
        #[arg(long)]
        scores: Option<PathBuf>,

        /// Include the full match trace
        #[arg(long)]
        trace: bool,

        /// Print reports as a JSON array
        #[arg(long)]
        json: bool,

        /// Files to match
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Extract and score the quality of a release name
    Quality {
        /// Use this sport's quality override
        #[arg(short, long)]
        sport: Option<String>,

        /// Score of the file currently at the destination
        #[arg(long, conflicts_with = "scores")]
        prior: Option<i64>,

        /// JSON file of prior quality scores keyed by destination
        #[arg(long, requires = "destination")]
        scores: Option<PathBuf>,

        /// Destination key to look up in the scores file
        #[arg(long)]
        destination: Option<String>,

        /// Print the quality, score, and comparison as JSON
        #[arg(long)]
        json: bool,

        /// Release name or path
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Validate configuration file and compile every enabled sport
    Validate {
        /// Config file to check (falls back to --config, then the default locations)
        config: Option<PathBuf>,
    },

    /// Print the sportforged version
    Version,
}
