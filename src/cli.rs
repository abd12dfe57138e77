use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "swarmscore")]
#[command(author, version, about = "Piece ancestry and playback segments from transfer logs")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Group a chunk log into playback segments
    Interpret {
        /// Chunk log (JSON)
        #[arg(required = true)]
        log: PathBuf,

        /// Also print every chunk stamped with its segment id
        #[arg(long)]
        annotate: bool,
    },

    /// Consolidate a chunk log into non-overlapping pieces with their ancestry
    Ancestry {
        /// Chunk log (JSON)
        #[arg(required = true)]
        log: PathBuf,

        /// Track interpreted segments instead of raw chunks
        #[arg(long)]
        segments: bool,

        /// Record which peers contributed to each piece
        #[arg(long)]
        contributors: bool,

        /// Only track chunks of this file (required when the log spans several files)
        #[arg(short = 'n', long)]
        filenum: Option<u32>,
    },

    /// Summarize how many bytes each peer delivered
    Contributions {
        /// Chunk log (JSON)
        #[arg(required = true)]
        log: PathBuf,

        /// Only count chunks of this file
        #[arg(short = 'n', long)]
        filenum: Option<u32>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
