use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "unwebp")]
#[command(author, version, about = "Replace downloaded WebP images with PNG copies")]
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
    /// Start watching the downloads directory until interrupted
    Start {
        /// Directory to watch instead of the configured one
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Convert a single file right away
    Convert {
        /// WebP file to convert
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
