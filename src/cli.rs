//! CLI definitions for pagesnap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pagesnap CLI.
#[derive(Parser)]
#[command(name = "pagesnap")]
#[command(about = "Semantic page snapshots with stable element refs")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (defaults to config/default.toml when present)
    #[arg(short, long, global = true, env = "PAGESNAP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Snapshot a captured document
    Snapshot {
        /// Path to a JSON document capture
        capture: PathBuf,

        /// Output format (text, json); overrides the config file
        #[arg(long)]
        format: Option<String>,

        /// Wrap text output in a `- Page Snapshot` block
        #[arg(long)]
        framed: bool,

        /// Previous snapshot text to diff against
        #[arg(long)]
        diff: Option<PathBuf>,

        /// Skip frame content
        #[arg(long)]
        no_frames: bool,
    },

    /// Look up a ref in a captured document
    Resolve {
        /// Path to a JSON document capture
        capture: PathBuf,

        /// Element ref, e.g. `e3`
        #[arg(value_name = "REF")]
        ref_id: String,
    },

    /// Validate the configuration file
    CheckConfig,
}
