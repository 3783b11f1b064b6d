//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub snapshot: SnapshotSettings,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analyzer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSettings {
    /// Attribute refs are written back under, e.g. `aria-ref`.
    #[serde(default = "default_ref_attribute")]
    pub ref_attribute: String,

    #[serde(default = "default_true")]
    pub include_frames: bool,

    #[serde(default = "default_max_frame_depth")]
    pub max_frame_depth: usize,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            ref_attribute: default_ref_attribute(),
            include_frames: true,
            max_frame_depth: default_max_frame_depth(),
        }
    }
}

fn default_ref_attribute() -> String {
    "aria-ref".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_frame_depth() -> usize {
    8
}

/// How the CLI prints a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `text` or `json`.
    #[serde(default = "default_format")]
    pub format: String,

    /// Wrap text output in the `- Page Snapshot` block.
    #[serde(default)]
    pub framed: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            framed: false,
        }
    }
}

fn default_format() -> String {
    "text".to_string()
}

/// Output formats the CLI understands.
pub const OUTPUT_FORMATS: &[&str] = &["text", "json"];

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Also write daily-rotated log files.
    #[serde(default)]
    pub file: bool,

    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: false,
            dir: default_log_dir(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pagesnap")
        .join("logs")
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
