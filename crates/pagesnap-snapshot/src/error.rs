//! Snapshot error types.

use thiserror::Error;

/// Failures reported by a host document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    /// Computed style could not be read for a node.
    #[error("Style unavailable for node {0}")]
    StyleUnavailable(u64),

    /// Layout geometry could not be read for a node.
    #[error("Geometry unavailable for node {0}")]
    GeometryUnavailable(u64),

    /// The document is gone (navigated away, context destroyed).
    #[error("Document detached: {0}")]
    Detached(String),
}

/// Analyzer errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The host document failed in a way the analyzer cannot absorb.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// A serialized capture is structurally invalid.
    #[error("Invalid capture: {0}")]
    InvalidCapture(String),

    /// No element carries the requested ref.
    #[error("Ref not found: {0}")]
    RefNotFound(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
