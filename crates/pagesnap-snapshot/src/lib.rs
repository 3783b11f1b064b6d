//! # Pagesnap Snapshot
//!
//! Turns a rendered document into a compact, text-addressable snapshot of its
//! interactive structure, plus a ref-keyed map of element records carrying
//! hit-testable geometry.
//!
//! The pipeline per document:
//!
//! 1. [`TreeBuilder`] walks the body into a raw [`SemanticNode`] tree, asking
//!    [`StyleOracle`] about visibility, roles and names, and writes each ref
//!    back onto its element.
//! 2. [`TreeNormalizer`] merges same-name nesting and collapses generic wrappers.
//! 3. [`SnapshotRenderer`] serializes the tree, one line per node.
//!
//! [`FrameWalker`] repeats this for same-origin frames, and [`PageAnalyzer`]
//! ties it together with the [`ElementRegistry`].

mod analyzer;
mod builder;
mod context;
pub mod document;
mod error;
mod frames;
mod locator;
mod normalizer;
mod oracle;
mod registry;
mod renderer;
mod snapshot;
mod tree;

pub use analyzer::{PageAnalyzer, SnapshotConfig};
pub use builder::TreeBuilder;
pub use context::AnalysisContext;
pub use document::{Document, MemoryDocument, NodeId};
pub use error::{DocumentError, SnapshotError};
pub use frames::{DocumentVisitor, FrameWalker, RenderedLines};
pub use locator::{Rect, VisualLocator};
pub use normalizer::TreeNormalizer;
pub use oracle::StyleOracle;
pub use registry::{ElementRecord, ElementRegistry};
pub use renderer::{attribute_suffix, is_transparent, normalize_whitespace, SnapshotRenderer};
pub use snapshot::{extract_refs, PageSnapshot, SnapshotMetadata};
pub use tree::{CheckedState, Child, SemanticNode};
