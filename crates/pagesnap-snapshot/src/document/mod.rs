//! The host document boundary.
//!
//! The analyzer never owns the document it inspects. Everything it learns about
//! structure, style and geometry goes through [`Document`], which a browser
//! bridge (CDP, WebDriver, an embedded engine) or the in-memory
//! [`MemoryDocument`] implements.

mod memory;
mod types;

pub use memory::{CaptureDocument, CapturedElement, CapturedNode, MemoryDocument, StyleDecl};
pub use types::{BoundingBox, ComputedStyle, NodeId, NodeKind, ScrollMetrics, ViewportInfo};

use crate::error::DocumentError;

/// A live, rendered document.
///
/// Handles passed in are the ones this document handed out. Lookups on an
/// unknown handle return `None`/empty rather than failing.
pub trait Document {
    /// URL the document was loaded from.
    fn url(&self) -> String;

    /// Viewport size and device pixel ratio.
    fn viewport(&self) -> ViewportInfo;

    /// The body element. Fails only when the document itself is gone.
    fn body(&self) -> Result<NodeId, DocumentError>;

    /// Kind of a node, `None` when the handle does not resolve.
    fn node_kind(&self, node: NodeId) -> Option<NodeKind>;

    /// Lowercase tag name of an element.
    fn tag_name(&self, node: NodeId) -> Option<String>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Raw value of a text node.
    fn text(&self, node: NodeId) -> Option<String>;

    /// Light-DOM child nodes in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Parent node. Shadow-root children report their host.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Children of an open shadow root attached to `node`, if any.
    fn shadow_children(&self, node: NodeId) -> Option<Vec<NodeId>>;

    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    fn computed_style(&self, node: NodeId) -> Result<ComputedStyle, DocumentError>;

    /// Border box of the element.
    fn bounding_rect(&self, node: NodeId) -> Result<BoundingBox, DocumentError>;

    /// All client rects (wrapped inline content yields several).
    fn client_rects(&self, node: NodeId) -> Result<Vec<BoundingBox>, DocumentError>;

    /// Topmost element at a viewport point.
    fn element_from_point(&self, x: f64, y: f64) -> Option<NodeId>;

    fn scroll_metrics(&self, node: NodeId) -> Option<ScrollMetrics>;

    /// Live value of a form control.
    fn value(&self, node: NodeId) -> Option<String>;

    /// Same-document iframe elements in document order.
    fn frames(&self) -> Vec<NodeId>;

    /// Nested document of an iframe; `None` when cross-origin or not loaded.
    fn content_document(&mut self, frame: NodeId) -> Option<&mut dyn Document>;
}
