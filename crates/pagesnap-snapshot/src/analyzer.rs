//! Top-level analysis: text snapshot plus element registry for one document.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::context::AnalysisContext;
use crate::document::{Document, NodeId, NodeKind};
use crate::error::SnapshotError;
use crate::frames::{FrameWalker, RenderedLines};
use crate::registry::ElementRegistry;
use crate::snapshot::{PageSnapshot, SnapshotMetadata};

/// Analyzer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Attribute refs are written back under.
    #[serde(default = "default_ref_attribute")]
    pub ref_attribute: String,

    /// Descend into same-origin frames.
    #[serde(default = "default_include_frames")]
    pub include_frames: bool,

    /// Frame nesting limit.
    #[serde(default = "default_max_frame_depth")]
    pub max_frame_depth: usize,
}

fn default_ref_attribute() -> String {
    "aria-ref".to_string()
}

fn default_include_frames() -> bool {
    true
}

fn default_max_frame_depth() -> usize {
    8
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            ref_attribute: default_ref_attribute(),
            include_frames: default_include_frames(),
            max_frame_depth: default_max_frame_depth(),
        }
    }
}

/// Runs the full pipeline over a document.
///
/// The document is walked twice: once to render text, once (after resetting
/// the ref counter) to fill the registry. Both walks see the same document,
/// so they hand out the same refs.
#[derive(Debug, Default)]
pub struct PageAnalyzer {
    config: SnapshotConfig,
    ctx: AnalysisContext,
}

impl PageAnalyzer {
    pub fn new(config: SnapshotConfig) -> Self {
        Self {
            config,
            ctx: AnalysisContext::new(),
        }
    }

    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// Analyze `doc`. Fails only if the top-level document is gone.
    pub fn analyze(&mut self, doc: &mut dyn Document) -> Result<PageSnapshot, SnapshotError> {
        let text = self.render_text(doc)?;

        self.ctx.begin_call();
        let mut registry = ElementRegistry::new();
        self.walker().walk(doc, &mut registry)?;

        let elements = registry.into_map();
        info!(
            url = %doc.url(),
            elements = elements.len(),
            lines = text.lines().count(),
            "Captured page snapshot"
        );

        Ok(PageSnapshot {
            url: doc.url(),
            metadata: SnapshotMetadata {
                captured_at: Utc::now(),
                element_count: elements.len(),
                viewport: doc.viewport(),
            },
            elements,
            snapshot: text,
        })
    }

    /// Only the text snapshot, frames appended after their parent document.
    pub fn render_text(&mut self, doc: &mut dyn Document) -> Result<String, SnapshotError> {
        self.ctx.begin_call();
        let mut rendered = RenderedLines::default();
        self.walker().walk(doc, &mut rendered)?;
        debug!(lines = rendered.lines.len(), refs = self.ctx.refs_issued(), "Rendered snapshot text");
        Ok(rendered.lines.join("\n"))
    }

    /// Find the element a previous analysis tagged with `ref_id`.
    ///
    /// Searches the top-level document, light and shadow trees alike.
    pub fn resolve_ref(&self, doc: &dyn Document, ref_id: &str) -> Result<NodeId, SnapshotError> {
        let body = doc.body()?;
        let mut stack = vec![body];
        while let Some(node) = stack.pop() {
            if doc.node_kind(node) != Some(NodeKind::Element) {
                continue;
            }
            if doc.attribute(node, &self.config.ref_attribute).as_deref() == Some(ref_id) {
                return Ok(node);
            }
            if let Some(shadow) = doc.shadow_children(node) {
                stack.extend(shadow.into_iter().rev());
            }
            stack.extend(doc.children(node).into_iter().rev());
        }
        Err(SnapshotError::RefNotFound(ref_id.to_string()))
    }

    /// CSS selector addressing `ref_id`, for automation layers that query by selector.
    pub fn ref_selector(&self, ref_id: &str) -> String {
        format!("[{}='{}']", self.config.ref_attribute, ref_id)
    }

    fn walker(&mut self) -> FrameWalker<'_> {
        FrameWalker::new(
            &mut self.ctx,
            &self.config.ref_attribute,
            self.config.include_frames,
            self.config.max_frame_depth,
        )
    }
}

#[cfg(test)]
#[path = "analyzer_tests.rs"]
mod tests;
