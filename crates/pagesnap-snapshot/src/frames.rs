//! Frame walker: runs the build/normalize pipeline over a document and,
//! recursively, over every accessible same-origin frame it embeds.

use tracing::debug;

use crate::builder::TreeBuilder;
use crate::context::AnalysisContext;
use crate::document::Document;
use crate::error::{DocumentError, SnapshotError};
use crate::normalizer::TreeNormalizer;
use crate::renderer::SnapshotRenderer;
use crate::tree::SemanticNode;

/// Consumer of one normalized tree per document.
pub trait DocumentVisitor {
    fn visit(&mut self, doc: &dyn Document, tree: &SemanticNode);
}

/// Collects rendered snapshot lines, frames appended after their parent.
#[derive(Debug, Default)]
pub struct RenderedLines {
    pub lines: Vec<String>,
}

impl DocumentVisitor for RenderedLines {
    fn visit(&mut self, doc: &dyn Document, tree: &SemanticNode) {
        self.lines
            .extend(SnapshotRenderer::new(doc).snapshot_lines(tree));
    }
}

pub struct FrameWalker<'a> {
    ctx: &'a mut AnalysisContext,
    ref_attribute: &'a str,
    include_frames: bool,
    max_depth: usize,
}

impl<'a> FrameWalker<'a> {
    pub fn new(
        ctx: &'a mut AnalysisContext,
        ref_attribute: &'a str,
        include_frames: bool,
        max_depth: usize,
    ) -> Self {
        Self {
            ctx,
            ref_attribute,
            include_frames,
            max_depth,
        }
    }

    /// Walk `doc` and its frames in document order, feeding each tree to `visitor`.
    pub fn walk(
        &mut self,
        doc: &mut dyn Document,
        visitor: &mut dyn DocumentVisitor,
    ) -> Result<(), SnapshotError> {
        self.walk_document(doc, visitor, 0)
    }

    fn walk_document(
        &mut self,
        doc: &mut dyn Document,
        visitor: &mut dyn DocumentVisitor,
        depth: usize,
    ) -> Result<(), SnapshotError> {
        let raw = TreeBuilder::new(&mut *doc, &mut *self.ctx, self.ref_attribute).build()?;
        let tree = TreeNormalizer::new(&*doc).normalize_root(raw);
        debug!(url = %doc.url(), depth, "Walked document");
        visitor.visit(&*doc, &tree);

        if !self.include_frames {
            return Ok(());
        }
        if depth >= self.max_depth {
            debug!(depth, "Frame nesting limit reached");
            return Ok(());
        }

        for frame in doc.frames() {
            let Some(nested) = doc.content_document(frame) else {
                debug!(frame = frame.0, "Skipping inaccessible frame");
                continue;
            };
            self.ctx.begin_frame();
            match self.walk_document(nested, visitor, depth + 1) {
                Err(SnapshotError::Document(DocumentError::Detached(url))) => {
                    debug!(frame = frame.0, %url, "Skipping detached frame");
                }
                other => other?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "frames_tests.rs"]
mod tests;
