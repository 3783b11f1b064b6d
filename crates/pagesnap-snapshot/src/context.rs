//! Per-call analysis state: ref counter and visible-text cache.

use std::collections::HashMap;

use crate::document::NodeId;

/// State owned by one analysis invocation.
///
/// [`begin_call`](Self::begin_call) must run before every top-level walk so
/// ref numbering is reproducible and no text from an earlier document state is
/// served. [`begin_frame`](Self::begin_frame) runs before each nested document:
/// node handles are only unique within one document, so the cache is dropped,
/// while the counter keeps running so refs stay unique across frames.
#[derive(Debug, Default)]
pub struct AnalysisContext {
    next_ref: u32,
    text_cache: HashMap<NodeId, String>,
}

impl AnalysisContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_call(&mut self) {
        self.next_ref = 0;
        self.text_cache.clear();
    }

    pub fn begin_frame(&mut self) {
        self.text_cache.clear();
    }

    /// Allocate the next ref id (`e1`, `e2`, ...).
    pub fn next_ref(&mut self) -> String {
        self.next_ref += 1;
        format!("e{}", self.next_ref)
    }

    /// Number of refs handed out since the last reset.
    pub fn refs_issued(&self) -> u32 {
        self.next_ref
    }

    pub(crate) fn cached_text(&self, node: NodeId) -> Option<&str> {
        self.text_cache.get(&node).map(String::as_str)
    }

    pub(crate) fn cache_text(&mut self, node: NodeId, text: String) {
        self.text_cache.insert(node, text);
    }
}
