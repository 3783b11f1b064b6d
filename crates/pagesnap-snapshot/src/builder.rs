//! Phase 1: walk the live document into a raw semantic tree.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::context::AnalysisContext;
use crate::document::{Document, NodeId, NodeKind};
use crate::error::SnapshotError;
use crate::oracle::StyleOracle;
use crate::tree::{CheckedState, Child, SemanticNode};

/// Elements skipped together with their whole subtree.
const SKIPPED_TAGS: &[&str] = &["script", "style", "meta", "noscript"];

/// Pre-order walker producing a [`SemanticNode`] tree rooted at the body.
///
/// Every materialized node that can be addressed gets a fresh ref, written
/// back onto its element under `ref_attribute` so later actions can find it.
pub struct TreeBuilder<'a> {
    doc: &'a mut dyn Document,
    ctx: &'a mut AnalysisContext,
    ref_attribute: &'a str,
    visited: HashSet<NodeId>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(doc: &'a mut dyn Document, ctx: &'a mut AnalysisContext, ref_attribute: &'a str) -> Self {
        Self {
            doc,
            ctx,
            ref_attribute,
            visited: HashSet::new(),
        }
    }

    /// Build the raw tree. Fails only if the document is gone.
    pub fn build(mut self) -> Result<SemanticNode, SnapshotError> {
        let body = self.doc.body()?;
        self.visited.insert(body);

        let mut root = SemanticNode::document_root();
        let mut children = Vec::new();
        self.walk_children(body, &mut children);
        root.children = children;
        Ok(root)
    }

    fn walk_children(&mut self, node: NodeId, out: &mut Vec<Child>) {
        for child in self.doc.children(node) {
            self.walk(child, out);
        }
        if let Some(shadow) = self.doc.shadow_children(node) {
            for child in shadow {
                self.walk(child, out);
            }
        }
    }

    fn walk(&mut self, node: NodeId, out: &mut Vec<Child>) {
        match self.doc.node_kind(node) {
            Some(NodeKind::Element) => {}
            Some(NodeKind::Text) => {
                if let Some(text) = self.doc.text(node) {
                    let text = text.trim();
                    if !text.is_empty() {
                        out.push(Child::Text(text.to_string()));
                    }
                }
                return;
            }
            _ => return,
        }
        if !self.visited.insert(node) {
            return;
        }

        let tag = self.doc.tag_name(node).unwrap_or_default();
        if SKIPPED_TAGS.contains(&tag.as_str()) {
            return;
        }
        let style = match self.doc.computed_style(node) {
            Ok(style) => style,
            Err(e) => {
                debug!(node = node.0, error = %e, "Skipping element with unreadable style");
                return;
            }
        };
        if style.is_hidden() {
            return;
        }
        if let Err(e) = self.doc.bounding_rect(node) {
            debug!(node = node.0, error = %e, "Skipping element with unreadable geometry");
            return;
        }

        let role = StyleOracle::role(&*self.doc, node);
        if !StyleOracle::is_visible(&*self.doc, node) || role == "presentation" || role == "none" {
            self.walk_children(node, out);
            return;
        }

        let semantic = self.materialize(node, role, &tag);
        out.push(Child::Node(semantic));
    }

    fn materialize(&mut self, node: NodeId, role: String, tag: &str) -> SemanticNode {
        let name = StyleOracle::name_for_role(&*self.doc, self.ctx, node, &role);
        let mut semantic = SemanticNode::new(role, name, Some(node));

        // Plain structural wrappers are never addressable.
        if semantic.role != "generic" || StyleOracle::is_pointer_interactive(&*self.doc, node) {
            let ref_id = self.ctx.next_ref();
            self.doc.set_attribute(node, self.ref_attribute, &ref_id);
            trace!(node = node.0, ref_id = %ref_id, "Assigned ref");
            semantic.ref_id = Some(ref_id);
        }

        self.attach_states(&mut semantic, node, tag);

        let mut children = Vec::new();
        self.walk_children(node, &mut children);
        semantic.children = children;
        remove_redundant_text(&mut semantic);
        semantic
    }

    fn attach_states(&self, semantic: &mut SemanticNode, node: NodeId, tag: &str) {
        let doc = &*self.doc;
        let aria_true = |name: &str| {
            doc.attribute(node, name)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
        };

        semantic.disabled = doc.attribute(node, "disabled").is_some() || aria_true("aria-disabled");

        semantic.checked = match doc.attribute(node, "aria-checked") {
            Some(value) => CheckedState::from_aria(&value),
            None if tag == "input" => {
                let input_type = doc
                    .attribute(node, "type")
                    .map(|t| t.trim().to_ascii_lowercase())
                    .unwrap_or_default();
                if input_type == "checkbox" || input_type == "radio" {
                    if doc.attribute(node, "checked").is_some() {
                        Some(CheckedState::True)
                    } else {
                        Some(CheckedState::False)
                    }
                } else {
                    None
                }
            }
            None => None,
        };

        semantic.expanded = doc
            .attribute(node, "aria-expanded")
            .and_then(|v| match v.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            });

        semantic.selected =
            aria_true("aria-selected") || (tag == "option" && doc.attribute(node, "selected").is_some());

        let level = StyleOracle::aria_level(doc, node, &semantic.role);
        semantic.level = (level > 0).then_some(level);
    }
}

/// Drop text runs that merely repeat the node's own name: exact matches, and
/// runs longer than three characters contained in the name.
pub(crate) fn remove_redundant_text(node: &mut SemanticNode) {
    let name = node.trimmed_name().to_string();
    if name.is_empty() {
        return;
    }
    node.children.retain(|child| match child {
        Child::Text(text) => !(*text == name || (text.chars().count() > 3 && name.contains(text.as_str()))),
        Child::Node(_) => true,
    });
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
