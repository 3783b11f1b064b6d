//! Phase 2: bottom-up structural rewrite of the raw tree.
//!
//! Two rewrites run at every node after its children are normalized:
//!
//! - **same-name merge**: a child whose trimmed name equals the node's
//!   (non-empty) trimmed name is replaced by its own children; `disabled`,
//!   `selected` and a pointer cursor carry over to the surviving node.
//! - **wrapper collapse**: a `generic` node left with exactly one semantic
//!   child is replaced by its children.
//!
//! Normalizing a child yields a sequence, so both elision (a wrapper becomes
//! its children) and text pass-through are the same operation.

use crate::document::Document;
use crate::oracle::StyleOracle;
use crate::tree::{Child, SemanticNode};

pub struct TreeNormalizer<'a> {
    doc: &'a dyn Document,
}

impl<'a> TreeNormalizer<'a> {
    pub fn new(doc: &'a dyn Document) -> Self {
        Self { doc }
    }

    /// Normalize the document root. The root itself is never elided.
    pub fn normalize_root(&self, mut root: SemanticNode) -> SemanticNode {
        root.children = self.normalize_children(std::mem::take(&mut root.children));
        root
    }

    /// Normalize one child into zero or more replacement children.
    pub fn normalize(&self, child: Child) -> Vec<Child> {
        match child {
            Child::Text(text) => vec![Child::Text(text)],
            Child::Node(node) => self.normalize_node(node),
        }
    }

    fn normalize_children(&self, children: Vec<Child>) -> Vec<Child> {
        children.into_iter().flat_map(|c| self.normalize(c)).collect()
    }

    fn normalize_node(&self, mut node: SemanticNode) -> Vec<Child> {
        let children = self.normalize_children(std::mem::take(&mut node.children));
        let name = node.trimmed_name().to_string();

        let mut merged = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Child::Node(child) if !name.is_empty() && child.trimmed_name() == name => {
                    node.disabled |= child.disabled;
                    node.selected |= child.selected;
                    if child.inherited_cursor || self.is_pointer_interactive(&child) {
                        node.inherited_cursor = true;
                    }
                    merged.extend(child.children);
                }
                other => merged.push(other),
            }
        }
        node.children = merged;

        if node.role == "generic" && node.node_children().count() == 1 {
            let wrapper_cursor = node.inherited_cursor || self.is_pointer_interactive(&node);
            let mut promoted = node.children;
            if wrapper_cursor {
                for child in &mut promoted {
                    if let Child::Node(child) = child {
                        child.inherited_cursor = true;
                    }
                }
            }
            return promoted;
        }

        vec![Child::Node(node)]
    }

    fn is_pointer_interactive(&self, node: &SemanticNode) -> bool {
        node.element
            .is_some_and(|element| StyleOracle::is_pointer_interactive(self.doc, element))
    }
}

#[cfg(test)]
#[path = "normalizer_tests.rs"]
mod tests;
