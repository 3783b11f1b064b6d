//! Element registry: ref → record map fusing structural, visual and
//! metadata facts about every addressable node.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{Document, NodeId};
use crate::frames::DocumentVisitor;
use crate::locator::{Rect, VisualLocator};
use crate::oracle::StyleOracle;
use crate::renderer::{is_transparent, normalize_whitespace};
use crate::tree::{CheckedState, SemanticNode};

/// Everything an agent needs to act on one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub role: String,
    pub name: String,
    /// Lowercase tag name.
    pub tag: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<CheckedState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(default)]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    /// Unobstructed client rects in device pixels; empty when fully covered.
    pub rects: Vec<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Content overflows the visible box.
    pub scrollable: bool,
    pub receives_pointer_events: bool,
    pub has_pointer_cursor: bool,
}

impl ElementRecord {
    fn from_node(doc: &dyn Document, node: &SemanticNode, element: NodeId) -> Self {
        Self {
            role: node.role.clone(),
            name: normalize_whitespace(&node.name),
            tag: doc.tag_name(element).unwrap_or_default(),
            disabled: node.disabled,
            checked: node.checked,
            expanded: node.expanded,
            selected: node.selected,
            level: node.level,
            rects: VisualLocator::locate(doc, element),
            href: doc.attribute(element, "href"),
            value: doc.value(element),
            placeholder: doc.attribute(element, "placeholder"),
            scrollable: doc
                .scroll_metrics(element)
                .is_some_and(|metrics| metrics.overflows()),
            receives_pointer_events: StyleOracle::receives_pointer_events(doc, element),
            has_pointer_cursor: StyleOracle::has_pointer_cursor(doc, element),
        }
    }
}

/// Records keyed by ref, one per node the renderer prints with a ref.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    records: BTreeMap<String, ElementRecord>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every addressable node of a normalized tree.
    pub fn register_tree(&mut self, doc: &dyn Document, root: &SemanticNode) {
        for node in root.descendants() {
            if is_transparent(node) {
                continue;
            }
            let (Some(element), Some(ref_id)) = (node.element, node.ref_id.as_ref()) else {
                continue;
            };
            self.records
                .insert(ref_id.clone(), ElementRecord::from_node(doc, node, element));
        }
    }

    pub fn get(&self, ref_id: &str) -> Option<&ElementRecord> {
        self.records.get(ref_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<String, ElementRecord> {
        self.records
    }
}

impl DocumentVisitor for ElementRegistry {
    fn visit(&mut self, doc: &dyn Document, tree: &SemanticNode) {
        self.register_tree(doc, tree);
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
