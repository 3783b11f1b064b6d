//! Semantic tree produced by the builder and rewritten by the normalizer.

use serde::{Deserialize, Serialize};

use crate::document::NodeId;

/// Checked state of a checkbox-like node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckedState {
    True,
    False,
    Mixed,
}

impl CheckedState {
    /// Parse an `aria-checked` value.
    pub fn from_aria(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" => Some(CheckedState::True),
            "false" => Some(CheckedState::False),
            "mixed" => Some(CheckedState::Mixed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckedState::True => "true",
            CheckedState::False => "false",
            CheckedState::Mixed => "mixed",
        }
    }
}

/// A materialized element in the semantic tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticNode {
    pub role: String,
    /// Raw accessible name; whitespace is normalized at render time.
    pub name: String,
    pub children: Vec<Child>,
    /// Originating element, borrowed for the duration of one analysis call.
    pub element: Option<NodeId>,
    pub ref_id: Option<String>,
    pub disabled: bool,
    pub checked: Option<CheckedState>,
    pub expanded: Option<bool>,
    pub selected: bool,
    /// Heading/list/tree level, `None` when the element has none.
    pub level: Option<u32>,
    /// Set by the normalizer when a merged or elided node had a pointer cursor.
    pub inherited_cursor: bool,
}

impl SemanticNode {
    pub fn new(role: impl Into<String>, name: impl Into<String>, element: Option<NodeId>) -> Self {
        Self {
            role: role.into(),
            name: name.into(),
            children: Vec::new(),
            element,
            ref_id: None,
            disabled: false,
            checked: None,
            expanded: None,
            selected: false,
            level: None,
            inherited_cursor: false,
        }
    }

    /// Synthetic root standing in for the document body.
    pub fn document_root() -> Self {
        Self::new("document", "", None)
    }

    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }

    /// Semantic (non-text) children.
    pub fn node_children(&self) -> impl Iterator<Item = &SemanticNode> {
        self.children.iter().filter_map(Child::as_node)
    }

    /// This node and every descendant node, in pre-order.
    pub fn descendants(&self) -> Vec<&SemanticNode> {
        let mut out = vec![self];
        for child in self.node_children() {
            out.extend(child.descendants());
        }
        out
    }
}

/// A child of a semantic node: another node or a trimmed text run.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Node(SemanticNode),
    Text(String),
}

impl Child {
    pub fn as_node(&self) -> Option<&SemanticNode> {
        match self {
            Child::Node(node) => Some(node),
            Child::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Child::Node(_) => None,
            Child::Text(text) => Some(text),
        }
    }
}

impl From<SemanticNode> for Child {
    fn from(node: SemanticNode) -> Self {
        Child::Node(node)
    }
}
