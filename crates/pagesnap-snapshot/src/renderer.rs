//! Phase 3: deterministic text serialization of a normalized tree.
//!
//! One line per printed node, two spaces of indentation per level:
//!
//! ```text
//! - navigation "Main"
//!   - link "Home" [ref=e2] [cursor=pointer]
//!   - text "Welcome back"
//! - checkbox "Remember me" [checked=false] [ref=e3]
//! ```

use crate::document::Document;
use crate::oracle::StyleOracle;
use crate::tree::{Child, SemanticNode};

pub struct SnapshotRenderer<'a> {
    doc: &'a dyn Document,
}

impl<'a> SnapshotRenderer<'a> {
    pub fn new(doc: &'a dyn Document) -> Self {
        Self { doc }
    }

    /// Render a tree, starting with the root's own line.
    ///
    /// The root line is synthetic; callers building a snapshot drop it (see
    /// [`snapshot_lines`](Self::snapshot_lines)). Root children render at level 0.
    pub fn render(&self, root: &SemanticNode) -> Vec<String> {
        let mut lines = vec![self.node_line(root, 0)];
        for child in &root.children {
            self.render_child(child, 0, &mut lines);
        }
        lines
    }

    /// Rendered lines without the synthetic root line.
    pub fn snapshot_lines(&self, root: &SemanticNode) -> Vec<String> {
        self.render(root).into_iter().skip(1).collect()
    }

    fn render_child(&self, child: &Child, depth: usize, lines: &mut Vec<String>) {
        match child {
            Child::Text(text) => {
                let text = normalize_whitespace(text);
                if !text.is_empty() {
                    lines.push(format!("{}- text \"{}\"", indent(depth), escape(&text)));
                }
            }
            Child::Node(node) => self.render_node(node, depth, lines),
        }
    }

    fn render_node(&self, node: &SemanticNode, depth: usize, lines: &mut Vec<String>) {
        if is_transparent(node) {
            for child in &node.children {
                self.render_child(child, depth, lines);
            }
            return;
        }
        lines.push(self.node_line(node, depth));
        for child in &node.children {
            self.render_child(child, depth + 1, lines);
        }
    }

    /// `<indent>- <role>[ "<name>"]<attrs>[ [ref=..]][ [cursor=pointer]]`
    pub fn node_line(&self, node: &SemanticNode, depth: usize) -> String {
        let mut line = format!("{}- {}", indent(depth), node.role);
        let name = normalize_whitespace(&node.name);
        if !name.is_empty() {
            line.push_str(&format!(" \"{}\"", escape(&name)));
        }
        line.push_str(&attribute_suffix(node));
        if let Some(ref ref_id) = node.ref_id {
            line.push_str(&format!(" [ref={}]", ref_id));
        }
        if self.shows_pointer_cursor(node) {
            line.push_str(" [cursor=pointer]");
        }
        line
    }

    fn shows_pointer_cursor(&self, node: &SemanticNode) -> bool {
        node.inherited_cursor
            || node
                .element
                .is_some_and(|element| StyleOracle::is_pointer_interactive(self.doc, element))
    }
}

/// State attributes in fixed order: disabled, checked, expanded, selected, level.
pub fn attribute_suffix(node: &SemanticNode) -> String {
    let mut suffix = String::new();
    if node.disabled {
        suffix.push_str(" [disabled]");
    }
    if let Some(checked) = node.checked {
        suffix.push_str(&format!(" [checked={}]", checked.as_str()));
    }
    if let Some(expanded) = node.expanded {
        suffix.push_str(&format!(" [expanded={}]", expanded));
    }
    if node.selected {
        suffix.push_str(" [selected]");
    }
    if let Some(level) = node.level {
        suffix.push_str(&format!(" [level={}]", level));
    }
    suffix
}

/// A node with neither name nor state renders only its children. A ref or
/// cursor alone does not make a node worth a line.
pub fn is_transparent(node: &SemanticNode) -> bool {
    normalize_whitespace(&node.name).is_empty() && attribute_suffix(node).is_empty()
}

/// Collapse whitespace runs to single spaces and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
