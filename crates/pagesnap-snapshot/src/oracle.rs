//! Style and geometry predicates over a single element.
//!
//! Every predicate is fail-soft: an absent handle, a non-element node or a
//! failed style/geometry read yields the safe default (`false`, `"generic"`,
//! `""`, `0`) instead of an error.

use crate::context::AnalysisContext;
use crate::document::{Document, NodeId, NodeKind};

/// Elements whose content never contributes visible text.
const TEXT_EXCLUDED_TAGS: &[&str] = &["script", "style", "noscript", "meta", "head"];

/// Roles whose accessible name may be computed from their content.
const NAME_FROM_CONTENT_ROLES: &[&str] = &[
    "button", "link", "heading", "checkbox", "radio", "option", "menuitem",
    "menuitemcheckbox", "menuitemradio", "tab", "treeitem", "listitem", "cell",
    "gridcell", "columnheader", "rowheader", "row", "switch", "tooltip",
];

/// Roles that honor an explicit `aria-level`.
const LEVELED_ROLES: &[&str] = &["heading", "listitem", "row", "treeitem"];

/// Characters that mark a name as code-like noise rather than a label.
const CODE_LIKE_CHARS: &[char] = &[';', ':', '{', '}'];

/// Stateless element predicates.
pub struct StyleOracle;

impl StyleOracle {
    /// Whether the element renders a box.
    ///
    /// Non-element nodes count as visible: text visibility is governed by its
    /// parent element.
    pub fn is_visible(doc: &dyn Document, node: NodeId) -> bool {
        match doc.node_kind(node) {
            None => false,
            Some(NodeKind::Element) => {
                let Ok(style) = doc.computed_style(node) else {
                    return false;
                };
                if style.is_hidden() {
                    return false;
                }
                if style.display == "contents" {
                    return true;
                }
                doc.bounding_rect(node)
                    .map(|rect| rect.has_area())
                    .unwrap_or(false)
            }
            Some(_) => true,
        }
    }

    /// Explicit `role` attribute, else the implicit role of the tag.
    pub fn role(doc: &dyn Document, node: NodeId) -> String {
        if doc.node_kind(node) != Some(NodeKind::Element) {
            return "generic".to_string();
        }
        if let Some(explicit) = doc.attribute(node, "role") {
            if let Some(first) = explicit.split_whitespace().next() {
                return first.to_ascii_lowercase();
            }
        }
        let tag = doc.tag_name(node).unwrap_or_default();
        let role = match tag.as_str() {
            "a" => "link",
            "button" => "button",
            "input" => {
                let input_type = doc
                    .attribute(node, "type")
                    .map(|t| t.trim().to_ascii_lowercase())
                    .unwrap_or_default();
                match input_type.as_str() {
                    "button" | "reset" | "submit" | "image" => "button",
                    "checkbox" => "checkbox",
                    "radio" => "radio",
                    _ => "textbox",
                }
            }
            "select" => "select",
            "textarea" => "textarea",
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "heading",
            "img" => "img",
            "nav" => "navigation",
            "main" => "main",
            "aside" => "complementary",
            "form" => "form",
            "ul" | "ol" => "list",
            "li" => "listitem",
            "header" => "banner",
            "footer" => "contentinfo",
            "fieldset" => "group",
            "table" => "table",
            "tr" => "row",
            "td" => "cell",
            "th" => "columnheader",
            "option" => "option",
            "dialog" => "dialog",
            "summary" => "button",
            "p" => "paragraph",
            _ => "generic",
        };
        role.to_string()
    }

    /// Accessible name: `aria-label`, then `aria-labelledby`, then visible text.
    pub fn accessible_name(doc: &dyn Document, ctx: &mut AnalysisContext, node: NodeId) -> String {
        if doc.node_kind(node) != Some(NodeKind::Element) {
            return String::new();
        }
        if let Some(name) = Self::labelled_name(doc, ctx, node) {
            return suppress_code_like(name);
        }
        suppress_code_like(Self::visible_text(doc, ctx, node))
    }

    /// Name used for a node of the given role.
    ///
    /// Only roles that take their name from content fall back to visible text;
    /// containers are named by their author or not at all.
    pub fn name_for_role(
        doc: &dyn Document,
        ctx: &mut AnalysisContext,
        node: NodeId,
        role: &str,
    ) -> String {
        if NAME_FROM_CONTENT_ROLES.contains(&role) {
            return Self::accessible_name(doc, ctx, node);
        }
        if doc.node_kind(node) != Some(NodeKind::Element) {
            return String::new();
        }
        let name = Self::labelled_name(doc, ctx, node)
            .or_else(|| {
                if role == "img" {
                    doc.attribute(node, "alt").filter(|alt| !alt.trim().is_empty())
                } else {
                    None
                }
            })
            .or_else(|| doc.attribute(node, "title").filter(|t| !t.trim().is_empty()))
            .unwrap_or_default();
        suppress_code_like(name)
    }

    fn labelled_name(doc: &dyn Document, ctx: &mut AnalysisContext, node: NodeId) -> Option<String> {
        if let Some(label) = doc.attribute(node, "aria-label") {
            if !label.trim().is_empty() {
                return Some(label);
            }
        }
        let ids = doc.attribute(node, "aria-labelledby")?;
        let parts: Vec<String> = ids
            .split_whitespace()
            .filter_map(|id| doc.element_by_id(id))
            .map(|label| Self::visible_text(doc, ctx, label))
            .filter(|text| !text.trim().is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Concatenated text of the node and its visible descendants, memoized
    /// per node for the current call.
    pub fn visible_text(doc: &dyn Document, ctx: &mut AnalysisContext, node: NodeId) -> String {
        match doc.node_kind(node) {
            Some(NodeKind::Text) => return doc.text(node).unwrap_or_default(),
            Some(NodeKind::Element) => {}
            _ => return String::new(),
        }
        if let Some(cached) = ctx.cached_text(node) {
            return cached.to_string();
        }
        let tag = doc.tag_name(node).unwrap_or_default();
        if TEXT_EXCLUDED_TAGS.contains(&tag.as_str()) {
            ctx.cache_text(node, String::new());
            return String::new();
        }

        // Placeholder first: a cyclic reference back to this node reads empty.
        ctx.cache_text(node, String::new());
        let mut children = doc.children(node);
        if let Some(shadow) = doc.shadow_children(node) {
            children.extend(shadow);
        }
        let mut text = String::new();
        for child in children {
            if doc.node_kind(child) == Some(NodeKind::Element) && !Self::is_visible(doc, child) {
                continue;
            }
            text.push_str(&Self::visible_text(doc, ctx, child));
        }
        ctx.cache_text(node, text.clone());
        text
    }

    /// False when the element or any ancestor has `pointer-events:none`.
    pub fn receives_pointer_events(doc: &dyn Document, node: NodeId) -> bool {
        if doc.node_kind(node) != Some(NodeKind::Element) {
            return false;
        }
        let mut current = Some(node);
        while let Some(id) = current {
            if doc.node_kind(id) == Some(NodeKind::Element) {
                if let Ok(style) = doc.computed_style(id) {
                    if style.pointer_events == "none" {
                        return false;
                    }
                }
            }
            current = doc.parent(id);
        }
        true
    }

    pub fn has_pointer_cursor(doc: &dyn Document, node: NodeId) -> bool {
        doc.computed_style(node)
            .map(|style| style.cursor == "pointer")
            .unwrap_or(false)
    }

    /// Receives pointer events and shows a pointer cursor.
    pub fn is_pointer_interactive(doc: &dyn Document, node: NodeId) -> bool {
        Self::has_pointer_cursor(doc, node) && Self::receives_pointer_events(doc, node)
    }

    /// Heading level from the tag, else a positive `aria-level` for leveled roles; 0 means none.
    pub fn aria_level(doc: &dyn Document, node: NodeId, role: &str) -> u32 {
        let tag = doc.tag_name(node).unwrap_or_default();
        if let Some(level) = heading_level(&tag) {
            return level;
        }
        if !LEVELED_ROLES.contains(&role) {
            return 0;
        }
        doc.attribute(node, "aria-level")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&level| level > 0)
            .unwrap_or(0)
    }
}

fn heading_level(tag: &str) -> Option<u32> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Heuristic: more than two of `;:{}` reads as leaked CSS/JS, not a label.
fn suppress_code_like(name: String) -> String {
    let noise = name.chars().filter(|c| CODE_LIKE_CHARS.contains(c)).count();
    if noise > 2 { String::new() } else { name }
}

#[cfg(test)]
#[path = "oracle_tests.rs"]
mod tests;
