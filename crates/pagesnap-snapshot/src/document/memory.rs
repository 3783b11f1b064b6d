//! In-memory document built from a serialized page capture.
//!
//! A capture is the rendered state of a page as a browser bridge would dump it:
//! element tree, attributes, declared style, client rects, shadow roots and
//! nested frame documents. [`MemoryDocument`] answers every [`Document`]
//! query from that data, including hit-testing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{BoundingBox, ComputedStyle, NodeId, NodeKind, ScrollMetrics, ViewportInfo};
use super::Document;
use crate::error::{DocumentError, SnapshotError};

/// Declared style of a captured element. Unset inherited properties
/// (visibility, cursor, pointer-events) resolve through ancestors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StyleDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer_events: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

/// A captured document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureDocument {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub viewport: ViewportInfo,
    pub body: CapturedElement,
}

fn default_url() -> String {
    "about:blank".to_string()
}

impl CaptureDocument {
    pub fn new(body: CapturedElement) -> Self {
        Self {
            url: default_url(),
            viewport: ViewportInfo::default(),
            body,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_viewport(mut self, viewport: ViewportInfo) -> Self {
        self.viewport = viewport;
        self
    }
}

/// A captured node: text, comment or element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CapturedNode {
    Text { text: String },
    Comment { comment: String },
    Element(CapturedElement),
}

impl CapturedNode {
    pub fn text(text: impl Into<String>) -> Self {
        CapturedNode::Text { text: text.into() }
    }
}

impl From<CapturedElement> for CapturedNode {
    fn from(element: CapturedElement) -> Self {
        CapturedNode::Element(element)
    }
}

/// A captured element and its subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedElement {
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub style: StyleDecl,
    #[serde(default = "default_rect")]
    pub rect: BoundingBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_rects: Option<Vec<BoundingBox>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll: Option<ScrollMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub children: Vec<CapturedNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_root: Option<Vec<CapturedNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<Box<CaptureDocument>>,
    /// Frame content from another origin, even if the urls say otherwise.
    #[serde(default)]
    pub cross_origin: bool,
    /// Style and geometry reads fail for this element.
    #[serde(default)]
    pub unreadable: bool,
    /// Only geometry reads fail; style stays readable.
    #[serde(default)]
    pub no_layout: bool,
}

fn default_rect() -> BoundingBox {
    BoundingBox::new(0.0, 0.0, 100.0, 20.0)
}

impl CapturedElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            style: StyleDecl::default(),
            rect: default_rect(),
            client_rects: None,
            scroll: None,
            value: None,
            children: Vec::new(),
            shadow_root: None,
            frame: None,
            cross_origin: false,
            unreadable: false,
            no_layout: false,
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn display(mut self, display: &str) -> Self {
        self.style.display = Some(display.to_string());
        self
    }

    pub fn visibility(mut self, visibility: &str) -> Self {
        self.style.visibility = Some(visibility.to_string());
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.style.opacity = Some(opacity);
        self
    }

    pub fn pointer_events(mut self, value: &str) -> Self {
        self.style.pointer_events = Some(value.to_string());
        self
    }

    pub fn cursor(mut self, cursor: &str) -> Self {
        self.style.cursor = Some(cursor.to_string());
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.style.z_index = Some(z_index);
        self
    }

    pub fn rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = BoundingBox::new(x, y, width, height);
        self
    }

    pub fn client_rects(mut self, rects: Vec<BoundingBox>) -> Self {
        self.client_rects = Some(rects);
        self
    }

    pub fn scroll(mut self, scroll_height: f64, client_height: f64) -> Self {
        self.scroll = Some(ScrollMetrics {
            scroll_height,
            client_height,
        });
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn child(mut self, child: impl Into<CapturedNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(CapturedNode::text(text));
        self
    }

    pub fn shadow(mut self, child: impl Into<CapturedNode>) -> Self {
        self.shadow_root.get_or_insert_with(Vec::new).push(child.into());
        self
    }

    pub fn frame(mut self, document: CaptureDocument) -> Self {
        self.frame = Some(Box::new(document));
        self
    }

    pub fn cross_origin(mut self) -> Self {
        self.cross_origin = true;
        self
    }

    pub fn unreadable(mut self) -> Self {
        self.unreadable = true;
        self
    }

    pub fn no_layout(mut self) -> Self {
        self.no_layout = true;
        self
    }
}

#[derive(Debug)]
struct ElementData {
    tag: String,
    attributes: BTreeMap<String, String>,
    style: StyleDecl,
    rect: BoundingBox,
    client_rects: Option<Vec<BoundingBox>>,
    scroll: Option<ScrollMetrics>,
    value: Option<String>,
    shadow_children: Option<Vec<usize>>,
    frame: Option<Box<MemoryDocument>>,
    cross_origin: bool,
    unreadable: bool,
    no_layout: bool,
}

impl ElementData {
    fn geometry_readable(&self) -> bool {
        !self.unreadable && !self.no_layout
    }
}

/// Style with inheritance applied, resolved once after loading.
#[derive(Debug, Clone, Default)]
struct PaintInfo {
    style: ComputedStyle,
    /// No `display:none` on the ancestor-or-self chain.
    rendered: bool,
    z_index: i32,
}

#[derive(Debug)]
enum NodeData {
    Element(Box<ElementData>),
    Text(String),
    Other,
}

#[derive(Debug)]
struct MemoryNode {
    parent: Option<usize>,
    children: Vec<usize>,
    data: NodeData,
}

/// Arena-backed [`Document`] over a [`CaptureDocument`].
///
/// Arena order is paint order: pre-order, shadow content after light children.
#[derive(Debug)]
pub struct MemoryDocument {
    url: String,
    viewport: ViewportInfo,
    nodes: Vec<MemoryNode>,
    paint: Vec<PaintInfo>,
    detached: bool,
}

impl MemoryDocument {
    /// Build a document from a capture, recursively for nested frames.
    pub fn from_capture(capture: CaptureDocument) -> Result<Self, SnapshotError> {
        if capture.body.tag.trim().is_empty() {
            return Err(SnapshotError::InvalidCapture("body element has no tag".to_string()));
        }
        if !is_special_url(&capture.url) {
            url::Url::parse(&capture.url).map_err(|e| {
                SnapshotError::InvalidCapture(format!("invalid url '{}': {}", capture.url, e))
            })?;
        }
        if capture.viewport.device_pixel_ratio <= 0.0 {
            return Err(SnapshotError::InvalidCapture(
                "device_pixel_ratio must be positive".to_string(),
            ));
        }

        let mut document = Self {
            url: capture.url,
            viewport: capture.viewport,
            nodes: Vec::new(),
            paint: Vec::new(),
            detached: false,
        };
        document.insert_element(capture.body, None)?;
        document.resolve_paint();
        debug!(url = %document.url, nodes = document.nodes.len(), "Loaded captured document");
        Ok(document)
    }

    /// Parse a JSON capture.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let capture: CaptureDocument = serde_json::from_str(json)?;
        Self::from_capture(capture)
    }

    /// Simulate the page going away; every later `body()` call fails.
    pub fn detach(&mut self) {
        self.detached = true;
    }

    /// Number of nodes, including text nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn insert_node(&mut self, node: CapturedNode, parent: usize) -> Result<usize, SnapshotError> {
        match node {
            CapturedNode::Element(element) => self.insert_element(element, Some(parent)),
            CapturedNode::Text { text } => Ok(self.push(Some(parent), NodeData::Text(text))),
            CapturedNode::Comment { .. } => Ok(self.push(Some(parent), NodeData::Other)),
        }
    }

    fn insert_element(
        &mut self,
        element: CapturedElement,
        parent: Option<usize>,
    ) -> Result<usize, SnapshotError> {
        let frame = match element.frame {
            Some(capture) => Some(Box::new(MemoryDocument::from_capture(*capture)?)),
            None => None,
        };
        let index = self.push(
            parent,
            NodeData::Element(Box::new(ElementData {
                tag: element.tag.to_ascii_lowercase(),
                attributes: element.attributes,
                style: element.style,
                rect: element.rect,
                client_rects: element.client_rects,
                scroll: element.scroll,
                value: element.value,
                shadow_children: None,
                frame,
                cross_origin: element.cross_origin,
                unreadable: element.unreadable,
                no_layout: element.no_layout,
            })),
        );

        for child in element.children {
            let child_index = self.insert_node(child, index)?;
            self.nodes[index].children.push(child_index);
        }

        if let Some(shadow) = element.shadow_root {
            let mut shadow_children = Vec::with_capacity(shadow.len());
            for child in shadow {
                shadow_children.push(self.insert_node(child, index)?);
            }
            if let NodeData::Element(data) = &mut self.nodes[index].data {
                data.shadow_children = Some(shadow_children);
            }
        }

        Ok(index)
    }

    fn push(&mut self, parent: Option<usize>, data: NodeData) -> usize {
        self.nodes.push(MemoryNode {
            parent,
            children: Vec::new(),
            data,
        });
        self.nodes.len() - 1
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(node.0 as usize)?.data {
            NodeData::Element(data) => Some(data.as_ref()),
            _ => None,
        }
    }

    fn element_at(&self, index: usize) -> Option<&ElementData> {
        match &self.nodes.get(index)?.data {
            NodeData::Element(data) => Some(data.as_ref()),
            _ => None,
        }
    }

    /// Resolve inherited style, rendering and stacking for every node.
    ///
    /// Parents precede their children in the arena, so one forward pass sees
    /// each parent resolved first.
    fn resolve_paint(&mut self) {
        let root = PaintInfo {
            rendered: true,
            ..PaintInfo::default()
        };
        let mut paint: Vec<PaintInfo> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let parent = node
                .parent
                .and_then(|p| paint.get(p))
                .unwrap_or(&root);
            let info = match &node.data {
                NodeData::Element(data) => {
                    let decl = &data.style;
                    let defaults = ComputedStyle::default();
                    PaintInfo {
                        style: ComputedStyle {
                            display: decl.display.clone().unwrap_or(defaults.display),
                            visibility: decl
                                .visibility
                                .clone()
                                .unwrap_or_else(|| parent.style.visibility.clone()),
                            opacity: decl.opacity.unwrap_or(defaults.opacity),
                            pointer_events: decl
                                .pointer_events
                                .clone()
                                .unwrap_or_else(|| parent.style.pointer_events.clone()),
                            cursor: decl
                                .cursor
                                .clone()
                                .unwrap_or_else(|| parent.style.cursor.clone()),
                        },
                        rendered: parent.rendered && decl.display.as_deref() != Some("none"),
                        z_index: decl.z_index.unwrap_or(parent.z_index),
                    }
                }
                _ => parent.clone(),
            };
            paint.push(info);
        }
        self.paint = paint;
    }

    fn paint_at(&self, index: usize) -> Option<&PaintInfo> {
        self.paint.get(index)
    }

    fn is_rendered(&self, index: usize) -> bool {
        self.paint_at(index).is_some_and(|p| p.rendered)
    }

    fn rects_of(&self, index: usize, data: &ElementData) -> Vec<BoundingBox> {
        if !self.is_rendered(index) {
            return Vec::new();
        }
        match &data.client_rects {
            Some(rects) => rects.clone(),
            None => vec![data.rect],
        }
    }

    fn collect_frames(&self, index: usize, out: &mut Vec<NodeId>) {
        if let Some(data) = self.element_at(index) {
            if data.tag == "iframe" || data.tag == "frame" {
                out.push(NodeId(index as u64));
            }
        }
        for &child in &self.nodes[index].children {
            self.collect_frames(child, out);
        }
        if let Some(shadow) = self.element_at(index).and_then(|e| e.shadow_children.as_ref()) {
            for &child in shadow {
                self.collect_frames(child, out);
            }
        }
    }
}

fn is_special_url(url: &str) -> bool {
    url == "about:blank" || url == "about:srcdoc"
}

fn same_origin(parent: &str, child: &str) -> bool {
    if is_special_url(child) {
        return true;
    }
    match (url::Url::parse(parent), url::Url::parse(child)) {
        (Ok(a), Ok(b)) => a.origin() == b.origin(),
        _ => false,
    }
}

impl Document for MemoryDocument {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn viewport(&self) -> ViewportInfo {
        self.viewport.clone()
    }

    fn body(&self) -> Result<NodeId, DocumentError> {
        if self.detached || self.nodes.is_empty() {
            return Err(DocumentError::Detached(self.url.clone()));
        }
        Ok(NodeId(0))
    }

    fn node_kind(&self, node: NodeId) -> Option<NodeKind> {
        Some(match self.nodes.get(node.0 as usize)?.data {
            NodeData::Element(_) => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Other => NodeKind::Other,
        })
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.element(node).map(|e| e.tag.clone())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(MemoryNode {
            data: NodeData::Element(data),
            ..
        }) = self.nodes.get_mut(node.0 as usize)
        {
            data.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn text(&self, node: NodeId) -> Option<String> {
        match &self.nodes.get(node.0 as usize)?.data {
            NodeData::Text(text) => Some(text.clone()),
            _ => None,
        }
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0 as usize)
            .map(|n| n.children.iter().map(|&i| NodeId(i as u64)).collect())
            .unwrap_or_default()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes
            .get(node.0 as usize)?
            .parent
            .map(|i| NodeId(i as u64))
    }

    fn shadow_children(&self, node: NodeId) -> Option<Vec<NodeId>> {
        self.element(node)?
            .shadow_children
            .as_ref()
            .map(|c| c.iter().map(|&i| NodeId(i as u64)).collect())
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes.iter().enumerate().find_map(|(i, n)| match &n.data {
            NodeData::Element(data) if data.attributes.get("id").map(String::as_str) == Some(id) => {
                Some(NodeId(i as u64))
            }
            _ => None,
        })
    }

    fn computed_style(&self, node: NodeId) -> Result<ComputedStyle, DocumentError> {
        match self.element(node) {
            Some(data) if !data.unreadable => self
                .paint_at(node.0 as usize)
                .map(|p| p.style.clone())
                .ok_or(DocumentError::StyleUnavailable(node.0)),
            _ => Err(DocumentError::StyleUnavailable(node.0)),
        }
    }

    fn bounding_rect(&self, node: NodeId) -> Result<BoundingBox, DocumentError> {
        match self.element(node) {
            Some(data) if data.geometry_readable() => {
                if self.is_rendered(node.0 as usize) {
                    Ok(data.rect)
                } else {
                    Ok(BoundingBox::default())
                }
            }
            _ => Err(DocumentError::GeometryUnavailable(node.0)),
        }
    }

    fn client_rects(&self, node: NodeId) -> Result<Vec<BoundingBox>, DocumentError> {
        match self.element(node) {
            Some(data) if data.geometry_readable() => Ok(self.rects_of(node.0 as usize, data)),
            _ => Err(DocumentError::GeometryUnavailable(node.0)),
        }
    }

    fn element_from_point(&self, x: f64, y: f64) -> Option<NodeId> {
        let mut best: Option<(i32, usize)> = None;
        for (index, node) in self.nodes.iter().enumerate() {
            let NodeData::Element(data) = &node.data else {
                continue;
            };
            let Some(paint) = self.paint_at(index) else {
                continue;
            };
            if !data.geometry_readable() || !paint.rendered {
                continue;
            }
            if paint.style.visibility == "hidden" || paint.style.pointer_events == "none" {
                continue;
            }
            let hit = self
                .rects_of(index, data)
                .iter()
                .any(|r| r.has_area() && r.contains(x, y));
            if !hit {
                continue;
            }
            let z = paint.z_index;
            // Later paint order wins ties.
            if best.is_none_or(|(best_z, _)| z >= best_z) {
                best = Some((z, index));
            }
        }
        best.map(|(_, index)| NodeId(index as u64))
    }

    fn scroll_metrics(&self, node: NodeId) -> Option<ScrollMetrics> {
        self.element(node)?.scroll
    }

    fn value(&self, node: NodeId) -> Option<String> {
        let data = self.element(node)?;
        data.value
            .clone()
            .or_else(|| data.attributes.get("value").cloned())
    }

    fn frames(&self) -> Vec<NodeId> {
        let mut frames = Vec::new();
        if !self.nodes.is_empty() {
            self.collect_frames(0, &mut frames);
        }
        frames
    }

    fn content_document(&mut self, frame: NodeId) -> Option<&mut dyn Document> {
        let parent_url = self.url.clone();
        let node = self.nodes.get_mut(frame.0 as usize)?;
        let NodeData::Element(data) = &mut node.data else {
            return None;
        };
        if data.cross_origin {
            return None;
        }
        let document = data.frame.as_mut()?;
        if !same_origin(&parent_url, &document.url) {
            return None;
        }
        Some(document.as_mut() as &mut dyn Document)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
