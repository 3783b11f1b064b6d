//! Visual locator: hit-testable geometry for an element.

use serde::{Deserialize, Serialize};

use crate::document::{BoundingBox, Document, NodeId};

/// A client rect that is topmost at its center, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Scale a CSS-pixel box by the device pixel ratio.
    pub fn from_css(bbox: &BoundingBox, device_pixel_ratio: f64) -> Self {
        let x = bbox.x * device_pixel_ratio;
        let y = bbox.y * device_pixel_ratio;
        let width = bbox.width * device_pixel_ratio;
        let height = bbox.height * device_pixel_ratio;
        Self {
            x,
            y,
            width,
            height,
            top: y,
            left: x,
            right: x + width,
            bottom: y + height,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

pub struct VisualLocator;

impl VisualLocator {
    /// Client rects of `element` whose center is not covered by another element.
    ///
    /// A point where nothing is hit (e.g. scrolled out into empty space) counts
    /// as unobstructed. Unreadable geometry yields no rects.
    pub fn locate(doc: &dyn Document, element: NodeId) -> Vec<Rect> {
        let Ok(rects) = doc.client_rects(element) else {
            return Vec::new();
        };
        let dpr = doc.viewport().device_pixel_ratio;
        rects
            .iter()
            .filter(|bbox| {
                let (cx, cy) = bbox.center();
                Self::is_topmost(doc, element, cx, cy)
            })
            .map(|bbox| Rect::from_css(bbox, dpr))
            .collect()
    }

    /// Whether `element` (or a descendant of it) is what a click at the point lands on.
    pub fn is_topmost(doc: &dyn Document, element: NodeId, x: f64, y: f64) -> bool {
        let mut current = doc.element_from_point(x, y);
        if current.is_none() {
            return true;
        }
        while let Some(node) = current {
            if node == element {
                return true;
            }
            current = doc.parent(node);
        }
        false
    }
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;
