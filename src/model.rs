use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a rectangle. Allocated once and never reused within a diagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RectId(pub u64);

impl fmt::Display for RectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A position in client (screen) or canvas-local coordinates.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset_from(self, origin: Point) -> Self {
        Self {
            x: self.x - origin.x,
            y: self.y - origin.y,
        }
    }
}

/// Axis-aligned box in canvas-local coordinates: origin top-left, y grows downward.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RawRect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl RawRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Normalised box spanned by two corners given in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self {
            top,
            left,
            width: a.x.max(b.x) - left,
            height: a.y.max(b.y) - top,
        }
    }

    /// Zero-area box at `p`, used as a hit-test probe.
    pub fn point(p: Point) -> Self {
        Self::new(p.x, p.y, 0.0, 0.0)
    }

    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            top: self.top + dy,
            left: self.left + dx,
            ..self
        }
    }

    pub fn is_degenerate(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub id: RectId,
    #[serde(flatten)]
    pub bounds: RawRect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_rect_id: Option<RectId>,
}

impl Rectangle {
    pub fn new(id: RectId, bounds: RawRect) -> Self {
        Self {
            id,
            bounds,
            parent_rect_id: None,
        }
    }

    pub fn with_parent(mut self, parent: Option<RectId>) -> Self {
        self.parent_rect_id = parent;
        self
    }
}

/// The persisted application state: every rectangle keyed by id.
///
/// Iteration is in ascending id order, which is also the tie-break order of
/// the hierarchy queries.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiagramState {
    #[serde(default)]
    pub rects_by_id: BTreeMap<RectId, Rectangle>,
}

impl DiagramState {
    pub fn get(&self, id: RectId) -> Option<&Rectangle> {
        self.rects_by_id.get(&id)
    }

    pub fn values(&self) -> impl Iterator<Item = &Rectangle> + '_ {
        self.rects_by_id.values()
    }

    pub fn contains(&self, id: RectId) -> bool {
        self.rects_by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.rects_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects_by_id.is_empty()
    }

    pub fn max_id(&self) -> Option<RectId> {
        self.rects_by_id.keys().next_back().copied()
    }
}

impl FromIterator<Rectangle> for DiagramState {
    fn from_iter<I: IntoIterator<Item = Rectangle>>(iter: I) -> Self {
        Self {
            rects_by_id: iter.into_iter().map(|r| (r.id, r)).collect(),
        }
    }
}
