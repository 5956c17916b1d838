//! Pure predicates over axis-aligned rectangles.
//!
//! All comparisons are strict: rectangles that share an edge neither contain
//! nor wrap each other.

use crate::model::RawRect;

/// Overlap percentage used when a moved rectangle looks for a new parent.
pub const MOVE_OVERLAP_THRESHOLD_PERCENT: f32 = 30.0;

/// Corner coordinates of a [`RawRect`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Points {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

pub fn to_points(r: &RawRect) -> Points {
    Points {
        x1: r.left,
        y1: r.top,
        x2: r.left + r.width,
        y2: r.top + r.height,
    }
}

pub fn area(r: &RawRect) -> f32 {
    r.width * r.height
}

/// True when `b` strictly contains `a` on all four sides.
pub fn is_inside_of(a: &RawRect, b: &RawRect) -> bool {
    let a = to_points(a);
    let b = to_points(b);
    b.x1 < a.x1 && b.y1 < a.y1 && b.x2 > a.x2 && b.y2 > a.y2
}

/// True when `a` strictly contains `b`. This is the lasso direction.
pub fn is_wrapping(a: &RawRect, b: &RawRect) -> bool {
    is_inside_of(b, a)
}

/// Intersection of `a` and `b`, or `None` when it has no positive area.
pub fn overlap(a: &RawRect, b: &RawRect) -> Option<RawRect> {
    let a = to_points(a);
    let b = to_points(b);
    let x1 = a.x1.max(b.x1);
    let y1 = a.y1.max(b.y1);
    let x2 = a.x2.min(b.x2);
    let y2 = a.y2.min(b.y2);
    if x2 > x1 && y2 > y1 {
        Some(RawRect::new(x1, y1, x2 - x1, y2 - y1))
    } else {
        None
    }
}

/// True when `a` and `b` overlap with positive area and the overlap spans at
/// least `threshold_percent` of `a`'s width or of `a`'s height.
///
/// Percentages are relative to `a`, so the predicate is not symmetric.
pub fn is_overlapping(a: &RawRect, b: &RawRect, threshold_percent: f32) -> bool {
    let Some(o) = overlap(a, b) else {
        return false;
    };
    let ratio = threshold_percent / 100.0;
    o.width >= a.width * ratio || o.height >= a.height * ratio
}
