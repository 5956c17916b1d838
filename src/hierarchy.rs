//! Parent/child relationships derived from geometry.
//!
//! Queries read a [`DiagramState`] and never modify it; the interaction layer
//! decides what to commit.

use std::collections::{HashMap, HashSet};

use log::warn;

use crate::geometry::{area, is_inside_of, is_overlapping, is_wrapping};
use crate::model::{DiagramState, Point, RawRect, RectId, Rectangle};

/// Which wrapped rectangles a lasso may adopt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NestFilter {
    /// Every rectangle strictly inside the lasso.
    Any,
    /// Only rectangles that are root-level or direct children of the given
    /// context. Deeper rectangles keep their current parent. A parent id that
    /// no longer resolves counts as root-level.
    TopLevelOf(Option<RectId>),
}

/// Full descendant closure of `rect`, in depth-first pre-order.
///
/// Malformed data with a parent cycle is tolerated: each rectangle is visited
/// at most once and `rect` itself is never part of the result.
pub fn find_children<'a>(state: &'a DiagramState, rect: Option<&Rectangle>) -> Vec<&'a Rectangle> {
    let Some(rect) = rect else {
        return Vec::new();
    };
    let mut by_parent: HashMap<RectId, Vec<&'a Rectangle>> = HashMap::new();
    for r in state.values() {
        if let Some(parent) = r.parent_rect_id {
            by_parent.entry(parent).or_default().push(r);
        }
    }

    let mut out = Vec::new();
    let mut visited = HashSet::from([rect.id]);
    let mut stack: Vec<&'a Rectangle> = by_parent
        .get(&rect.id)
        .map(|children| children.iter().rev().copied().collect())
        .unwrap_or_default();
    while let Some(r) = stack.pop() {
        if !visited.insert(r.id) {
            warn!(id:% = r.id; "Parent cycle detected while collecting descendants");
            continue;
        }
        out.push(r);
        if let Some(children) = by_parent.get(&r.id) {
            // reversed so the lowest id is visited first
            stack.extend(children.iter().rev().copied());
        }
    }
    out
}

/// Tightest rectangle that can act as a parent for `probe`.
///
/// A rectangle qualifies when it strictly contains the probe or, with
/// `overlap_threshold` set, overlaps it by at least that percentage of the
/// probe's width or height. Among qualifying rectangles at least as large as
/// the probe, the one with the smallest area wins; on equal areas the lowest
/// id wins. Rectangles in `exclude` are never considered.
pub fn find_best_parent(
    state: &DiagramState,
    probe: &RawRect,
    exclude: &[RectId],
    overlap_threshold: Option<f32>,
) -> Option<RectId> {
    let probe_area = area(probe);
    let mut best: Option<(RectId, f32)> = None;
    for r in state.values() {
        if exclude.contains(&r.id) {
            continue;
        }
        let candidate = is_inside_of(probe, &r.bounds)
            || overlap_threshold.is_some_and(|pct| is_overlapping(probe, &r.bounds, pct));
        if !candidate {
            continue;
        }
        let r_area = area(&r.bounds);
        if r_area < probe_area {
            continue;
        }
        if best.is_none_or(|(_, best_area)| r_area < best_area) {
            best = Some((r.id, r_area));
        }
    }
    best.map(|(id, _)| id)
}

/// Every rectangle strictly wrapped by `lasso`, in ascending id order.
pub fn find_nested(state: &DiagramState, lasso: &RawRect, filter: NestFilter) -> Vec<RectId> {
    state
        .values()
        .filter(|r| is_wrapping(lasso, &r.bounds))
        .filter(|r| match filter {
            NestFilter::Any => true,
            NestFilter::TopLevelOf(context) => r
                .parent_rect_id
                .is_none_or(|parent| Some(parent) == context || !state.contains(parent)),
        })
        .map(|r| r.id)
        .collect()
}

/// Innermost rectangle under a canvas-local point.
pub fn rect_at(state: &DiagramState, point: Point) -> Option<RectId> {
    find_best_parent(state, &RawRect::point(point), &[], None)
}
