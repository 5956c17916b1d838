use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, warn};

use crate::error::StoreError;
use crate::model::{DiagramState, RectId, Rectangle};

/// Owner of the diagram state.
///
/// Every mutation goes through a method here and replaces the state by value:
/// snapshots handed out by [`RectStore::snapshot`] are never modified
/// afterwards.
#[derive(Clone, Debug, Default)]
pub struct RectStore {
    state: Arc<DiagramState>,
}

impl RectStore {
    pub fn new(state: DiagramState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    pub fn snapshot(&self) -> Arc<DiagramState> {
        Arc::clone(&self.state)
    }

    pub fn state(&self) -> &DiagramState {
        &self.state
    }

    pub fn get(&self, id: RectId) -> Option<&Rectangle> {
        self.state.get(id)
    }

    pub fn values(&self) -> impl Iterator<Item = &Rectangle> + '_ {
        self.state.values()
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn add(&mut self, rect: Rectangle) -> Result<(), StoreError> {
        if self.state.contains(rect.id) {
            return Err(StoreError::DuplicateId(rect.id));
        }
        let rect = if parent_allowed(&self.state, rect.id, rect.parent_rect_id) {
            rect
        } else {
            warn!(id:% = rect.id; "Dropping invalid parent on insert");
            rect.with_parent(None)
        };
        Arc::make_mut(&mut self.state)
            .rects_by_id
            .insert(rect.id, rect);
        Ok(())
    }

    /// Merges many rectangles at once. Nothing is inserted if any id clashes
    /// with the store or with another rectangle in the batch.
    pub fn extend(&mut self, rects: Vec<Rectangle>) -> Result<(), StoreError> {
        let mut seen = HashSet::with_capacity(rects.len());
        for rect in &rects {
            if self.state.contains(rect.id) || !seen.insert(rect.id) {
                return Err(StoreError::DuplicateId(rect.id));
            }
        }
        let state = Arc::make_mut(&mut self.state);
        for rect in rects {
            state.rects_by_id.insert(rect.id, rect);
        }
        Ok(())
    }

    /// Translates every rectangle in `target_ids` by `(dx, dy)` and sets the
    /// parent of `reference` to `new_parent`.
    ///
    /// `reference` need not be in `target_ids`. A parent that does not exist,
    /// or that would make `reference` its own ancestor, is ignored while the
    /// translation still applies.
    pub fn batch_apply_delta(
        &mut self,
        target_ids: &[RectId],
        reference: RectId,
        dx: f32,
        dy: f32,
        new_parent: Option<RectId>,
    ) {
        let parent_ok = parent_allowed(&self.state, reference, new_parent);
        if !parent_ok {
            warn!(
                reference:% = reference,
                parent:? = new_parent;
                "Ignoring parent assignment that would break the hierarchy"
            );
        }
        let state = Arc::make_mut(&mut self.state);
        for id in target_ids {
            if let Some(rect) = state.rects_by_id.get_mut(id) {
                rect.bounds = rect.bounds.translate(dx, dy);
            }
        }
        if parent_ok {
            if let Some(rect) = state.rects_by_id.get_mut(&reference) {
                rect.parent_rect_id = new_parent;
            }
        }
    }

    /// Sets the parent of each of `ids`, re-reading every target from the
    /// current state. Missing ids and assignments that would create a cycle
    /// are skipped.
    pub fn reparent(&mut self, ids: &[RectId], parent: Option<RectId>) {
        let allowed: Vec<RectId> = ids
            .iter()
            .copied()
            .filter(|id| {
                let ok = self.state.contains(*id) && parent_allowed(&self.state, *id, parent);
                if !ok {
                    warn!(id:% = *id, parent:? = parent; "Skipping reparent");
                }
                ok
            })
            .collect();
        if allowed.is_empty() {
            return;
        }
        let state = Arc::make_mut(&mut self.state);
        for id in allowed {
            if let Some(rect) = state.rects_by_id.get_mut(&id) {
                rect.parent_rect_id = parent;
            }
        }
    }

    /// Deletes exactly `ids`. Children of a removed rectangle are left as
    /// they are, with a parent id that no longer resolves.
    pub fn remove(&mut self, ids: &[RectId]) -> usize {
        if !ids.iter().any(|id| self.state.contains(*id)) {
            return 0;
        }
        let state = Arc::make_mut(&mut self.state);
        let removed = ids
            .iter()
            .filter(|id| state.rects_by_id.remove(*id).is_some())
            .count();
        debug!(removed = removed; "Removed rectangles");
        removed
    }
}

/// Whether `child` may take `parent`: the parent exists, is not the child
/// itself, and does not already descend from the child.
pub(crate) fn parent_allowed(state: &DiagramState, child: RectId, parent: Option<RectId>) -> bool {
    let Some(parent) = parent else {
        return true;
    };
    if parent == child || !state.contains(parent) {
        return false;
    }
    let mut visited = HashSet::new();
    let mut cursor = Some(parent);
    while let Some(id) = cursor {
        if id == child {
            return false;
        }
        if !visited.insert(id) {
            // Pre-existing cycle above the parent; it does not involve the child.
            return true;
        }
        cursor = state.get(id).and_then(|r| r.parent_rect_id);
    }
    true
}
