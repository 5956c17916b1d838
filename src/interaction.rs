//! Pointer-driven editing of the diagram.
//!
//! [`Editor`] owns the [`RectStore`] and the state of the gesture in progress.
//! A gesture is driven by `pointer_down`, any number of `pointer_move`s and a
//! final `pointer_up`; at most one gesture is active at a time.

use std::mem;
use std::sync::Arc;

use log::{debug, info, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{InteractionError, PersistError, StoreError};
use crate::geometry::MOVE_OVERLAP_THRESHOLD_PERCENT;
use crate::hierarchy::{NestFilter, find_best_parent, find_children, find_nested, rect_at};
use crate::model::{DiagramState, Point, RawRect, RectId, Rectangle};
use crate::persistence::{self, KeyValueStore};
use crate::store::RectStore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Pointer-down on a rectangle starts moving it.
    #[default]
    Select,
    /// Pointer-down starts a lasso that becomes a new rectangle.
    Draw,
}

/// What happens to the children of a deleted rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Children stay, still pointing at the removed parent.
    #[default]
    Orphan,
    /// The whole subtree is removed.
    Cascade,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomRects {
    pub size: f32,
    pub area_width: f32,
    pub area_height: f32,
}

impl Default for RandomRects {
    fn default() -> Self {
        Self {
            size: 100.0,
            area_width: 700.0,
            area_height: 500.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditorConfig {
    pub delete_policy: DeletePolicy,
    pub overlap_threshold_percent: f32,
    pub random: RandomRects,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            delete_policy: DeletePolicy::Orphan,
            overlap_threshold_percent: MOVE_OVERLAP_THRESHOLD_PERCENT,
            random: RandomRects::default(),
        }
    }
}

/// A pointer event as delivered by the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    /// Pointer position in client coordinates.
    pub client: Point,
    /// Client position of the canvas' top-left corner, if the view knows it.
    pub canvas_origin: Option<Point>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LassoGesture {
    initial_pointer: Point,
    canvas_origin: Point,
    bbox: RawRect,
    candidate_parent: Option<RectId>,
    candidate_nested: Vec<RectId>,
}

impl LassoGesture {
    /// Stretches the box to `client` and recomputes the parent and the
    /// rectangles it would adopt.
    fn update(&mut self, state: &DiagramState, client: Point) {
        self.bbox = RawRect::from_corners(
            self.initial_pointer.offset_from(self.canvas_origin),
            client.offset_from(self.canvas_origin),
        );
        self.candidate_parent = find_best_parent(state, &self.bbox, &[], None);
        self.candidate_nested =
            find_nested(state, &self.bbox, NestFilter::TopLevelOf(self.candidate_parent));
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoveGesture {
    rect: Rectangle,
    descendants: Vec<Rectangle>,
    initial_pointer: Point,
    applied: (f32, f32),
    candidate_parent: Option<RectId>,
}

impl MoveGesture {
    fn target_ids(&self) -> Vec<RectId> {
        std::iter::once(self.rect.id)
            .chain(self.descendants.iter().map(|r| r.id))
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Lassoing(LassoGesture),
    Moving(MoveGesture),
}

/// Advisory ids for the view to emphasise.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Highlights {
    pub selected: Option<RectId>,
    pub candidate_parent: Option<RectId>,
    pub candidate_nested: Vec<RectId>,
}

#[derive(Debug)]
pub struct Editor {
    store: RectStore,
    gesture: Gesture,
    selected: Option<RectId>,
    mode: Mode,
    /// `None` once every id has been handed out.
    next_id: Option<u64>,
    config: EditorConfig,
}

impl Editor {
    pub fn new(state: DiagramState, mode: Mode, config: EditorConfig) -> Self {
        let next_id = state.max_id().map_or(Some(1), |id| id.0.checked_add(1));
        Self {
            store: RectStore::new(state),
            gesture: Gesture::Idle,
            selected: None,
            mode,
            next_id,
            config,
        }
    }

    pub fn state(&self) -> &DiagramState {
        self.store.state()
    }

    pub fn snapshot(&self) -> Arc<DiagramState> {
        self.store.snapshot()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn selected(&self) -> Option<RectId> {
        self.selected
    }

    /// The lasso box in canvas coordinates while a lasso is being drawn.
    pub fn lasso_box(&self) -> Option<RawRect> {
        match &self.gesture {
            Gesture::Lassoing(lasso) => Some(lasso.bbox),
            _ => None,
        }
    }

    pub fn highlights(&self) -> Highlights {
        let (candidate_parent, candidate_nested) = match &self.gesture {
            Gesture::Idle => (None, Vec::new()),
            Gesture::Lassoing(lasso) => (lasso.candidate_parent, lasso.candidate_nested.clone()),
            Gesture::Moving(mv) => (mv.candidate_parent, Vec::new()),
        };
        Highlights {
            selected: self.selected,
            candidate_parent,
            candidate_nested,
        }
    }

    fn allocate_id(&mut self) -> Result<RectId, StoreError> {
        let id = self.next_id.ok_or(StoreError::IdsExhausted)?;
        self.next_id = id.checked_add(1);
        Ok(RectId(id))
    }

    /// Starts a gesture. Any gesture still in progress is discarded first.
    ///
    /// Without a canvas origin the press is rejected and the editor stays
    /// idle.
    pub fn pointer_down(&mut self, input: PointerInput) -> Result<(), InteractionError> {
        if !matches!(self.gesture, Gesture::Idle) {
            debug!("Superseding unfinished gesture");
            self.gesture = Gesture::Idle;
        }
        let origin = input
            .canvas_origin
            .ok_or(InteractionError::PreconditionFailure("canvas position"))?;
        let local = input.client.offset_from(origin);

        match self.mode {
            Mode::Draw => {
                self.selected = None;
                self.gesture = Gesture::Lassoing(LassoGesture {
                    initial_pointer: input.client,
                    canvas_origin: origin,
                    bbox: RawRect::point(local),
                    candidate_parent: None,
                    candidate_nested: Vec::new(),
                });
                debug!(x = local.x, y = local.y; "Lasso started");
            }
            Mode::Select => {
                let state = self.store.state();
                let Some(rect) = rect_at(state, local).and_then(|id| state.get(id)).cloned()
                else {
                    self.selected = None;
                    return Ok(());
                };
                let descendants: Vec<Rectangle> =
                    find_children(state, Some(&rect)).into_iter().cloned().collect();
                debug!(id:% = rect.id, descendants = descendants.len(); "Move started");
                self.selected = Some(rect.id);
                self.gesture = Gesture::Moving(MoveGesture {
                    candidate_parent: rect.parent_rect_id,
                    rect,
                    descendants,
                    initial_pointer: input.client,
                    applied: (0.0, 0.0),
                });
            }
        }
        Ok(())
    }

    pub fn pointer_move(&mut self, client: Point) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Lassoing(lasso) => {
                lasso.update(self.store.state(), client);
                trace!(
                    parent:? = lasso.candidate_parent,
                    nested = lasso.candidate_nested.len();
                    "Lasso candidates"
                );
            }
            Gesture::Moving(mv) => {
                if self.store.get(mv.rect.id).is_none() {
                    debug!(id:% = mv.rect.id; "Moved rectangle vanished, ending move");
                    self.gesture = Gesture::Idle;
                    return;
                }
                let dx = client.x - mv.initial_pointer.x;
                let dy = client.y - mv.initial_pointer.y;
                let moved = mv.rect.bounds.translate(dx, dy);
                let targets = mv.target_ids();
                let parent = find_best_parent(
                    self.store.state(),
                    &moved,
                    &targets,
                    Some(self.config.overlap_threshold_percent),
                );
                self.store.batch_apply_delta(
                    &targets,
                    mv.rect.id,
                    dx - mv.applied.0,
                    dy - mv.applied.1,
                    parent,
                );
                mv.applied = (dx, dy);
                mv.candidate_parent = parent;
                trace!(id:% = mv.rect.id, dx = dx, dy = dy, parent:? = parent; "Move step");
            }
        }
    }

    /// Finishes the current gesture. Returns the id of the rectangle a lasso
    /// created, if any.
    pub fn pointer_up(&mut self, client: Point) -> Result<Option<RectId>, InteractionError> {
        match mem::take(&mut self.gesture) {
            Gesture::Idle => Ok(None),
            Gesture::Moving(mv) => {
                debug!(id:% = mv.rect.id; "Move finished");
                Ok(None)
            }
            Gesture::Lassoing(mut lasso) => {
                lasso.update(self.store.state(), client);
                if lasso.bbox.is_degenerate() {
                    debug!("Lasso has no area, nothing created");
                    return Ok(None);
                }
                let id = self.allocate_id()?;
                self.store
                    .add(Rectangle::new(id, lasso.bbox).with_parent(lasso.candidate_parent))?;
                self.store.reparent(&lasso.candidate_nested, Some(id));
                self.selected = Some(id);
                debug!(
                    id:% = id,
                    parent:? = lasso.candidate_parent,
                    nested = lasso.candidate_nested.len();
                    "Rectangle created"
                );
                Ok(Some(id))
            }
        }
    }

    /// Removes the selected rectangle according to the delete policy and
    /// returns how many rectangles were removed.
    pub fn delete_selected(&mut self) -> usize {
        let Some(id) = self.selected.take() else {
            return 0;
        };
        let mut ids = vec![id];
        if self.config.delete_policy == DeletePolicy::Cascade {
            let state = self.store.state();
            ids.extend(find_children(state, state.get(id)).into_iter().map(|r| r.id));
        }
        if let Gesture::Moving(mv) = &self.gesture {
            if ids.contains(&mv.rect.id) {
                self.gesture = Gesture::Idle;
            }
        }
        let removed = self.store.remove(&ids);
        info!(id:% = id, removed = removed; "Deleted selection");
        removed
    }

    pub fn save(&self, kv: &mut dyn KeyValueStore) -> Result<(), PersistError> {
        persistence::save_diagram(kv, self.store.state())
    }

    /// Adds `count` root-level rectangles of the configured size at random
    /// integer positions. A count of zero adds one.
    pub fn add_random<R: Rng>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<RectId>, StoreError> {
        let RandomRects {
            size,
            area_width,
            area_height,
        } = self.config.random;
        let mut rects = Vec::with_capacity(count.max(1));
        for _ in 0..count.max(1) {
            let left = rng.random_range(0.0..=area_width).round();
            let top = rng.random_range(0.0..=area_height).round();
            rects.push(Rectangle::new(
                self.allocate_id()?,
                RawRect::new(left, top, size, size),
            ));
        }
        let ids: Vec<RectId> = rects.iter().map(|r| r.id).collect();
        self.store.extend(rects)?;
        self.selected = None;
        info!(count = ids.len(); "Added random rectangles");
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryKeyValueStore, load_diagram};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const ORIGIN: Point = Point { x: 100.0, y: 50.0 };

    fn rect(id: u64, left: f32, top: f32, width: f32, height: f32) -> Rectangle {
        Rectangle::new(RectId(id), RawRect::new(left, top, width, height))
    }

    fn editor(mode: Mode, rects: Vec<Rectangle>) -> Editor {
        Editor::new(rects.into_iter().collect(), mode, EditorConfig::default())
    }

    /// Client coordinates of a canvas-local point.
    fn at(x: f32, y: f32) -> Point {
        Point::new(x + ORIGIN.x, y + ORIGIN.y)
    }

    fn press(ed: &mut Editor, x: f32, y: f32) -> Result<(), InteractionError> {
        ed.pointer_down(PointerInput {
            client: at(x, y),
            canvas_origin: Some(ORIGIN),
        })
    }

    fn bounds(ed: &Editor, id: u64) -> RawRect {
        ed.state().get(RectId(id)).unwrap().bounds
    }

    fn parent(ed: &Editor, id: u64) -> Option<RectId> {
        ed.state().get(RectId(id)).unwrap().parent_rect_id
    }

    #[test]
    fn lasso_creates_rect_under_best_parent_and_adopts_nested() {
        let mut ed = editor(
            Mode::Draw,
            vec![
                rect(1, 0.0, 0.0, 500.0, 500.0),
                rect(2, 60.0, 60.0, 20.0, 20.0).with_parent(Some(RectId(1))),
                rect(3, 140.0, 140.0, 50.0, 50.0).with_parent(Some(RectId(1))),
            ],
        );
        press(&mut ed, 50.0, 50.0).unwrap();
        ed.pointer_move(at(150.0, 150.0));

        let h = ed.highlights();
        assert_eq!(h.candidate_parent, Some(RectId(1)));
        assert_eq!(h.candidate_nested, vec![RectId(2)]);
        assert_eq!(ed.state().len(), 3);

        let id = ed.pointer_up(at(150.0, 150.0)).unwrap().unwrap();
        assert_eq!(id, RectId(4));
        assert_eq!(bounds(&ed, 4), RawRect::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(parent(&ed, 4), Some(RectId(1)));
        assert_eq!(parent(&ed, 2), Some(RectId(4)));
        assert_eq!(parent(&ed, 3), Some(RectId(1)));
        assert_eq!(ed.selected(), Some(RectId(4)));
        assert_eq!(ed.gesture(), &Gesture::Idle);
        assert_eq!(ed.highlights().candidate_nested, Vec::<RectId>::new());
    }

    #[test]
    fn lasso_released_without_move_uses_release_position() {
        let mut ed = editor(Mode::Draw, vec![rect(1, 0.0, 0.0, 500.0, 500.0)]);
        press(&mut ed, 50.0, 50.0).unwrap();
        let id = ed.pointer_up(at(100.0, 100.0)).unwrap().unwrap();
        assert_eq!(bounds(&ed, id.0), RawRect::new(50.0, 50.0, 50.0, 50.0));
        assert_eq!(parent(&ed, id.0), Some(RectId(1)));
    }

    #[test]
    fn lasso_shrunk_before_release_only_adopts_what_it_wraps() {
        let mut ed = editor(
            Mode::Draw,
            vec![
                rect(1, 0.0, 0.0, 500.0, 500.0),
                rect(2, 60.0, 60.0, 20.0, 20.0).with_parent(Some(RectId(1))),
            ],
        );
        press(&mut ed, 50.0, 50.0).unwrap();
        ed.pointer_move(at(150.0, 150.0));
        assert_eq!(ed.highlights().candidate_nested, vec![RectId(2)]);

        let id = ed.pointer_up(at(70.0, 70.0)).unwrap().unwrap();
        assert_eq!(bounds(&ed, id.0), RawRect::new(50.0, 50.0, 20.0, 20.0));
        assert_eq!(parent(&ed, id.0), Some(RectId(1)));
        assert_eq!(parent(&ed, 2), Some(RectId(1)));
    }

    #[test]
    fn exhausted_ids_are_reported_instead_of_wrapping() {
        let mut ed = editor(Mode::Draw, vec![rect(u64::MAX, 0.0, 0.0, 10.0, 10.0)]);
        press(&mut ed, 20.0, 20.0).unwrap();
        assert_eq!(
            ed.pointer_up(at(40.0, 40.0)),
            Err(InteractionError::Store(StoreError::IdsExhausted))
        );
        assert_eq!(ed.state().len(), 1);
        assert_eq!(ed.gesture(), &Gesture::Idle);

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(ed.add_random(3, &mut rng), Err(StoreError::IdsExhausted));
        assert_eq!(ed.state().len(), 1);
    }

    #[test]
    fn last_id_is_still_handed_out() {
        let mut ed = editor(Mode::Draw, vec![rect(u64::MAX - 1, 0.0, 0.0, 10.0, 10.0)]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(ed.add_random(1, &mut rng), Ok(vec![RectId(u64::MAX)]));
        assert_eq!(ed.add_random(1, &mut rng), Err(StoreError::IdsExhausted));
        assert_eq!(ed.state().len(), 2);
    }

    #[test]
    fn lasso_box_normalises_backwards_drag() {
        let mut ed = editor(Mode::Draw, vec![]);
        press(&mut ed, 150.0, 150.0).unwrap();
        ed.pointer_move(at(50.0, 70.0));
        assert_eq!(ed.lasso_box(), Some(RawRect::new(50.0, 70.0, 100.0, 80.0)));
    }

    #[test]
    fn lasso_does_not_steal_grandchildren() {
        let mut ed = editor(
            Mode::Draw,
            vec![
                rect(1, 100.0, 100.0, 100.0, 100.0),
                rect(2, 110.0, 110.0, 10.0, 10.0).with_parent(Some(RectId(1))),
            ],
        );
        press(&mut ed, 50.0, 50.0).unwrap();
        ed.pointer_move(at(300.0, 300.0));
        let id = ed.pointer_up(at(300.0, 300.0)).unwrap().unwrap();
        assert_eq!(parent(&ed, 1), Some(id));
        assert_eq!(parent(&ed, 2), Some(RectId(1)));
    }

    #[test]
    fn click_without_drag_creates_nothing() {
        let mut ed = editor(Mode::Draw, vec![]);
        press(&mut ed, 10.0, 10.0).unwrap();
        assert_eq!(ed.pointer_up(at(10.0, 10.0)).unwrap(), None);
        assert!(ed.state().is_empty());
        assert_eq!(ed.gesture(), &Gesture::Idle);
    }

    #[test]
    fn missing_canvas_origin_aborts_without_mutation() {
        let mut ed = editor(Mode::Draw, vec![rect(1, 0.0, 0.0, 10.0, 10.0)]);
        let before = ed.snapshot();
        let err = ed
            .pointer_down(PointerInput {
                client: at(5.0, 5.0),
                canvas_origin: None,
            })
            .unwrap_err();
        assert!(matches!(err, InteractionError::PreconditionFailure(_)));
        assert_eq!(ed.gesture(), &Gesture::Idle);
        ed.pointer_move(at(50.0, 50.0));
        assert_eq!(ed.pointer_up(at(50.0, 50.0)).unwrap(), None);
        assert_eq!(*ed.snapshot(), *before);
    }

    #[test]
    fn moving_parent_carries_descendants() {
        let mut ed = editor(
            Mode::Select,
            vec![
                rect(1, 100.0, 100.0, 100.0, 100.0),
                rect(2, 110.0, 110.0, 20.0, 20.0).with_parent(Some(RectId(1))),
                rect(3, 112.0, 112.0, 5.0, 5.0).with_parent(Some(RectId(2))),
            ],
        );
        press(&mut ed, 150.0, 180.0).unwrap();
        assert_eq!(ed.selected(), Some(RectId(1)));
        ed.pointer_move(at(155.0, 181.0));
        ed.pointer_move(at(160.0, 185.0));
        ed.pointer_up(at(160.0, 185.0)).unwrap();

        assert_eq!(bounds(&ed, 1), RawRect::new(110.0, 105.0, 100.0, 100.0));
        assert_eq!(bounds(&ed, 2), RawRect::new(120.0, 115.0, 20.0, 20.0));
        assert_eq!(bounds(&ed, 3), RawRect::new(122.0, 117.0, 5.0, 5.0));
        assert_eq!(parent(&ed, 1), None);
        assert_eq!(parent(&ed, 2), Some(RectId(1)));
        assert_eq!(parent(&ed, 3), Some(RectId(2)));
    }

    #[test]
    fn moving_into_a_box_reparents_and_moving_out_clears() {
        let mut ed = editor(
            Mode::Select,
            vec![
                rect(1, 0.0, 0.0, 300.0, 300.0),
                rect(2, 400.0, 400.0, 50.0, 50.0),
            ],
        );
        press(&mut ed, 410.0, 410.0).unwrap();
        ed.pointer_move(at(110.0, 110.0));
        assert_eq!(ed.highlights().candidate_parent, Some(RectId(1)));
        assert_eq!(parent(&ed, 2), Some(RectId(1)));
        ed.pointer_up(at(110.0, 110.0)).unwrap();

        press(&mut ed, 110.0, 110.0).unwrap();
        assert_eq!(ed.selected(), Some(RectId(2)));
        ed.pointer_move(at(610.0, 610.0));
        ed.pointer_up(at(610.0, 610.0)).unwrap();
        assert_eq!(parent(&ed, 2), None);
        assert_eq!(bounds(&ed, 2), RawRect::new(600.0, 600.0, 50.0, 50.0));
    }

    #[test]
    fn moving_never_picks_own_descendant_as_parent() {
        let mut ed = editor(
            Mode::Select,
            vec![
                rect(1, 0.0, 0.0, 100.0, 100.0),
                rect(2, 1.0, 1.0, 98.0, 98.0).with_parent(Some(RectId(1))),
            ],
        );
        press(&mut ed, 0.5, 50.0).unwrap();
        assert_eq!(ed.selected(), Some(RectId(1)));
        ed.pointer_move(at(5.5, 50.0));
        assert_eq!(parent(&ed, 1), None);
        assert_eq!(parent(&ed, 2), Some(RectId(1)));
    }

    #[test]
    fn pressing_empty_canvas_in_select_mode_clears_selection() {
        let mut ed = editor(Mode::Select, vec![rect(1, 0.0, 0.0, 10.0, 10.0)]);
        press(&mut ed, 5.0, 5.0).unwrap();
        ed.pointer_up(at(5.0, 5.0)).unwrap();
        assert_eq!(ed.selected(), Some(RectId(1)));
        press(&mut ed, 50.0, 50.0).unwrap();
        assert_eq!(ed.selected(), None);
        assert_eq!(ed.gesture(), &Gesture::Idle);
    }

    #[test]
    fn new_press_supersedes_running_gesture() {
        let mut ed = editor(Mode::Draw, vec![]);
        press(&mut ed, 0.0, 0.0).unwrap();
        ed.pointer_move(at(40.0, 40.0));
        press(&mut ed, 100.0, 100.0).unwrap();
        ed.pointer_move(at(120.0, 130.0));
        let id = ed.pointer_up(at(120.0, 130.0)).unwrap().unwrap();
        assert_eq!(bounds(&ed, id.0), RawRect::new(100.0, 100.0, 20.0, 30.0));
        assert_eq!(ed.state().len(), 1);
    }

    #[test]
    fn delete_orphans_children_by_default() {
        let mut ed = editor(
            Mode::Select,
            vec![
                rect(1, 0.0, 0.0, 100.0, 100.0),
                rect(2, 10.0, 10.0, 10.0, 10.0).with_parent(Some(RectId(1))),
            ],
        );
        press(&mut ed, 50.0, 50.0).unwrap();
        ed.pointer_up(at(50.0, 50.0)).unwrap();
        assert_eq!(ed.delete_selected(), 1);
        assert!(ed.state().get(RectId(1)).is_none());
        assert_eq!(parent(&ed, 2), Some(RectId(1)));
        assert_eq!(ed.selected(), None);
        assert_eq!(ed.delete_selected(), 0);
    }

    #[test]
    fn cascade_delete_removes_subtree() {
        let mut ed = Editor::new(
            [
                rect(1, 0.0, 0.0, 100.0, 100.0),
                rect(2, 10.0, 10.0, 50.0, 50.0).with_parent(Some(RectId(1))),
                rect(3, 20.0, 20.0, 5.0, 5.0).with_parent(Some(RectId(2))),
                rect(4, 200.0, 200.0, 5.0, 5.0),
            ]
            .into_iter()
            .collect(),
            Mode::Select,
            EditorConfig {
                delete_policy: DeletePolicy::Cascade,
                ..EditorConfig::default()
            },
        );
        press(&mut ed, 90.0, 90.0).unwrap();
        assert_eq!(ed.delete_selected(), 3);
        assert_eq!(ed.gesture(), &Gesture::Idle);
        assert_eq!(ed.state().len(), 1);
        assert!(ed.state().get(RectId(4)).is_some());
    }

    #[test]
    fn ids_continue_after_loaded_state() {
        let mut ed = editor(Mode::Draw, vec![rect(41, 500.0, 500.0, 5.0, 5.0)]);
        press(&mut ed, 0.0, 0.0).unwrap();
        let id = ed.pointer_up(at(10.0, 10.0)).unwrap().unwrap();
        assert_eq!(id, RectId(42));
    }

    #[test]
    fn add_random_places_fixed_size_rects_in_area() {
        let mut ed = editor(Mode::Select, vec![rect(1, 0.0, 0.0, 10.0, 10.0)]);
        let mut rng = StdRng::seed_from_u64(7);
        let ids = ed.add_random(25, &mut rng).unwrap();
        assert_eq!(ids.len(), 25);
        assert_eq!(ed.state().len(), 26);
        for id in ids {
            let r = ed.state().get(id).unwrap();
            assert_eq!(r.parent_rect_id, None);
            assert_eq!((r.bounds.width, r.bounds.height), (100.0, 100.0));
            assert!((0.0..=700.0).contains(&r.bounds.left));
            assert!((0.0..=500.0).contains(&r.bounds.top));
            assert_eq!(r.bounds.left, r.bounds.left.round());
        }
        assert_eq!(ed.add_random(0, &mut rng).unwrap().len(), 1);
    }

    #[test]
    fn save_then_reload_restores_same_diagram() {
        let mut ed = editor(Mode::Draw, vec![rect(1, 0.0, 0.0, 300.0, 300.0)]);
        press(&mut ed, 10.0, 10.0).unwrap();
        ed.pointer_move(at(50.0, 50.0));
        ed.pointer_up(at(50.0, 50.0)).unwrap();

        let mut kv = MemoryKeyValueStore::default();
        ed.save(&mut kv).unwrap();
        let reloaded = Editor::new(load_diagram(&kv), Mode::Select, EditorConfig::default());
        assert_eq!(reloaded.state(), ed.state());
    }
}
