//! Interactive drag relocation of a placed item.
//!
//! A drag session pulls the item's box out of its room's placed set so it
//! cannot collide with itself, validates every pointer move with the same
//! clamp and collision test placement uses, and puts the box back on
//! release. Each move either commits the new position or reverts to the
//! last committed one; nothing in between is ever observable.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::geometry::Aabb;
use crate::placement::{ItemExtent, ItemId, PlacedSet, RoomFrame};

/// Result of a single drag move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DragMove {
    /// Candidate was free; the item now sits at `(x, z)` (room-relative).
    Moved { x: f32, z: f32 },
    /// Candidate collided; the item stays at its last committed `(x, z)`.
    Reverted { x: f32, z: f32 },
}

impl DragMove {
    /// The committed room-relative position after this move.
    pub fn position(&self) -> (f32, f32) {
        match *self {
            DragMove::Moved { x, z } | DragMove::Reverted { x, z } => (x, z),
        }
    }
}

/// State of an in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub item: ItemId,
    /// Index of the item's room in the owning scene.
    pub room: usize,
    /// Room-relative position at drag start.
    pub start: (f32, f32),
    /// Last collision-free position of this session.
    pub committed: (f32, f32),
    committed_box: Aabb,
}

impl DragSession {
    pub fn committed_box(&self) -> &Aabb {
        &self.committed_box
    }
}

/// Owns at most one drag session at a time.
#[derive(Debug, Clone, Default)]
pub struct DragRelocator {
    session: Option<DragSession>,
}

impl DragRelocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Start dragging `item`, currently committed at room-relative `position`.
    ///
    /// Removes the item's box from `placed`. Returns `false` (and does
    /// nothing) if the item has no box there or a session is already open.
    pub fn begin(
        &mut self,
        item: ItemId,
        room: usize,
        position: (f32, f32),
        placed: &mut PlacedSet,
    ) -> bool {
        if self.session.is_some() {
            return false;
        }
        let Some(committed_box) = placed.remove(item) else {
            return false;
        };
        log::debug!("drag start {:?} at ({:.1}, {:.1})", item, position.0, position.1);
        self.session = Some(DragSession {
            item,
            room,
            start: position,
            committed: position,
            committed_box,
        });
        true
    }

    /// Validate a pointer move to world `(x, z)`.
    ///
    /// `placed` must be the room's set with the dragged item excluded, which
    /// is what [`begin`](Self::begin) leaves behind. Returns `None` when no
    /// session is open. A non-finite pointer position reverts.
    pub fn move_to(
        &mut self,
        world: (f32, f32),
        frame: &RoomFrame,
        extent: &ItemExtent,
        placed: &PlacedSet,
        config: &EngineConfig,
    ) -> Option<DragMove> {
        let session = self.session.as_mut()?;

        if !(world.0.is_finite() && world.1.is_finite()) {
            log::debug!("drag {:?}: ignoring non-finite pointer {:?}", session.item, world);
            let (x, z) = session.committed;
            return Some(DragMove::Reverted { x, z });
        }

        let (rel_x, rel_z) = frame.to_relative(world.0, world.1);
        let (range_x, range_z) = frame.axis_ranges(extent, config.wall_margin);
        let x = range_x.clamp(rel_x);
        let z = range_z.clamp(rel_z);
        let candidate = frame.item_box(x, z, extent, config.floor_top_y);

        if placed.collides(&candidate) {
            let (x, z) = session.committed;
            return Some(DragMove::Reverted { x, z });
        }

        session.committed = (x, z);
        session.committed_box = candidate;
        Some(DragMove::Moved { x, z })
    }

    /// Finish the drag, putting the committed box back into `placed`.
    ///
    /// Returns the finished session, or `None` when no session was open.
    pub fn end(&mut self, placed: &mut PlacedSet) -> Option<DragSession> {
        let session = self.session.take()?;
        placed.insert(session.item, session.committed_box);
        log::debug!(
            "drag end {:?} at ({:.1}, {:.1})",
            session.item,
            session.committed.0,
            session.committed.1
        );
        Some(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::place_item;
    use crate::resolver::ModelSize;

    fn setup() -> (RoomFrame, PlacedSet, ItemExtent, EngineConfig) {
        let frame = RoomFrame {
            center_x: 150.0,
            center_z: 200.0,
            breadth: 300.0,
            length: 400.0,
            wall_thickness: 5.0,
        };
        let extent = ItemExtent::from_size(&ModelSize::new(50.0, 50.0, 40.0), 0.0);
        let config = EngineConfig::default();
        let mut placed = PlacedSet::new();
        place_item(&frame, &mut placed, ItemId(0), (-60.0, 0.0), &extent, &config);
        place_item(&frame, &mut placed, ItemId(1), (60.0, 0.0), &extent, &config);
        (frame, placed, extent, config)
    }

    #[test]
    fn begin_removes_box_and_end_restores_it() {
        let (_, mut placed, _, _) = setup();
        let mut drag = DragRelocator::new();
        assert!(drag.begin(ItemId(0), 0, (-60.0, 0.0), &mut placed));
        assert!(!placed.contains(ItemId(0)));
        assert_eq!(placed.len(), 1);
        let session = drag.end(&mut placed).unwrap();
        assert_eq!(session.committed, (-60.0, 0.0));
        assert!(placed.contains(ItemId(0)));
        assert_eq!(placed.len(), 2);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn unknown_item_is_a_no_op() {
        let (_, mut placed, _, _) = setup();
        let mut drag = DragRelocator::new();
        assert!(!drag.begin(ItemId(9), 0, (0.0, 0.0), &mut placed));
        assert!(!drag.is_dragging());
        assert_eq!(placed.len(), 2);
    }

    #[test]
    fn item_does_not_collide_with_itself() {
        let (frame, mut placed, extent, config) = setup();
        let mut drag = DragRelocator::new();
        drag.begin(ItemId(0), 0, (-60.0, 0.0), &mut placed);
        // Nudge by 5: overlaps its own old box, which is out of the set.
        let mv = drag
            .move_to((150.0 - 55.0, 200.0), &frame, &extent, &placed, &config)
            .unwrap();
        assert_eq!(mv, DragMove::Moved { x: -55.0, z: 0.0 });
    }

    #[test]
    fn colliding_move_reverts_to_last_commit() {
        let (frame, mut placed, extent, config) = setup();
        let mut drag = DragRelocator::new();
        drag.begin(ItemId(0), 0, (-60.0, 0.0), &mut placed);
        drag.move_to((150.0 - 20.0, 200.0), &frame, &extent, &placed, &config);
        let before = drag.session().unwrap().committed;
        // Onto item 1 at +60.
        let mv = drag
            .move_to((150.0 + 55.0, 200.0), &frame, &extent, &placed, &config)
            .unwrap();
        assert_eq!(mv.position(), before);
        assert!(matches!(mv, DragMove::Reverted { .. }));

        let session = drag.end(&mut placed).unwrap();
        assert_eq!(session.committed, (-20.0, 0.0));
        let b = placed.get(ItemId(0)).unwrap();
        assert_eq!(b.center().x, 130.0);
    }

    #[test]
    fn move_is_clamped_into_room() {
        let (frame, mut placed, extent, config) = setup();
        let mut drag = DragRelocator::new();
        drag.begin(ItemId(0), 0, (-60.0, 0.0), &mut placed);
        let mv = drag
            .move_to((-500.0, 200.0), &frame, &extent, &placed, &config)
            .unwrap();
        assert_eq!(mv, DragMove::Moved { x: -110.0, z: 0.0 });
    }

    #[test]
    fn move_without_session_is_none() {
        let (frame, placed, extent, config) = setup();
        let mut drag = DragRelocator::new();
        assert!(drag
            .move_to((0.0, 0.0), &frame, &extent, &placed, &config)
            .is_none());
        let mut placed = placed;
        assert!(drag.end(&mut placed).is_none());
    }

    #[test]
    fn non_finite_pointer_reverts_and_keeps_box_finite() {
        let (frame, mut placed, extent, config) = setup();
        let mut drag = DragRelocator::new();
        drag.begin(ItemId(0), 0, (-60.0, 0.0), &mut placed);
        for world in [
            (f32::NAN, 200.0),
            (150.0, f32::NAN),
            (f32::INFINITY, 200.0),
            (150.0, f32::NEG_INFINITY),
        ] {
            let mv = drag
                .move_to(world, &frame, &extent, &placed, &config)
                .unwrap();
            assert_eq!(mv, DragMove::Reverted { x: -60.0, z: 0.0 }, "{world:?}");
        }
        let session = drag.end(&mut placed).unwrap();
        assert_eq!(session.committed, (-60.0, 0.0));
        let b = placed.get(ItemId(0)).unwrap();
        assert!(b.min.is_finite() && b.max.is_finite());

        // Still blocks the other item.
        drag.begin(ItemId(1), 0, (60.0, 0.0), &mut placed);
        let mv = drag
            .move_to((150.0 - 60.0, 200.0), &frame, &extent, &placed, &config)
            .unwrap();
        assert_eq!(mv, DragMove::Reverted { x: 60.0, z: 0.0 });
    }

    #[test]
    fn second_begin_is_refused_while_dragging() {
        let (_, mut placed, _, _) = setup();
        let mut drag = DragRelocator::new();
        assert!(drag.begin(ItemId(0), 0, (-60.0, 0.0), &mut placed));
        assert!(!drag.begin(ItemId(1), 0, (60.0, 0.0), &mut placed));
        assert!(placed.contains(ItemId(1)));
    }
}
