//! Furniture placement: clamp, collide, then spiral.
//!
//! Algorithm: "clamp then spiral"
//! 1. Compute the item's world-axis extents (rotation about Y applied)
//! 2. Compute the allowed centre range per axis; an axis the item cannot
//!    fit on is pinned to the room centre instead of clamped
//! 3. Clamp the requested position into range and rest the item on the floor
//! 4. If the box hits nothing already placed in the room, commit
//! 5. Otherwise scan rings of growing radius, 12 angles per ring, and commit
//!    the first in-range, collision-free candidate
//! 6. If the scan is exhausted, commit at the room centre anyway and report
//!    the placement as degraded
//!
//! Coordinates passed in and out are relative to the room centre unless a
//! name says otherwise; boxes are always in world space.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::geometry::{rotated_extents, Aabb};
use crate::resolver::ModelSize;

/// Stable identifier of a furniture item within a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// Allowed range for an item's centre along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f32,
    pub max: f32,
}

impl AxisRange {
    /// `±(half_room - wall_thickness - half_extent - margin)`.
    pub fn new(half_room: f32, wall_thickness: f32, half_extent: f32, margin: f32) -> Self {
        Self {
            min: -half_room + wall_thickness + half_extent + margin,
            max: half_room - wall_thickness - half_extent - margin,
        }
    }

    /// False when the item is too large for this axis.
    pub fn is_satisfiable(&self) -> bool {
        self.min <= self.max
    }

    /// Clamp into range, or 0 (room centre) when the range is empty.
    pub fn clamp(&self, v: f32) -> f32 {
        if self.is_satisfiable() {
            v.clamp(self.min, self.max)
        } else {
            0.0
        }
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }

    /// Spiral candidate coordinate on this axis, if allowed. An empty range
    /// only admits the room centre, snapped to exactly 0.
    pub fn admit(&self, v: f32) -> Option<f32> {
        if self.is_satisfiable() {
            self.contains(v).then_some(v)
        } else {
            (v.abs() <= PINNED_AXIS_TOLERANCE).then_some(0.0)
        }
    }
}

/// How far a spiral candidate may stray from 0 on a pinned axis and still
/// count as the centre. Absorbs `cos(90°)` rounding.
const PINNED_AXIS_TOLERANCE: f32 = 0.01;

/// World-axis extents of an item at its current rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemExtent {
    /// Full extent along X.
    pub x: f32,
    /// Full extent along Z.
    pub z: f32,
    pub height: f32,
    pub min_y: f32,
}

impl ItemExtent {
    pub fn from_size(size: &ModelSize, rotation: f32) -> Self {
        let (x, z) = rotated_extents(size.width, size.depth, rotation);
        Self {
            x,
            z,
            height: size.height,
            min_y: size.min_y,
        }
    }
}

/// A room's geometry as placement sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomFrame {
    pub center_x: f32,
    pub center_z: f32,
    pub breadth: f32,
    pub length: f32,
    pub wall_thickness: f32,
}

impl RoomFrame {
    /// Allowed centre ranges `(x, z)` for an item of this extent.
    pub fn axis_ranges(&self, extent: &ItemExtent, margin: f32) -> (AxisRange, AxisRange) {
        (
            AxisRange::new(self.breadth / 2.0, self.wall_thickness, extent.x / 2.0, margin),
            AxisRange::new(self.length / 2.0, self.wall_thickness, extent.z / 2.0, margin),
        )
    }

    /// World-space box of an item at room-relative `(rel_x, rel_z)`, resting on the floor.
    pub fn item_box(&self, rel_x: f32, rel_z: f32, extent: &ItemExtent, floor_top_y: f32) -> Aabb {
        let min = Vec3::new(
            self.center_x + rel_x - extent.x / 2.0,
            floor_top_y,
            self.center_z + rel_z - extent.z / 2.0,
        );
        let max = Vec3::new(
            self.center_x + rel_x + extent.x / 2.0,
            floor_top_y + extent.height,
            self.center_z + rel_z + extent.z / 2.0,
        );
        Aabb::new(min, max)
    }

    /// World position → room-relative `(x, z)`.
    pub fn to_relative(&self, world_x: f32, world_z: f32) -> (f32, f32) {
        (world_x - self.center_x, world_z - self.center_z)
    }

    /// Room-relative `(x, z)` → world position.
    pub fn to_world(&self, rel_x: f32, rel_z: f32) -> (f32, f32) {
        (rel_x + self.center_x, rel_z + self.center_z)
    }
}

/// Elevation of an item's origin such that its lowest point touches the floor.
pub fn rest_on_floor(extent: &ItemExtent, floor_top_y: f32) -> f32 {
    floor_top_y - extent.min_y
}

/// Boxes of the items currently committed in one room.
///
/// Keyed by item so each item appears at most once.
#[derive(Debug, Clone, Default)]
pub struct PlacedSet {
    boxes: HashMap<ItemId, Aabb>,
}

impl PlacedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item's box, returning the previous one.
    pub fn insert(&mut self, id: ItemId, aabb: Aabb) -> Option<Aabb> {
        self.boxes.insert(id, aabb)
    }

    pub fn remove(&mut self, id: ItemId) -> Option<Aabb> {
        self.boxes.remove(&id)
    }

    pub fn get(&self, id: ItemId) -> Option<&Aabb> {
        self.boxes.get(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.boxes.contains_key(&id)
    }

    /// True if `candidate` intersects any committed box.
    pub fn collides(&self, candidate: &Aabb) -> bool {
        self.boxes.values().any(|b| b.intersects(candidate))
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &Aabb)> {
        self.boxes.iter()
    }
}

/// How a placement was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlacementOutcome {
    /// Clamped request was free.
    Direct,
    /// Found by the spiral scan.
    Spiral { radius: f32, angle_deg: f32 },
    /// Scan exhausted; committed at the room centre, may overlap.
    Degraded,
}

impl PlacementOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, PlacementOutcome::Degraded)
    }
}

/// Final placement of one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rel_x: f32,
    pub rel_z: f32,
    /// Elevation of the item's origin.
    pub y: f32,
    pub aabb: Aabb,
    pub outcome: PlacementOutcome,
    /// Axis pinned to the room centre because the item does not fit on it.
    pub centered_x: bool,
    pub centered_z: bool,
}

/// Place one item in a room and commit its box to `placed`.
///
/// Always commits; check [`Placement::outcome`] for degraded placements.
pub fn place_item(
    frame: &RoomFrame,
    placed: &mut PlacedSet,
    id: ItemId,
    requested: (f32, f32),
    extent: &ItemExtent,
    config: &EngineConfig,
) -> Placement {
    let (range_x, range_z) = frame.axis_ranges(extent, config.wall_margin);
    let centered_x = !range_x.is_satisfiable();
    let centered_z = !range_z.is_satisfiable();
    if centered_x || centered_z {
        log::warn!(
            "item {:?} too large for room interior (x: {}, z: {}), centring",
            id,
            centered_x,
            centered_z
        );
    }

    let x = range_x.clamp(requested.0);
    let z = range_z.clamp(requested.1);
    let y = rest_on_floor(extent, config.floor_top_y);

    let commit = |placed: &mut PlacedSet, x: f32, z: f32, outcome: PlacementOutcome| {
        let aabb = frame.item_box(x, z, extent, config.floor_top_y);
        placed.insert(id, aabb);
        Placement {
            rel_x: x,
            rel_z: z,
            y,
            aabb,
            outcome,
            centered_x,
            centered_z,
        }
    };

    let candidate = frame.item_box(x, z, extent, config.floor_top_y);
    if !placed.collides(&candidate) {
        log::debug!("item {:?} placed directly at ({:.1}, {:.1})", id, x, z);
        return commit(placed, x, z, PlacementOutcome::Direct);
    }

    if let Some((cx, cz, radius, angle_deg)) =
        spiral_search(frame, placed, (x, z), extent, (range_x, range_z), config)
    {
        log::debug!(
            "item {:?} moved by spiral to ({:.1}, {:.1}) r={} a={}",
            id,
            cx,
            cz,
            radius,
            angle_deg
        );
        return commit(placed, cx, cz, PlacementOutcome::Spiral { radius, angle_deg });
    }

    log::warn!(
        "item {:?}: no free slot near ({:.1}, {:.1}), falling back to room centre",
        id,
        x,
        z
    );
    commit(placed, 0.0, 0.0, PlacementOutcome::Degraded)
}

/// Scan rings around `origin` for the first free, in-range candidate.
/// Returns `(x, z, radius, angle_deg)`.
fn spiral_search(
    frame: &RoomFrame,
    placed: &PlacedSet,
    origin: (f32, f32),
    extent: &ItemExtent,
    ranges: (AxisRange, AxisRange),
    config: &EngineConfig,
) -> Option<(f32, f32, f32, f32)> {
    let step = extent.x.max(extent.z).max(config.min_spiral_step);
    if !(step.is_finite() && step > 0.0) {
        return None;
    }
    let max_radius = frame.breadth.max(frame.length);
    let angle_step = if config.spiral_angle_step_deg > 0.0 {
        config.spiral_angle_step_deg
    } else {
        360.0
    };
    let angles = ((360.0 / angle_step).ceil() as u32).max(1);

    let mut ring = 1u32;
    loop {
        let radius = step * ring as f32;
        if radius > max_radius {
            return None;
        }
        for i in 0..angles {
            let angle_deg = i as f32 * angle_step;
            if angle_deg >= 360.0 {
                break;
            }
            let (sin, cos) = angle_deg.to_radians().sin_cos();
            let (Some(cx), Some(cz)) = (
                ranges.0.admit(origin.0 + radius * cos),
                ranges.1.admit(origin.1 + radius * sin),
            ) else {
                continue;
            };
            let candidate = frame.item_box(cx, cz, extent, config.floor_top_y);
            if !placed.collides(&candidate) {
                return Some((cx, cz, radius, angle_deg));
            }
        }
        ring += 1;
    }
}
