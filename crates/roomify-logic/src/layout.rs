//! Room layout: packs rooms side by side along +X.
//!
//! Rooms are laid out in input order with no gap and no overlap: each
//! room's min-X edge is the previous room's max-X edge, and every room
//! starts at z = 0. The aggregate bounding box feeds camera framing and
//! wall culling.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Planar input for one room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomFootprint {
    pub breadth: f32,
    pub length: f32,
}

/// Where one room ended up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomPlacement {
    pub center_x: f32,
    pub center_z: f32,
    pub breadth: f32,
    pub length: f32,
}

impl RoomPlacement {
    pub fn min_x(&self) -> f32 {
        self.center_x - self.breadth / 2.0
    }
    pub fn max_x(&self) -> f32 {
        self.center_x + self.breadth / 2.0
    }
    pub fn min_z(&self) -> f32 {
        self.center_z - self.length / 2.0
    }
    pub fn max_z(&self) -> f32 {
        self.center_z + self.length / 2.0
    }
}

/// Aggregate planar bounds of the whole scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl SceneBounds {
    /// Bounds enclosing every room, or `None` for an empty scene.
    pub fn from_rooms(rooms: &[RoomPlacement]) -> Option<Self> {
        let first = rooms.first()?;
        let init = Self {
            min_x: first.min_x(),
            max_x: first.max_x(),
            min_z: first.min_z(),
            max_z: first.max_z(),
        };
        Some(rooms[1..].iter().fold(init, |b, r| Self {
            min_x: b.min_x.min(r.min_x()),
            max_x: b.max_x.max(r.max_x()),
            min_z: b.min_z.min(r.min_z()),
            max_z: b.max_z.max(r.max_z()),
        }))
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f32 {
        self.max_z - self.min_z
    }

    /// Planar centre at floor level.
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.min_x + self.max_x) / 2.0,
            0.0,
            (self.min_z + self.max_z) / 2.0,
        )
    }

    /// Characteristic scale: the larger of width and depth.
    pub fn scale(&self) -> f32 {
        self.width().max(self.depth())
    }
}

/// Result of packing a room sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomLayout {
    pub rooms: Vec<RoomPlacement>,
    /// Sum of all breadths.
    pub total_width: f32,
    /// Largest length.
    pub max_depth: f32,
}

impl RoomLayout {
    pub fn bounds(&self) -> Option<SceneBounds> {
        SceneBounds::from_rooms(&self.rooms)
    }
}

/// Pack rooms along +X in input order.
///
/// ```
/// use roomify_logic::layout::{plan_layout, RoomFootprint};
///
/// let layout = plan_layout(&[
///     RoomFootprint { breadth: 300.0, length: 400.0 },
///     RoomFootprint { breadth: 200.0, length: 100.0 },
/// ]);
/// assert_eq!(layout.rooms[1].center_x, 400.0);
/// assert_eq!(layout.total_width, 500.0);
/// assert_eq!(layout.max_depth, 400.0);
/// ```
pub fn plan_layout(rooms: &[RoomFootprint]) -> RoomLayout {
    let mut offset = 0.0f32;
    let mut max_depth = 0.0f32;
    let mut placed = Vec::with_capacity(rooms.len());

    for room in rooms {
        placed.push(RoomPlacement {
            center_x: offset + room.breadth / 2.0,
            center_z: room.length / 2.0,
            breadth: room.breadth,
            length: room.length,
        });
        offset += room.breadth;
        max_depth = max_depth.max(room.length);
    }

    RoomLayout {
        rooms: placed,
        total_width: offset,
        max_depth,
    }
}
