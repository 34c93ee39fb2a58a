//! Room boundary walls and camera-relative visibility culling.
//!
//! Each room gets up to four vertical walls, one per side, lying inside the
//! room footprint along its edges. Where two packed rooms meet, only the
//! longer room keeps its wall on the shared edge; the shorter room's wall
//! is omitted so no boundary is drawn twice.
//!
//! Culling is a pure function of camera position and wall geometry: a wall
//! whose outward normal points back at the camera would block the view of
//! the interior and is hidden.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::layout::RoomPlacement;

/// Which side of its room a wall bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    /// -X
    West,
    /// +X
    East,
    /// -Z
    North,
    /// +Z
    South,
}

impl WallSide {
    pub const ALL: [WallSide; 4] = [
        WallSide::West,
        WallSide::East,
        WallSide::North,
        WallSide::South,
    ];

    /// Outward unit normal.
    pub fn normal(self) -> Vec3 {
        match self {
            WallSide::West => Vec3::NEG_X,
            WallSide::East => Vec3::X,
            WallSide::North => Vec3::NEG_Z,
            WallSide::South => Vec3::Z,
        }
    }
}

/// A vertical boundary wall owned by exactly one room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    /// Index of the owning room.
    pub room: usize,
    pub side: WallSide,
    /// Centre of the wall slab.
    pub position: Vec3,
    /// Outward unit normal.
    pub normal: Vec3,
    /// Length along the wall.
    pub span: f32,
    pub height: f32,
    pub thickness: f32,
    /// Result of the most recent cull.
    pub visible: bool,
}

/// Per-room wall dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSpec {
    pub thickness: f32,
    pub height: f32,
}

fn room_wall(room_index: usize, room: &RoomPlacement, side: WallSide, dims: WallSpec) -> Wall {
    let inset = dims.thickness / 2.0;
    let y = dims.height / 2.0;
    let (position, span) = match side {
        WallSide::West => (Vec3::new(room.min_x() + inset, y, room.center_z), room.length),
        WallSide::East => (Vec3::new(room.max_x() - inset, y, room.center_z), room.length),
        WallSide::North => (Vec3::new(room.center_x, y, room.min_z() + inset), room.breadth),
        WallSide::South => (Vec3::new(room.center_x, y, room.max_z() - inset), room.breadth),
    };
    Wall {
        room: room_index,
        side,
        position,
        normal: side.normal(),
        span,
        height: dims.height,
        thickness: dims.thickness,
        visible: true,
    }
}

/// Build walls for rooms packed along +X, omitting the redundant wall on
/// each shared edge. `wall_dims[i]` describes room `i`'s walls.
pub fn build_walls(rooms: &[RoomPlacement], wall_dims: &[WallSpec]) -> Vec<Wall> {
    let mut walls = Vec::with_capacity(rooms.len() * 4);
    for (i, (room, dims)) in rooms.iter().zip(wall_dims).enumerate() {
        for side in WallSide::ALL {
            let shared = match side {
                // Previous room is at least as long: its east wall stands in.
                WallSide::West => i > 0 && rooms[i - 1].length >= room.length,
                // Next room is strictly longer: its west wall stands in.
                WallSide::East => rooms.get(i + 1).is_some_and(|next| next.length > room.length),
                WallSide::North | WallSide::South => false,
            };
            if !shared {
                walls.push(room_wall(i, room, side, *dims));
            }
        }
    }
    walls
}

/// Visibility decision for one wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallVisibility {
    pub visible: bool,
    /// 1.0 when visible, 0.0 when hidden.
    pub opacity: f32,
    pub dot: f32,
}

/// `dot(normalize(wall - camera), normal)`. A camera sitting exactly on the
/// wall position has no direction and yields 0.
pub fn facing_dot(camera: Vec3, wall: &Wall) -> f32 {
    (wall.position - camera)
        .try_normalize()
        .map_or(0.0, |dir| dir.dot(wall.normal))
}

/// Hidden iff the facing dot is below `threshold`.
pub fn wall_visibility(camera: Vec3, wall: &Wall, threshold: f32) -> WallVisibility {
    let dot = facing_dot(camera, wall);
    let visible = dot >= threshold;
    WallVisibility {
        visible,
        opacity: if visible { 1.0 } else { 0.0 },
        dot,
    }
}

/// Cull every wall for the given camera position. Output is index-aligned with `walls`.
pub fn cull_walls(camera: Vec3, walls: &[Wall], threshold: f32) -> Vec<WallVisibility> {
    walls
        .iter()
        .map(|w| wall_visibility(camera, w, threshold))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::walls::HIDE_THRESHOLD;
    use crate::layout::{plan_layout, RoomFootprint};

    const DIMS: WallSpec = WallSpec {
        thickness: 5.0,
        height: 80.0,
    };

    fn rooms(dims: &[(f32, f32)]) -> Vec<RoomPlacement> {
        let fps: Vec<RoomFootprint> = dims
            .iter()
            .map(|&(breadth, length)| RoomFootprint { breadth, length })
            .collect();
        plan_layout(&fps).rooms
    }

    fn find(walls: &[Wall], room: usize, side: WallSide) -> Option<&Wall> {
        walls.iter().find(|w| w.room == room && w.side == side)
    }

    #[test]
    fn single_room_has_four_walls() {
        let r = rooms(&[(300.0, 400.0)]);
        let walls = build_walls(&r, &[DIMS]);
        assert_eq!(walls.len(), 4);
        let south = find(&walls, 0, WallSide::South).unwrap();
        assert_eq!(south.position, Vec3::new(150.0, 40.0, 397.5));
        assert_eq!(south.normal, Vec3::Z);
        assert_eq!(south.span, 300.0);
    }

    #[test]
    fn shared_edge_keeps_longer_rooms_wall() {
        let r = rooms(&[(300.0, 400.0), (200.0, 100.0), (100.0, 500.0)]);
        let walls = build_walls(&r, &[DIMS; 3]);
        // 0|1: room 0 longer, room 1 drops its west wall.
        assert!(find(&walls, 0, WallSide::East).is_some());
        assert!(find(&walls, 1, WallSide::West).is_none());
        // 1|2: room 2 longer, room 1 drops its east wall.
        assert!(find(&walls, 1, WallSide::East).is_none());
        assert!(find(&walls, 2, WallSide::West).is_some());
        assert_eq!(walls.len(), 10);
    }

    #[test]
    fn equal_lengths_keep_earlier_rooms_wall() {
        let r = rooms(&[(100.0, 100.0), (100.0, 100.0)]);
        let walls = build_walls(&r, &[DIMS; 2]);
        assert!(find(&walls, 0, WallSide::East).is_some());
        assert!(find(&walls, 1, WallSide::West).is_none());
    }

    #[test]
    fn wall_facing_camera_is_hidden() {
        let r = rooms(&[(300.0, 400.0)]);
        let walls = build_walls(&r, &[DIMS]);
        let south = find(&walls, 0, WallSide::South).unwrap();
        let camera = Vec3::new(150.0, 40.0, 1000.0);
        let vis = wall_visibility(camera, south, HIDE_THRESHOLD);
        assert!(vis.dot < -0.1);
        assert!(!vis.visible);
        assert_eq!(vis.opacity, 0.0);

        let north = find(&walls, 0, WallSide::North).unwrap();
        assert!(wall_visibility(camera, north, HIDE_THRESHOLD).visible);
    }

    #[test]
    fn grazing_angle_is_hidden() {
        let r = rooms(&[(300.0, 400.0)]);
        let walls = build_walls(&r, &[DIMS]);
        let south = find(&walls, 0, WallSide::South).unwrap();
        // Mostly off to the side, slightly in front.
        let camera = south.position + Vec3::new(-1000.0, 0.0, 150.0);
        let vis = wall_visibility(camera, south, HIDE_THRESHOLD);
        assert!(vis.dot < -0.1 && vis.dot > -0.2, "dot={}", vis.dot);
        assert!(!vis.visible);
    }

    #[test]
    fn edge_on_wall_stays_visible() {
        let r = rooms(&[(300.0, 400.0)]);
        let walls = build_walls(&r, &[DIMS]);
        let south = find(&walls, 0, WallSide::South).unwrap();
        let camera = south.position + Vec3::new(-1000.0, 0.0, 0.0);
        assert!(wall_visibility(camera, south, HIDE_THRESHOLD).visible);
    }

    #[test]
    fn camera_on_wall_is_visible() {
        let r = rooms(&[(300.0, 400.0)]);
        let walls = build_walls(&r, &[DIMS]);
        let vis = wall_visibility(walls[0].position, &walls[0], HIDE_THRESHOLD);
        assert_eq!(vis.dot, 0.0);
        assert!(vis.visible);
    }

    #[test]
    fn top_down_camera_hides_nothing() {
        let r = rooms(&[(300.0, 400.0), (200.0, 100.0)]);
        let walls = build_walls(&r, &[DIMS; 2]);
        let camera = Vec3::new(250.0, 2000.0, 200.0);
        let vis = cull_walls(camera, &walls, HIDE_THRESHOLD);
        assert_eq!(vis.len(), walls.len());
        assert!(vis.iter().all(|v| v.visible));
    }

    #[test]
    fn culling_matches_dot_rule_and_is_idempotent() {
        let r = rooms(&[(300.0, 400.0), (200.0, 100.0)]);
        let walls = build_walls(&r, &[DIMS; 2]);
        let camera = Vec3::new(250.0, 480.0, 680.0);
        let first = cull_walls(camera, &walls, HIDE_THRESHOLD);
        assert_eq!(first, cull_walls(camera, &walls, HIDE_THRESHOLD));
        for (wall, vis) in walls.iter().zip(&first) {
            let dot = (wall.position - camera).normalize().dot(wall.normal);
            assert_eq!(!vis.visible, dot < -0.1);
        }
    }
}
