//! Axis-aligned boxes, footprint extents, and layout validation.
//!
//! The validation half mirrors the checks a harness or operator runs after
//! a scene is built: pure functions over plain structs that return
//! `ValidationError`s instead of failing.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given half-extents centred on `center`.
    pub fn from_center(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Strict overlap on every axis. Boxes that only share a face do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
            && self.min.z < other.max.z
            && other.min.z < self.max.z
    }
}

/// World-axis extents (full width along X, full depth along Z) of a
/// `width × depth` footprint rotated by `rotation` radians about Y.
pub fn rotated_extents(width: f32, depth: f32, rotation: f32) -> (f32, f32) {
    let (sin, cos) = rotation.sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    (width * cos + depth * sin, width * sin + depth * cos)
}

/// Minimal room footprint data for validation. `x`/`z` is the min corner.
#[derive(Debug, Clone)]
pub struct RoomRect {
    pub id: u32,
    pub x: f32,
    pub z: f32,
    pub breadth: f32,
    pub length: f32,
    pub wall_thickness: f32,
}

/// Minimal placed-item data for validation.
#[derive(Debug, Clone)]
pub struct ItemBox {
    pub id: u32,
    pub room: u32,
    pub aabb: Aabb,
    /// Placed by centre fallback after an exhausted search.
    pub degraded: bool,
    /// Larger than the room interior on at least one axis.
    pub oversized: bool,
}

/// A layout validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

const TOLERANCE: f32 = 0.01;

// ── A. Room geometry ────────────────────────────────────────────────────

/// Check that no room has zero, negative or non-finite dimensions.
pub fn check_room_dimensions(rooms: &[RoomRect]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for r in rooms {
        let valid = r.breadth.is_finite() && r.length.is_finite();
        if !valid || r.breadth <= 0.0 || r.length <= 0.0 {
            errors.push(ValidationError {
                category: "room_geometry",
                severity: Severity::Error,
                message: format!(
                    "Room #{} has non-positive dimensions: {}×{}",
                    r.id, r.breadth, r.length
                ),
            });
        }
    }
    errors
}

/// Rooms in packing order must be pairwise disjoint and contiguous along X.
pub fn check_room_packing(rooms: &[RoomRect]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for i in 0..rooms.len() {
        for j in (i + 1)..rooms.len() {
            let a = &rooms[i];
            let b = &rooms[j];
            let overlap_x =
                (a.x + a.breadth - TOLERANCE) > b.x && (b.x + b.breadth - TOLERANCE) > a.x;
            let overlap_z =
                (a.z + a.length - TOLERANCE) > b.z && (b.z + b.length - TOLERANCE) > a.z;
            if overlap_x && overlap_z {
                errors.push(ValidationError {
                    category: "room_overlap",
                    severity: Severity::Error,
                    message: format!("Rooms #{} and #{} overlap", a.id, b.id),
                });
            }
        }
    }

    for pair in rooms.windows(2) {
        let gap = pair[1].x - (pair[0].x + pair[0].breadth);
        if gap.abs() > TOLERANCE {
            errors.push(ValidationError {
                category: "room_packing",
                severity: Severity::Error,
                message: format!(
                    "Gap of {:.2} between rooms #{} and #{}",
                    gap, pair[0].id, pair[1].id
                ),
            });
        }
    }
    errors
}

// ── B. Furniture ────────────────────────────────────────────────────────

/// Every item footprint must sit inside its room's interior minus `margin`.
/// Oversized items are centred by design and only warned about.
pub fn check_items_within_rooms(
    items: &[ItemBox],
    rooms: &[RoomRect],
    margin: f32,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let by_id: HashMap<u32, &RoomRect> = rooms.iter().map(|r| (r.id, r)).collect();

    for item in items {
        let Some(room) = by_id.get(&item.room) else {
            errors.push(ValidationError {
                category: "item_bounds",
                severity: Severity::Error,
                message: format!(
                    "Item #{} references non-existent room #{}",
                    item.id, item.room
                ),
            });
            continue;
        };
        let inset = room.wall_thickness + margin - TOLERANCE;
        let inside = item.aabb.min.x >= room.x + inset
            && item.aabb.max.x <= room.x + room.breadth - inset
            && item.aabb.min.z >= room.z + inset
            && item.aabb.max.z <= room.z + room.length - inset;
        if !inside {
            errors.push(ValidationError {
                category: "item_bounds",
                severity: if item.oversized {
                    Severity::Warning
                } else {
                    Severity::Error
                },
                message: format!(
                    "Item #{} extends outside the interior of room #{}",
                    item.id, item.room
                ),
            });
        }
    }
    errors
}

/// No two items in the same room may intersect, unless one of them was
/// placed by the degraded centre fallback (reported as a warning).
pub fn check_item_overlaps(items: &[ItemBox]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut by_room: HashMap<u32, Vec<&ItemBox>> = HashMap::new();
    for item in items {
        by_room.entry(item.room).or_default().push(item);
    }

    for room_items in by_room.values() {
        for i in 0..room_items.len() {
            for j in (i + 1)..room_items.len() {
                let a = room_items[i];
                let b = room_items[j];
                if !a.aabb.intersects(&b.aabb) {
                    continue;
                }
                errors.push(ValidationError {
                    category: "item_overlap",
                    severity: if a.degraded || b.degraded {
                        Severity::Warning
                    } else {
                        Severity::Error
                    },
                    message: format!(
                        "Items #{} and #{} overlap in room #{}",
                        a.id, b.id, a.room
                    ),
                });
            }
        }
    }
    errors
}

// ── Master validation ───────────────────────────────────────────────────

/// Run all layout validations and return combined results.
pub fn validate_all(rooms: &[RoomRect], items: &[ItemBox], margin: f32) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_room_dimensions(rooms));
    all.extend(check_room_packing(rooms));
    all.extend(check_items_within_rooms(items, rooms, margin));
    all.extend(check_item_overlaps(items));
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_room(id: u32, x: f32, breadth: f32, length: f32) -> RoomRect {
        RoomRect {
            id,
            x,
            z: 0.0,
            breadth,
            length,
            wall_thickness: 5.0,
        }
    }

    fn make_item(id: u32, room: u32, cx: f32, cz: f32, half: f32) -> ItemBox {
        ItemBox {
            id,
            room,
            aabb: Aabb::from_center(Vec3::new(cx, half, cz), Vec3::splat(half)),
            degraded: false,
            oversized: false,
        }
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = Aabb::from_center(Vec3::ZERO, Vec3::splat(25.0));
        let b = Aabb::from_center(Vec3::new(50.0, 0.0, 0.0), Vec3::splat(25.0));
        assert!(!a.intersects(&b));
        let c = Aabb::from_center(Vec3::new(49.0, 0.0, 0.0), Vec3::splat(25.0));
        assert!(a.intersects(&c));
    }

    #[test]
    fn rotated_extents_swap_at_quarter_turn() {
        let (x, z) = rotated_extents(40.0, 10.0, std::f32::consts::FRAC_PI_2);
        assert!((x - 10.0).abs() < 1e-3, "x={x}");
        assert!((z - 40.0).abs() < 1e-3, "z={z}");
        let (x, z) = rotated_extents(40.0, 10.0, 0.0);
        assert_eq!((x, z), (40.0, 10.0));
    }

    #[test]
    fn rotated_extents_grow_at_diagonal() {
        let (x, z) = rotated_extents(10.0, 10.0, std::f32::consts::FRAC_PI_4);
        assert!((x - 14.142).abs() < 1e-2);
        assert!((z - 14.142).abs() < 1e-2);
    }

    #[test]
    fn contiguous_rooms_pass() {
        let rooms = vec![make_room(1, 0.0, 300.0, 400.0), make_room(2, 300.0, 200.0, 100.0)];
        assert!(check_room_packing(&rooms).is_empty());
        assert!(check_room_dimensions(&rooms).is_empty());
    }

    #[test]
    fn gap_between_rooms_is_reported() {
        let rooms = vec![make_room(1, 0.0, 300.0, 400.0), make_room(2, 350.0, 200.0, 100.0)];
        let errs = check_room_packing(&rooms);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].category, "room_packing");
    }

    #[test]
    fn overlapping_rooms_are_reported() {
        let rooms = vec![make_room(1, 0.0, 300.0, 400.0), make_room(2, 250.0, 200.0, 100.0)];
        let errs = check_room_packing(&rooms);
        assert!(errs.iter().any(|e| e.category == "room_overlap"));
    }

    #[test]
    fn zero_breadth_room() {
        let errs = check_room_dimensions(&[make_room(1, 0.0, 0.0, 10.0)]);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("non-positive"));
    }

    #[test]
    fn item_inside_interior_passes() {
        let rooms = vec![make_room(1, 0.0, 300.0, 400.0)];
        let items = vec![make_item(1, 1, 150.0, 200.0, 25.0)];
        assert!(check_items_within_rooms(&items, &rooms, 10.0).is_empty());
    }

    #[test]
    fn item_in_margin_is_reported() {
        let rooms = vec![make_room(1, 0.0, 300.0, 400.0)];
        // min x = 5, interior starts at 5 + 10
        let items = vec![make_item(1, 1, 30.0, 200.0, 25.0)];
        let errs = check_items_within_rooms(&items, &rooms, 10.0);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].severity, Severity::Error);
    }

    #[test]
    fn oversized_item_only_warns() {
        let rooms = vec![make_room(1, 0.0, 300.0, 400.0)];
        let mut item = make_item(1, 1, 150.0, 200.0, 170.0);
        item.oversized = true;
        let errs = check_items_within_rooms(&[item], &rooms, 10.0);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].severity, Severity::Warning);
    }

    #[test]
    fn overlapping_items_error_unless_degraded() {
        let a = make_item(1, 1, 100.0, 100.0, 25.0);
        let mut b = make_item(2, 1, 110.0, 100.0, 25.0);
        let errs = check_item_overlaps(&[a.clone(), b.clone()]);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].severity, Severity::Error);

        b.degraded = true;
        let errs = check_item_overlaps(&[a, b]);
        assert_eq!(errs[0].severity, Severity::Warning);
    }

    #[test]
    fn items_in_different_rooms_never_overlap() {
        let a = make_item(1, 1, 100.0, 100.0, 25.0);
        let b = make_item(2, 2, 100.0, 100.0, 25.0);
        assert!(check_item_overlaps(&[a, b]).is_empty());
    }
}
