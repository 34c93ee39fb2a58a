//! The scene: one owned collection of rooms, items, placed sets and walls.
//!
//! Items are addressed by [`ItemId`] everywhere; nothing outside this
//! struct holds a reference into it. Input handlers pass in pick results
//! (already resolved to ids by the renderer) and pointer positions; the
//! render driver asks for wall visibility and a snapshot once per frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::camera::{frame_scene, Framing, ViewPreset};
use crate::config::{DisplayConfig, EngineConfig};
use crate::constants::room_types;
use crate::description::{parse_rooms, RoomRecord};
use crate::drag::{DragMove, DragRelocator};
use crate::geometry::{validate_all, Aabb, ItemBox, RoomRect, ValidationError};
use crate::layout::{plan_layout, RoomFootprint, SceneBounds};
use crate::placement::{
    place_item, ItemExtent, ItemId, PlacedSet, PlacementOutcome, RoomFrame,
};
use crate::resolver::{ModelResolver, ModelSize, ResolveError};
use crate::walls::{build_walls, cull_walls, Wall, WallSide, WallSpec};

/// Errors that prevent a scene from being built or an operation from running.
#[derive(Debug)]
pub enum SceneError {
    Json(serde_json::Error),
    InvalidRoom { room_no: u32, reason: String },
    UnknownItem(ItemId),
}

impl From<serde_json::Error> for SceneError {
    fn from(e: serde_json::Error) -> Self {
        SceneError::Json(e)
    }
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Json(e) => write!(f, "Description parse error: {}", e),
            SceneError::InvalidRoom { room_no, reason } => {
                write!(f, "Room {} is invalid: {}", room_no, reason)
            }
            SceneError::UnknownItem(id) => write!(f, "No item with id {}", id.0),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Json(e) => Some(e),
            _ => None,
        }
    }
}

/// A laid-out room.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub room_no: u32,
    pub room_type: String,
    pub color: String,
    pub breadth: f32,
    pub length: f32,
    pub wall_thickness: f32,
    pub wall_height: f32,
    pub center_x: f32,
    pub center_z: f32,
}

impl Room {
    pub fn frame(&self) -> RoomFrame {
        RoomFrame {
            center_x: self.center_x,
            center_z: self.center_z,
            breadth: self.breadth,
            length: self.length,
            wall_thickness: self.wall_thickness,
        }
    }

    pub fn is_outdoor(&self) -> bool {
        room_types::is_outdoor(&self.room_type)
    }

    pub fn label(&self) -> String {
        format!("{} (Room {})", self.room_type, self.room_no)
    }
}

/// Resolved geometry of a placed item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedItem {
    pub size: ModelSize,
    pub extent: ItemExtent,
    /// Committed room-relative position.
    pub rel_x: f32,
    pub rel_z: f32,
    /// Elevation of the item's origin.
    pub y: f32,
    /// How the load-time position was found.
    pub outcome: PlacementOutcome,
    pub centered_x: bool,
    pub centered_z: bool,
    /// A drag has committed a collision-free position since load.
    pub relocated: bool,
}

impl PlacedItem {
    pub fn oversized(&self) -> bool {
        self.centered_x || self.centered_z
    }

    /// Still sitting where the centre fallback put it, possibly overlapping.
    pub fn is_degraded(&self) -> bool {
        self.outcome.is_degraded() && !self.relocated
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemState {
    Placed(PlacedItem),
    /// The resolver could not size this item; it is not in the scene.
    Unresolved(ResolveError),
}

/// A furniture item and its placement state.
#[derive(Debug, Clone, PartialEq)]
pub struct FurnitureItem {
    pub id: ItemId,
    /// Index of the owning room.
    pub room: usize,
    pub item_type: String,
    /// Requested room-relative `(x, z)` from the description.
    pub requested: (f32, f32),
    pub rotation: f32,
    pub state: ItemState,
}

impl FurnitureItem {
    pub fn placed(&self) -> Option<&PlacedItem> {
        match &self.state {
            ItemState::Placed(p) => Some(p),
            ItemState::Unresolved(_) => None,
        }
    }
}

/// Summary of a scene build. Drags do not change it; see
/// [`Scene::degraded_items`] for the live state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementReport {
    pub direct: usize,
    pub spiral: usize,
    /// Items committed by centre fallback; they may overlap others.
    pub degraded: Vec<ItemId>,
    /// Number of axes pinned to the room centre because an item was too large.
    pub centered_axes: usize,
    pub unresolved: Vec<(ItemId, ResolveError)>,
    /// Furniture records dropped because their room is outdoors.
    pub ignored_outdoor: usize,
}

impl PlacementReport {
    pub fn placed(&self) -> usize {
        self.direct + self.spiral + self.degraded.len()
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

/// What the UI shows for a selected item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInfo {
    pub id: ItemId,
    pub item_type: String,
    pub room_type: String,
    pub room_no: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomView {
    pub room_no: u32,
    pub room_type: String,
    /// Floor label, `"<room type> (Room <no>)"`.
    pub label: String,
    pub color: String,
    pub center: Vec3,
    pub breadth: f32,
    pub length: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallView {
    pub room: usize,
    pub side: WallSide,
    pub position: Vec3,
    pub span: f32,
    pub height: f32,
    pub thickness: f32,
    pub visible: bool,
    /// Effective material opacity: the display opacity when visible, else 0.
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: ItemId,
    pub item_type: String,
    pub room: usize,
    /// World-space origin.
    pub position: Vec3,
    pub rotation: f32,
    pub bounds: Aabb,
    pub selected: bool,
    pub hovered: bool,
}

/// Per-frame output for the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub rooms: Vec<RoomView>,
    pub walls: Vec<WallView>,
    pub items: Vec<ItemView>,
    pub framing: Option<Framing>,
    pub show_grid: bool,
}

impl RenderSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A built scene.
#[derive(Debug, Clone)]
pub struct Scene {
    config: EngineConfig,
    pub display: DisplayConfig,
    rooms: Vec<Room>,
    items: Vec<FurnitureItem>,
    placed: Vec<PlacedSet>,
    walls: Vec<Wall>,
    bounds: Option<SceneBounds>,
    report: PlacementReport,
    drag: DragRelocator,
    selected: Option<ItemId>,
    hovered: Option<ItemId>,
    view: ViewPreset,
}

impl Scene {
    /// Parse a description and build the scene.
    pub fn from_json(
        json: &str,
        resolver: &dyn ModelResolver,
        config: EngineConfig,
    ) -> Result<Self, SceneError> {
        let records = parse_rooms(json)?;
        Self::build(&records, resolver, config)
    }

    /// Lay out rooms, then place every item room by room in input order.
    ///
    /// Fails only on rooms that cannot be laid out. Items the resolver
    /// cannot size are left out and listed in the report.
    pub fn build(
        records: &[RoomRecord],
        resolver: &dyn ModelResolver,
        config: EngineConfig,
    ) -> Result<Self, SceneError> {
        for r in records {
            if !r.has_valid_dimensions() {
                return Err(SceneError::InvalidRoom {
                    room_no: r.room_no,
                    reason: format!(
                        "dimensions must be positive, got {}×{}",
                        r.dimensions.breadth, r.dimensions.length
                    ),
                });
            }
            if let Some(t) = r.wall_thickness {
                if !t.is_finite() || t < 0.0 {
                    return Err(SceneError::InvalidRoom {
                        room_no: r.room_no,
                        reason: format!("wall thickness must be non-negative, got {}", t),
                    });
                }
            }
        }

        let footprints: Vec<RoomFootprint> = records
            .iter()
            .map(|r| RoomFootprint {
                breadth: r.dimensions.breadth,
                length: r.dimensions.length,
            })
            .collect();
        let layout = plan_layout(&footprints);
        let bounds = layout.bounds();

        let rooms: Vec<Room> = records
            .iter()
            .zip(&layout.rooms)
            .map(|(r, p)| Room {
                room_no: r.room_no,
                room_type: r.room_type.clone(),
                color: r.room_color.clone(),
                breadth: p.breadth,
                length: p.length,
                wall_thickness: r.wall_thickness.unwrap_or(config.wall_thickness),
                wall_height: config.wall_height,
                center_x: p.center_x,
                center_z: p.center_z,
            })
            .collect();

        let wall_dims: Vec<WallSpec> = rooms
            .iter()
            .map(|r| WallSpec {
                thickness: r.wall_thickness,
                height: r.wall_height,
            })
            .collect();
        let walls = build_walls(&layout.rooms, &wall_dims);

        let mut placed = vec![PlacedSet::new(); rooms.len()];
        let mut items = Vec::new();
        let mut report = PlacementReport::default();
        let mut next_id = 0u32;

        for (room_index, (record, room)) in records.iter().zip(&rooms).enumerate() {
            if room.is_outdoor() {
                if !record.furniture.is_empty() {
                    log::warn!(
                        "Room {} is outdoors, ignoring {} furniture records",
                        room.room_no,
                        record.furniture.len()
                    );
                    report.ignored_outdoor += record.furniture.len();
                }
                continue;
            }

            let frame = room.frame();
            for f in &record.furniture {
                let id = ItemId(next_id);
                next_id += 1;
                let requested = (f.position[0], f.position[1]);

                let state = match resolver.resolve(&f.item_type) {
                    Ok(size) if size.is_valid() => {
                        let extent = ItemExtent::from_size(&size, f.rotation);
                        let p = place_item(
                            &frame,
                            &mut placed[room_index],
                            id,
                            requested,
                            &extent,
                            &config,
                        );
                        match p.outcome {
                            PlacementOutcome::Direct => report.direct += 1,
                            PlacementOutcome::Spiral { .. } => report.spiral += 1,
                            PlacementOutcome::Degraded => report.degraded.push(id),
                        }
                        report.centered_axes += p.centered_x as usize + p.centered_z as usize;
                        ItemState::Placed(PlacedItem {
                            size,
                            extent,
                            rel_x: p.rel_x,
                            rel_z: p.rel_z,
                            y: p.y,
                            outcome: p.outcome,
                            centered_x: p.centered_x,
                            centered_z: p.centered_z,
                            relocated: false,
                        })
                    }
                    Ok(size) => {
                        let e = ResolveError::InvalidSize {
                            item_type: f.item_type.clone(),
                            size,
                        };
                        log::warn!("Item {:?} not placed: {}", id, e);
                        report.unresolved.push((id, e.clone()));
                        ItemState::Unresolved(e)
                    }
                    Err(e) => {
                        log::warn!("Item {:?} not placed: {}", id, e);
                        report.unresolved.push((id, e.clone()));
                        ItemState::Unresolved(e)
                    }
                };

                items.push(FurnitureItem {
                    id,
                    room: room_index,
                    item_type: f.item_type.clone(),
                    requested,
                    rotation: f.rotation,
                    state,
                });
            }
        }

        log::info!(
            "Scene built: {} rooms, {} items placed ({} direct, {} spiral, {} degraded), {} unresolved",
            rooms.len(),
            report.placed(),
            report.direct,
            report.spiral,
            report.degraded.len(),
            report.unresolved.len()
        );

        Ok(Self {
            config,
            display: DisplayConfig::default(),
            rooms,
            items,
            placed,
            walls,
            bounds,
            report,
            drag: DragRelocator::new(),
            selected: None,
            hovered: None,
            view: ViewPreset::default(),
        })
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn items(&self) -> &[FurnitureItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&FurnitureItem> {
        self.items.get(id.0 as usize)
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn bounds(&self) -> Option<&SceneBounds> {
        self.bounds.as_ref()
    }

    pub fn report(&self) -> &PlacementReport {
        &self.report
    }

    /// Items still at their centre-fallback position.
    pub fn degraded_items(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|i| i.placed().is_some_and(PlacedItem::is_degraded))
            .map(|i| i.id)
            .collect()
    }

    /// Committed boxes in a room. Excludes an item while it is being dragged.
    pub fn placed_set(&self, room: usize) -> Option<&PlacedSet> {
        self.placed.get(room)
    }

    /// World-space origin of a placed item.
    pub fn item_world_position(&self, id: ItemId) -> Option<Vec3> {
        let item = self.item(id)?;
        let p = item.placed()?;
        let (x, z) = self.rooms[item.room].frame().to_world(p.rel_x, p.rel_z);
        Some(Vec3::new(x, p.y, z))
    }

    /// World-space box at the item's committed position.
    pub fn item_bounds(&self, id: ItemId) -> Option<Aabb> {
        let item = self.item(id)?;
        let p = item.placed()?;
        Some(self.rooms[item.room].frame().item_box(
            p.rel_x,
            p.rel_z,
            &p.extent,
            self.config.floor_top_y,
        ))
    }

    // ── Drag ────────────────────────────────────────────────────────────

    /// Start dragging the picked item. Ends any drag already in progress.
    /// Returns `false` when the pick is empty or not a placed item.
    pub fn begin_drag(&mut self, pick: Option<ItemId>) -> bool {
        let Some(id) = pick else {
            return false;
        };
        let Some(item) = self.items.get(id.0 as usize) else {
            return false;
        };
        let Some(p) = item.placed() else {
            return false;
        };
        let room = item.room;
        let position = (p.rel_x, p.rel_z);

        if self.drag.is_dragging() {
            self.end_drag();
        }
        self.drag.begin(id, room, position, &mut self.placed[room])
    }

    /// Move the dragged item toward world `(x, z)`. `None` when not dragging.
    pub fn drag_to(&mut self, world_x: f32, world_z: f32) -> Option<DragMove> {
        let session = *self.drag.session()?;
        let frame = self.rooms[session.room].frame();
        let idx = session.item.0 as usize;
        let extent = self.items[idx].placed()?.extent;

        let mv = self.drag.move_to(
            (world_x, world_z),
            &frame,
            &extent,
            &self.placed[session.room],
            &self.config,
        )?;

        if let ItemState::Placed(p) = &mut self.items[idx].state {
            (p.rel_x, p.rel_z) = mv.position();
            if let DragMove::Moved { .. } = mv {
                p.relocated = true;
            }
        }
        Some(mv)
    }

    /// Drop the dragged item, making it block others again.
    pub fn end_drag(&mut self) -> Option<ItemId> {
        let room = self.drag.session()?.room;
        let session = self.drag.end(&mut self.placed[room])?;
        Some(session.item)
    }

    pub fn dragging(&self) -> Option<ItemId> {
        self.drag.session().map(|s| s.item)
    }

    // ── Selection ───────────────────────────────────────────────────────

    fn valid_pick(&self, pick: Option<ItemId>) -> Option<ItemId> {
        pick.filter(|id| self.item(*id).is_some_and(|i| i.placed().is_some()))
    }

    /// Update the hovered item; returns its tooltip label.
    pub fn hover(&mut self, pick: Option<ItemId>) -> Option<String> {
        self.hovered = self.valid_pick(pick);
        self.hover_label()
    }

    /// Select the picked item, or clear the selection on an empty pick.
    pub fn click(&mut self, pick: Option<ItemId>) {
        self.selected = self.valid_pick(pick);
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    pub fn hovered(&self) -> Option<ItemId> {
        self.hovered
    }

    /// `"<type> in <room type>"` for the hovered item.
    pub fn hover_label(&self) -> Option<String> {
        let item = self.item(self.hovered?)?;
        Some(format!(
            "{} in {}",
            item.item_type, self.rooms[item.room].room_type
        ))
    }

    pub fn item_info(&self, id: ItemId) -> Result<ItemInfo, SceneError> {
        let item = self.item(id).ok_or(SceneError::UnknownItem(id))?;
        let room = &self.rooms[item.room];
        Ok(ItemInfo {
            id,
            item_type: item.item_type.clone(),
            room_type: room.room_type.clone(),
            room_no: room.room_no,
        })
    }

    pub fn selected_info(&self) -> Option<ItemInfo> {
        self.item_info(self.selected?).ok()
    }

    // ── View ────────────────────────────────────────────────────────────

    pub fn view(&self) -> ViewPreset {
        self.view
    }

    pub fn set_view(&mut self, preset: ViewPreset) {
        self.view = preset;
    }

    pub fn reset_view(&mut self) {
        self.view = ViewPreset::Perspective;
    }

    /// Framing for the active preset; `None` for a scene with no rooms.
    pub fn framing(&self) -> Option<Framing> {
        self.bounds
            .as_ref()
            .map(|b| frame_scene(self.view, b, &self.config))
    }

    // ── Per-frame ───────────────────────────────────────────────────────

    /// Recompute every wall's visibility flag for this camera position.
    pub fn update_wall_visibility(&mut self, camera: Vec3) -> &[Wall] {
        let vis = cull_walls(camera, &self.walls, self.config.wall_hide_threshold);
        let show = self.display.show_walls;
        for (wall, v) in self.walls.iter_mut().zip(vis) {
            wall.visible = show && v.visible;
        }
        &self.walls
    }

    /// Render-ready view of the scene for this camera position. Does not
    /// mutate the stored wall flags.
    pub fn snapshot(&self, camera: Vec3) -> RenderSnapshot {
        let vis = cull_walls(camera, &self.walls, self.config.wall_hide_threshold);
        let base_opacity = self.display.wall_opacity();

        let rooms = self
            .rooms
            .iter()
            .map(|r| RoomView {
                room_no: r.room_no,
                room_type: r.room_type.clone(),
                label: r.label(),
                color: r.color.clone(),
                center: Vec3::new(r.center_x, 0.0, r.center_z),
                breadth: r.breadth,
                length: r.length,
            })
            .collect();

        let walls = self
            .walls
            .iter()
            .zip(vis)
            .map(|(w, v)| {
                let visible = self.display.show_walls && v.visible;
                WallView {
                    room: w.room,
                    side: w.side,
                    position: w.position,
                    span: w.span,
                    height: w.height,
                    thickness: w.thickness,
                    visible,
                    opacity: if visible { base_opacity * v.opacity } else { 0.0 },
                }
            })
            .collect();

        let items = self
            .items
            .iter()
            .filter_map(|item| {
                Some(ItemView {
                    id: item.id,
                    item_type: item.item_type.clone(),
                    room: item.room,
                    position: self.item_world_position(item.id)?,
                    rotation: item.rotation,
                    bounds: self.item_bounds(item.id)?,
                    selected: self.selected == Some(item.id),
                    hovered: self.hovered == Some(item.id),
                })
            })
            .collect();

        RenderSnapshot {
            rooms,
            walls,
            items,
            framing: self.framing(),
            show_grid: self.display.show_grid,
        }
    }

    /// Post-hoc layout check: packing, interior bounds, overlaps.
    pub fn validate(&self) -> Vec<ValidationError> {
        let rooms: Vec<RoomRect> = self
            .rooms
            .iter()
            .enumerate()
            .map(|(i, r)| RoomRect {
                id: i as u32,
                x: r.center_x - r.breadth / 2.0,
                z: r.center_z - r.length / 2.0,
                breadth: r.breadth,
                length: r.length,
                wall_thickness: r.wall_thickness,
            })
            .collect();

        let items: Vec<ItemBox> = self
            .items
            .iter()
            .filter_map(|item| {
                let p = item.placed()?;
                Some(ItemBox {
                    id: item.id.0,
                    room: item.room as u32,
                    aabb: self.item_bounds(item.id)?,
                    degraded: p.is_degraded(),
                    oversized: p.oversized(),
                })
            })
            .collect();

        validate_all(&rooms, &items, self.config.wall_margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::{Dimensions, FurnitureRecord};
    use crate::geometry::Severity;

    fn square_resolver(t: &str) -> Result<ModelSize, ResolveError> {
        match t {
            "box" => Ok(ModelSize::new(50.0, 50.0, 40.0)),
            "wide" => Ok(ModelSize::new(340.0, 50.0, 40.0)),
            "flat" => Ok(ModelSize::new(50.0, 50.0, 0.0)),
            "tiny" => Ok(ModelSize::new(10.0, 10.0, 10.0)),
            _ => Err(ResolveError::NotFound(t.to_string())),
        }
    }

    fn record(no: u32, room_type: &str, breadth: f32, length: f32, items: &[(&str, f32, f32)]) -> RoomRecord {
        RoomRecord {
            room_no: no,
            room_type: room_type.to_string(),
            dimensions: Dimensions { breadth, length },
            room_color: "#FFFFFF".into(),
            furniture: items
                .iter()
                .map(|&(t, x, z)| FurnitureRecord {
                    item_type: t.to_string(),
                    position: [x, z],
                    rotation: 0.0,
                })
                .collect(),
            furniture_count: None,
            wall_thickness: None,
        }
    }

    fn build(records: &[RoomRecord]) -> Scene {
        Scene::build(records, &square_resolver, EngineConfig::default()).unwrap()
    }

    #[test]
    fn lone_item_lands_on_room_center() {
        let scene = build(&[record(1, "bedroom", 300.0, 400.0, &[("box", 0.0, 0.0)])]);
        let pos = scene.item_world_position(ItemId(0)).unwrap();
        assert_eq!((pos.x, pos.z), (150.0, 200.0));
        assert_eq!(scene.report().direct, 1);
    }

    #[test]
    fn second_room_items_are_offset_by_layout() {
        let scene = build(&[
            record(1, "bedroom", 300.0, 400.0, &[]),
            record(2, "kitchen", 200.0, 100.0, &[("box", 0.0, 0.0)]),
        ]);
        let pos = scene.item_world_position(ItemId(0)).unwrap();
        assert_eq!((pos.x, pos.z), (400.0, 50.0));
    }

    #[test]
    fn unresolved_item_is_reported_not_fatal() {
        let scene = build(&[record(
            1,
            "bedroom",
            300.0,
            400.0,
            &[("box", 0.0, 0.0), ("piano", 0.0, 0.0), ("flat", 0.0, 0.0)],
        )]);
        assert_eq!(scene.items().len(), 3);
        assert_eq!(scene.report().unresolved.len(), 2);
        assert!(scene.item(ItemId(1)).unwrap().placed().is_none());
        assert_eq!(scene.placed_set(0).unwrap().len(), 1);
        let mut scene = scene;
        assert!(!scene.begin_drag(Some(ItemId(1))));
    }

    #[test]
    fn outdoor_furniture_is_ignored() {
        let scene = build(&[record(1, "outdoor", 300.0, 400.0, &[("box", 0.0, 0.0)])]);
        assert!(scene.items().is_empty());
        assert_eq!(scene.report().ignored_outdoor, 1);
    }

    #[test]
    fn invalid_room_is_an_error() {
        let err = Scene::build(
            &[record(7, "bedroom", -1.0, 400.0, &[])],
            &square_resolver,
            EngineConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SceneError::InvalidRoom { room_no: 7, .. }));
        assert!(err.to_string().contains("Room 7"));
    }

    #[test]
    fn oversized_item_counts_axis_fallback() {
        let scene = build(&[record(1, "bedroom", 300.0, 400.0, &[("wide", 90.0, 0.0)])]);
        assert_eq!(scene.report().centered_axes, 1);
        let p = scene.item(ItemId(0)).unwrap().placed().unwrap();
        assert_eq!(p.rel_x, 0.0);
        assert!(scene
            .validate()
            .iter()
            .all(|e| e.severity == Severity::Warning));
    }

    #[test]
    fn drag_round_trip_keeps_placed_set_consistent() {
        let mut scene = build(&[record(
            1,
            "bedroom",
            300.0,
            400.0,
            &[("box", -60.0, 0.0), ("box", 60.0, 0.0)],
        )]);
        assert!(scene.begin_drag(Some(ItemId(0))));
        assert_eq!(scene.dragging(), Some(ItemId(0)));
        assert_eq!(scene.placed_set(0).unwrap().len(), 1);

        let mv = scene.drag_to(150.0 - 20.0, 200.0).unwrap();
        assert_eq!(mv, DragMove::Moved { x: -20.0, z: 0.0 });
        let mv = scene.drag_to(150.0 + 60.0, 200.0).unwrap();
        assert_eq!(mv, DragMove::Reverted { x: -20.0, z: 0.0 });

        assert_eq!(scene.end_drag(), Some(ItemId(0)));
        let set = scene.placed_set(0).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(ItemId(0)), scene.item_bounds(ItemId(0)).as_ref());
        assert!(scene.validate().is_empty());
    }

    #[test]
    fn relocating_degraded_item_clears_degraded_state() {
        // Interior fits the 50×50 box only at the centre, on top of the tiny one.
        let mut scene = build(&[record(
            1,
            "bedroom",
            100.0,
            100.0,
            &[("tiny", 0.0, 0.0), ("box", 0.0, 0.0)],
        )]);
        assert_eq!(scene.report().degraded, vec![ItemId(1)]);
        assert_eq!(scene.degraded_items(), vec![ItemId(1)]);
        assert!(scene
            .validate()
            .iter()
            .any(|e| e.category == "item_overlap" && e.severity == Severity::Warning));

        // Tiny box into the corner, then the degraded box off the centre.
        scene.begin_drag(Some(ItemId(0)));
        assert!(matches!(scene.drag_to(100.0, 100.0), Some(DragMove::Moved { .. })));
        scene.end_drag();
        scene.begin_drag(Some(ItemId(1)));
        assert!(matches!(scene.drag_to(40.0, 40.0), Some(DragMove::Moved { .. })));
        scene.end_drag();

        assert!(scene.degraded_items().is_empty());
        assert!(scene.item(ItemId(1)).unwrap().placed().unwrap().relocated);
        // Build summary is unchanged.
        assert_eq!(scene.report().degraded, vec![ItemId(1)]);
        assert!(scene.validate().is_empty());
    }

    #[test]
    fn non_finite_drag_keeps_item_in_place() {
        let mut scene = build(&[record(
            1,
            "bedroom",
            300.0,
            400.0,
            &[("box", -60.0, 0.0), ("box", 60.0, 0.0)],
        )]);
        scene.begin_drag(Some(ItemId(0)));
        assert_eq!(
            scene.drag_to(f32::NAN, 200.0),
            Some(DragMove::Reverted { x: -60.0, z: 0.0 })
        );
        assert_eq!(
            scene.drag_to(150.0, f32::INFINITY),
            Some(DragMove::Reverted { x: -60.0, z: 0.0 })
        );
        scene.end_drag();
        let b = scene.placed_set(0).unwrap().get(ItemId(0)).copied().unwrap();
        assert!(b.min.is_finite() && b.max.is_finite());
        assert_eq!(Some(b), scene.item_bounds(ItemId(0)));
        assert!(!scene.item(ItemId(0)).unwrap().placed().unwrap().relocated);
    }

    #[test]
    fn room_label_names_type_and_number() {
        let scene = build(&[record(4, "kitchen", 300.0, 400.0, &[])]);
        assert_eq!(scene.rooms()[0].label(), "kitchen (Room 4)");
        let snap = scene.snapshot(Vec3::new(0.0, 500.0, 0.0));
        assert_eq!(snap.rooms[0].label, "kitchen (Room 4)");
    }

    #[test]
    fn drag_on_empty_pick_is_noop() {
        let mut scene = build(&[record(1, "bedroom", 300.0, 400.0, &[("box", 0.0, 0.0)])]);
        assert!(!scene.begin_drag(None));
        assert!(!scene.begin_drag(Some(ItemId(42))));
        assert!(scene.drag_to(0.0, 0.0).is_none());
        assert!(scene.end_drag().is_none());
    }

    #[test]
    fn new_drag_ends_previous_one() {
        let mut scene = build(&[record(
            1,
            "bedroom",
            300.0,
            400.0,
            &[("box", -60.0, 0.0), ("box", 60.0, 0.0)],
        )]);
        scene.begin_drag(Some(ItemId(0)));
        assert!(scene.begin_drag(Some(ItemId(1))));
        let set = scene.placed_set(0).unwrap();
        assert!(set.contains(ItemId(0)));
        assert!(!set.contains(ItemId(1)));
    }

    #[test]
    fn hover_and_selection() {
        let mut scene = build(&[record(3, "kitchen", 300.0, 400.0, &[("box", 0.0, 0.0)])]);
        assert_eq!(
            scene.hover(Some(ItemId(0))),
            Some("box in kitchen".to_string())
        );
        scene.click(Some(ItemId(0)));
        let info = scene.selected_info().unwrap();
        assert_eq!(info.room_no, 3);
        assert_eq!(info.item_type, "box");
        scene.click(None);
        assert!(scene.selected().is_none());
        assert!(scene.hover(None).is_none());
    }

    #[test]
    fn hidden_walls_toggle() {
        let mut scene = build(&[record(1, "bedroom", 300.0, 400.0, &[])]);
        let camera = Vec3::new(150.0, 40.0, 1000.0);
        let hidden = scene
            .update_wall_visibility(camera)
            .iter()
            .filter(|w| !w.visible)
            .count();
        assert_eq!(hidden, 1);
        scene.display.show_walls = false;
        assert!(scene.update_wall_visibility(camera).iter().all(|w| !w.visible));
    }

    #[test]
    fn snapshot_flags_selection_and_serializes() {
        let mut scene = build(&[record(1, "bedroom", 300.0, 400.0, &[("box", 0.0, 0.0)])]);
        scene.click(Some(ItemId(0)));
        let snap = scene.snapshot(Vec3::new(150.0, 480.0, 680.0));
        assert_eq!(snap.items.len(), 1);
        assert!(snap.items[0].selected);
        assert!(snap.framing.is_some());
        let visible = snap.walls.iter().filter(|w| w.visible).count();
        assert_eq!(visible, 3);
        assert!(snap.walls.iter().all(|w| w.visible == (w.opacity > 0.0)));
        let json = snap.to_json().unwrap();
        assert!(json.contains("\"selected\":true"));
    }

    #[test]
    fn empty_scene_has_no_framing() {
        let scene = build(&[]);
        assert!(scene.framing().is_none());
        assert!(scene.bounds().is_none());
    }
}
