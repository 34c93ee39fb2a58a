//! Wire types for the upstream room description.
//!
//! The upload collaborator returns a JSON array of room records. Only the
//! fields layout and placement need are modelled; anything else (the
//! upstream's own `position` guess, for instance) is ignored.

use serde::{Deserialize, Serialize};

use crate::constants::assets;

/// Interior dimensions of a room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Extent along X (the packing axis).
    pub breadth: f32,
    /// Extent along Z.
    pub length: f32,
}

/// A single detected furniture item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureRecord {
    #[serde(rename = "type")]
    pub item_type: String,
    /// Requested `[x, z]` relative to the room centre.
    pub position: [f32; 2],
    /// Rotation about the vertical axis, in radians.
    #[serde(default)]
    pub rotation: f32,
}

/// A single room as described by the upload collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    #[serde(rename = "roomno")]
    pub room_no: u32,
    #[serde(rename = "roomtype")]
    pub room_type: String,
    pub dimensions: Dimensions,
    #[serde(default = "default_room_color")]
    pub room_color: String,
    #[serde(default)]
    pub furniture: Vec<FurnitureRecord>,
    #[serde(default)]
    pub furniture_count: Option<u32>,
    #[serde(default)]
    pub wall_thickness: Option<f32>,
}

fn default_room_color() -> String {
    assets::DEFAULT_ROOM_COLOR.to_string()
}

impl RoomRecord {
    /// Dimensions must be finite and strictly positive.
    pub fn has_valid_dimensions(&self) -> bool {
        let Dimensions { breadth, length } = self.dimensions;
        breadth.is_finite() && length.is_finite() && breadth > 0.0 && length > 0.0
    }
}

/// Parse the ordered room list returned by the upload collaborator.
pub fn parse_rooms(json: &str) -> Result<Vec<RoomRecord>, serde_json::Error> {
    serde_json::from_str(json)
}
