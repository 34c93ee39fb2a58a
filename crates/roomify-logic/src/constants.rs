//! Layout and view constants: margins, thresholds, camera factors, room tags.
//!
//! Plain constants with no engine dependency. They back the defaults of
//! [`EngineConfig`](crate::config::EngineConfig) and [`DisplayConfig`](crate::config::DisplayConfig).

pub mod placement {
    /// Clearance kept between a furniture footprint and a wall's interior face.
    pub const WALL_MARGIN: f32 = 10.0;
    /// Smallest radius increment the spiral search will use.
    pub const MIN_SPIRAL_STEP: f32 = 10.0;
    /// Angular increment of the spiral search, in degrees.
    pub const SPIRAL_ANGLE_STEP_DEG: f32 = 30.0;
    /// Elevation of the floor's top surface.
    pub const FLOOR_TOP_Y: f32 = 0.0;
}

pub mod walls {
    pub const DEFAULT_THICKNESS: f32 = 5.0;
    pub const DEFAULT_HEIGHT: f32 = 80.0;
    /// Walls whose facing dot product falls below this are hidden.
    /// Slightly negative so grazing walls are hidden too.
    pub const HIDE_THRESHOLD: f32 = -0.1;
    pub const DEFAULT_OPACITY: f32 = 0.12;
    pub const MAX_OPACITY: f32 = 0.5;
}

pub mod camera {
    /// Camera distance as a multiple of the scene's characteristic scale.
    pub const DISTANCE_FACTOR: f32 = 1.2;
    pub const ORBIT_MIN_DISTANCE: f32 = 100.0;
    /// Orbit max distance as a multiple of the characteristic scale.
    pub const ORBIT_MAX_FACTOR: f32 = 3.0;
    pub const MIN_GRID_SIZE: f32 = 1000.0;
    /// Elevation of the look-at target.
    pub const TARGET_Y: f32 = 0.0;
}

pub mod room_types {
    pub const LIVING_ROOM: &str = "living_room";
    pub const KITCHEN: &str = "kitchen";
    pub const BEDROOM: &str = "bedroom";
    pub const BATHROOM: &str = "bathroom";
    pub const OUTDOOR: &str = "outdoor";

    /// Outdoor scenes never carry furniture.
    pub fn is_outdoor(room_type: &str) -> bool {
        room_type.eq_ignore_ascii_case(OUTDOOR)
    }
}

pub mod assets {
    /// Model used by the sample catalog when a type tag has no entry.
    pub const DEFAULT_MODEL: &str = "coffee_table";
    pub const DEFAULT_ROOM_COLOR: &str = "#FFFFFF";
}
