//! Pure layout and view logic for Roomify.
//!
//! This crate turns a room description (rooms with dimensions and a list of
//! furniture with requested positions) into a laid-out scene: rooms packed
//! side by side, furniture clamped inside walls and pushed apart, walls that
//! get out of the camera's way, and camera presets framing the whole thing.
//! Functions take plain data and return results; no renderer, no network.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`camera`] | View presets, orbit limits and grid size from scene bounds |
//! | [`config`] | Engine tunables, display toggles and config validation |
//! | [`constants`] | Margins, wall dimensions, thresholds, room type names |
//! | [`description`] | Room description records as parsed from JSON |
//! | [`drag`] | Drag relocation sessions with commit-or-revert moves |
//! | [`geometry`] | Boxes, rotated extents and post-hoc layout validation |
//! | [`layout`] | Packing rooms along +X and scene bounds |
//! | [`placement`] | Clamping, floor rest and spiral collision search |
//! | [`resolver`] | Model size lookup and the asset catalog |
//! | [`scene`] | The owned scene: build, drag, selection, snapshots |
//! | [`walls`] | Boundary walls and camera-facing wall culling |

pub mod camera;
pub mod config;
pub mod constants;
pub mod description;
pub mod drag;
pub mod geometry;
pub mod layout;
pub mod placement;
pub mod resolver;
pub mod scene;
pub mod walls;
