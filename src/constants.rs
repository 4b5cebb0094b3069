//! Centralized constants used across the application.
//!
//! Defaults for [`ViewerSettings`](crate::config::ViewerSettings) live here too so
//! tests and the config loader agree on them.

use bevy::prelude::*;

/// Marker color for an anchor created during this session
pub const NEW_ANCHOR_COLOR: Color = Color::srgb(0.1, 0.9, 0.2);

/// Marker color for an anchor recovered from a previous session
pub const RECOVERED_ANCHOR_COLOR: Color = Color::srgb(0.95, 0.15, 0.1);

/// Seconds to wait after session start before asking the tracker to restore anchors
pub const DEFAULT_RESTORE_SETTLE_SECS: f32 = 1.0;

/// Horizontal distance between annotation objects laid out in a row
pub const DEFAULT_ANNOTATION_SPACING: f32 = 0.35;

/// Height of laid out annotation objects above their anchor
pub const DEFAULT_ANNOTATION_HEIGHT: f32 = 1.0;

/// Hit sphere radius of an annotation object
pub const DEFAULT_ANNOTATION_HIT_RADIUS: f32 = 0.12;

/// Radius of the anchor marker sphere
pub const DEFAULT_MARKER_RADIUS: f32 = 0.05;

/// Radius of the marker drawn on a controller once its hit-test target resolves
pub const CONTROLLER_MARKER_RADIUS: f32 = 0.02;

/// Length of the controller ray drawn by the renderer
pub const CONTROLLER_RAY_LENGTH: f32 = 4.0;

/// Window size for the desktop simulator
pub const DEFAULT_WINDOW_WIDTH: f32 = 1280.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 720.0;

/// Eye height of the simulated viewer
pub const SIM_EYE_HEIGHT: f32 = 1.6;
