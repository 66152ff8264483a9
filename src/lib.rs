//! Koi Pond - A procedurally generated, animated koi pond
//!
//! Core modules:
//! - `sim`: Deterministic scene model (generation, placement, swim cycles)
//! - `renderer`: Declarative shape tree and SVG serialization
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Data-driven pond configuration

pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{PondError, PondResult};
pub use settings::{PondDensity, Settings};

use glam::Vec2;

/// Pond configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz is plenty for tweened motion)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical canvas dimensions
    pub const CANVAS_WIDTH: f32 = 1000.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;
    /// Distance from the canvas edge that swimming koi are kept within
    pub const EDGE_MARGIN: f32 = 50.0;

    /// Koi body silhouette (semi-axes, unscaled)
    pub const BODY_RX: f32 = 50.0;
    pub const BODY_RY: f32 = 25.0;
    /// Body semi-minor axis at the tightest point of the wiggle squeeze
    pub const BODY_RY_SQUEEZED: f32 = 23.0;

    /// Lily pad outline radius before scaling
    pub const LILY_BASE_RADIUS: f32 = 50.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Signed shortest difference `to - from` in degrees, in [-180, 180)
#[inline]
pub fn shortest_degrees(from: f32, to: f32) -> f32 {
    (to - from + 180.0).rem_euclid(360.0) - 180.0
}

/// Unit vector pointing along a heading given in degrees (0 = +x, 90 = +y)
#[inline]
pub fn heading_vector(degrees: f32) -> Vec2 {
    let r = degrees.to_radians();
    Vec2::new(r.cos(), r.sin())
}
