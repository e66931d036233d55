//! Stack Tower - A block stacking arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (overlap resolution, stack, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Per-page configuration read from the URL
//! - `ui`: DOM score/results display (web only)
//! - `audio`: Procedural sound effects (web only)

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod ui;

pub use error::SimError;
pub use settings::Settings;

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (the layer speeds are tuned per 60 Hz step)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Where a new moving layer starts along its axis
    pub const SPAWN_OFFSET: f32 = -10.0;
    /// Passing this coordinate along the axis counts as a miss
    pub const TRAVEL_LIMIT: f32 = 10.0;

    /// Gravity applied to detached fragments (units/s²)
    pub const GRAVITY: f32 = -10.0;
    /// Fragments below this height are dropped from the world
    pub const FRAGMENT_KILL_DEPTH: f32 = -30.0;

    /// Camera framing
    pub const CAMERA_START: [f32; 3] = [4.0, 4.0, 4.0];
    /// Camera rests this far above the second-from-top layer
    pub const CAMERA_LIFT: f32 = 4.0;
    /// Visible world width of the orthographic view
    pub const VIEW_WIDTH: f32 = 10.0;
    pub const VIEW_NEAR: f32 = 0.0;
    pub const VIEW_FAR: f32 = 100.0;

    /// Lighting: white ambient plus one directional light
    pub const AMBIENT_INTENSITY: f32 = 0.6;
    pub const DIRECTIONAL_INTENSITY: f32 = 0.6;
    pub const LIGHT_POSITION: [f32; 3] = [10.0, 20.0, 0.0];
    pub const BACKGROUND: [f64; 3] = [0.0, 0.0, 0.0];

    /// Hue step between consecutive layers (degrees)
    pub const HUE_STEP: f32 = 4.0;
}

/// Horizontal direction a layer slides along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    /// The perpendicular horizontal axis
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }

    /// Read this axis' component of a vector
    #[inline]
    pub fn of(self, v: glam::Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Z => v.z,
        }
    }

    /// Mutable access to this axis' component of a vector
    #[inline]
    pub fn of_mut(self, v: &mut glam::Vec3) -> &mut f32 {
        match self {
            Axis::X => &mut v.x,
            Axis::Z => &mut v.z,
        }
    }
}

/// Wrap a hue in degrees to [0, 360)
#[inline]
pub fn normalize_hue(hue: f32) -> f32 {
    hue.rem_euclid(360.0)
}
