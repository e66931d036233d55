//! Layer geometry for stacked blocks
//!
//! A layer is an axis-aligned box described by its center, its two
//! horizontal extents and a shared height:
//! - width: extent along X
//! - depth: extent along Z
//! - axis: the horizontal direction it slides along before placement

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::Axis;

/// A placed or moving block in the stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Box center
    pub position: Vec3,
    /// Extent along X
    pub width: f32,
    /// Extent along Z
    pub depth: f32,
    /// Vertical extent (same for every layer in a session)
    pub height: f32,
    /// Motion axis
    pub axis: Axis,
    /// Display hue in degrees
    pub hue: f32,
}

impl Layer {
    pub fn new(position: Vec3, width: f32, depth: f32, height: f32, axis: Axis, hue: f32) -> Self {
        Self {
            position,
            width,
            depth,
            height,
            axis,
            hue,
        }
    }

    /// Horizontal extent along the given axis
    #[inline]
    pub fn extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.width,
            Axis::Z => self.depth,
        }
    }

    /// Set the horizontal extent along the given axis
    #[inline]
    pub fn set_extent(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.width = value,
            Axis::Z => self.depth = value,
        }
    }

    /// Center coordinate along the given axis
    #[inline]
    pub fn coord(&self, axis: Axis) -> f32 {
        axis.of(self.position)
    }

    /// Full box size as a vector (width, height, depth)
    #[inline]
    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }

    /// Half extents, as used by box meshes
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Detach this layer whole, as happens on a miss
    pub fn to_fragment(&self) -> Fragment {
        Fragment {
            position: self.position,
            width: self.width,
            depth: self.depth,
            height: self.height,
            hue: self.hue,
            cut_axis: self.axis,
            side: 0.0,
        }
    }
}

/// A piece cut away from a layer; handed to the physics world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub position: Vec3,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub hue: f32,
    /// Axis the cut happened on
    pub cut_axis: Axis,
    /// Which side of the surviving layer it broke off (+1, -1, or 0 for a whole layer)
    pub side: f32,
}

impl Fragment {
    #[inline]
    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }
}
