//! Orthographic camera that climbs with the tower

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::consts::{CAMERA_START, VIEW_FAR, VIEW_NEAR, VIEW_WIDTH};

/// View direction: from (4, 4, 4) towards the origin, kept fixed while climbing
const VIEW_DIR: Vec3 = Vec3::new(-1.0, -1.0, -1.0);

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Camera state: only the eye height changes during play
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    pub eye: Vec3,
    /// Viewport size in pixels
    pub viewport: (u32, u32),
}

impl CameraRig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            eye: Vec3::from(CAMERA_START),
            viewport: (width.max(1), height.max(1)),
        }
    }

    /// Climb by `step` while below `target`; never descends
    pub fn follow(&mut self, target: f32, step: f32) {
        if self.eye.y < target {
            self.eye.y += step;
        }
    }

    pub fn reset(&mut self) {
        self.eye = Vec3::from(CAMERA_START);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.viewport = (width, height);
        }
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.0 as f32 / self.viewport.1 as f32
    }

    pub fn view_proj(&self) -> Mat4 {
        let half_w = VIEW_WIDTH / 2.0;
        let half_h = half_w / self.aspect();
        let proj = Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, VIEW_NEAR, VIEW_FAR);
        let view = Mat4::look_to_rh(self.eye, VIEW_DIR.normalize(), Vec3::Y);
        proj * view
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
        }
    }
}
