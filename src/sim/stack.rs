//! The tower of layers
//!
//! Index 0 is the foundation; the last layer is the one sliding while a
//! round runs. Axes alternate X, Z, X... from the first movable layer on,
//! and layer `i` always sits at height `i * layer_height`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::layer::{Fragment, Layer};
use super::overlap::{self, Placement};
use super::state::DifficultyParams;
use crate::consts::{HUE_STEP, SPAWN_OFFSET, TRAVEL_LIMIT};
use crate::error::{SimError, SimResult};
use crate::{Axis, normalize_hue};

/// Layers below the first one the player drops (foundation + first mover)
pub const FOUNDATION_LAYERS: usize = 2;

/// What a commit did to the stack
#[derive(Debug, Clone, PartialEq)]
pub enum Committed {
    /// Layer kept (possibly trimmed); a new mover was spawned on top
    Placed {
        /// Piece that broke off, if the drop wasn't perfect
        fragment: Option<Fragment>,
        /// Layers placed so far
        score: u32,
    },
    /// Layer missed completely and was detached whole
    Missed { fragment: Fragment, final_score: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stack {
    layers: Vec<Layer>,
    layer_height: f32,
    base_size: f32,
    start_hue: f32,
}

impl Stack {
    /// Foundation plus the first moving layer, sized for the given preset
    pub fn new(params: DifficultyParams, start_hue: f32) -> Self {
        let mut stack = Self {
            layers: Vec::new(),
            layer_height: params.layer_height,
            base_size: params.base_size,
            start_hue,
        };
        stack.reset(params);
        stack
    }

    /// Back to the foundation pair, resized for a (possibly new) preset
    pub fn reset(&mut self, params: DifficultyParams) {
        self.layers.clear();
        self.layer_height = params.layer_height;
        self.base_size = params.base_size;

        let size = self.base_size;
        // Foundation is tagged Z so the first mover starts the X/Z alternation
        self.push_layer(0.0, 0.0, size, size, Axis::Z);
        self.push_layer(SPAWN_OFFSET, 0.0, size, size, Axis::X);
    }

    /// Append a moving layer on `axis`, spawned at the far edge
    ///
    /// The coordinate across the motion axis and both extents come from the
    /// layer below, so the new block lines up with what survived the last cut.
    pub fn add_layer(&mut self, axis: Axis) -> SimResult<()> {
        let below = self.layers.last().ok_or(SimError::StackUnderflow(0))?;
        let x = if axis == Axis::X { SPAWN_OFFSET } else { below.position.x };
        let z = if axis == Axis::Z { SPAWN_OFFSET } else { below.position.z };
        let (width, depth) = (below.width, below.depth);
        self.push_layer(x, z, width, depth, axis);
        Ok(())
    }

    fn push_layer(&mut self, x: f32, z: f32, width: f32, depth: f32, axis: Axis) {
        let index = self.layers.len();
        let y = self.layer_height * index as f32;
        let hue = self.hue_for(index);
        self.layers.push(Layer::new(
            Vec3::new(x, y, z),
            width,
            depth,
            self.layer_height,
            axis,
            hue,
        ));
    }

    /// Hue of the layer at `index`
    pub fn hue_for(&self, index: usize) -> f32 {
        normalize_hue(self.start_hue + index as f32 * HUE_STEP)
    }

    /// Slide the top layer along its axis
    ///
    /// Returns true once it has travelled past the far edge, which the caller
    /// treats the same as a missed drop.
    pub fn advance(&mut self, distance: f32) -> bool {
        let Some(top) = self.layers.last_mut() else {
            return false;
        };
        let axis = top.axis;
        let coord = axis.of_mut(&mut top.position);
        *coord += distance;
        *coord > TRAVEL_LIMIT
    }

    /// Work out where the top layer would land right now
    pub fn resolve_top(&self) -> SimResult<Placement> {
        match self.layers.as_slice() {
            [.., prev, top] => Ok(overlap::resolve_layers(top, prev)),
            _ => Err(SimError::StackUnderflow(self.layers.len())),
        }
    }

    /// Apply a placement to the top layer
    pub fn commit(&mut self, placement: Placement) -> SimResult<Committed> {
        if self.layers.len() < FOUNDATION_LAYERS {
            return Err(SimError::StackUnderflow(self.layers.len()));
        }

        match placement {
            Placement::Hit(cut) => {
                let top = self
                    .layers
                    .last_mut()
                    .ok_or(SimError::StackUnderflow(0))?;
                let (trimmed, fragment) = overlap::split(top, &cut);
                let next_axis = trimmed.axis.other();
                *top = trimmed;

                let score = self.placed_count() as u32 + 1;
                self.add_layer(next_axis)?;
                Ok(Committed::Placed { fragment, score })
            }
            Placement::Miss => {
                let final_score = self.placed_count() as u32;
                let top = self
                    .layers
                    .pop()
                    .ok_or(SimError::StackUnderflow(0))?;
                Ok(Committed::Missed {
                    fragment: top.to_fragment(),
                    final_score,
                })
            }
        }
    }

    /// Resolve and commit the top layer in one go
    pub fn place(&mut self) -> SimResult<Committed> {
        let placement = self.resolve_top()?;
        self.commit(placement)
    }

    /// Layers the player has dropped successfully
    ///
    /// The moving layer is not counted, nor is the foundation.
    pub fn placed_count(&self) -> usize {
        self.layers.len().saturating_sub(FOUNDATION_LAYERS)
    }

    pub fn top(&self) -> Option<&Layer> {
        self.layers.last()
    }

    pub fn previous(&self) -> Option<&Layer> {
        self.layers.iter().rev().nth(1)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer_height(&self) -> f32 {
        self.layer_height
    }

    pub fn base_size(&self) -> f32 {
        self.base_size
    }
}
