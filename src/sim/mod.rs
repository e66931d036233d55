//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by layer index / fragment ID)
//! - No rendering or platform dependencies

pub mod layer;
pub mod overlap;
pub mod physics;
pub mod stack;
pub mod state;
pub mod tick;

pub use layer::{Fragment, Layer};
pub use overlap::{Cut, Placement, resolve, resolve_layers, split};
pub use physics::{FragmentTransform, FragmentWorld};
pub use stack::{Committed, FOUNDATION_LAYERS, Stack};
pub use state::{Difficulty, DifficultyParams, GameEvent, GamePhase, GameSession};
pub use tick::{InputEvent, TickInput, handle_input, tick};
