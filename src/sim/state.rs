//! Game state and core simulation types
//!
//! Everything a round needs lives in one `GameSession`; the browser shell
//! owns exactly one and hands it to `tick`/`handle_input`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::physics::FragmentWorld;
use super::stack::Stack;
use crate::consts::CAMERA_LIFT;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start input (fresh page or after reset)
    #[default]
    Idle,
    /// A layer is sliding
    Running,
    /// Missed; results are on screen until reset
    Ended,
}

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Tuning for one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Vertical extent of every layer
    pub layer_height: f32,
    /// Width and depth of the foundation and first mover
    pub base_size: f32,
    /// Distance the mover slides per 60 Hz step
    pub speed: f32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn params(&self) -> DifficultyParams {
        match self {
            Difficulty::Easy => DifficultyParams {
                layer_height: 0.2,
                base_size: 2.0,
                speed: 0.12,
            },
            Difficulty::Medium => DifficultyParams {
                layer_height: 0.1,
                base_size: 1.0,
                speed: 0.15,
            },
            Difficulty::Hard => DifficultyParams {
                layer_height: 0.05,
                base_size: 0.5,
                speed: 0.20,
            },
        }
    }

    /// Lowercase name; doubles as the DOM element id of its button
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Things that happened during a tick, for the audio/DOM side to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Idle -> Running
    Started,
    /// A layer was kept; `perfect` when nothing was trimmed
    Placed { score: u32, perfect: bool },
    /// Running -> Ended
    Missed { final_score: u32 },
    /// Stack rebuilt for the given preset
    Reset { difficulty: Difficulty },
    /// A difficulty change arrived mid-round and was dropped
    DifficultyRejected { requested: Difficulty },
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    /// Seed the hue was drawn from
    pub seed: u64,
    /// Hue of the foundation (degrees)
    pub start_hue: f32,
    pub difficulty: Difficulty,
    pub phase: GamePhase,
    /// Layers placed this round
    pub score: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub stack: Stack,
    /// Detached overhangs in flight
    pub fragments: FragmentWorld,
    /// Pending events, drained by the shell each frame
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a new idle session with the given seed
    pub fn new(seed: u64, difficulty: Difficulty) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let start_hue = rng.random_range(1..=360u32) as f32;

        Self {
            seed,
            start_hue,
            difficulty,
            phase: GamePhase::Idle,
            score: 0,
            time_ticks: 0,
            stack: Stack::new(difficulty.params(), start_hue),
            fragments: FragmentWorld::new(),
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn params(&self) -> DifficultyParams {
        self.difficulty.params()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Height the camera should climb to for the current stack
    pub fn camera_target_height(&self) -> f32 {
        let placed = self.stack.len().saturating_sub(2) as f32;
        self.stack.layer_height() * placed + CAMERA_LIFT
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
