//! Fixed timestep simulation tick
//!
//! Inputs arrive as `InputEvent`s and go through a single transition
//! function, so the whole state machine can be driven from tests without a
//! browser event loop.

use super::overlap::Placement;
use super::stack::Committed;
use super::state::{Difficulty, GameEvent, GamePhase, GameSession};
use crate::consts::SIM_DT;
use crate::error::SimResult;

/// A discrete player/UI input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Begin a round (Idle only)
    Start,
    /// Drop the moving layer (Running only)
    Place,
    /// Rebuild the stack with the current preset (not while Running)
    Reset,
    /// Switch preset and rebuild (not while Running)
    SelectDifficulty(Difficulty),
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start a round (space/enter while idle)
    pub start: bool,
    /// Drop the moving layer (click/tap/space while running)
    pub place: bool,
    /// Reset (R)
    pub reset: bool,
    /// Difficulty button pressed
    pub difficulty: Option<Difficulty>,
    /// Demo mode - the simulation drops layers by itself
    pub autoplay: bool,
}

impl TickInput {
    /// Forget the one-shot inputs after they've been consumed
    pub fn clear_one_shots(&mut self) {
        self.start = false;
        self.place = false;
        self.reset = false;
        self.difficulty = None;
    }

    /// One-shot inputs in the order they are applied
    fn events(&self) -> impl Iterator<Item = InputEvent> {
        let select = self.difficulty.map(InputEvent::SelectDifficulty);
        let reset = self.reset.then_some(InputEvent::Reset);
        let start = self.start.then_some(InputEvent::Start);
        let place = self.place.then_some(InputEvent::Place);
        [select, reset, start, place].into_iter().flatten()
    }
}

/// Apply one input to the session
///
/// Inputs that don't fit the current phase are ignored. The only error is a
/// broken stack invariant, which the caller should treat as fatal.
pub fn handle_input(session: &mut GameSession, input: InputEvent) -> SimResult<()> {
    match (input, session.phase) {
        (InputEvent::Start, GamePhase::Idle) => {
            session.phase = GamePhase::Running;
            session.emit(GameEvent::Started);
            log::info!("Round started ({})", session.difficulty.as_str());
        }
        (InputEvent::Place, GamePhase::Running) => {
            let committed = session.stack.place()?;
            apply_commit(session, committed);
        }
        (InputEvent::Reset, GamePhase::Idle | GamePhase::Ended) => {
            let difficulty = session.difficulty;
            reset(session, difficulty);
        }
        (InputEvent::SelectDifficulty(difficulty), GamePhase::Idle | GamePhase::Ended) => {
            reset(session, difficulty);
        }
        (InputEvent::SelectDifficulty(requested), GamePhase::Running) => {
            log::warn!(
                "Ignoring difficulty change to {} mid-round",
                requested.as_str()
            );
            session.emit(GameEvent::DifficultyRejected { requested });
        }
        (input, phase) => {
            log::debug!("Ignoring {:?} while {:?}", input, phase);
        }
    }
    Ok(())
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) -> SimResult<()> {
    for event in input.events() {
        handle_input(session, event)?;
    }

    session.time_ticks += 1;

    if session.phase == GamePhase::Running {
        let step = session.params().speed * dt / SIM_DT;

        if input.autoplay && autoplay_ready(session, step) {
            handle_input(session, InputEvent::Place)?;
        }

        // Placing may have ended the round
        if session.phase == GamePhase::Running && session.stack.advance(step) {
            log::debug!("Layer slid past the far edge");
            let committed = session.stack.commit(Placement::Miss)?;
            apply_commit(session, committed);
        }
    }

    session.fragments.step(dt);
    Ok(())
}

/// Fold a stack commit into score, phase and fragments
fn apply_commit(session: &mut GameSession, committed: Committed) {
    match committed {
        Committed::Placed { fragment, score } => {
            let perfect = fragment.is_none();
            if let Some(fragment) = fragment {
                session.fragments.spawn(&fragment);
            }
            session.score = score;
            session.emit(GameEvent::Placed { score, perfect });
            log::debug!("Placed layer {} (perfect: {})", score, perfect);
        }
        Committed::Missed {
            fragment,
            final_score,
        } => {
            session.fragments.spawn(&fragment);
            session.score = final_score;
            session.phase = GamePhase::Ended;
            session.emit(GameEvent::Missed { final_score });
            log::info!("Round over, final score {}", final_score);
        }
    }
}

/// Rebuild the session for `difficulty`; total replacement of round state
fn reset(session: &mut GameSession, difficulty: Difficulty) {
    session.difficulty = difficulty;
    session.stack.reset(difficulty.params());
    session.fragments.clear();
    session.score = 0;
    session.phase = GamePhase::Idle;
    session.emit(GameEvent::Reset { difficulty });
    log::info!("Reset ({})", difficulty.as_str());
}

/// Demo mode: drop as soon as the mover is within half a step of alignment
fn autoplay_ready(session: &GameSession, step: f32) -> bool {
    let (Some(top), Some(prev)) = (session.stack.top(), session.stack.previous()) else {
        return false;
    };
    let axis = top.axis;
    top.coord(axis) - prev.coord(axis) >= -step * 0.5
}
