//! Simulation error types
//!
//! Every variant is a broken invariant, never a gameplay outcome. A miss is
//! a normal transition and does not go through here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A placement was resolved without a layer to land on
    #[error("stack holds {0} layer(s); resolving a placement needs at least 2")]
    StackUnderflow(usize),

    /// The fragment world was asked for a body it never issued
    #[error("no fragment with id {0}")]
    UnknownFragment(u32),
}

pub type SimResult<T> = Result<T, SimError>;
