// Domain-level errors for session and simulation workflows.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Requested level is outside `1..=level_count`.
    InvalidLevel { requested: usize, level_count: usize },
    /// A deferred transition outlived the level generation it was scheduled for.
    StaleTimer { scheduled: u64, current: u64 },
    /// A session cannot start without at least one level.
    NoLevels,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidLevel {
                requested,
                level_count,
            } => write!(f, "level {requested} is outside 1..={level_count}"),
            SimError::StaleTimer { scheduled, current } => write!(
                f,
                "transition scheduled for generation {scheduled} fired in generation {current}"
            ),
            SimError::NoLevels => write!(f, "no levels loaded"),
        }
    }
}

impl std::error::Error for SimError {}
