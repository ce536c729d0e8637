// Use-case level inputs/outputs for the game loop.

use crate::domain::{SimError, WorldSnapshot};
use crate::use_cases::session::SessionStatus;
use tokio::sync::oneshot;

#[derive(Debug)]
pub enum GameEvent {
    /// The single start/pause/resume signal.
    Commit,
    /// Back to level 1 with the clock reset.
    Restart,
    /// Jump to a level; callers that care get the outcome back.
    SelectLevel {
        level: usize,
        reply: Option<oneshot::Sender<Result<(), SimError>>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Ready {
        level: usize,
        tutorial_text: Vec<String>,
    },
    Countdown {
        level: usize,
        in_seconds: u32,
    },
    Running {
        level: usize,
    },
    Paused {
        level: usize,
    },
    /// Explosion or portal transition in progress.
    Transition {
        level: usize,
    },
    GameOver {
        total_time: f32,
    },
}

#[derive(Debug, Clone)]
pub struct WorldUpdate {
    pub tick: u64,
    pub world: WorldSnapshot,
    pub status: SessionStatus,
}
