// Wire protocol DTOs and conversions for public simulation server messages.
// Level file DTOs live in `levels`.

use crate::domain::{
    BodySnapshot, HazardKind, HazardSnapshot, PlayerSnapshot, PortalSnapshot, WorldSnapshot,
};
use crate::use_cases::{SessionState, SessionStatus, WorldUpdate};
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Sent once after the socket is attached to a session.
    Attached {
        session_id: String,
        level_count: usize,
    },
    // Snapshot of the world for a given tick.
    WorldUpdate(WorldUpdateDto),
    // Session phase transitions (ready, countdown, running, paused, game over).
    SessionState(SessionStateDto),
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    // Start, pause, resume, or restart after game over.
    Commit,
    Restart,
    SelectLevel { level: usize },
    // Discrete classifier output.
    Sound(SoundDto),
    // Continuous formant tracker output.
    Formants(FormantsDto),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SoundDto {
    pub label: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormantsDto {
    pub f1: f32,
    pub f2: f32,
    pub confidence: f32,
    #[serde(default)]
    pub amplitude: f32,
}

/// Snapshot of the world sent to clients on each tick.
#[derive(Debug, Clone, Serialize)]
pub struct WorldUpdateDto {
    pub tick: u64,
    pub scroll: f32,
    pub player: PlayerDto,
    pub platforms: Vec<BodyDto>,
    pub hazards: Vec<HazardDto>,
    pub portal: PortalDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explosion: Option<PointDto>,
    pub session: SessionStatusDto,
}

impl From<WorldUpdate> for WorldUpdateDto {
    fn from(update: WorldUpdate) -> Self {
        let WorldSnapshot {
            scroll,
            player,
            platforms,
            hazards,
            portal,
            explosion,
        } = update.world;
        Self {
            tick: update.tick,
            scroll,
            player: PlayerDto::from(&player),
            platforms: platforms.iter().map(BodyDto::from).collect(),
            hazards: hazards.iter().map(HazardDto::from).collect(),
            portal: PortalDto::from(&portal),
            explosion: explosion.map(|at| PointDto { x: at.x, y: at.y }),
            session: SessionStatusDto::from(&update.status),
        }
    }
}

/// Player pose and mode flags in screen space.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerDto {
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub speed: f32,
    pub on_ground: bool,
    pub is_jumping: bool,
    pub is_floating: bool,
    pub is_dashing: bool,
    pub is_downstriking: bool,
    pub is_frozen: bool,
}

impl From<&PlayerSnapshot> for PlayerDto {
    fn from(p: &PlayerSnapshot) -> Self {
        Self {
            x: p.x,
            y: p.y,
            vy: p.vy,
            speed: p.speed,
            on_ground: p.on_ground,
            is_jumping: p.is_jumping,
            is_floating: p.is_floating,
            is_dashing: p.is_dashing,
            is_downstriking: p.is_downstriking,
            is_frozen: p.is_frozen,
        }
    }
}

/// Axis-aligned body, top-left corner in screen space.
#[derive(Debug, Clone, Serialize)]
pub struct BodyDto {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<&BodySnapshot> for BodyDto {
    fn from(b: &BodySnapshot) -> Self {
        Self {
            x: b.x,
            y: b.y,
            width: b.width,
            height: b.height,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HazardDto {
    #[serde(flatten)]
    pub body: BodyDto,
    pub kind: &'static str,
    pub detonated: bool,
}

impl From<&HazardSnapshot> for HazardDto {
    fn from(h: &HazardSnapshot) -> Self {
        Self {
            body: BodyDto::from(&h.body),
            kind: match h.kind {
                HazardKind::Obstacle => "obstacle",
                HazardKind::Bomb => "bomb",
            },
            detonated: h.detonated,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PortalDto {
    Ring { x: f32, y: f32, radius: f32 },
    FinishLine(BodyDto),
}

impl From<&PortalSnapshot> for PortalDto {
    fn from(p: &PortalSnapshot) -> Self {
        match p {
            PortalSnapshot::Ring { x, y, radius } => PortalDto::Ring {
                x: *x,
                y: *y,
                radius: *radius,
            },
            PortalSnapshot::FinishLine(body) => PortalDto::FinishLine(BodyDto::from(body)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PointDto {
    pub x: f32,
    pub y: f32,
}

/// Flags and clocks shown next to the world.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatusDto {
    pub level: usize,
    pub level_count: usize,
    pub paused: bool,
    pub game_over: bool,
    pub frozen: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown_ticks: Option<u32>,
    pub elapsed_seconds: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time: Option<f32>,
}

impl From<&SessionStatus> for SessionStatusDto {
    fn from(s: &SessionStatus) -> Self {
        Self {
            level: s.level,
            level_count: s.level_count,
            paused: s.paused,
            game_over: s.game_over,
            frozen: s.frozen,
            countdown_ticks: s.countdown_ticks,
            elapsed_seconds: s.elapsed_seconds,
            total_time: s.total_time,
        }
    }
}

/// Session lifecycle state sent to clients for UI flow.
#[derive(Debug, Clone, Serialize)]
pub enum SessionStateDto {
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
    Transition {
        level: usize,
    },
    GameOver {
        total_time: f32,
    },
}

impl From<SessionState> for SessionStateDto {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::Ready {
                level,
                tutorial_text,
            } => SessionStateDto::Ready {
                level,
                tutorial_text,
            },
            SessionState::Countdown { level, in_seconds } => {
                SessionStateDto::Countdown { level, in_seconds }
            }
            SessionState::Running { level } => SessionStateDto::Running { level },
            SessionState::Paused { level } => SessionStateDto::Paused { level },
            SessionState::Transition { level } => SessionStateDto::Transition { level },
            SessionState::GameOver { total_time } => SessionStateDto::GameOver { total_time },
        }
    }
}
