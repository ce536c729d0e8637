// Immutable level templates. Live state is instantiated from these per load and never
// writes back into them.

use crate::domain::geometry::{Rect, Vec2};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Back-and-forth motion of the top-left corner along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearMotion {
    pub axis: Axis,
    pub min: f32,
    pub max: f32,
    /// Non-negative distance per tick.
    pub speed: f32,
    /// `1.0` toward `max`, `-1.0` toward `min`.
    pub direction: f32,
}

/// Orbit of the body's center around `center`.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularMotion {
    pub center: Vec2,
    pub radius: f32,
    /// Radians, kept in `[0, 2π)`.
    pub angle: f32,
    /// Radians per tick.
    pub angular_speed: f32,
}

/// Cyclic tour of the top-left corner through `waypoints`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathMotion {
    pub waypoints: Vec<Vec2>,
    pub current: usize,
    pub next: usize,
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    Static,
    Linear(LinearMotion),
    Circular(CircularMotion),
    Path(PathMotion),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformTemplate {
    pub rect: Rect,
    pub motion: Motion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardKind {
    /// Respawns the player immediately.
    Obstacle,
    /// Explodes, freezes the player and respawns after a delay.
    Bomb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HazardTemplate {
    pub rect: Rect,
    pub kind: HazardKind,
    pub motion: Motion,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PortalTemplate {
    /// Round portal reached by center distance.
    Ring { center: Vec2 },
    /// Tall thin goal rectangle reached by overlap.
    FinishLine { rect: Rect },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelTemplate {
    /// Declaration order is the landing priority order.
    pub platforms: Vec<PlatformTemplate>,
    pub hazards: Vec<HazardTemplate>,
    pub portal: PortalTemplate,
    /// Player screen x and world y at load.
    pub spawn: Vec2,
    pub tutorial_text: Vec<String>,
}
