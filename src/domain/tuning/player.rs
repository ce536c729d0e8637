use serde::Deserialize;

/// Gameplay tuning for the player avatar.
///
/// Velocities are in world units per tick and are multiplied by the world time factor where the
/// simulation integrates them. Keep this separate from runtime/server configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Side length of the player's collision box.
    pub size: f32,

    /// Downward acceleration added to `vy` every tick.
    pub gravity: f32,

    /// Vertical velocity assigned on jump (negative is up).
    pub jump_force: f32,

    /// Mid-air jumps are allowed while `|vy|` is below this. Zero means grounded only.
    pub jump_epsilon: f32,

    /// Cruise speed the player decays toward without intents.
    pub base_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,

    /// Per-tick change while an accelerate/decelerate intent is held.
    pub acceleration: f32,
    pub deceleration: f32,

    /// Per-tick drift back to base speed when no speed intent is held.
    pub recovery_rate: f32,

    /// Terminal descent speed for normal falls.
    pub max_fall_speed: f32,

    /// Descent cap and per-tick damping while floating.
    pub slow_fall_speed: f32,
    pub slow_fall_damping: f32,

    pub dash_speed: f32,
    /// Dash length in ticks.
    pub dash_duration: u32,

    /// Downward velocity assigned on downstrike.
    pub downstrike_force: f32,
    /// Downstrike length in ticks unless a landing ends it first.
    pub downstrike_duration: u32,

    /// Fraction of `|vy|` kept after hitting a platform from below.
    pub head_bump_bounce: f32,
}

impl PlayerTuning {
    pub fn half_size(&self) -> f32 {
        self.size / 2.0
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: 30.0,
            gravity: 0.5,
            jump_force: -12.0,
            jump_epsilon: 0.0,
            base_speed: 4.0,
            min_speed: 2.0,
            max_speed: 10.0,
            acceleration: 0.2,
            deceleration: 0.2,
            recovery_rate: 0.04,
            max_fall_speed: 8.0,
            slow_fall_speed: 3.0,
            slow_fall_damping: 0.85,
            dash_speed: 15.0,
            dash_duration: 15,
            downstrike_force: 25.0,
            downstrike_duration: 30,
            head_bump_bounce: 0.5,
        }
    }
}
