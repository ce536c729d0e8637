use crate::domain::geometry::Vec2;
use serde::Deserialize;

/// Level-wide constants shared by collision, scrolling and level loading.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub screen_width: f32,
    pub screen_height: f32,

    /// Height used for platforms declared with a width only.
    pub platform_height: f32,

    /// Slack on platform top faces to absorb per-tick overshoot.
    pub platform_tolerance: f32,

    /// Diameter of ring portals.
    pub portal_size: f32,

    /// Finish-line portal extent when a level does not declare one.
    pub finish_line_width: f32,
    pub finish_line_height: f32,

    /// Distance below the screen bottom at which the player counts as fallen out.
    pub fall_margin: f32,

    /// Global simulation rate multiplier applied to gravity, jumps and scrolling.
    pub time_factor: f32,

    /// Spawn point for levels that do not declare one (screen x, world y).
    pub spawn: Vec2,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 600.0,
            platform_height: 20.0,
            platform_tolerance: 5.0,
            portal_size: 50.0,
            finish_line_width: 20.0,
            finish_line_height: 200.0,
            fall_margin: 0.0,
            time_factor: 1.0,
            spawn: Vec2::new(100.0, 500.0),
        }
    }
}
