use serde::Deserialize;

/// Tick-counted durations for session phase transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    /// Ticks between the start signal and play. Zero starts immediately.
    pub countdown_ticks: u32,

    /// Ticks the player stays frozen after a bomb before respawning.
    pub explosion_ticks: u32,

    /// Ticks between touching the portal and loading the next level.
    pub portal_transition_ticks: u32,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            countdown_ticks: 180,
            explosion_ticks: 30,
            portal_transition_ticks: 60,
        }
    }
}
