// Gameplay tuning, loadable from a TOML game config. Every field has a default.

pub mod control;
pub mod player;
pub mod session;
pub mod world;

pub use control::{Action, ControlProfile, FormantTuning, Preset};
pub use player::PlayerTuning;
pub use session::SessionTuning;
pub use world::WorldTuning;

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    pub player: PlayerTuning,
    pub world: WorldTuning,
    pub session: SessionTuning,
    pub controls: ControlProfile,
    pub formants: FormantTuning,
}
