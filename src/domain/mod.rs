// Domain layer: core simulation types and rules.

pub mod errors;
pub mod geometry;
pub mod level;
pub mod state;
pub mod systems;
pub mod tuning;

pub use errors::SimError;
pub use geometry::{Rect, Vec2};
pub use level::{
    Axis, CircularMotion, HazardKind, HazardTemplate, LevelTemplate, LinearMotion, Motion,
    PathMotion, PlatformTemplate, PortalTemplate,
};
pub use state::{
    BodySnapshot, HazardSnapshot, PlayerSnapshot, PortalSnapshot, SimHazard, SimPlatform,
    SimPlayer, SimPortal, WorldSnapshot,
};
