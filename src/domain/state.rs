// Domain-level simulation entities and snapshot types.
// Geometry is stored in world space; snapshots are converted to screen space.

use crate::domain::geometry::{Rect, Vec2};
use crate::domain::level::{HazardKind, HazardTemplate, Motion, PlatformTemplate, PortalTemplate};
use crate::domain::systems::kinematics;
use crate::domain::systems::scroll::Scroll;
use crate::domain::tuning::PlayerTuning;

pub struct SimPlayer {
    // Screen-space x; the world scrolls underneath it.
    pub x: f32,
    // Center y (screen and world agree vertically).
    pub y: f32,
    pub vy: f32,
    pub speed: f32,

    // Per-tick control inputs, rewritten by every applied intent.
    pub accelerating: bool,
    pub decelerating: bool,
    pub steer: Option<f32>,
    pub antigravity: f32,

    // Mode flags.
    pub on_ground: bool,
    pub is_jumping: bool,
    pub is_floating: bool,
    pub is_dashing: bool,
    pub is_downstriking: bool,
    pub is_frozen: bool,

    pub dash_frames: u32,
    pub downstrike_frames: u32,

    // Index of the platform landed on last tick.
    pub support: Option<usize>,
}

impl SimPlayer {
    pub fn spawn(at: Vec2, tuning: &PlayerTuning) -> Self {
        Self {
            x: at.x,
            y: at.y,
            vy: 0.0,
            speed: tuning.base_speed,
            accelerating: false,
            decelerating: false,
            steer: None,
            antigravity: 0.0,
            on_ground: false,
            is_jumping: false,
            is_floating: false,
            is_dashing: false,
            is_downstriking: false,
            is_frozen: false,
            dash_frames: 0,
            downstrike_frames: 0,
            support: None,
        }
    }

    pub fn any_mode_active(&self) -> bool {
        self.is_jumping
            || self.is_floating
            || self.is_dashing
            || self.is_downstriking
            || self.is_frozen
    }
}

pub struct SimPlatform {
    pub rect: Rect,
    pub motion: Motion,
    // Displacement applied by the last kinematics step.
    pub delta: Vec2,
}

impl SimPlatform {
    pub fn instantiate(template: &PlatformTemplate) -> Self {
        let mut rect = Rect::new(
            template.rect.x,
            template.rect.y,
            template.rect.width,
            template.rect.height,
        );
        let motion = template.motion.clone();
        kinematics::settle(&mut rect, &motion);
        Self {
            rect,
            motion,
            delta: Vec2::ZERO,
        }
    }
}

pub struct SimHazard {
    pub rect: Rect,
    pub kind: HazardKind,
    pub motion: Motion,
    // Spent bombs stay in place but no longer collide or move.
    pub detonated: bool,
}

impl SimHazard {
    pub fn instantiate(template: &HazardTemplate) -> Self {
        let mut rect = Rect::new(
            template.rect.x,
            template.rect.y,
            template.rect.width,
            template.rect.height,
        );
        let motion = template.motion.clone();
        kinematics::settle(&mut rect, &motion);
        Self {
            rect,
            kind: template.kind,
            motion,
            detonated: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimPortal {
    Ring { center: Vec2, radius: f32 },
    FinishLine { rect: Rect },
}

impl SimPortal {
    pub fn instantiate(template: &PortalTemplate, portal_size: f32) -> Self {
        match *template {
            PortalTemplate::Ring { center } => SimPortal::Ring {
                center: Vec2::new(center.x, center.y),
                radius: portal_size / 2.0,
            },
            PortalTemplate::FinishLine { rect } => SimPortal::FinishLine {
                rect: Rect::new(rect.x, rect.y, rect.width, rect.height),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
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

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardSnapshot {
    pub body: BodySnapshot,
    pub kind: HazardKind,
    pub detonated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PortalSnapshot {
    Ring { x: f32, y: f32, radius: f32 },
    FinishLine(BodySnapshot),
}

/// Read-only screen-space pose of everything the renderer draws.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    pub scroll: f32,
    pub player: PlayerSnapshot,
    pub platforms: Vec<BodySnapshot>,
    pub hazards: Vec<HazardSnapshot>,
    pub portal: PortalSnapshot,
    pub explosion: Option<Vec2>,
}

impl From<&SimPlayer> for PlayerSnapshot {
    fn from(p: &SimPlayer) -> Self {
        Self {
            x: p.x,
            y: p.y,
            vy: p.vy,
            // Frozen players do not travel; the stored speed keeps its bounds for the respawn.
            speed: if p.is_frozen { 0.0 } else { p.speed },
            on_ground: p.on_ground,
            is_jumping: p.is_jumping,
            is_floating: p.is_floating,
            is_dashing: p.is_dashing,
            is_downstriking: p.is_downstriking,
            is_frozen: p.is_frozen,
        }
    }
}

impl BodySnapshot {
    pub fn on_screen(rect: &Rect, scroll: &Scroll) -> Self {
        Self {
            x: scroll.world_to_screen(rect.x),
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

impl HazardSnapshot {
    pub fn on_screen(hazard: &SimHazard, scroll: &Scroll) -> Self {
        Self {
            body: BodySnapshot::on_screen(&hazard.rect, scroll),
            kind: hazard.kind,
            detonated: hazard.detonated,
        }
    }
}

impl PortalSnapshot {
    pub fn on_screen(portal: &SimPortal, scroll: &Scroll) -> Self {
        match portal {
            SimPortal::Ring { center, radius } => PortalSnapshot::Ring {
                x: scroll.world_to_screen(center.x),
                y: center.y,
                radius: *radius,
            },
            SimPortal::FinishLine { rect } => {
                PortalSnapshot::FinishLine(BodySnapshot::on_screen(rect, scroll))
            }
        }
    }
}
