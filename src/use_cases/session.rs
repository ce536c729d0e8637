// Level/session controller: owns all mutable simulation state of one play session.

use crate::domain::systems::collision::{self, CollisionConfig, Outcome};
use crate::domain::systems::control::Intent;
use crate::domain::systems::scroll::Scroll;
use crate::domain::systems::{kinematics, player};
use crate::domain::tuning::GameTuning;
use crate::domain::{
    BodySnapshot, HazardKind, HazardSnapshot, LevelTemplate, PlayerSnapshot, PortalSnapshot,
    SimError, SimHazard, SimPlatform, SimPlayer, SimPortal, Vec2, WorldSnapshot,
};
use crate::use_cases::types::SessionState;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Level loaded, waiting for the start signal.
    Ready,
    Countdown { ticks_left: u32 },
    Running,
    Paused,
    /// Explosion or portal transition; waits for the pending transition.
    Frozen,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionAction {
    Respawn,
    Advance,
}

/// Tick-counted deferred transition, valid only for the generation it was scheduled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransition {
    pub action: TransitionAction,
    pub ticks_left: u32,
    pub generation: u64,
}

/// Flags and clocks the renderer shows next to the world.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatus {
    pub level: usize,
    pub level_count: usize,
    pub paused: bool,
    pub game_over: bool,
    pub frozen: bool,
    pub countdown_ticks: Option<u32>,
    pub elapsed_seconds: f32,
    pub total_time: Option<f32>,
}

// Live copies of one level template.
struct LiveLevel {
    player: SimPlayer,
    platforms: Vec<SimPlatform>,
    hazards: Vec<SimHazard>,
    portal: SimPortal,
}

impl LiveLevel {
    fn instantiate(template: &LevelTemplate, tuning: &GameTuning) -> Self {
        Self {
            player: SimPlayer::spawn(template.spawn, &tuning.player),
            platforms: template
                .platforms
                .iter()
                .map(SimPlatform::instantiate)
                .collect(),
            hazards: template.hazards.iter().map(SimHazard::instantiate).collect(),
            portal: SimPortal::instantiate(&template.portal, tuning.world.portal_size),
        }
    }
}

pub struct Session {
    levels: Arc<[LevelTemplate]>,
    tuning: GameTuning,
    tick_seconds: f32,

    // 1-based.
    level: usize,
    phase: Phase,
    // Bumped on every level load; stale pending transitions are dropped.
    generation: u64,
    pending: Option<PendingTransition>,

    ticks: u64,
    // Advances only while running or frozen.
    elapsed_ticks: u64,
    total_time: Option<f32>,

    scroll: Scroll,
    live: LiveLevel,
    explosion: Option<Vec2>,
}

impl Session {
    /// Creates a session on level 1, waiting for the start signal.
    pub fn new(
        levels: Arc<[LevelTemplate]>,
        tuning: GameTuning,
        tick_interval: Duration,
    ) -> Result<Self, SimError> {
        let first = levels.first().ok_or(SimError::NoLevels)?;
        let live = LiveLevel::instantiate(first, &tuning);
        Ok(Self {
            levels,
            tuning,
            tick_seconds: tick_interval.as_secs_f32(),
            level: 1,
            phase: Phase::Ready,
            generation: 0,
            pending: None,
            ticks: 0,
            elapsed_ticks: 0,
            total_time: None,
            scroll: Scroll::new(),
            live,
            explosion: None,
        })
    }

    pub fn tuning(&self) -> &GameTuning {
        &self.tuning
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn player(&self) -> &SimPlayer {
        &self.live.player
    }

    pub fn platforms(&self) -> &[SimPlatform] {
        &self.live.platforms
    }

    pub fn hazards(&self) -> &[SimHazard] {
        &self.live.hazards
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.offset()
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed_ticks as f32 * self.tick_seconds
    }

    pub fn total_time(&self) -> Option<f32> {
        self.total_time
    }

    /// Loads level `level` (1-based) and waits for the start signal.
    pub fn load_level(&mut self, level: usize) -> Result<(), SimError> {
        if level == 0 || level > self.levels.len() {
            return Err(SimError::InvalidLevel {
                requested: level,
                level_count: self.levels.len(),
            });
        }
        self.reset_level(level);
        self.phase = Phase::Ready;
        info!(level, generation = self.generation, "level loaded");
        Ok(())
    }

    /// Reloads the current level and keeps playing. Elapsed time is kept.
    pub fn respawn(&mut self) {
        self.reset_level(self.level);
        self.phase = Phase::Running;
        info!(level = self.level, "player respawned");
    }

    /// Advances to the next level, or ends the session after the last one.
    pub fn complete_level(&mut self) {
        let next = self.level + 1;
        if next <= self.levels.len() {
            self.reset_level(next);
            self.phase = Phase::Ready;
            info!(level = next, "level complete; next level loaded");
        } else {
            let total_time = self.elapsed_seconds();
            self.total_time = Some(total_time);
            self.phase = Phase::GameOver;
            info!(total_time, "final level complete; game over");
        }
    }

    /// Start, pause, resume, or restart after game over.
    pub fn commit(&mut self) {
        let next = match self.phase {
            Phase::Ready => match self.tuning.session.countdown_ticks {
                0 => Phase::Running,
                ticks_left => Phase::Countdown { ticks_left },
            },
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            Phase::GameOver => {
                self.restart();
                return;
            }
            phase @ (Phase::Countdown { .. } | Phase::Frozen) => phase,
        };
        self.phase = next;
        debug!(phase = ?self.phase, "commit");
    }

    /// Back to level 1 with the clock reset.
    pub fn restart(&mut self) {
        self.reset_level(1);
        self.reset_clock();
        self.phase = Phase::Ready;
        info!("session restarted");
    }

    /// Jumps to `level` with the clock reset.
    pub fn select_level(&mut self, level: usize) -> Result<(), SimError> {
        self.load_level(level)?;
        self.reset_clock();
        Ok(())
    }

    pub fn tick(&mut self, intent: Intent) {
        self.ticks += 1;
        match self.phase {
            Phase::Ready | Phase::Paused | Phase::GameOver => return,
            Phase::Countdown { ticks_left } => {
                self.phase = if ticks_left <= 1 {
                    Phase::Running
                } else {
                    Phase::Countdown {
                        ticks_left: ticks_left - 1,
                    }
                };
                return;
            }
            Phase::Running | Phase::Frozen => self.elapsed_ticks += 1,
        }

        self.advance_pending();
        if self.phase == Phase::Running {
            self.step(intent);
        }
    }

    fn step(&mut self, intent: Intent) {
        let tf = self.tuning.world.time_factor;
        let pt = self.tuning.player;
        let world = self.tuning.world;
        let half = pt.half_size();

        player::apply_intent(&mut self.live.player, intent, &pt, tf);
        player::update_speed(&mut self.live.player, &pt);
        self.scroll
            .advance(player::travel_velocity(&self.live.player, &pt) * tf);

        for platform in &mut self.live.platforms {
            platform.delta = kinematics::step(&mut platform.rect, &mut platform.motion);
        }
        for hazard in self.live.hazards.iter_mut().filter(|h| !h.detonated) {
            kinematics::step(&mut hazard.rect, &mut hazard.motion);
        }
        player::carry(
            &mut self.live.player,
            &self.live.platforms,
            half,
            world.screen_width - half,
        );

        let prev_y = self.live.player.y;
        player::apply_gravity(&mut self.live.player, &pt, tf);
        player::integrate(&mut self.live.player);

        let world_x = self.scroll.screen_to_world(self.live.player.x);
        let resolution = collision::resolve(
            &mut self.live.player,
            world_x,
            prev_y,
            &self.live.platforms,
            &self.live.hazards,
            &self.live.portal,
            &CollisionConfig {
                half_size: half,
                tolerance: world.platform_tolerance,
                head_bump_bounce: pt.head_bump_bounce,
                screen_height: world.screen_height,
                fall_margin: world.fall_margin,
            },
        );
        player::tick_timers(&mut self.live.player, &pt);

        match resolution.outcome {
            Outcome::Clear => {}
            Outcome::Hazard {
                index,
                kind: HazardKind::Obstacle,
            } => {
                info!(index, "obstacle hit");
                self.respawn();
            }
            Outcome::Hazard {
                index,
                kind: HazardKind::Bomb,
            } => self.detonate(index),
            Outcome::Goal => {
                info!(level = self.level, "portal reached");
                self.schedule(
                    TransitionAction::Advance,
                    self.tuning.session.portal_transition_ticks,
                );
            }
            Outcome::FellOut => {
                info!(level = self.level, "player fell out");
                self.respawn();
            }
        }
    }

    fn detonate(&mut self, index: usize) {
        if let Some(bomb) = self.live.hazards.get_mut(index) {
            bomb.detonated = true;
            self.explosion = Some(bomb.rect.center());
        }
        let player = &mut self.live.player;
        player.is_frozen = true;
        player.vy = 0.0;
        info!(index, "bomb detonated");
        self.schedule(
            TransitionAction::Respawn,
            self.tuning.session.explosion_ticks,
        );
    }

    fn schedule(&mut self, action: TransitionAction, ticks: u32) {
        let pending = PendingTransition {
            action,
            ticks_left: ticks,
            generation: self.generation,
        };
        if ticks == 0 {
            self.apply_transition(pending);
        } else {
            self.pending = Some(pending);
            self.phase = Phase::Frozen;
        }
    }

    fn advance_pending(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        if pending.ticks_left > 1 {
            pending.ticks_left -= 1;
            return;
        }
        if let Some(pending) = self.pending.take() {
            self.apply_transition(pending);
        }
    }

    fn apply_transition(&mut self, pending: PendingTransition) {
        if let Err(error) = self.fire(pending) {
            debug!(%error, "dropping deferred transition");
        }
    }

    fn fire(&mut self, pending: PendingTransition) -> Result<(), SimError> {
        if pending.generation != self.generation {
            return Err(SimError::StaleTimer {
                scheduled: pending.generation,
                current: self.generation,
            });
        }
        match pending.action {
            TransitionAction::Respawn => self.respawn(),
            TransitionAction::Advance => self.complete_level(),
        }
        Ok(())
    }

    fn reset_level(&mut self, level: usize) {
        let levels = Arc::clone(&self.levels);
        let Some(template) = level.checked_sub(1).and_then(|index| levels.get(index)) else {
            return;
        };
        self.live = LiveLevel::instantiate(template, &self.tuning);
        self.level = level;
        self.scroll.reset();
        self.explosion = None;
        self.generation += 1;
    }

    fn reset_clock(&mut self) {
        self.elapsed_ticks = 0;
        self.total_time = None;
    }

    fn tutorial_text(&self) -> Vec<String> {
        self.levels
            .get(self.level - 1)
            .map(|template| template.tutorial_text.clone())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            scroll: self.scroll.offset(),
            player: PlayerSnapshot::from(&self.live.player),
            platforms: self
                .live
                .platforms
                .iter()
                .map(|p| BodySnapshot::on_screen(&p.rect, &self.scroll))
                .collect(),
            hazards: self
                .live
                .hazards
                .iter()
                .map(|h| HazardSnapshot::on_screen(h, &self.scroll))
                .collect(),
            portal: PortalSnapshot::on_screen(&self.live.portal, &self.scroll),
            explosion: self
                .explosion
                .map(|at| Vec2::new(self.scroll.world_to_screen(at.x), at.y)),
        }
    }

    pub fn summary(&self) -> SessionStatus {
        SessionStatus {
            level: self.level,
            level_count: self.levels.len(),
            paused: matches!(self.phase, Phase::Ready | Phase::Paused | Phase::GameOver),
            game_over: self.phase == Phase::GameOver,
            frozen: self.phase == Phase::Frozen,
            countdown_ticks: match self.phase {
                Phase::Countdown { ticks_left } => Some(ticks_left),
                _ => None,
            },
            elapsed_seconds: self.elapsed_seconds(),
            total_time: self.total_time,
        }
    }

    pub fn state(&self) -> SessionState {
        let level = self.level;
        match self.phase {
            Phase::Ready => SessionState::Ready {
                level,
                tutorial_text: self.tutorial_text(),
            },
            Phase::Countdown { ticks_left } => SessionState::Countdown {
                level,
                in_seconds: (ticks_left as f32 * self.tick_seconds).ceil() as u32,
            },
            Phase::Running => SessionState::Running { level },
            Phase::Paused => SessionState::Paused { level },
            Phase::Frozen => SessionState::Transition { level },
            Phase::GameOver => SessionState::GameOver {
                total_time: self.total_time.unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Axis, CircularMotion, HazardTemplate, LinearMotion, Motion, PathMotion, PlatformTemplate,
        PortalTemplate, Rect,
    };

    const TICK: Duration = Duration::from_millis(10);

    fn ground() -> PlatformTemplate {
        PlatformTemplate {
            rect: Rect::new(0.0, 565.0, 100_000.0, 20.0),
            motion: Motion::Static,
        }
    }

    fn level(portal_x: f32, hazards: Vec<HazardTemplate>) -> LevelTemplate {
        LevelTemplate {
            platforms: vec![ground()],
            hazards,
            portal: PortalTemplate::Ring {
                center: Vec2::new(portal_x, 550.0),
            },
            spawn: Vec2::new(100.0, 550.0),
            tutorial_text: vec!["Say pop to jump".to_string()],
        }
    }

    fn bomb_at(x: f32) -> HazardTemplate {
        HazardTemplate {
            rect: Rect::new(x, 535.0, 30.0, 30.0),
            kind: HazardKind::Bomb,
            motion: Motion::Static,
        }
    }

    fn tuning() -> GameTuning {
        let mut tuning = GameTuning::default();
        tuning.session.countdown_ticks = 0;
        tuning.session.explosion_ticks = 3;
        tuning.session.portal_transition_ticks = 2;
        tuning
    }

    fn session(levels: Vec<LevelTemplate>) -> Session {
        Session::new(levels.into(), tuning(), TICK).expect("session should build")
    }

    fn running(levels: Vec<LevelTemplate>) -> Session {
        let mut s = session(levels);
        s.commit();
        assert_eq!(s.phase(), Phase::Running);
        s
    }

    #[test]
    fn when_no_levels_are_given_then_session_creation_fails() {
        let result = Session::new(Vec::new().into(), tuning(), TICK);

        assert!(matches!(result, Err(SimError::NoLevels)));
    }

    #[test]
    fn when_player_jumps_from_the_ground_then_it_follows_an_arc_and_lands_back() {
        let mut s = running(vec![level(90_000.0, vec![])]);
        s.tick(Intent::None);
        assert!(s.player().on_ground);
        assert_eq!(s.player().y, 550.0);

        s.tick(Intent::Jump);
        assert_eq!(s.player().vy, -11.5);
        assert!(s.player().y < 550.0);

        let mut ticks = 0;
        while !s.player().on_ground {
            let prev_y = s.player().y;
            s.tick(Intent::None);
            let p = s.player();
            if !p.on_ground {
                if p.vy < 0.0 {
                    assert!(p.y < prev_y);
                } else if p.vy > 0.0 {
                    assert!(p.y > prev_y);
                }
            }
            ticks += 1;
            assert!(ticks < 200, "player never landed");
        }

        assert_eq!(s.player().y, 550.0);
        assert_eq!(s.player().vy, 0.0);
        assert!(!s.player().is_jumping);
    }

    #[test]
    fn when_player_hits_an_obstacle_then_it_respawns_at_spawn_with_flags_cleared() {
        let obstacle = HazardTemplate {
            rect: Rect::new(90.0, 540.0, 30.0, 30.0),
            kind: HazardKind::Obstacle,
            motion: Motion::Static,
        };
        let mut s = running(vec![level(90_000.0, vec![obstacle])]);
        let generation = s.generation();
        s.live.player.is_dashing = true;
        s.live.player.is_floating = true;

        s.tick(Intent::None);

        assert_eq!(s.generation(), generation + 1);
        assert_eq!((s.player().x, s.player().y), (100.0, 550.0));
        assert!(!s.player().any_mode_active());
        assert_eq!(s.scroll_offset(), 0.0);
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.elapsed_ticks, 1);
    }

    #[test]
    fn when_player_hits_a_bomb_then_respawn_waits_for_the_explosion() {
        let mut s = running(vec![level(90_000.0, vec![bomb_at(150.0)])]);

        let mut ticks = 0;
        while s.phase() != Phase::Frozen {
            s.tick(Intent::None);
            ticks += 1;
            assert!(ticks < 50, "bomb never hit");
        }
        assert!(s.player().is_frozen);
        assert!(s.hazards()[0].detonated);
        assert!(s.snapshot().explosion.is_some());
        assert_eq!(s.snapshot().player.speed, 0.0);
        assert_eq!(s.player().speed, s.tuning().player.base_speed);

        let frozen_scroll = s.scroll_offset();
        let frozen_y = s.player().y;
        for _ in 0..2 {
            s.tick(Intent::Jump);
            assert_eq!(s.phase(), Phase::Frozen);
            assert_eq!(s.scroll_offset(), frozen_scroll);
            assert_eq!(s.player().y, frozen_y);
        }

        s.tick(Intent::None);
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.scroll_offset(), 4.0);
        assert!(!s.player().is_frozen);
        assert!(!s.hazards()[0].detonated);
        assert!(s.snapshot().explosion.is_none());
        assert_eq!(s.snapshot().player.speed, s.tuning().player.base_speed);
    }

    #[test]
    fn when_level_is_reloaded_before_a_deferred_respawn_then_the_stale_transition_is_dropped() {
        let mut s = running(vec![level(90_000.0, vec![bomb_at(150.0)])]);
        while s.phase() != Phase::Frozen {
            s.tick(Intent::None);
        }

        s.select_level(1).expect("level 1 exists");
        let generation = s.generation();
        s.commit();
        for _ in 0..3 {
            s.tick(Intent::None);
        }

        assert_eq!(s.phase(), Phase::Running);
        assert!(s.pending.is_none());
        assert_eq!(s.generation(), generation);
        assert_eq!(s.scroll_offset(), 12.0);
    }

    #[test]
    fn when_last_portal_is_reached_then_session_ends_with_total_time() {
        let mut s = running(vec![level(130.0, vec![]), level(130.0, vec![])]);

        for _ in 0..3 {
            s.tick(Intent::None);
        }
        assert_eq!(s.level(), 2);
        assert_eq!(s.phase(), Phase::Ready);

        s.commit();
        for _ in 0..3 {
            s.tick(Intent::None);
        }

        let status = s.summary();
        assert_eq!(s.phase(), Phase::GameOver);
        assert!(status.game_over && status.paused);
        let total = s.total_time().expect("total time recorded");
        assert!((total - 0.06).abs() < 1e-6);

        for _ in 0..10 {
            s.tick(Intent::None);
        }
        assert_eq!(s.total_time(), Some(total));
        assert_eq!(
            s.state(),
            SessionState::GameOver { total_time: total }
        );

        s.commit();
        assert_eq!(s.level(), 1);
        assert_eq!(s.phase(), Phase::Ready);
        assert_eq!(s.elapsed_seconds(), 0.0);
    }

    #[test]
    fn when_level_is_out_of_range_then_load_fails_and_state_is_kept() {
        let mut s = session(vec![level(90_000.0, vec![]), level(90_000.0, vec![])]);
        let generation = s.generation();

        assert_eq!(
            s.load_level(0),
            Err(SimError::InvalidLevel {
                requested: 0,
                level_count: 2
            })
        );
        assert_eq!(
            s.select_level(3),
            Err(SimError::InvalidLevel {
                requested: 3,
                level_count: 2
            })
        );
        assert_eq!(s.level(), 1);
        assert_eq!(s.generation(), generation);
    }

    #[test]
    fn when_live_state_is_mutated_then_reloading_restores_template_values() {
        let mut template = level(90_000.0, vec![]);
        template.platforms.push(PlatformTemplate {
            rect: Rect::new(500.0, 430.0, 100.0, 20.0),
            motion: Motion::Linear(LinearMotion {
                axis: Axis::Horizontal,
                min: 420.0,
                max: 580.0,
                speed: 3.0,
                direction: 1.0,
            }),
        });
        let original = template.clone();
        let mut s = running(vec![template]);

        for _ in 0..40 {
            s.tick(Intent::None);
        }
        s.live.platforms[1].rect.y = -999.0;
        s.live.platforms[0].rect.width = 1.0;

        s.load_level(1).expect("level 1 exists");

        assert_eq!(s.levels[0], original);
        assert_eq!(s.platforms()[1].rect, original.platforms[1].rect);
        assert_eq!(s.platforms()[1].motion, original.platforms[1].motion);
        assert_eq!(s.platforms()[0].rect, original.platforms[0].rect);
        assert_eq!(s.phase(), Phase::Ready);
    }

    #[test]
    fn when_paused_then_flags_and_positions_are_frozen_until_resume() {
        let mut s = running(vec![level(90_000.0, vec![])]);
        s.tick(Intent::None);
        s.tick(Intent::Dash);
        assert!(s.player().is_dashing);
        assert_eq!(s.player().dash_frames, 1);

        s.commit();
        assert_eq!(s.phase(), Phase::Paused);
        let scroll = s.scroll_offset();
        let elapsed = s.elapsed_seconds();
        for _ in 0..10 {
            s.tick(Intent::Jump);
        }
        assert!(s.player().is_dashing);
        assert_eq!(s.player().dash_frames, 1);
        assert_eq!(s.scroll_offset(), scroll);
        assert_eq!(s.elapsed_seconds(), elapsed);

        s.commit();
        s.tick(Intent::None);
        assert_eq!(s.player().dash_frames, 2);
    }

    #[test]
    fn when_countdown_is_configured_then_play_starts_after_it_elapses() {
        let mut tuning = tuning();
        tuning.session.countdown_ticks = 3;
        let mut s =
            Session::new(vec![level(90_000.0, vec![])].into(), tuning, TICK).expect("session");

        s.commit();
        assert_eq!(
            s.state(),
            SessionState::Countdown {
                level: 1,
                in_seconds: 1
            }
        );
        s.tick(Intent::None);
        s.tick(Intent::None);
        assert_eq!(s.phase(), Phase::Countdown { ticks_left: 1 });
        s.commit();
        assert_eq!(s.phase(), Phase::Countdown { ticks_left: 1 });

        s.tick(Intent::None);
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.scroll_offset(), 0.0);
        assert_eq!(s.elapsed_seconds(), 0.0);
    }

    #[test]
    fn when_standing_on_a_rising_platform_then_player_rides_it() {
        let mut template = level(90_000.0, vec![]);
        template.platforms = vec![PlatformTemplate {
            rect: Rect::new(0.0, 565.0, 100_000.0, 20.0),
            motion: Motion::Linear(LinearMotion {
                axis: Axis::Vertical,
                min: 500.0,
                max: 565.0,
                speed: 2.0,
                direction: -1.0,
            }),
        }];
        let mut s = running(vec![template]);

        for _ in 0..20 {
            s.tick(Intent::None);
            let top = s.platforms()[0].rect.y;
            assert!(s.player().on_ground);
            assert_eq!(s.player().y, top - 15.0);
        }
    }

    #[test]
    fn when_scrolling_starts_then_moving_platforms_shift_without_a_jump() {
        let mut template = level(90_000.0, vec![]);
        template.platforms.push(PlatformTemplate {
            rect: Rect::new(0.0, 0.0, 40.0, 10.0),
            motion: Motion::Circular(CircularMotion {
                center: Vec2::new(600.0, 300.0),
                radius: 50.0,
                angle: 0.0,
                angular_speed: 0.1,
            }),
        });
        template.platforms.push(PlatformTemplate {
            rect: Rect::new(800.0, 300.0, 60.0, 10.0),
            motion: Motion::Path(PathMotion {
                waypoints: vec![Vec2::new(800.0, 300.0), Vec2::new(810.0, 320.0)],
                current: 0,
                next: 1,
                speed: 3.0,
            }),
        });
        let mut s = running(vec![template]);
        assert_eq!(s.scroll_offset(), 0.0);

        let close = |a: f32, b: f32| (a - b).abs() < 1e-3;
        let mut prev = s.snapshot();
        let mut prev_scroll = s.scroll_offset();
        for _ in 0..12 {
            s.tick(Intent::None);
            let snapshot = s.snapshot();
            let travel = s.scroll_offset() - prev_scroll;
            assert!(travel > 0.0);

            for (i, platform) in s.platforms().iter().enumerate() {
                let body = snapshot.platforms[i];
                assert!(close(body.x, platform.rect.x - s.scroll_offset()));
                assert!(close(body.y, platform.rect.y));
                assert!(close(body.x - prev.platforms[i].x, platform.delta.x - travel));
                assert!(close(body.y - prev.platforms[i].y, platform.delta.y));
            }

            prev = snapshot;
            prev_scroll = s.scroll_offset();
        }
    }

    #[test]
    fn when_scrolling_then_snapshot_reports_screen_positions() {
        let mut s = running(vec![level(90_000.0, vec![])]);
        for _ in 0..5 {
            s.tick(Intent::None);
        }

        let snapshot = s.snapshot();

        assert_eq!(snapshot.scroll, 20.0);
        assert_eq!(snapshot.platforms[0].x, -20.0);
        assert_eq!(snapshot.player.x, 100.0);
        assert_eq!(
            snapshot.portal,
            PortalSnapshot::Ring {
                x: 90_000.0 - 20.0,
                y: 550.0,
                radius: 25.0
            }
        );
    }
}
