use crate::domain::geometry::{Rect, Vec2};
use crate::domain::level::HazardKind;
use crate::domain::state::{SimHazard, SimPlatform, SimPlayer, SimPortal};

#[derive(Debug, Clone, Copy)]
pub struct CollisionConfig {
    pub half_size: f32,
    pub tolerance: f32,
    pub head_bump_bounce: f32,
    pub screen_height: f32,
    pub fall_margin: f32,
}

/// What the session has to react to after platform contacts are resolved.
/// Variants are listed in precedence order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Hazard { index: usize, kind: HazardKind },
    Goal,
    FellOut,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub landed_on: Option<usize>,
    pub outcome: Outcome,
}

/// Resolves the player against the level in world space.
///
/// `world_x` is the player's center converted through the scroll; `prev_y` is the center before
/// this tick's gravity integration. Platform contacts mutate the player; everything else is
/// reported through the outcome.
pub fn resolve(
    player: &mut SimPlayer,
    world_x: f32,
    prev_y: f32,
    platforms: &[SimPlatform],
    hazards: &[SimHazard],
    portal: &SimPortal,
    cfg: &CollisionConfig,
) -> Resolution {
    let landed_on = resolve_platforms(player, world_x, prev_y, platforms, cfg);
    let body = Rect::centered(Vec2::new(world_x, player.y), cfg.half_size);

    let outcome = if let Some((index, hazard)) = hazards
        .iter()
        .enumerate()
        .find(|(_, h)| !h.detonated && body.overlaps(&h.rect))
    {
        Outcome::Hazard {
            index,
            kind: hazard.kind,
        }
    } else if reached_portal(&body, portal, cfg.half_size) {
        Outcome::Goal
    } else if player.y > cfg.screen_height + cfg.fall_margin {
        Outcome::FellOut
    } else {
        Outcome::Clear
    };

    Resolution { landed_on, outcome }
}

fn resolve_platforms(
    player: &mut SimPlayer,
    world_x: f32,
    prev_y: f32,
    platforms: &[SimPlatform],
    cfg: &CollisionConfig,
) -> Option<usize> {
    let half = cfg.half_size;
    player.on_ground = false;
    player.support = None;

    for (index, platform) in platforms.iter().enumerate() {
        let top = platform.rect.y;
        // Top face is relaxed by the tolerance band; the other faces are exact.
        let colliding = world_x + half > platform.rect.x
            && world_x - half < platform.rect.right()
            && player.y + half > top - cfg.tolerance
            && player.y - half < platform.rect.bottom();
        if !colliding {
            continue;
        }

        let was_above = prev_y + half <= top + cfg.tolerance;
        if was_above {
            if player.vy >= 0.0 {
                player.y = top - half;
                player.vy = 0.0;
                player.is_jumping = false;
                player.is_floating = false;
                player.is_downstriking = false;
                player.downstrike_frames = 0;
                player.on_ground = true;
                player.support = Some(index);
                return Some(index);
            }
            // Rising through the tolerance band from above: no contact.
            continue;
        }

        player.y = platform.rect.bottom() + half;
        player.vy = player.vy.abs() * cfg.head_bump_bounce;
    }

    None
}

fn reached_portal(body: &Rect, portal: &SimPortal, half: f32) -> bool {
    match portal {
        SimPortal::Ring { center, radius } => body.center().distance(*center) < radius + half,
        SimPortal::FinishLine { rect } => body.overlaps(rect),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::level::Motion;
    use crate::domain::tuning::PlayerTuning;

    fn cfg() -> CollisionConfig {
        CollisionConfig {
            half_size: 15.0,
            tolerance: 5.0,
            head_bump_bounce: 0.5,
            screen_height: 600.0,
            fall_margin: 0.0,
        }
    }

    fn player_at(y: f32, vy: f32) -> SimPlayer {
        let mut p = SimPlayer::spawn(Vec2::new(100.0, y), &PlayerTuning::default());
        p.vy = vy;
        p
    }

    fn platform(x: f32, y: f32, width: f32) -> SimPlatform {
        SimPlatform {
            rect: Rect::new(x, y, width, 20.0),
            motion: Motion::Static,
            delta: Vec2::ZERO,
        }
    }

    fn hazard(x: f32, y: f32, kind: HazardKind) -> SimHazard {
        SimHazard {
            rect: Rect::new(x, y, 30.0, 30.0),
            kind,
            motion: Motion::Static,
            detonated: false,
        }
    }

    fn far_portal() -> SimPortal {
        SimPortal::Ring {
            center: Vec2::new(5000.0, 300.0),
            radius: 25.0,
        }
    }

    #[test]
    fn when_falling_onto_a_platform_then_player_snaps_to_top_with_zero_velocity() {
        for (prev_y, y, vy) in [(540.0, 552.0, 12.0), (549.0, 553.5, 4.5), (552.0, 552.5, 0.5)] {
            let mut player = player_at(y, vy);
            player.is_jumping = true;
            player.is_floating = true;
            player.is_downstriking = true;

            let res = resolve(
                &mut player,
                100.0,
                prev_y,
                &[platform(0.0, 565.0, 400.0)],
                &[],
                &far_portal(),
                &cfg(),
            );

            assert_eq!(res.landed_on, Some(0));
            assert_eq!(player.y, 550.0);
            assert_eq!(player.vy, 0.0);
            assert!(player.on_ground);
            assert!(!player.is_jumping && !player.is_floating && !player.is_downstriking);
        }
    }

    #[test]
    fn when_rising_into_a_platform_from_below_then_player_is_pushed_under_it_and_bounces() {
        let mut player = player_at(395.0, -10.0);

        let res = resolve(
            &mut player,
            100.0,
            405.0,
            &[platform(50.0, 370.0, 100.0)],
            &[],
            &far_portal(),
            &cfg(),
        );

        assert_eq!(res.landed_on, None);
        assert_eq!(player.y, 390.0 + 15.0);
        assert_eq!(player.vy, 5.0);
        assert!(!player.on_ground);
    }

    #[test]
    fn when_rising_through_the_tolerance_band_then_no_contact_is_made() {
        let mut player = player_at(548.0, -3.0);

        let res = resolve(
            &mut player,
            100.0,
            551.0,
            &[platform(0.0, 565.0, 400.0)],
            &[],
            &far_portal(),
            &cfg(),
        );

        assert_eq!(res.landed_on, None);
        assert_eq!(player.y, 548.0);
        assert_eq!(player.vy, -3.0);
    }

    #[test]
    fn when_two_platforms_qualify_then_the_first_declared_wins() {
        let mut player = player_at(552.0, 2.0);

        let res = resolve(
            &mut player,
            100.0,
            549.0,
            &[platform(80.0, 566.0, 50.0), platform(0.0, 565.0, 400.0)],
            &[],
            &far_portal(),
            &cfg(),
        );

        assert_eq!(res.landed_on, Some(0));
        assert_eq!(player.y, 551.0);
        assert_eq!(player.support, Some(0));
    }

    #[test]
    fn when_player_overlaps_hazard_and_portal_then_hazard_takes_precedence() {
        let mut player = player_at(300.0, 1.0);
        let portal = SimPortal::Ring {
            center: Vec2::new(110.0, 300.0),
            radius: 25.0,
        };

        let res = resolve(
            &mut player,
            100.0,
            299.0,
            &[],
            &[
                hazard(500.0, 290.0, HazardKind::Obstacle),
                hazard(90.0, 290.0, HazardKind::Bomb),
            ],
            &portal,
            &cfg(),
        );

        assert_eq!(
            res.outcome,
            Outcome::Hazard {
                index: 1,
                kind: HazardKind::Bomb
            }
        );
    }

    #[test]
    fn when_bomb_is_detonated_then_it_no_longer_collides() {
        let mut player = player_at(300.0, 1.0);
        let mut bomb = hazard(90.0, 290.0, HazardKind::Bomb);
        bomb.detonated = true;

        let res = resolve(&mut player, 100.0, 299.0, &[], &[bomb], &far_portal(), &cfg());

        assert_eq!(res.outcome, Outcome::Clear);
    }

    #[test]
    fn when_player_is_within_ring_radius_then_goal_is_reported() {
        let mut player = player_at(300.0, 0.0);
        let near = SimPortal::Ring {
            center: Vec2::new(139.0, 300.0),
            radius: 25.0,
        };
        let far = SimPortal::Ring {
            center: Vec2::new(141.0, 300.0),
            radius: 25.0,
        };

        let hit = resolve(&mut player, 100.0, 300.0, &[], &[], &near, &cfg());
        let miss = resolve(&mut player, 100.0, 300.0, &[], &[], &far, &cfg());

        assert_eq!(hit.outcome, Outcome::Goal);
        assert_eq!(miss.outcome, Outcome::Clear);
    }

    #[test]
    fn when_player_overlaps_finish_line_then_goal_is_reported() {
        let mut player = player_at(300.0, 0.0);
        let portal = SimPortal::FinishLine {
            rect: Rect::new(110.0, 200.0, 20.0, 200.0),
        };

        let res = resolve(&mut player, 100.0, 300.0, &[], &[], &portal, &cfg());

        assert_eq!(res.outcome, Outcome::Goal);
    }

    #[test]
    fn when_player_drops_below_the_screen_then_fell_out_is_reported() {
        let mut player = player_at(601.0, 8.0);

        let res = resolve(&mut player, 100.0, 593.0, &[], &[], &far_portal(), &cfg());

        assert_eq!(res.outcome, Outcome::FellOut);
    }

    #[test]
    fn when_landing_and_reaching_portal_in_same_tick_then_both_apply() {
        let mut player = player_at(552.0, 2.0);
        let portal = SimPortal::Ring {
            center: Vec2::new(100.0, 520.0),
            radius: 25.0,
        };

        let res = resolve(
            &mut player,
            100.0,
            549.0,
            &[platform(0.0, 565.0, 400.0)],
            &[],
            &portal,
            &cfg(),
        );

        assert_eq!(res.landed_on, Some(0));
        assert_eq!(res.outcome, Outcome::Goal);
    }
}
