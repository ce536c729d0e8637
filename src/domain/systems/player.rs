use crate::domain::state::{SimPlatform, SimPlayer};
use crate::domain::systems::control::Intent;
use crate::domain::tuning::PlayerTuning;

/// Applies this tick's intent. Per-tick inputs are rewritten; mode flags persist.
pub fn apply_intent(player: &mut SimPlayer, intent: Intent, tuning: &PlayerTuning, time_factor: f32) {
    player.accelerating = false;
    player.decelerating = false;
    player.steer = None;
    player.antigravity = 0.0;
    player.is_floating = false;

    match intent {
        Intent::None => {}
        Intent::Accelerate => player.accelerating = true,
        Intent::Decelerate => player.decelerating = true,
        Intent::Jump => try_jump(player, tuning, time_factor),
        Intent::Float => player.is_floating = !player.is_downstriking,
        Intent::Dash => {
            if !player.is_dashing && !player.is_downstriking {
                player.is_dashing = true;
                player.dash_frames = 0;
            }
        }
        Intent::Downstrike => {
            player.is_downstriking = true;
            player.downstrike_frames = 0;
            player.vy = tuning.downstrike_force * time_factor;
            player.is_dashing = false;
            player.dash_frames = 0;
        }
        Intent::Steer {
            horizontal,
            antigravity,
        } => {
            player.steer = Some(horizontal);
            player.antigravity = antigravity.max(0.0);
        }
    }
}

fn try_jump(player: &mut SimPlayer, tuning: &PlayerTuning, time_factor: f32) {
    if !player.on_ground && player.vy.abs() >= tuning.jump_epsilon {
        return;
    }
    player.vy = tuning.jump_force * time_factor;
    player.is_jumping = true;
    player.is_floating = false;
    player.is_downstriking = false;
    player.on_ground = false;
    player.support = None;
}

/// Moves `speed` toward the held intent, or back toward base speed.
pub fn update_speed(player: &mut SimPlayer, tuning: &PlayerTuning) {
    let base = tuning.base_speed;
    player.speed = if player.accelerating {
        player.speed + tuning.acceleration
    } else if player.decelerating {
        player.speed - tuning.deceleration
    } else if player.speed > base {
        (player.speed - tuning.recovery_rate).max(base)
    } else {
        (player.speed + tuning.recovery_rate).min(base)
    }
    .clamp(tuning.min_speed, tuning.max_speed);
}

/// Horizontal velocity that drives the scroll this tick. Dash and downstrike override it
/// without touching `speed`.
pub fn travel_velocity(player: &SimPlayer, tuning: &PlayerTuning) -> f32 {
    if player.is_frozen || player.is_downstriking {
        0.0
    } else if player.is_dashing {
        tuning.dash_speed
    } else if let Some(horizontal) = player.steer {
        horizontal
    } else {
        player.speed
    }
}

/// Moves the player with the platform it stood on last tick.
pub fn carry(player: &mut SimPlayer, platforms: &[SimPlatform], min_x: f32, max_x: f32) {
    let Some(platform) = player.support.and_then(|index| platforms.get(index)) else {
        return;
    };
    player.x = (player.x + platform.delta.x).clamp(min_x, max_x);
    if player.on_ground {
        player.y += platform.delta.y;
    }
}

/// Antigravity, gravity, then glide damping or the fall cap.
pub fn apply_gravity(player: &mut SimPlayer, tuning: &PlayerTuning, time_factor: f32) {
    if player.is_frozen {
        return;
    }
    let antigravity = player.antigravity;
    if antigravity > 0.0 {
        player.vy = (player.vy - antigravity).max(-2.0 * antigravity);
    }

    player.vy += tuning.gravity * time_factor;

    if player.is_downstriking {
        return;
    }
    if player.is_floating && player.vy > 0.0 {
        player.vy = (player.vy * tuning.slow_fall_damping).min(tuning.slow_fall_speed * time_factor);
    } else {
        player.vy = player.vy.min(tuning.max_fall_speed * time_factor);
    }
}

pub fn integrate(player: &mut SimPlayer) {
    if !player.is_frozen {
        player.y += player.vy;
    }
}

/// Counts down dash and downstrike. A finished dash returns to base speed.
pub fn tick_timers(player: &mut SimPlayer, tuning: &PlayerTuning) {
    if player.is_dashing {
        player.dash_frames += 1;
        if player.dash_frames >= tuning.dash_duration {
            player.is_dashing = false;
            player.dash_frames = 0;
            player.speed = tuning.base_speed;
        }
    }
    if player.is_downstriking {
        player.downstrike_frames += 1;
        if player.downstrike_frames >= tuning.downstrike_duration {
            player.is_downstriking = false;
            player.downstrike_frames = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::{Rect, Vec2};
    use crate::domain::level::Motion;

    fn tuning() -> PlayerTuning {
        PlayerTuning::default()
    }

    fn grounded() -> SimPlayer {
        let mut p = SimPlayer::spawn(Vec2::new(100.0, 550.0), &tuning());
        p.on_ground = true;
        p.support = Some(0);
        p
    }

    #[test]
    fn when_any_intent_sequence_runs_then_speed_stays_within_bounds() {
        let t = tuning();
        let mut player = grounded();
        let pattern = [
            Intent::Accelerate,
            Intent::Accelerate,
            Intent::None,
            Intent::Decelerate,
            Intent::Dash,
            Intent::Downstrike,
        ];

        for i in 0..2000 {
            let intent = if i < 300 {
                Intent::Accelerate
            } else if i < 600 {
                Intent::Decelerate
            } else {
                pattern[i % pattern.len()]
            };
            apply_intent(&mut player, intent, &t, 1.0);
            update_speed(&mut player, &t);
            assert!(
                (t.min_speed..=t.max_speed).contains(&player.speed),
                "speed {}",
                player.speed
            );
            tick_timers(&mut player, &t);
        }
    }

    #[test]
    fn when_no_speed_intent_is_held_then_speed_recovers_toward_base() {
        let t = tuning();
        let mut player = grounded();
        player.speed = 4.1;

        apply_intent(&mut player, Intent::None, &t, 1.0);
        update_speed(&mut player, &t);
        assert!((player.speed - 4.06).abs() < 1e-5);

        for _ in 0..10 {
            update_speed(&mut player, &t);
        }
        assert_eq!(player.speed, 4.0);
    }

    #[test]
    fn when_airborne_with_jump_epsilon_zero_then_jump_is_refused() {
        let t = tuning();
        let mut player = grounded();
        player.on_ground = false;
        player.vy = 0.0;

        apply_intent(&mut player, Intent::Jump, &t, 1.0);

        assert_eq!(player.vy, 0.0);
        assert!(!player.is_jumping);
    }

    #[test]
    fn when_jump_epsilon_allows_apex_jumps_then_near_zero_vy_can_jump() {
        let t = PlayerTuning {
            jump_epsilon: 0.1,
            ..tuning()
        };
        let mut player = grounded();
        player.on_ground = false;
        player.vy = 0.05;

        apply_intent(&mut player, Intent::Jump, &t, 1.0);

        assert_eq!(player.vy, -12.0);
    }

    #[test]
    fn when_jumping_then_float_and_downstrike_are_cleared() {
        let t = tuning();
        let mut player = grounded();
        player.is_downstriking = true;

        apply_intent(&mut player, Intent::Jump, &t, 1.0);

        assert!(player.is_jumping);
        assert!(!player.is_floating && !player.is_downstriking && !player.on_ground);
    }

    #[test]
    fn when_floating_while_falling_then_descent_is_capped_and_never_upward() {
        let t = tuning();
        let mut player = grounded();
        player.on_ground = false;
        player.vy = 7.0;

        for _ in 0..50 {
            apply_intent(&mut player, Intent::Float, &t, 1.0);
            apply_gravity(&mut player, &t, 1.0);
            assert!(player.vy > 0.0);
            assert!(player.vy <= t.slow_fall_speed);
        }
    }

    #[test]
    fn when_falling_normally_then_velocity_is_capped() {
        let t = tuning();
        let mut player = grounded();
        player.vy = 7.9;

        apply_gravity(&mut player, &t, 1.0);

        assert_eq!(player.vy, t.max_fall_speed);
    }

    #[test]
    fn when_downstriking_then_fall_cap_is_lifted_and_travel_stops() {
        let t = tuning();
        let mut player = grounded();
        player.on_ground = false;

        apply_intent(&mut player, Intent::Downstrike, &t, 1.0);
        apply_gravity(&mut player, &t, 1.0);

        assert_eq!(player.vy, 25.5);
        assert_eq!(travel_velocity(&player, &t), 0.0);
        assert_eq!(player.speed, t.base_speed);
    }

    #[test]
    fn when_dash_runs_its_duration_then_travel_returns_to_base_speed() {
        let t = tuning();
        let mut player = grounded();
        player.speed = 7.0;

        apply_intent(&mut player, Intent::Dash, &t, 1.0);
        for _ in 0..t.dash_duration {
            assert_eq!(travel_velocity(&player, &t), t.dash_speed);
            tick_timers(&mut player, &t);
        }

        assert!(!player.is_dashing);
        assert_eq!(travel_velocity(&player, &t), t.base_speed);
    }

    #[test]
    fn when_antigravity_exceeds_gravity_then_rise_is_capped_at_twice_the_force() {
        let t = tuning();
        let mut player = grounded();
        player.on_ground = false;

        for _ in 0..100 {
            apply_intent(
                &mut player,
                Intent::Steer {
                    horizontal: -2.0,
                    antigravity: 2.5,
                },
                &t,
                1.0,
            );
            apply_gravity(&mut player, &t, 1.0);
            assert!(player.vy >= -5.0 + t.gravity - 1e-5);
        }

        assert!(player.vy < 0.0);
        assert_eq!(travel_velocity(&player, &t), -2.0);
    }

    #[test]
    fn when_standing_on_a_moving_platform_then_its_delta_carries_the_player() {
        let mut player = grounded();
        let platforms = [SimPlatform {
            rect: Rect::new(50.0, 565.0, 100.0, 20.0),
            motion: Motion::Static,
            delta: Vec2::new(1.5, -2.0),
        }];

        carry(&mut player, &platforms, 15.0, 785.0);
        assert_eq!((player.x, player.y), (101.5, 548.0));

        player.on_ground = false;
        carry(&mut player, &platforms, 15.0, 785.0);
        assert_eq!((player.x, player.y), (103.0, 548.0));
    }
}
