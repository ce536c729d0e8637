use crate::domain::geometry::{Rect, Vec2};
use crate::domain::level::{Axis, CircularMotion, LinearMotion, Motion, PathMotion};
use std::f32::consts::TAU;

// Below this distance a path target counts as reached.
const ARRIVAL_EPSILON: f32 = 1e-4;

/// Places a freshly instantiated body on its motion locus.
pub fn settle(rect: &mut Rect, motion: &Motion) {
    match motion {
        Motion::Static | Motion::Path(_) => {}
        Motion::Linear(m) => {
            let pos = axis_value(rect, m.axis).clamp(m.min, m.max);
            set_axis_value(rect, m.axis, pos);
        }
        Motion::Circular(m) => place_on_circle(rect, m),
    }
}

/// Advances one tick and returns the body's displacement.
pub fn step(rect: &mut Rect, motion: &mut Motion) -> Vec2 {
    let before = rect.origin();
    match motion {
        Motion::Static => {}
        Motion::Linear(m) => step_linear(rect, m),
        Motion::Circular(m) => {
            m.angle = (m.angle + m.angular_speed).rem_euclid(TAU);
            place_on_circle(rect, m);
        }
        Motion::Path(m) => step_path(rect, m),
    }
    rect.origin() - before
}

fn step_linear(rect: &mut Rect, m: &mut LinearMotion) {
    let mut next = axis_value(rect, m.axis) + m.speed * m.direction;
    if next >= m.max {
        next = m.max;
        m.direction = -1.0;
    } else if next <= m.min {
        next = m.min;
        m.direction = 1.0;
    }
    set_axis_value(rect, m.axis, next);
}

fn place_on_circle(rect: &mut Rect, m: &CircularMotion) {
    let center = m.center + Vec2::new(m.angle.cos(), m.angle.sin()) * m.radius;
    rect.set_origin(center - rect.half_extent());
}

fn step_path(rect: &mut Rect, m: &mut PathMotion) {
    let len = m.waypoints.len();
    if len == 0 {
        return;
    }
    let target = m.waypoints[m.next % len];
    let to_target = target - rect.origin();
    let distance = to_target.length();

    if distance < m.speed || distance < ARRIVAL_EPSILON {
        rect.set_origin(target);
        m.current = m.next % len;
        m.next = (m.current + 1) % len;
    } else {
        rect.set_origin(rect.origin() + to_target * (m.speed / distance));
    }
}

fn axis_value(rect: &Rect, axis: Axis) -> f32 {
    match axis {
        Axis::Horizontal => rect.x,
        Axis::Vertical => rect.y,
    }
}

fn set_axis_value(rect: &mut Rect, axis: Axis, value: f32) {
    match axis {
        Axis::Horizontal => rect.x = value,
        Axis::Vertical => rect.y = value,
    }
}
