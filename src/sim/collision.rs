//! Collision detection and response
//!
//! All balls share one mass, so a ball-ball hit is an exchange of the
//! velocity components along the line of centers.

use glam::Vec2;

use super::geometry::TableGeometry;
use super::state::Ball;

/// Contact between two overlapping balls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal from the first ball's center toward the second's
    pub normal: Vec2,
    /// How far the balls overlap along the normal
    pub penetration: f32,
}

/// Advance one ball by one unit timestep and apply rolling friction.
///
/// Velocity below `min_speed` snaps to exactly zero.
#[inline]
pub fn integrate(ball: &mut Ball, friction: f32, min_speed: f32) {
    ball.pos += ball.vel;
    ball.vel *= friction;
    if ball.vel.length() < min_speed {
        ball.vel = Vec2::ZERO;
    }
}

/// Keep a ball inside the cushions.
///
/// Each axis that had to be clamped has its velocity component inverted and
/// scaled by `restitution`. Returns whether any cushion was hit.
pub fn resolve_wall(ball: &mut Ball, table: &TableGeometry, restitution: f32) -> bool {
    let (min, max) = table.center_bounds(ball.radius);
    let mut hit = false;

    if ball.pos.x < min.x || ball.pos.x > max.x {
        ball.vel.x *= -restitution;
        ball.pos.x = ball.pos.x.clamp(min.x, max.x);
        hit = true;
    }
    if ball.pos.y < min.y || ball.pos.y > max.y {
        ball.vel.y *= -restitution;
        ball.pos.y = ball.pos.y.clamp(min.y, max.y);
        hit = true;
    }

    hit
}

/// Check two ball centers for overlap.
///
/// Coincident centers have no usable normal and report no contact.
pub fn ball_contact(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> Option<Contact> {
    let delta = b_pos - a_pos;
    let dist = delta.length();
    let min_dist = a_radius + b_radius;

    if dist > 0.0 && dist < min_dist {
        Some(Contact {
            normal: delta / dist,
            penetration: min_dist - dist,
        })
    } else {
        None
    }
}

/// Separate an overlapping pair until tangent and exchange their normal
/// velocity components. Tangential components are untouched.
pub fn resolve_ball_pair(a: &mut Ball, b: &mut Ball) -> bool {
    let Some(contact) = ball_contact(a.pos, a.radius, b.pos, b.radius) else {
        return false;
    };
    let n = contact.normal;

    let correction = n * (contact.penetration / 2.0);
    a.pos -= correction;
    b.pos += correction;

    let va = a.vel.dot(n);
    let vb = b.vel.dot(n);
    let diff = va - vb;
    a.vel -= n * diff;
    b.vel += n * diff;

    true
}
