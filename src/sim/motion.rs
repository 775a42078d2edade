//! Per-tick motion for craft and projectiles
//!
//! Units are per tick: velocities are added to positions once per tick with
//! no timestep scaling.

use glam::Vec2;

use super::state::{Arena, Craft, Projectile};
use crate::tuning::Tuning;
use crate::normalize_degrees;

/// Decay, clamp and integrate a craft's velocity, then clamp it into bounds
pub fn integrate(craft: &mut Craft, max_speed: f32, friction: f32, arena: &Arena) {
    craft.vel *= friction;
    craft.vel = craft
        .vel
        .clamp(Vec2::splat(-max_speed), Vec2::splat(max_speed));
    craft.pos += craft.vel;
    clamp_to_bounds(craft, arena);
}

/// Keep a craft's center inside `[0, width] x [0, height]`
pub fn clamp_to_bounds(craft: &mut Craft, arena: &Arena) {
    craft.pos = craft
        .pos
        .clamp(Vec2::ZERO, Vec2::new(arena.width, arena.height));
}

/// Push along the nose: `vel += amount * (cos, sin)(heading)`
pub fn apply_thrust(craft: &mut Craft, amount: f32) {
    craft.vel += craft.forward() * amount;
}

/// Turn by `degrees`, keeping the heading in [0, 360)
pub fn rotate(craft: &mut Craft, degrees: f32) {
    craft.heading = normalize_degrees(craft.heading + degrees);
}

/// Build a bullet just ahead of the craft's nose, moving along its heading
pub fn fire(craft: &Craft, id: u32, tuning: &Tuning) -> Projectile {
    let dir = craft.forward();
    Projectile {
        id,
        owner: craft.id,
        pos: craft.pos + dir * tuning.muzzle_offset,
        vel: dir * tuning.bullet_speed,
        heading: craft.heading,
        lifespan: tuning.bullet_lifespan,
    }
}

/// Move a bullet one tick and burn one tick of lifetime
pub fn advance_projectile(p: &mut Projectile) {
    p.pos += p.vel;
    p.lifespan -= 1;
}
