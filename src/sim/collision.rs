//! Collision detection and response for axis-aligned boxes
//!
//! Craft response is positional: an overlapping craft is pushed to the near
//! side of the obstacle and loses its velocity along that axis. There is no
//! impulse and no swept test, so fast bullets may tunnel through thin walls.

use glam::Vec2;

use super::geometry::{Rect, distance};
use super::state::{Craft, CraftId, Projectile};

/// Push a craft out of every rectangle its box overlaps
///
/// The craft box is taken once, before any correction. Each overlapping
/// rectangle then corrects x and y independently against the craft's current
/// center, so a later rectangle may overwrite an earlier correction. Walls go
/// first, then the boxes of the other craft.
pub fn resolve_craft_collisions(craft: &mut Craft, half_size: f32, walls: &[Rect], others: &[Rect]) {
    let bounds = craft.bounds(half_size);
    for obstacle in walls.iter().chain(others) {
        if !bounds.overlaps(obstacle) {
            continue;
        }

        if craft.pos.x < obstacle.x {
            craft.pos.x = obstacle.x - half_size;
            craft.vel.x = 0.0;
        } else if craft.pos.x > obstacle.right() {
            craft.pos.x = obstacle.right() + half_size;
            craft.vel.x = 0.0;
        }

        if craft.pos.y < obstacle.y {
            craft.pos.y = obstacle.y - half_size;
            craft.vel.y = 0.0;
        } else if craft.pos.y > obstacle.bottom() {
            craft.pos.y = obstacle.bottom() + half_size;
            craft.vel.y = 0.0;
        }
    }
}

/// Whether a bullet's box overlaps any wall
pub fn bullet_hits_wall(pos: Vec2, half_size: f32, walls: &[Rect]) -> bool {
    let bounds = Rect::centered(pos, half_size);
    walls.iter().any(|w| bounds.overlaps(w))
}

/// First live craft, other than the shooter, within `hit_radius` of the bullet
pub fn bullet_hits_craft(p: &Projectile, crafts: &[Craft], hit_radius: f32) -> Option<CraftId> {
    crafts
        .iter()
        .filter(|c| c.id != p.owner && c.is_alive())
        .find(|c| distance(p.pos, c.pos) < hit_radius)
        .map(|c| c.id)
}
