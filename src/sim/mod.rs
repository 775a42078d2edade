//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (roster order, pilots by craft ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod driver;
pub mod geometry;
pub mod motion;
pub mod pilot;
pub mod sensor;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{bullet_hits_craft, bullet_hits_wall, resolve_craft_collisions};
pub use driver::{Match, MatchSummary, PlayerControl};
pub use geometry::{
    Rect, distance, rect_intersection_point, segment_intersection_point, segment_intersects_rect,
    segments_intersect,
};
pub use pilot::{ChasePilot, Pilot, PilotMode, ScanPilot};
pub use sensor::{clear_path, is_obstacle_ahead, laser_end, scan};
pub use spawn::{place_coins, sample_spawn};
pub use state::{
    Arena, Coin, Craft, CraftId, CraftSnapshot, GameEvent, GameState, Projectile, Role, Side,
    WorldSnapshot,
};
pub use tick::{Intent, TickInput, tick};
