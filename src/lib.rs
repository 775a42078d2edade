//! BotFighters - 2D arena combat simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, sensor, pilots)
//! - `tuning`: Data-driven game balance, injected at construction
//! - `error`: Failure taxonomy for spawning and configuration

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use tuning::Tuning;

use glam::Vec2;

/// Normalize a heading in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Fold an angle difference in degrees into (-180, 180]
#[inline]
pub fn shortest_turn(delta: f32) -> f32 {
    let d = normalize_degrees(delta);
    if d > 180.0 { d - 360.0 } else { d }
}

/// Unit vector for a heading in degrees (0 = +x, 90 = +y)
#[inline]
pub fn heading_vector(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Bearing in degrees from `from` toward `to`, in (-180, 180]
#[inline]
pub fn bearing_degrees(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x).to_degrees()
}
