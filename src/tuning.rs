//! Gameplay tuning
//!
//! Every balance constant the engine reads lives here. A `Tuning` is built
//! once (defaults, JSON string, or JSON file) and handed to the engine; it is
//! never mutated while a match runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::sim::state::Role;

/// Gameplay constants (distances in world units, times in ticks, angles in degrees)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Craft ===
    /// Per-tick velocity decay factor, in (0, 1)
    pub friction: f32,
    /// Velocity cap per axis for the player craft
    pub player_max_speed: f32,
    /// Velocity cap per axis for drone craft
    pub drone_max_speed: f32,
    /// Half the side of a craft's square bounding box
    pub craft_half_size: f32,
    /// Starting and respawn health
    pub craft_max_hp: i32,

    // === Projectiles ===
    /// Distance ahead of the nose where bullets spawn
    pub muzzle_offset: f32,
    pub bullet_speed: f32,
    /// Lifetime in ticks
    pub bullet_lifespan: i32,
    pub bullet_damage: i32,
    /// Half the side of a bullet's box (wall tests only)
    pub bullet_half_size: f32,
    /// Center distance below which a bullet hits a craft
    pub hit_radius: f32,

    // === Scoring & respawn ===
    pub kill_bonus: u32,
    /// Drones spawned to replace each destroyed drone
    pub respawn_count: u32,
    pub coin_score: u32,
    pub coin_count: u32,
    /// Coin bounding box (width, height)
    pub coin_size: (f32, f32),

    // === Spawning ===
    /// Distance from the world edge kept free of spawn points
    pub spawn_inset: f32,
    /// Draws before sampling gives up
    pub spawn_attempts: u32,

    // === Sensor ===
    /// Full laser range used for target detection
    pub sensor_range: f32,
    /// Short forward probe used for obstacle avoidance
    pub probe_range: f32,

    // === Scan agent ===
    /// Maximum rotation per tick while engaging
    pub agent_max_turn: f32,
    pub engage_thrust: f32,
    pub wander_turn: f32,
    pub wander_thrust: f32,
    /// Avoidance turn magnitude range (min, max)
    pub avoid_turn: (f32, f32),

    // === Chase drones ===
    /// Fraction of the bearing error corrected per tick
    pub chase_turn_gain: f32,
    pub chase_thrust: f32,
    /// Chance per tick of firing while the player is in sight
    pub chase_fire_chance: f64,
    /// Spacing between line-of-sight probes
    pub sight_step: f32,
    pub sight_probe_half: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            friction: 0.99,
            player_max_speed: 8.0,
            drone_max_speed: 3.0,
            craft_half_size: 10.0,
            craft_max_hp: 100,

            muzzle_offset: 15.0,
            bullet_speed: 15.0,
            bullet_lifespan: 60,
            bullet_damage: 10,
            bullet_half_size: 3.0,
            hit_radius: 15.0,

            kill_bonus: 10,
            respawn_count: 2,
            coin_score: 1,
            coin_count: 20,
            coin_size: (12.0, 16.0),

            spawn_inset: 20.0,
            spawn_attempts: 10_000,

            sensor_range: 1000.0,
            probe_range: 50.0,

            agent_max_turn: 40.0,
            engage_thrust: 0.5,
            wander_turn: 0.8,
            wander_thrust: 1.0,
            avoid_turn: (90.0, 180.0),

            chase_turn_gain: 0.1,
            chase_thrust: 0.3,
            chase_fire_chance: 0.02,
            sight_step: 10.0,
            sight_probe_half: 5.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; absent fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Velocity cap for a craft role
    pub fn max_speed(&self, role: Role) -> f32 {
        match role {
            Role::Player => self.player_max_speed,
            Role::Drone => self.drone_max_speed,
        }
    }

    /// Reject values that cannot describe a physical world
    pub fn validate(&self) -> Result<(), SimError> {
        fn invalid(field: &'static str, reason: &str) -> SimError {
            SimError::InvalidTuning {
                field,
                reason: reason.to_string(),
            }
        }

        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(invalid("friction", "must lie strictly between 0 and 1"));
        }
        let positive = [
            ("player_max_speed", self.player_max_speed),
            ("drone_max_speed", self.drone_max_speed),
            ("craft_half_size", self.craft_half_size),
            ("bullet_speed", self.bullet_speed),
            ("bullet_half_size", self.bullet_half_size),
            ("hit_radius", self.hit_radius),
            ("sensor_range", self.sensor_range),
            ("probe_range", self.probe_range),
            ("agent_max_turn", self.agent_max_turn),
            ("sight_step", self.sight_step),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(invalid(field, "must be positive"));
            }
        }
        if self.craft_max_hp <= 0 {
            return Err(invalid("craft_max_hp", "must be positive"));
        }
        if self.bullet_damage < 0 {
            return Err(invalid("bullet_damage", "must not be negative"));
        }
        let (coin_w, coin_h) = self.coin_size;
        if !(coin_w > 0.0 && coin_h > 0.0) {
            return Err(invalid("coin_size", "width and height must be positive"));
        }
        if self.bullet_lifespan <= 0 {
            return Err(invalid("bullet_lifespan", "must be positive"));
        }
        if self.spawn_attempts == 0 {
            return Err(invalid("spawn_attempts", "must allow at least one draw"));
        }
        if self.spawn_inset < 0.0 {
            return Err(invalid("spawn_inset", "must not be negative"));
        }
        let (lo, hi) = self.avoid_turn;
        if !(lo >= 0.0 && lo <= hi) {
            return Err(invalid("avoid_turn", "expected 0 <= min <= max"));
        }
        if !(0.0..=1.0).contains(&self.chase_fire_chance) {
            return Err(invalid("chase_fire_chance", "must be a probability"));
        }
        Ok(())
    }

    /// Reject a spawn inset that leaves no room inside `width x height`
    pub fn check_bounds(&self, width: f32, height: f32) -> Result<(), SimError> {
        if 2.0 * self.spawn_inset > width.min(height) {
            return Err(SimError::InvalidTuning {
                field: "spawn_inset",
                reason: format!("{} leaves no room inside {width}x{height}", self.spawn_inset),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json_str(r#"{ "bullet_damage": 25 }"#).unwrap();
        assert_eq!(tuning.bullet_damage, 25);
        assert_eq!(tuning.player_max_speed, 8.0);
        assert_eq!(tuning.respawn_count, 2);
    }

    #[test]
    fn test_rejects_bad_friction() {
        let err = Tuning::from_json_str(r#"{ "friction": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidTuning {
                field: "friction",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SimError::Json(_)));
    }

    #[test]
    fn test_rejects_healing_bullets() {
        let err = Tuning::from_json_str(r#"{ "bullet_damage": -5 }"#).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidTuning {
                field: "bullet_damage",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_empty_coin() {
        let err = Tuning::from_json_str(r#"{ "coin_size": [12.0, 0.0] }"#).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidTuning {
                field: "coin_size",
                ..
            }
        ));
    }

    #[test]
    fn test_inset_must_fit_bounds() {
        let tuning = Tuning::default();
        assert!(tuning.check_bounds(2000.0, 2000.0).is_ok());
        assert!(tuning.check_bounds(40.0, 500.0).is_ok());
        assert!(matches!(
            tuning.check_bounds(500.0, 30.0),
            Err(SimError::InvalidTuning {
                field: "spawn_inset",
                ..
            })
        ));
    }

    #[test]
    fn test_max_speed_by_role() {
        let tuning = Tuning::default();
        assert_eq!(tuning.max_speed(Role::Player), 8.0);
        assert_eq!(tuning.max_speed(Role::Drone), 3.0);
    }
}
