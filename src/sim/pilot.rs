//! Decision policies that turn a snapshot into an intent
//!
//! A pilot owns exactly one craft, reads the start-of-tick snapshot and
//! returns that craft's `Intent`. Pilots never touch `GameState`, so the
//! engine stays free of policy code and any pilot can be swapped for
//! another, or for direct input.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::geometry::Rect;
use super::sensor::{clear_path, is_obstacle_ahead, scan};
use super::state::{CraftId, CraftSnapshot, WorldSnapshot};
use super::tick::Intent;
use crate::tuning::Tuning;
use crate::{bearing_degrees, normalize_degrees, shortest_turn};

/// Chance per tick that a chase drone without sight picks a new heading
const DRIFT_TURN_CHANCE: f64 = 0.02;
/// Largest random drift turn, degrees either way
const DRIFT_TURN_MAX: i32 = 10;
const DRIFT_THRUST_CHANCE: f64 = 0.05;
const DRIFT_THRUST: f32 = 0.5;
/// Growth of the craft box when looking for nearby walls
const WALL_LOOKAHEAD: f32 = 30.0;
/// Steering nudge away from a nearby wall
const WALL_NUDGE: f32 = 3.0;

/// A decision policy for a single craft
pub trait Pilot {
    /// The craft this pilot flies
    fn craft(&self) -> CraftId;

    fn decide(&mut self, snapshot: &WorldSnapshot, walls: &[Rect]) -> Intent;
}

/// What the scan pilot did on its latest decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PilotMode {
    /// Own craft missing from the snapshot
    Idle,
    /// Target in sight: turning onto it and firing
    Engaging,
    /// Wall ahead: turning away without thrust
    Avoiding,
    /// Nothing to do: slow circle under full thrust
    Wandering,
}

/// The laser-sensor agent
///
/// Priority each tick: engage a visible target, else steer away from a wall
/// ahead, else wander.
#[derive(Debug, Clone)]
pub struct ScanPilot {
    craft: CraftId,
    tuning: Tuning,
    rng: Pcg32,
    /// Turn direction held while an avoidance maneuver continues
    avoid_sign: Option<f32>,
    mode: PilotMode,
}

impl ScanPilot {
    pub fn new(craft: CraftId, tuning: Tuning, seed: u64) -> Self {
        Self {
            craft,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            avoid_sign: None,
            mode: PilotMode::Wandering,
        }
    }

    pub fn mode(&self) -> PilotMode {
        self.mode
    }

    fn set_mode(&mut self, mode: PilotMode) {
        if mode != self.mode {
            log::debug!("Pilot for craft {}: {:?} -> {:?}", self.craft, self.mode, mode);
            self.mode = mode;
        }
        if mode != PilotMode::Avoiding {
            self.avoid_sign = None;
        }
    }
}

impl Pilot for ScanPilot {
    fn craft(&self) -> CraftId {
        self.craft
    }

    fn decide(&mut self, snapshot: &WorldSnapshot, walls: &[Rect]) -> Intent {
        let Some(me) = snapshot.craft(self.craft) else {
            self.set_mode(PilotMode::Idle);
            return Intent::idle();
        };
        let origin = me.pos();
        let heading = me.angle;

        let visible = snapshot
            .first_opponent(me.side())
            .map(|t| t.pos())
            .filter(|&t| scan(origin, heading, t, walls, self.tuning.sensor_range));

        if let Some(target) = visible {
            self.set_mode(PilotMode::Engaging);
            let max_turn = self.tuning.agent_max_turn;
            let delta = shortest_turn(bearing_degrees(origin, target) - heading);
            return Intent {
                rotate: delta.clamp(-max_turn, max_turn),
                thrust: self.tuning.engage_thrust,
                fire: true,
            };
        }

        if is_obstacle_ahead(origin, heading, walls, self.tuning.probe_range) {
            self.set_mode(PilotMode::Avoiding);
            let sign = match self.avoid_sign {
                Some(sign) => sign,
                None if self.rng.random_bool(0.5) => 1.0,
                None => -1.0,
            };
            self.avoid_sign = Some(sign);
            let (lo, hi) = self.tuning.avoid_turn;
            return Intent {
                rotate: sign * self.rng.random_range(lo..=hi),
                thrust: 0.0,
                fire: false,
            };
        }

        self.set_mode(PilotMode::Wandering);
        Intent {
            rotate: self.tuning.wander_turn,
            thrust: self.tuning.wander_thrust,
            fire: false,
        }
    }
}

/// Scripted drone: chase the player while in sight, drift otherwise
#[derive(Debug, Clone)]
pub struct ChasePilot {
    craft: CraftId,
    tuning: Tuning,
    rng: Pcg32,
}

impl ChasePilot {
    pub fn new(craft: CraftId, tuning: Tuning, seed: u64) -> Self {
        Self {
            craft,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Small turn away from the first wall within reach of the inflated box
    fn wall_nudge(&self, me: &CraftSnapshot, walls: &[Rect]) -> f32 {
        let reach = Rect::centered(me.pos(), self.tuning.craft_half_size)
            .inflate(WALL_LOOKAHEAD, WALL_LOOKAHEAD);
        match walls.iter().find(|w| reach.overlaps(w)) {
            Some(wall) => {
                let toward = normalize_degrees(bearing_degrees(me.pos(), wall.center()) - me.angle);
                if toward > 180.0 { WALL_NUDGE } else { -WALL_NUDGE }
            }
            None => 0.0,
        }
    }
}

impl Pilot for ChasePilot {
    fn craft(&self) -> CraftId {
        self.craft
    }

    fn decide(&mut self, snapshot: &WorldSnapshot, walls: &[Rect]) -> Intent {
        let Some(me) = snapshot.craft(self.craft) else {
            return Intent::idle();
        };
        let mut intent = Intent::idle();

        let player = snapshot.player().filter(|p| {
            clear_path(
                me.pos(),
                p.pos(),
                walls,
                self.tuning.sight_step,
                self.tuning.sight_probe_half,
            )
        });

        match player {
            Some(player) => {
                let delta = shortest_turn(bearing_degrees(me.pos(), player.pos()) - me.angle);
                intent.rotate = delta * self.tuning.chase_turn_gain;
                intent.thrust = self.tuning.chase_thrust;
                intent.fire = self.rng.random_bool(self.tuning.chase_fire_chance);
            }
            None => {
                if self.rng.random_bool(DRIFT_TURN_CHANCE) {
                    intent.rotate = self.rng.random_range(-DRIFT_TURN_MAX..=DRIFT_TURN_MAX) as f32;
                }
                if self.rng.random_bool(DRIFT_THRUST_CHANCE) {
                    intent.thrust = DRIFT_THRUST;
                }
            }
        }

        intent.rotate += self.wall_nudge(me, walls);
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{GameState, Role};
    use glam::Vec2;

    fn snapshot(crafts: &[(Role, Vec2, f32)]) -> WorldSnapshot {
        GameState::with_crafts(1, Tuning::default(), crafts.iter().copied()).snapshot()
    }

    #[test]
    fn test_engages_visible_target() {
        let snap = snapshot(&[
            (Role::Player, Vec2::new(100.0, 100.0), 0.0),
            (Role::Drone, Vec2::new(300.0, 300.0), 0.0),
        ]);
        let mut pilot = ScanPilot::new(1, Tuning::default(), 7);
        let intent = pilot.decide(&snap, &[]);
        assert_eq!(pilot.mode(), PilotMode::Engaging);
        assert!(intent.fire);
        assert_eq!(intent.thrust, 0.5);
        assert!((intent.rotate - 40.0).abs() < 1e-3, "bearing 45 clamped to 40");
    }

    #[test]
    fn test_small_bearing_not_clamped() {
        let snap = snapshot(&[
            (Role::Player, Vec2::new(0.0, 0.0), 350.0),
            (Role::Drone, Vec2::new(100.0, 0.0), 0.0),
        ]);
        let mut pilot = ScanPilot::new(1, Tuning::default(), 7);
        let intent = pilot.decide(&snap, &[]);
        assert!((intent.rotate - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_avoids_wall_ahead() {
        let walls = [Rect::new(40.0, -10.0, 20.0, 100.0)];
        let snap = snapshot(&[
            (Role::Player, Vec2::new(0.0, 0.0), 0.0),
            (Role::Drone, Vec2::new(100.0, 0.0), 0.0),
        ]);
        let mut pilot = ScanPilot::new(1, Tuning::default(), 7);
        let first = pilot.decide(&snap, &walls);
        assert_eq!(pilot.mode(), PilotMode::Avoiding);
        assert!(!first.fire);
        assert_eq!(first.thrust, 0.0);
        assert!((90.0..=180.0).contains(&first.rotate.abs()));

        // Same maneuver keeps turning the same way
        let second = pilot.decide(&snap, &walls);
        assert_eq!(first.rotate.signum(), second.rotate.signum());
    }

    #[test]
    fn test_wanders_without_target() {
        let snap = snapshot(&[(Role::Player, Vec2::new(500.0, 500.0), 0.0)]);
        let mut pilot = ScanPilot::new(1, Tuning::default(), 7);
        let intent = pilot.decide(&snap, &[]);
        assert_eq!(pilot.mode(), PilotMode::Wandering);
        assert_eq!(
            intent,
            Intent {
                rotate: 0.8,
                thrust: 1.0,
                fire: false
            }
        );
    }

    #[test]
    fn test_missing_craft_idles() {
        let snap = snapshot(&[(Role::Drone, Vec2::new(500.0, 500.0), 0.0)]);
        let mut pilot = ScanPilot::new(42, Tuning::default(), 7);
        assert_eq!(pilot.decide(&snap, &[]), Intent::idle());
        assert_eq!(pilot.mode(), PilotMode::Idle);
    }

    #[test]
    fn test_same_seed_same_decisions() {
        let walls = [Rect::new(40.0, -10.0, 20.0, 100.0)];
        let snap = snapshot(&[(Role::Player, Vec2::new(0.0, 0.0), 0.0)]);
        let mut a = ScanPilot::new(1, Tuning::default(), 99);
        let mut b = ScanPilot::new(1, Tuning::default(), 99);
        for _ in 0..10 {
            assert_eq!(a.decide(&snap, &walls), b.decide(&snap, &walls));
        }
    }

    #[test]
    fn test_chase_turns_toward_player() {
        let snap = snapshot(&[
            (Role::Player, Vec2::new(500.0, 600.0), 0.0),
            (Role::Drone, Vec2::new(500.0, 500.0), 0.0),
        ]);
        let mut pilot = ChasePilot::new(2, Tuning::default(), 3);
        let intent = pilot.decide(&snap, &[]);
        // Bearing 90, 10% per tick
        assert!((intent.rotate - 9.0).abs() < 1e-3);
        assert_eq!(intent.thrust, 0.3);
    }

    #[test]
    fn test_chase_blocked_sight_drifts() {
        let walls = [Rect::new(480.0, 540.0, 40.0, 20.0)];
        let snap = snapshot(&[
            (Role::Player, Vec2::new(500.0, 600.0), 0.0),
            (Role::Drone, Vec2::new(500.0, 500.0), 0.0),
        ]);
        let mut pilot = ChasePilot::new(2, Tuning::default(), 3);
        for _ in 0..50 {
            let intent = pilot.decide(&snap, &walls);
            assert!(!intent.fire);
            assert!(intent.thrust == 0.0 || intent.thrust == 0.5);
            assert!(intent.rotate.abs() <= 10.0);
        }
    }

    #[test]
    fn test_chase_nudged_off_nearby_wall() {
        // Wall just below a drone heading along +x: turn away (negative)
        let walls = [Rect::new(400.0, 520.0, 200.0, 20.0)];
        let snap = snapshot(&[(Role::Drone, Vec2::new(500.0, 500.0), 0.0)]);
        let mut pilot = ChasePilot::new(1, Tuning::default(), 3);
        let mut nudged = false;
        for _ in 0..20 {
            let intent = pilot.decide(&snap, &walls);
            if intent.rotate == -WALL_NUDGE {
                nudged = true;
            }
        }
        assert!(nudged);
    }
}
