//! Fixed timestep simulation tick
//!
//! One call advances the match by exactly one tick: intents, craft motion,
//! craft collisions, pickups, projectiles, then deaths and respawns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::collision::{bullet_hits_craft, bullet_hits_wall, resolve_craft_collisions};
use super::geometry::Rect;
use super::motion;
use super::state::{Arena, CraftId, GameEvent, GameState, Role, Side};
use crate::error::SimError;

/// What a craft wants to do this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Degrees to turn, positive is clockwise on screen
    pub rotate: f32,
    pub thrust: f32,
    pub fire: bool,
}

impl Intent {
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Input commands for a single tick (deterministic)
///
/// Craft without an entry idle for the tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub intents: HashMap<CraftId, Intent>,
}

impl TickInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, craft: CraftId, intent: Intent) {
        self.intents.insert(craft, intent);
    }

    pub fn intent(&self, craft: CraftId) -> Intent {
        self.intents.get(&craft).copied().unwrap_or_default()
    }
}

impl FromIterator<(CraftId, Intent)> for TickInput {
    fn from_iter<I: IntoIterator<Item = (CraftId, Intent)>>(iter: I) -> Self {
        Self {
            intents: iter.into_iter().collect(),
        }
    }
}

/// Advance the game state by one fixed timestep
///
/// Only fails when a replacement drone cannot be placed. The tick runs on a
/// working copy that replaces `state` on success, so a failed tick leaves
/// `state` exactly as it was.
pub fn tick(state: &mut GameState, arena: &Arena, input: &TickInput) -> Result<(), SimError> {
    let mut next = state.clone();
    next.events.clear();

    apply_intents(&mut next, input);
    move_crafts(&mut next, arena);
    collect_coins(&mut next);
    update_projectiles(&mut next, arena);
    remove_dead_crafts(&mut next, arena)?;

    next.time_ticks += 1;
    *state = next;
    Ok(())
}

/// Rotate, thrust and fire, in roster order
fn apply_intents(state: &mut GameState, input: &TickInput) {
    for i in 0..state.crafts.len() {
        let intent = input.intent(state.crafts[i].id);
        let craft = &mut state.crafts[i];
        motion::rotate(craft, intent.rotate);
        motion::apply_thrust(craft, intent.thrust);

        if intent.fire {
            let id = state.next_entity_id();
            let projectile = motion::fire(&state.crafts[i], id, &state.tuning);
            state.projectiles.push(projectile);
        }
    }
}

fn move_crafts(state: &mut GameState, arena: &Arena) {
    let friction = state.tuning.friction;
    let half = state.tuning.craft_half_size;

    for craft in &mut state.crafts {
        let max_speed = state.tuning.max_speed(craft.role);
        motion::integrate(craft, max_speed, friction, arena);
    }

    // Sequential: each craft sees the already-corrected boxes of earlier ones
    for i in 0..state.crafts.len() {
        let others: Vec<Rect> = state
            .crafts
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, c)| c.bounds(half))
            .collect();
        let craft = &mut state.crafts[i];
        resolve_craft_collisions(craft, half, &arena.walls, &others);
        motion::clamp_to_bounds(craft, arena);
    }
}

fn collect_coins(state: &mut GameState) {
    let half = state.tuning.craft_half_size;
    let size = state.tuning.coin_size;
    let mut coins = std::mem::take(&mut state.coins);

    coins.retain(|coin| {
        let bounds = coin.bounds(size);
        let Some(collector) = state.crafts.iter().find(|c| c.bounds(half).overlaps(&bounds)) else {
            return true;
        };
        state.score[collector.role.side().index()] += state.tuning.coin_score;
        state.events.push(GameEvent::CoinCollected {
            coin: coin.id,
            craft: collector.id,
        });
        log::debug!("Craft {} collected coin {}", collector.id, coin.id);
        false
    });

    state.coins = coins;
}

fn update_projectiles(state: &mut GameState, arena: &Arena) {
    let bullet_half = state.tuning.bullet_half_size;
    let hit_radius = state.tuning.hit_radius;
    let mut projectiles = std::mem::take(&mut state.projectiles);

    projectiles.retain_mut(|p| {
        motion::advance_projectile(p);

        if bullet_hits_wall(p.pos, bullet_half, &arena.walls) {
            return false;
        }
        if let Some(target) = bullet_hits_craft(p, &state.crafts, hit_radius) {
            apply_hit(state, target, p.owner);
            return false;
        }
        p.lifespan > 0 && arena.contains(p.pos)
    });

    state.projectiles = projectiles;
}

/// Damage a craft; score the kill when this hit takes it to zero
fn apply_hit(state: &mut GameState, target: CraftId, shooter: CraftId) {
    let damage = state.tuning.bullet_damage;
    let kill_bonus = state.tuning.kill_bonus;
    let Some(craft) = state.craft_mut(target) else {
        return;
    };
    let was_alive = craft.is_alive();
    craft.hp = (craft.hp - damage).max(0);
    let (hp, role) = (craft.hp, craft.role);

    log::debug!("Craft {} hit by {}, hp now {}", target, shooter, hp);
    state.events.push(GameEvent::CraftHit {
        target,
        shooter,
        hp,
    });

    if was_alive && hp == 0 {
        if role == Role::Drone {
            state.score[Side::Player.index()] += kill_bonus;
        }
        log::info!("{:?} {} destroyed by craft {}", role, target, shooter);
        state.events.push(GameEvent::CraftDestroyed {
            id: target,
            role,
            shooter,
        });
    }
}

/// Drop destroyed craft, replace drones and flag player loss
fn remove_dead_crafts(state: &mut GameState, arena: &Arena) -> Result<(), SimError> {
    let dead: Vec<(CraftId, Role)> = state
        .crafts
        .iter()
        .filter(|c| !c.is_alive())
        .map(|c| (c.id, c.role))
        .collect();
    if dead.is_empty() {
        return Ok(());
    }
    state.crafts.retain(|c| c.is_alive());

    for (id, role) in dead {
        match role {
            Role::Player => {
                state.player_alive = false;
                state.events.push(GameEvent::PlayerDown { id });
                log::info!(
                    "Player craft {} lost at tick {}, score {:?}",
                    id,
                    state.time_ticks,
                    state.score
                );
            }
            Role::Drone => {
                for _ in 0..state.tuning.respawn_count {
                    let spawned = state.spawn_craft(Role::Drone, arena)?;
                    state.events.push(GameEvent::DroneSpawned { id: spawned });
                }
                log::info!(
                    "Drone {} replaced by {} new drones ({} craft active)",
                    id,
                    state.tuning.respawn_count,
                    state.crafts.len()
                );
            }
        }
    }
    Ok(())
}
