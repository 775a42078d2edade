//! Match driver: pilots plus engine
//!
//! `Match` owns the engine state and one pilot per piloted craft. Each step
//! takes a snapshot, lets every pilot decide from it, merges the decisions
//! with any direct input and runs one tick. Drones spawned during the tick
//! get a chase pilot; pilots of destroyed craft are dropped.

use std::collections::BTreeMap;

use serde::Serialize;

use super::pilot::{ChasePilot, Pilot, ScanPilot};
use super::state::{Arena, CraftId, GameEvent, GameState, Role, WorldSnapshot};
use super::tick::{TickInput, tick};
use crate::error::SimError;
use crate::tuning::Tuning;

/// Who flies the player craft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerControl {
    /// Direct input only; the player idles without it
    Manual,
    /// The laser-sensor agent
    Agent,
}

/// End-of-run totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub ticks: u64,
    pub score: [u32; 2],
    pub player_alive: bool,
    pub crafts: usize,
}

pub struct Match {
    state: GameState,
    arena: Arena,
    /// Keyed by craft so pilots decide in a stable order
    pilots: BTreeMap<CraftId, Box<dyn Pilot>>,
}

impl Match {
    pub fn new(
        seed: u64,
        tuning: Tuning,
        arena: Arena,
        control: PlayerControl,
    ) -> Result<Self, SimError> {
        let state = GameState::new(seed, tuning, &arena)?;
        Ok(Self::from_state(state, arena, control))
    }

    /// Wrap an existing state, assigning pilots to the craft it already has
    pub fn from_state(state: GameState, arena: Arena, control: PlayerControl) -> Self {
        let mut m = Self {
            state,
            arena,
            pilots: BTreeMap::new(),
        };
        let roster: Vec<(CraftId, Role)> = m.state.crafts.iter().map(|c| (c.id, c.role)).collect();
        for (id, role) in roster {
            match role {
                Role::Drone => m.assign_chase_pilot(id),
                Role::Player if control == PlayerControl::Agent => {
                    let pilot = ScanPilot::new(id, m.state.tuning.clone(), m.pilot_seed(id));
                    m.set_pilot(Box::new(pilot));
                }
                Role::Player => {}
            }
        }
        m
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.state.snapshot()
    }

    pub fn is_over(&self) -> bool {
        !self.state.player_alive
    }

    /// Install or replace the pilot for `pilot.craft()`
    pub fn set_pilot(&mut self, pilot: Box<dyn Pilot>) {
        self.pilots.insert(pilot.craft(), pilot);
    }

    /// Run one tick; direct input wins over a pilot for the same craft
    ///
    /// A failed tick leaves the engine state unchanged.
    pub fn step(&mut self, direct: &TickInput) -> Result<&[GameEvent], SimError> {
        let snapshot = self.state.snapshot();
        let mut input = direct.clone();
        for (&id, pilot) in self.pilots.iter_mut() {
            if !input.intents.contains_key(&id) {
                input.set(id, pilot.decide(&snapshot, &self.arena.walls));
            }
        }

        tick(&mut self.state, &self.arena, &input)?;

        let events = self.state.events.clone();
        for event in &events {
            match *event {
                GameEvent::DroneSpawned { id } => self.assign_chase_pilot(id),
                GameEvent::CraftDestroyed { id, .. } => {
                    self.pilots.remove(&id);
                }
                _ => {}
            }
        }
        Ok(&self.state.events)
    }

    /// Step until `max_ticks` or player loss, calling `observe` after each tick
    pub fn run(
        &mut self,
        max_ticks: u64,
        mut observe: impl FnMut(&WorldSnapshot),
    ) -> Result<MatchSummary, SimError> {
        let idle = TickInput::new();
        for _ in 0..max_ticks {
            if self.is_over() {
                break;
            }
            self.step(&idle)?;
            observe(&self.state.snapshot());
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            ticks: self.state.time_ticks,
            score: self.state.score,
            player_alive: self.state.player_alive,
            crafts: self.state.crafts.len(),
        }
    }

    fn assign_chase_pilot(&mut self, id: CraftId) {
        let pilot = ChasePilot::new(id, self.state.tuning.clone(), self.pilot_seed(id));
        self.set_pilot(Box::new(pilot));
    }

    /// Per-craft pilot seed derived from the match seed
    fn pilot_seed(&self, id: CraftId) -> u64 {
        self.state
            .seed
            .wrapping_add(u64::from(id).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}
