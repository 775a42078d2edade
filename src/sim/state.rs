//! Game state and core simulation types
//!
//! `GameState` is the live engine: it owns every roster and the RNG and is
//! only mutated inside `tick`. Everything that leaves the engine goes through
//! `WorldSnapshot`, a plain copy.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::spawn::{place_coins, sample_spawn};
use crate::error::SimError;
use crate::tuning::Tuning;
use crate::{heading_vector, normalize_degrees};

/// Stable identity of a craft; projectiles carry their shooter's id
pub type CraftId = u32;

/// Who controls a craft and which rules apply to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The human- or agent-piloted craft; no respawn
    Player,
    /// Non-player craft; replaced on death
    Drone,
}

impl Role {
    pub fn side(self) -> Side {
        match self {
            Role::Player => Side::Player,
            Role::Drone => Side::Drones,
        }
    }
}

/// Scoring side, used as the index into `score`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player = 0,
    Drones = 1,
}

impl Side {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Drones,
            Side::Drones => Side::Player,
        }
    }
}

/// A maneuverable craft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Craft {
    pub id: CraftId,
    pub role: Role,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in degrees, [0, 360)
    pub heading: f32,
    pub hp: i32,
}

impl Craft {
    pub fn new(id: CraftId, role: Role, pos: Vec2, heading: f32, hp: i32) -> Self {
        Self {
            id,
            role,
            pos,
            vel: Vec2::ZERO,
            heading: normalize_degrees(heading),
            hp,
        }
    }

    /// Square bounding box used for walls, other craft and coins
    pub fn bounds(&self, half_size: f32) -> Rect {
        Rect::centered(self.pos, half_size)
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Unit vector along the craft's nose
    pub fn forward(&self) -> Vec2 {
        heading_vector(self.heading)
    }
}

/// A bullet in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub owner: CraftId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading at launch, degrees
    pub heading: f32,
    /// Remaining lifetime in ticks
    pub lifespan: i32,
}

/// A collectible coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub pos: Vec2,
}

impl Coin {
    /// Coin box: `size` wide and tall, centered on the coin
    pub fn bounds(&self, size: (f32, f32)) -> Rect {
        let (w, h) = size;
        Rect::new(self.pos.x - w / 2.0, self.pos.y - h / 2.0, w, h)
    }
}

/// World bounds and static obstacles
///
/// Owned by the caller and borrowed into every tick; the engine never
/// modifies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub walls: Vec<Rect>,
}

impl Arena {
    pub fn new(width: f32, height: f32, walls: Vec<Rect>) -> Self {
        Self {
            width,
            height,
            walls,
        }
    }

    /// Empty arena with the given bounds
    pub fn open(width: f32, height: f32) -> Self {
        Self::new(width, height, Vec::new())
    }

    /// The 2000x2000 labyrinth: outer walls, corridors and dead ends
    pub fn labyrinth() -> Self {
        let walls = vec![
            // Outer walls
            Rect::new(50.0, 50.0, 1900.0, 20.0),
            Rect::new(50.0, 50.0, 20.0, 1900.0),
            Rect::new(50.0, 1930.0, 1900.0, 20.0),
            Rect::new(1930.0, 50.0, 20.0, 1900.0),
            // Inner structures
            Rect::new(200.0, 200.0, 20.0, 400.0),
            Rect::new(200.0, 600.0, 400.0, 20.0),
            Rect::new(600.0, 200.0, 20.0, 400.0),
            Rect::new(600.0, 600.0, 400.0, 20.0),
            Rect::new(1000.0, 200.0, 20.0, 800.0),
            Rect::new(200.0, 1000.0, 800.0, 20.0),
            Rect::new(1200.0, 200.0, 20.0, 800.0),
            Rect::new(1200.0, 1000.0, 400.0, 20.0),
            Rect::new(1600.0, 200.0, 20.0, 800.0),
            Rect::new(200.0, 1400.0, 400.0, 20.0),
            Rect::new(600.0, 1400.0, 20.0, 400.0),
            Rect::new(600.0, 1800.0, 400.0, 20.0),
            Rect::new(1000.0, 1400.0, 20.0, 400.0),
            Rect::new(1200.0, 1400.0, 400.0, 20.0),
            Rect::new(1600.0, 1400.0, 20.0, 400.0),
            // Dead ends
            Rect::new(300.0, 300.0, 100.0, 20.0),
            Rect::new(1500.0, 1500.0, 100.0, 20.0),
            Rect::new(800.0, 800.0, 20.0, 100.0),
        ];
        Self::new(2000.0, 2000.0, walls)
    }

    /// Parse an arena from JSON
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let arena: Arena = serde_json::from_str(json)?;
        arena.validate()?;
        Ok(arena)
    }

    /// Load an arena from a JSON file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let arena = Self::from_json_str(&json)?;
        log::info!(
            "Loaded arena {}x{} with {} walls from {}",
            arena.width,
            arena.height,
            arena.walls.len(),
            path.as_ref().display()
        );
        Ok(arena)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(SimError::InvalidArena(format!(
                "bounds must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if let Some(wall) = self
            .walls
            .iter()
            .find(|w| !(w.width > 0.0 && w.height > 0.0))
        {
            return Err(SimError::InvalidArena(format!(
                "wall at ({}, {}) has non-positive size",
                wall.x, wall.y
            )));
        }
        Ok(())
    }

    /// Whether a point lies inside the closed world bounds
    pub fn contains(&self, p: Vec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }
}

/// Something that happened during a tick, reported outward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CraftHit {
        target: CraftId,
        shooter: CraftId,
        hp: i32,
    },
    CraftDestroyed {
        id: CraftId,
        role: Role,
        shooter: CraftId,
    },
    DroneSpawned {
        id: CraftId,
    },
    CoinCollected {
        coin: u32,
        craft: CraftId,
    },
    /// The player craft is gone; the match is over
    PlayerDown {
        id: CraftId,
    },
}

/// Per-craft view handed to pilots and renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftSnapshot {
    pub id: CraftId,
    pub role: Role,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub angle: f32,
    pub hp: i32,
}

impl CraftSnapshot {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn side(&self) -> Side {
        self.role.side()
    }
}

impl From<&Craft> for CraftSnapshot {
    fn from(c: &Craft) -> Self {
        Self {
            id: c.id,
            role: c.role,
            x: c.pos.x,
            y: c.pos.y,
            vx: c.vel.x,
            vy: c.vel.y,
            angle: c.heading,
            hp: c.hp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub lifespan: i32,
    pub owner: CraftId,
}

impl From<&Projectile> for ProjectileSnapshot {
    fn from(p: &Projectile) -> Self {
        Self {
            x: p.pos.x,
            y: p.pos.y,
            angle: p.heading,
            lifespan: p.lifespan,
            owner: p.owner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSnapshot {
    pub x: f32,
    pub y: f32,
}

/// Immutable copy of the world at a tick boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub crafts: Vec<CraftSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub coins: Vec<CoinSnapshot>,
    /// Indexed by `Side::index`
    pub score: [u32; 2],
    pub player_alive: bool,
}

impl WorldSnapshot {
    pub fn craft(&self, id: CraftId) -> Option<&CraftSnapshot> {
        self.crafts.iter().find(|c| c.id == id)
    }

    /// First craft in roster order on the side opposing `side`
    pub fn first_opponent(&self, side: Side) -> Option<&CraftSnapshot> {
        self.crafts.iter().find(|c| c.side() == side.opponent())
    }

    pub fn player(&self) -> Option<&CraftSnapshot> {
        self.crafts.iter().find(|c| c.role == Role::Player)
    }
}

/// Complete engine state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Injected configuration, fixed for the lifetime of the engine
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Active craft in spawn order
    pub crafts: Vec<Craft>,
    pub projectiles: Vec<Projectile>,
    pub coins: Vec<Coin>,
    /// Indexed by `Side::index`
    pub score: [u32; 2],
    /// Cleared once the player craft is destroyed
    pub player_alive: bool,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Start a match: one player, one drone and the configured coins, all at
    /// collision-free positions
    pub fn new(seed: u64, tuning: Tuning, arena: &Arena) -> Result<Self, SimError> {
        tuning.validate()?;
        arena.validate()?;
        tuning.check_bounds(arena.width, arena.height)?;

        let mut state = Self::empty(seed, tuning);
        state.spawn_craft(Role::Player, arena)?;
        state.spawn_craft(Role::Drone, arena)?;

        let coins = place_coins(
            &mut state.rng,
            &arena.walls,
            arena.width,
            arena.height,
            &state.tuning,
        )?;
        for pos in coins {
            let id = state.next_entity_id();
            state.coins.push(Coin { id, pos });
        }

        log::info!(
            "Match started with seed {}: {} craft, {} coins, {} walls",
            seed,
            state.crafts.len(),
            state.coins.len(),
            arena.walls.len()
        );
        Ok(state)
    }

    /// Build a state from explicitly placed craft (scenarios, replays)
    ///
    /// Craft ids are reassigned in the given order starting at 1; the returned
    /// ids match the input order.
    pub fn with_crafts(
        seed: u64,
        tuning: Tuning,
        crafts: impl IntoIterator<Item = (Role, Vec2, f32)>,
    ) -> Self {
        let mut state = Self::empty(seed, tuning);
        for (role, pos, heading) in crafts {
            let id = state.next_entity_id();
            let hp = state.tuning.craft_max_hp;
            state.crafts.push(Craft::new(id, role, pos, heading, hp));
        }
        state.player_alive = state.crafts.iter().any(|c| c.role == Role::Player);
        state
    }

    fn empty(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            tuning,
            time_ticks: 0,
            crafts: Vec::new(),
            projectiles: Vec::new(),
            coins: Vec::new(),
            score: [0; 2],
            player_alive: true,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a craft at a sampled free position with full health and a
    /// random heading
    pub fn spawn_craft(&mut self, role: Role, arena: &Arena) -> Result<CraftId, SimError> {
        let pos = sample_spawn(
            &mut self.rng,
            &arena.walls,
            arena.width,
            arena.height,
            self.tuning.spawn_inset,
            self.tuning.craft_half_size,
            self.tuning.spawn_attempts,
        )?;
        let heading = match role {
            Role::Player => 0.0,
            Role::Drone => self.rng.random_range(0.0..360.0),
        };
        let id = self.next_entity_id();
        let hp = self.tuning.craft_max_hp;
        self.crafts.push(Craft::new(id, role, pos, heading, hp));
        Ok(id)
    }

    pub fn craft(&self, id: CraftId) -> Option<&Craft> {
        self.crafts.iter().find(|c| c.id == id)
    }

    pub fn craft_mut(&mut self, id: CraftId) -> Option<&mut Craft> {
        self.crafts.iter_mut().find(|c| c.id == id)
    }

    /// Copy the externally visible state
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.time_ticks,
            crafts: self.crafts.iter().map(CraftSnapshot::from).collect(),
            projectiles: self
                .projectiles
                .iter()
                .map(ProjectileSnapshot::from)
                .collect(),
            coins: self
                .coins
                .iter()
                .map(|c| CoinSnapshot {
                    x: c.pos.x,
                    y: c.pos.y,
                })
                .collect(),
            score: self.score,
            player_alive: self.player_alive,
        }
    }
}
