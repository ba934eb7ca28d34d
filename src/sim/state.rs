//! Arena State
//!
//! The complete simulation state for one session: player body, live enemies,
//! mask pickups, wave progress, score, and the session RNG. Everything in the
//! session flows through this struct; there is no other mutable state.
//!
//! Enemies and pickups live in `BTreeMap`s so iteration order is fixed by ID
//! and the simulation stays deterministic across runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::rng::DeterministicRng;
use crate::core::vec3::Vec3;
use crate::sim::enemy::{EnemyState, EnemyStats};
use crate::sim::events::{GameEvent, GameEventData};
use crate::sim::score::ScoreState;
use crate::sim::spawner::WaveState;
use crate::sim::tick::SimConfig;

/// Unique session identifier (16 raw bytes, UUID-compatible).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub [u8; 16]);

impl SessionId {
    /// Parse from a UUID string.
    pub fn from_uuid_str(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(*Uuid::parse_str(s)?.as_bytes()))
    }

    /// Format as a UUID string.
    pub fn to_uuid_string(&self) -> String {
        Uuid::from_bytes(self.0).to_string()
    }
}

/// Unique enemy identifier, monotonic within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// Unique mask pickup identifier, monotonic within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MaskId(pub u32);

/// Mask types, both as enemy protection and as collectible pickups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskKind {
    /// Plain protective mask.
    Basic,
    /// Mask whose thrown form pierces through enemies.
    Penetrating,
    /// Mask whose thrown form carries a wind gust.
    Wind,
}

/// The player's body as the simulation sees it.
///
/// Position, velocity and groundedness are written by the external
/// integrator each frame; the simulation reads them and only writes
/// velocity when a lunge collision pushes the player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    /// World position.
    pub position: Vec3,
    /// World velocity.
    pub velocity: Vec3,
    /// Whether the player is standing on ground this frame.
    pub grounded: bool,
    /// Remaining lives.
    pub lives: u32,
    /// Masks currently held, oldest first.
    pub masks: Vec<MaskKind>,
}

impl Default for PlayerBody {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            grounded: true,
            lives: 3,
            masks: Vec::new(),
        }
    }
}

/// A mask lying on the ground after being knocked off an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaskPickup {
    /// Mask type.
    pub kind: MaskKind,
    /// World position.
    pub position: Vec3,
    /// World velocity (integrated externally after the fling).
    pub velocity: Vec3,
    /// Seconds since the pickup appeared.
    pub age: f32,
}

/// Complete simulation state for one arena session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArenaState {
    /// Session identifier.
    pub session_id: SessionId,
    /// Seed the session RNG was created from.
    pub seed: u64,
    /// Session RNG. Not serialized; restore by replaying from the seed.
    #[serde(skip)]
    pub rng: DeterministicRng,
    /// Fixed tick counter.
    pub tick: u64,
    /// Elapsed session time in seconds (frame time).
    pub time: f32,
    /// Player body.
    pub player: PlayerBody,
    /// Live enemies, keyed by ID for deterministic iteration.
    pub enemies: BTreeMap<EnemyId, EnemyState>,
    /// Mask pickups on the ground.
    pub masks: BTreeMap<MaskId, MaskPickup>,
    /// Wave spawner progress.
    pub wave: WaveState,
    /// Score and combo state.
    pub score: ScoreState,
    /// Next enemy ID to assign.
    next_enemy_id: u32,
    /// Next mask pickup ID to assign.
    next_mask_id: u32,
    /// Events accumulated since the last drain.
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,
}

impl ArenaState {
    /// Create a fresh session.
    pub fn new(session_id: SessionId, seed: u64, config: &SimConfig) -> Self {
        Self {
            session_id,
            seed,
            rng: DeterministicRng::new(seed),
            tick: 0,
            time: 0.0,
            player: PlayerBody::default(),
            enemies: BTreeMap::new(),
            masks: BTreeMap::new(),
            wave: WaveState::new(config.spawn.initial_target_power),
            score: ScoreState::default(),
            next_enemy_id: 0,
            next_mask_id: 0,
            pending_events: Vec::new(),
        }
    }

    /// Create an enemy at `position`, facing `facing`, and emit the spawn
    /// event. Returns the assigned ID.
    pub fn spawn_enemy(&mut self, stats: EnemyStats, position: Vec3, facing: Vec3) -> EnemyId {
        let id = EnemyId(self.next_enemy_id);
        self.next_enemy_id += 1;

        let name = stats.name.clone();
        let enemy = EnemyState::new(id, stats, position, facing, &mut self.rng);
        self.enemies.insert(id, enemy);

        self.push_event(GameEventData::EnemySpawned { id, name, position });
        id
    }

    /// Create a mask pickup flung off an enemy and emit the knock-off event.
    pub fn spawn_mask_pickup(&mut self, kind: MaskKind, position: Vec3, velocity: Vec3) -> MaskId {
        let id = MaskId(self.next_mask_id);
        self.next_mask_id += 1;

        self.masks.insert(id, MaskPickup { kind, position, velocity, age: 0.0 });
        self.push_event(GameEventData::MaskKnockedOff { id, kind, position });
        id
    }

    /// Queue an event stamped with the current tick.
    pub fn push_event(&mut self, data: GameEventData) {
        self.pending_events.push(GameEvent::new(self.tick, data));
    }

    /// Drain all pending events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

// =============================================================================
// TESTS
// =============================================================================
