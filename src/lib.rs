//! # Soul Arena Simulation Core
//!
//! Headless gameplay simulation for a first-person arena brawler: enemies
//! that stalk and lunge at the player, a wave spawner that spends a rising
//! power budget, and a score engine that stacks time-windowed combo bonuses.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SOUL ARENA CORE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── vec3.rs     - 3D vector math (horizontal-plane helpers) │
//! │  └── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │                                                              │
//! │  sim/            - Simulation logic                          │
//! │  ├── state.rs    - Arena state, player body, mask pickups    │
//! │  ├── enemy.rs    - Enemy stats and per-tick drive logic      │
//! │  ├── spawner.rs  - Budget-constrained wave spawning          │
//! │  ├── score.rs    - Score, multiplier and combo windows       │
//! │  ├── combat.rs   - Slaps, damage, collisions, death paths    │
//! │  ├── tick.rs     - Fixed/frame tick orchestration, config    │
//! │  └── events.rs   - Simulation and feedback events            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Boundaries
//!
//! The core decides *target velocities*, *state transitions*, and *score
//! deltas*. Moving bodies, detecting collisions, rendering, and audio are
//! external collaborators: an integrator reads velocities and writes back
//! positions, and reports contacts through [`sim::combat::report_collision`].
//! Presentation consumers drain [`sim::events::GameEvent`]s each frame;
//! nothing in the core blocks on them.
//!
//! ## Determinism
//!
//! All randomness flows from a seeded Xorshift128+ PRNG owned by the state,
//! and entities live in `BTreeMap`s so iteration order is stable. Given the
//! same seed and the same call sequence, a session replays identically.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod sim;

// Re-export commonly used types
pub use crate::core::rng::DeterministicRng;
pub use crate::core::vec3::Vec3;
pub use sim::events::{GameEvent, GameEventData};
pub use sim::state::{ArenaState, EnemyId, MaskKind, SessionId};
pub use sim::tick::{fixed_tick, frame_tick, SimConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;

/// Duration of one fixed tick in seconds
pub const FIXED_DT: f32 = 1.0 / TICK_RATE as f32;
