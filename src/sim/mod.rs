//! Simulation Logic Module
//!
//! The gameplay core. Single-threaded, poll-driven, no blocking waits.
//!
//! ## Module Structure
//!
//! - `state`: arena state, player body, mask pickups, session identity
//! - `enemy`: static enemy stats and per-tick drive logic (chaser, flyer)
//! - `spawner`: wave budget allocation and spawn placement
//! - `score`: score, multiplier growth and combo windows
//! - `combat`: slaps, damage, lunge collisions, death paths
//! - `tick`: configuration plus the fixed/frame tick entry points
//! - `events`: simulation and presentation-facing events

pub mod combat;
pub mod enemy;
pub mod events;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;

// Re-export key types
pub use enemy::{Archetype, EnemyPhase, EnemyStats};
pub use events::{DeathCause, GameEvent, GameEventData};
pub use state::{ArenaState, EnemyId, MaskId, MaskKind, PlayerBody, SessionId};
pub use tick::{ConfigError, SimConfig};
