//! Simulation and Feedback Events
//!
//! Everything the core tells the outside world, in one queue. Simulation
//! events (spawns, deaths, projectiles) feed gameplay collaborators;
//! feedback events (floating text, camera shake, sounds) feed presentation.
//! Emission is fire-and-forget: consumers drain the queue, absent consumers
//! cost nothing.

use serde::{Deserialize, Serialize};

use crate::core::vec3::Vec3;
use crate::sim::state::{EnemyId, MaskId, MaskKind};

/// Why an enemy died.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Health reached zero.
    HealthDepleted,
    /// Fell below the fatal height threshold (awards the fatal bonus).
    FatalFall,
}

/// Tint for floating feedback text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextColor {
    /// Airborne kills.
    Cyan,
    /// Fatal falls and triple kills.
    Magenta,
    /// Slap fury combos.
    Gold,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A wave finished spawning.
    WaveSpawned {
        /// Wave ordinal, starting at 1.
        wave: u32,
        /// Budget the wave started with.
        target_power: i32,
        /// Budget actually spent (leftover is discarded).
        power_spent: i32,
        /// Number of enemies created.
        enemies: u32,
    },

    /// An enemy was created.
    EnemySpawned {
        /// Enemy identifier.
        id: EnemyId,
        /// Enemy type name from the spawn pool.
        name: String,
        /// Spawn position.
        position: Vec3,
    },

    /// An enemy died (either death path, exactly once per enemy).
    EnemyDied {
        /// Enemy identifier.
        id: EnemyId,
        /// Which death path fired.
        cause: DeathCause,
        /// Position at death.
        position: Vec3,
    },

    /// A flyer started its attack telegraph.
    FlyerCharging {
        /// Enemy identifier.
        id: EnemyId,
    },

    /// A flyer fired a projectile; flight and hit detection are external.
    ProjectileFired {
        /// Enemy identifier.
        id: EnemyId,
        /// Muzzle position.
        origin: Vec3,
        /// Unit direction toward the player at fire time.
        direction: Vec3,
    },

    /// A lunge collision damaged the player.
    PlayerDamaged {
        /// Lives remaining after the hit.
        lives_left: u32,
    },

    /// A mask was slapped off an enemy and became a pickup.
    MaskKnockedOff {
        /// Pickup identifier.
        id: MaskId,
        /// Mask type.
        kind: MaskKind,
        /// Where the pickup appeared.
        position: Vec3,
    },

    /// The player collected a mask pickup.
    MaskPickedUp {
        /// Mask type.
        kind: MaskKind,
    },

    /// A mask pickup timed out before being collected.
    MaskExpired {
        /// Pickup identifier.
        id: MaskId,
    },

    /// Show floating text at a world position.
    FloatingText {
        /// Anchor position.
        position: Vec3,
        /// Text to display (may contain newlines).
        text: String,
        /// Optional tint; `None` means the default color.
        color: Option<TextColor>,
    },

    /// Request a camera shake.
    CameraShake {
        /// Shake duration in seconds.
        duration: f32,
        /// Shake intensity.
        intensity: f32,
    },

    /// Play a one-shot sound.
    Sound {
        /// Sound cue name.
        name: String,
    },
}

/// A game event stamped with the fixed tick it was emitted on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Fixed tick when the event occurred.
    pub tick: u64,
    /// Event data.
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u64, data: GameEventData) -> Self {
        Self { tick, data }
    }

    /// Create an enemy died event.
    pub fn enemy_died(tick: u64, id: EnemyId, cause: DeathCause, position: Vec3) -> Self {
        Self::new(tick, GameEventData::EnemyDied { id, cause, position })
    }

    /// Create a camera shake request.
    pub fn camera_shake(tick: u64, duration: f32, intensity: f32) -> Self {
        Self::new(tick, GameEventData::CameraShake { duration, intensity })
    }

    /// Create a sound event.
    pub fn sound(tick: u64, name: &str) -> Self {
        Self::new(tick, GameEventData::Sound { name: name.to_owned() })
    }

    /// Create a projectile fired event.
    pub fn projectile_fired(tick: u64, id: EnemyId, origin: Vec3, direction: Vec3) -> Self {
        Self::new(tick, GameEventData::ProjectileFired { id, origin, direction })
    }
}
