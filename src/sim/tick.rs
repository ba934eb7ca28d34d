//! Configuration and Tick Entry Points
//!
//! Two clocks drive the simulation. `fixed_tick` runs at the fixed rate and
//! advances enemy drives, which is everything that must be reproducible
//! step-for-step. `frame_tick` runs once per rendered frame and advances
//! wall-ish concerns: score windows, the wave countdown, pickup aging and
//! fall deaths. Callers integrate positions externally between the two.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::combat;
use crate::sim::events::GameEventData;
use crate::sim::score::{self, ScoreConfig};
use crate::sim::spawner::{self, SpawnConfig};
use crate::sim::state::{ArenaState, MaskId};

/// Mask pickup tunables.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaskConfig {
    /// Seconds a dropped mask lies around before expiring.
    pub life_time: f32,
    /// Grace window after the drop during which it cannot be collected.
    pub can_pick_up_after: f32,
    /// Speed of the fling off an enemy's face.
    pub fling_speed: f32,
    /// Maximum masks the player can carry.
    pub mask_limit: usize,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            life_time: 3.0,
            can_pick_up_after: 0.5,
            fling_speed: 8.0,
            mask_limit: 3,
        }
    }
}

/// Complete simulation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Wave spawner tunables.
    pub spawn: SpawnConfig,
    /// Score engine tunables.
    pub score: ScoreConfig,
    /// Mask pickup tunables.
    pub mask: MaskConfig,
    /// Height below which anything falling dies.
    pub fall_kill_height: f32,
    /// Death-path bonus for fatal falls (health deaths use 1.0).
    pub fatal_bonus_multiplier: f32,
    /// Knockback speed applied by a slap on an unmasked enemy.
    pub slap_knockback_speed: f32,
    /// Shove speed a lunge collision applies to the other body.
    pub lunge_push_speed: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            spawn: SpawnConfig::default(),
            score: ScoreConfig::default(),
            mask: MaskConfig::default(),
            fall_kill_height: -10.0,
            fatal_bonus_multiplier: 2.0,
            slap_knockback_speed: 13.0,
            lunge_push_speed: 4.0,
        }
    }
}

/// Configuration validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The spawn pool has no entries to buy.
    #[error("spawn pool is empty")]
    EmptyPool,

    /// A pool entry costs nothing, which would make waves infinite.
    #[error("spawn pool entry {name:?} has non-positive power cost {cost}")]
    InvalidPowerCost {
        /// Offending entry name.
        name: String,
        /// Its configured cost.
        cost: i32,
    },

    /// The spawn circle has no rim to place enemies on.
    #[error("spawn radius must be positive, got {0}")]
    InvalidSpawnRadius(f32),

    /// Placement needs at least one attempt before the fallback.
    #[error("max spawn retries must be at least 1")]
    ZeroSpawnRetries,
}

impl SimConfig {
    /// Check the configuration for values that would break the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spawn.pool.is_empty() {
            return Err(ConfigError::EmptyPool);
        }
        for stats in &self.spawn.pool {
            if stats.power_cost <= 0 {
                return Err(ConfigError::InvalidPowerCost {
                    name: stats.name.clone(),
                    cost: stats.power_cost,
                });
            }
        }
        if self.spawn.spawn_radius <= 0.0 {
            return Err(ConfigError::InvalidSpawnRadius(self.spawn.spawn_radius));
        }
        if self.spawn.max_spawn_retries == 0 {
            return Err(ConfigError::ZeroSpawnRetries);
        }
        Ok(())
    }
}

/// Advance every enemy drive by one fixed step.
pub fn fixed_tick(state: &mut ArenaState, _config: &SimConfig, dt: f32) {
    state.tick += 1;

    let player_pos = state.player.position;
    let tick = state.tick;
    let mut events = Vec::new();

    let rng = &mut state.rng;
    for enemy in state.enemies.values_mut() {
        enemy.fixed_update(player_pos, dt, rng, &mut events, tick);
    }

    state.pending_events.append(&mut events);
}

/// Advance per-frame bookkeeping: score windows, the wave countdown, mask
/// pickup aging and fall deaths.
pub fn frame_tick(state: &mut ArenaState, config: &SimConfig, dt: f32) {
    state.time += dt;

    score::tick_score_timers(state, &config.score, dt);
    spawner::update_spawner(state, &config.spawn, dt);
    combat::handle_fall_deaths(state, config);
    update_mask_pickups(state, config, dt);
}

/// Age dropped masks and expire the ones past their lifetime.
fn update_mask_pickups(state: &mut ArenaState, config: &SimConfig, dt: f32) {
    let mut expired: Vec<MaskId> = Vec::new();
    for (&id, pickup) in &mut state.masks {
        pickup.age += dt;
        if pickup.age >= config.mask.life_time {
            expired.push(id);
        }
    }

    for id in expired {
        state.masks.remove(&id);
        state.push_event(GameEventData::MaskExpired { id });
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec3::Vec3;
    use crate::sim::enemy::EnemyStats;
    use crate::sim::state::{MaskKind, SessionId};

    const DT: f32 = 1.0 / 60.0;

    fn test_state(config: &SimConfig) -> ArenaState {
        ArenaState::new(SessionId([9u8; 16]), 2024, config)
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_pool() {
        let mut config = SimConfig::default();
        config.spawn.pool.clear();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyPool)));
    }

    #[test]
    fn test_validate_rejects_free_enemies() {
        let mut config = SimConfig::default();
        config.spawn.pool[0].power_cost = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPowerCost { cost: 0, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_degenerate_placement() {
        let mut config = SimConfig::default();
        config.spawn.spawn_radius = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpawnRadius(_))
        ));

        let mut config = SimConfig::default();
        config.spawn.max_spawn_retries = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroSpawnRetries)));
    }

    #[test]
    fn test_fixed_tick_advances_counter_and_enemies() {
        let config = SimConfig::default();
        let mut state = test_state(&config);
        state.spawn_enemy(EnemyStats::chaser(), Vec3::new(10.0, 0.0, 0.0), -Vec3::X);

        fixed_tick(&mut state, &config, DT);

        assert_eq!(state.tick, 1);
        let enemy = state.enemies.values().next().unwrap();
        // Chasing toward the player at the origin
        assert!(enemy.velocity.x < 0.0);
    }

    #[test]
    fn test_frame_tick_spawns_first_wave() {
        let config = SimConfig::default();
        let mut state = test_state(&config);

        frame_tick(&mut state, &config, DT);

        assert_eq!(state.wave.waves_spawned, 1);
        assert!(!state.enemies.is_empty());
    }

    #[test]
    fn test_mask_pickups_expire() {
        let config = SimConfig::default();
        let mut state = test_state(&config);
        // Park the wave countdown so no enemies interfere
        state.wave.wave_timer = 1000.0;

        let id = state.spawn_mask_pickup(MaskKind::Wind, Vec3::ZERO, Vec3::ZERO);
        state.take_events();

        frame_tick(&mut state, &config, 2.9);
        assert!(state.masks.contains_key(&id));

        frame_tick(&mut state, &config, 0.2);
        assert!(state.masks.is_empty());

        let events = state.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e.data, GameEventData::MaskExpired { id: ex } if ex == id)));
    }

    #[test]
    fn test_irregular_frame_times_keep_invariants() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let config = SimConfig::default();
        let mut state = test_state(&config);
        let mut dts = StdRng::seed_from_u64(0xD7);

        let mut prev_multiplier = state.score.global_multiplier;
        for _ in 0..2_000 {
            let dt: f32 = dts.gen_range(0.001..0.1);
            frame_tick(&mut state, &config, dt);
            fixed_tick(&mut state, &config, dt);

            assert!(state.score.global_multiplier >= prev_multiplier);
            prev_multiplier = state.score.global_multiplier;
            assert!(state.wave.current_target_power > 0);
        }

        assert!(state.wave.waves_spawned > 0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let config = SimConfig::default();
        let mut a = test_state(&config);
        let mut b = test_state(&config);

        for _ in 0..600 {
            frame_tick(&mut a, &config, DT);
            fixed_tick(&mut a, &config, DT);
            frame_tick(&mut b, &config, DT);
            fixed_tick(&mut b, &config, DT);
        }

        assert_eq!(a.take_events(), b.take_events());
        assert_eq!(a.tick, b.tick);
        assert_eq!(a.wave, b.wave);

        let pos_a: Vec<_> = a.enemies.values().map(|e| e.position).collect();
        let pos_b: Vec<_> = b.enemies.values().map(|e| e.position).collect();
        assert_eq!(pos_a, pos_b);
    }

    #[test]
    fn test_fall_deaths_run_from_frame_tick() {
        let config = SimConfig::default();
        let mut state = test_state(&config);
        state.wave.wave_timer = 1000.0;
        let id = state.spawn_enemy(EnemyStats::chaser(), Vec3::new(5.0, -20.0, 0.0), Vec3::X);
        state.take_events();

        frame_tick(&mut state, &config, DT);

        assert!(!state.enemies.contains_key(&id));
        assert_eq!(state.score.current_score, 200.0);
    }
}
