//! Wave Spawner
//!
//! Waves are bought from a power budget: each wave gets a target power,
//! the allocator repeatedly picks a uniformly random affordable pool entry
//! and subtracts its cost, and stops when nothing is affordable. Leftover
//! budget is discarded, not banked. The budget grows by a flat amount per
//! wave so later waves are denser, not individually stronger.
//!
//! Placement happens on the arena rim: a random angle on the spawn circle,
//! retried a bounded number of times to stay clear of the player, with a
//! deterministic diametrically-opposite fallback when every retry fails.

use serde::{Deserialize, Serialize};

use crate::core::rng::DeterministicRng;
use crate::core::vec3::Vec3;
use crate::sim::enemy::EnemyStats;
use crate::sim::events::GameEventData;
use crate::sim::state::ArenaState;

/// Spawner tunables, including the pool of purchasable enemy types.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Enemy types the allocator can buy.
    pub pool: Vec<EnemyStats>,
    /// Center of the spawn circle.
    pub spawn_center: Vec3,
    /// Radius of the spawn circle.
    pub spawn_radius: f32,
    /// Seconds between waves. The first wave fires immediately.
    pub time_between_waves: f32,
    /// Minimum horizontal distance between a spawn point and the player.
    pub min_distance_from_player: f32,
    /// Placement attempts before falling back to the opposite rim point.
    pub max_spawn_retries: u32,
    /// Power budget of the first wave.
    pub initial_target_power: i32,
    /// Flat budget growth per wave.
    pub power_increase_per_wave: i32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            pool: vec![
                EnemyStats::chaser(),
                EnemyStats::masked_chaser(),
                EnemyStats::flyer(),
            ],
            spawn_center: Vec3::ZERO,
            spawn_radius: 20.0,
            time_between_waves: 5.0,
            min_distance_from_player: 15.0,
            max_spawn_retries: 10,
            initial_target_power: 10,
            power_increase_per_wave: 5,
        }
    }
}

/// Mutable wave progress.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveState {
    /// Budget of the next wave.
    pub current_target_power: i32,
    /// Countdown to the next wave. Starts expired.
    pub wave_timer: f32,
    /// Waves spawned so far.
    pub waves_spawned: u32,
}

impl WaveState {
    /// Start the wave ladder at `initial_target_power`, first wave due now.
    pub fn new(initial_target_power: i32) -> Self {
        Self {
            current_target_power: initial_target_power,
            wave_timer: 0.0,
            waves_spawned: 0,
        }
    }
}

/// Advance the wave countdown, spawning a wave when it expires.
pub fn update_spawner(state: &mut ArenaState, config: &SpawnConfig, dt: f32) {
    state.wave.wave_timer -= dt;
    if state.wave.wave_timer <= 0.0 {
        spawn_wave(state, config);
        state.wave.wave_timer = config.time_between_waves;
    }
}

/// Spend the current wave budget and place the purchased enemies.
pub fn spawn_wave(state: &mut ArenaState, config: &SpawnConfig) {
    let target_power = state.wave.current_target_power;
    let mut remaining = target_power;
    let mut spawned = 0u32;

    loop {
        let affordable: Vec<usize> = config
            .pool
            .iter()
            .enumerate()
            .filter(|(_, stats)| stats.power_cost <= remaining)
            .map(|(i, _)| i)
            .collect();
        let Some(&index) = state.rng.choose(&affordable) else {
            break;
        };

        let stats = config.pool[index].clone();
        remaining -= stats.power_cost;

        let position = valid_spawn_position(&mut state.rng, state.player.position, config);
        let facing = (config.spawn_center - position).horizontal().normalize_or(Vec3::X);
        state.spawn_enemy(stats, position, facing);
        spawned += 1;
    }

    state.wave.waves_spawned += 1;
    state.wave.current_target_power += config.power_increase_per_wave;

    let wave = state.wave.waves_spawned;
    state.push_event(GameEventData::WaveSpawned {
        wave,
        target_power,
        power_spent: target_power - remaining,
        enemies: spawned,
    });
}

/// Pick a spawn point on the rim of the spawn circle.
///
/// Random angles are tried up to the retry limit; each candidate must keep
/// the minimum horizontal distance from the player. If every try fails the
/// rim point diametrically opposite the player is used, which is the
/// farthest rim point available.
pub fn valid_spawn_position(
    rng: &mut DeterministicRng,
    player_pos: Vec3,
    config: &SpawnConfig,
) -> Vec3 {
    for _ in 0..config.max_spawn_retries {
        let angle = rng.next_angle();
        let candidate = config.spawn_center
            + Vec3::new(angle.cos(), 0.0, angle.sin()) * config.spawn_radius;
        if candidate.horizontal_distance(player_pos) >= config.min_distance_from_player {
            return candidate;
        }
    }

    let away = (config.spawn_center - player_pos).horizontal().normalize_or(Vec3::X);
    config.spawn_center + away * config.spawn_radius
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::SessionId;
    use crate::sim::tick::SimConfig;

    fn state_with(config: &SimConfig) -> ArenaState {
        ArenaState::new(SessionId([3u8; 16]), 99, config)
    }

    fn pool_5_and_10() -> SpawnConfig {
        let mut chaser = EnemyStats::chaser();
        chaser.power_cost = 5;
        let mut flyer = EnemyStats::flyer();
        flyer.power_cost = 10;
        SpawnConfig {
            pool: vec![chaser, flyer],
            ..SpawnConfig::default()
        }
    }

    #[test]
    fn test_wave_budget_is_spent_until_unaffordable() {
        let spawn = pool_5_and_10();
        let config = SimConfig {
            spawn: spawn.clone(),
            ..SimConfig::default()
        };
        let mut state = state_with(&config);
        state.wave.current_target_power = 12;

        spawn_wave(&mut state, &spawn);

        let events = state.take_events();
        let GameEventData::WaveSpawned { target_power, power_spent, enemies, .. } =
            events.last().unwrap().data
        else {
            panic!("expected wave event last");
        };

        assert_eq!(target_power, 12);
        // Cheapest entry costs 5, so leftover must be below that
        assert!(target_power - power_spent < 5);
        assert!(power_spent <= target_power);
        assert_eq!(enemies as usize, state.enemies.len());
        assert!(enemies >= 1);

        // Sum of purchased costs matches the reported spend
        let total: i32 = state.enemies.values().map(|e| e.stats.power_cost).sum();
        assert_eq!(total, power_spent);
    }

    #[test]
    fn test_budget_grows_per_wave_and_leftover_is_discarded() {
        let spawn = pool_5_and_10();
        let config = SimConfig {
            spawn: spawn.clone(),
            ..SimConfig::default()
        };
        let mut state = state_with(&config);
        state.wave.current_target_power = 12;

        spawn_wave(&mut state, &spawn);
        // 12 + 5, not (12 - spent) + something
        assert_eq!(state.wave.current_target_power, 17);
        assert_eq!(state.wave.waves_spawned, 1);

        spawn_wave(&mut state, &spawn);
        assert_eq!(state.wave.current_target_power, 22);
        assert_eq!(state.wave.waves_spawned, 2);
    }

    #[test]
    fn test_first_wave_fires_immediately() {
        let config = SimConfig::default();
        let mut state = state_with(&config);

        update_spawner(&mut state, &config.spawn, 1.0 / 60.0);

        assert_eq!(state.wave.waves_spawned, 1);
        assert!(!state.enemies.is_empty());
        // Countdown rearmed for the next wave
        assert!(state.wave.wave_timer > 0.0);
    }

    #[test]
    fn test_no_wave_before_countdown_expires() {
        let config = SimConfig::default();
        let mut state = state_with(&config);
        state.wave.wave_timer = 5.0;

        update_spawner(&mut state, &config.spawn, 1.0);
        assert_eq!(state.wave.waves_spawned, 0);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_spawn_position_sits_on_the_rim() {
        let config = SpawnConfig::default();
        let mut rng = DeterministicRng::new(5);

        for _ in 0..50 {
            let pos = valid_spawn_position(&mut rng, Vec3::ZERO, &config);
            let from_center = pos.horizontal_distance(config.spawn_center);
            assert!((from_center - config.spawn_radius).abs() < 1e-3);
            assert!(pos.horizontal_distance(Vec3::ZERO) >= config.min_distance_from_player);
        }
    }

    #[test]
    fn test_spawn_fallback_picks_opposite_rim_point() {
        // Impossible constraint: every random candidate is rejected
        let config = SpawnConfig {
            min_distance_from_player: 100.0,
            ..SpawnConfig::default()
        };
        let mut rng = DeterministicRng::new(5);
        let player = Vec3::new(12.0, 0.0, 0.0);

        let pos = valid_spawn_position(&mut rng, player, &config);

        // Fallback sits on the rim, diametrically opposite the player
        assert!((pos.x - -20.0).abs() < 1e-3);
        assert!(pos.z.abs() < 1e-3);
    }

    #[test]
    fn test_wave_composition_is_deterministic() {
        let spawn = pool_5_and_10();
        let config = SimConfig {
            spawn: spawn.clone(),
            ..SimConfig::default()
        };

        let mut a = state_with(&config);
        let mut b = state_with(&config);
        spawn_wave(&mut a, &spawn);
        spawn_wave(&mut b, &spawn);

        let names_a: Vec<_> = a.enemies.values().map(|e| e.stats.name.clone()).collect();
        let names_b: Vec<_> = b.enemies.values().map(|e| e.stats.name.clone()).collect();
        assert_eq!(names_a, names_b);
    }
}
