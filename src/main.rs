//! Demo driver for the arena simulation core.
//!
//! Runs a headless session with a scripted player and a minimal integrator
//! standing in for the game's physics: gravity, a circular ground plane, and
//! sphere-overlap contact reports. Prints a JSON summary at the end.
//!
//! ```bash
//! cargo run --bin soul-arena-demo
//! RUST_LOG=debug cargo run --bin soul-arena-demo
//! ```

use anyhow::Context;
use tracing::{debug, info};
use uuid::Uuid;

use soul_arena::core::rng::derive_session_seed;
use soul_arena::sim::combat::{self, CollisionOther, CollisionReport};
use soul_arena::sim::events::GameEventData;
use soul_arena::{fixed_tick, frame_tick, ArenaState, SessionId, SimConfig, Vec3, FIXED_DT};

/// Seconds of simulated play.
const DEMO_DURATION: f32 = 45.0;
/// Radius of the walkable disk; bodies beyond it fall into the void.
const GROUND_RADIUS: f32 = 22.0;
/// Downward acceleration applied by the stand-in integrator.
const GRAVITY: f32 = 20.0;
/// Horizontal reach of the scripted player's slap.
const SLAP_RANGE: f32 = 2.0;
/// Seconds between scripted slaps.
const SLAP_COOLDOWN: f32 = 0.4;
/// Reach for collecting mask pickups.
const PICKUP_RANGE: f32 = 1.5;
/// Contact distance for lunge overlap reports.
const CONTACT_RANGE: f32 = 0.9;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let session_uuid = Uuid::new_v4();
    let session_id = SessionId(*session_uuid.as_bytes());
    let seed = derive_session_seed(&session_id.0);

    let config = SimConfig::default();
    config.validate().context("invalid simulation config")?;

    info!(session = %session_uuid, seed, "starting arena session");

    let mut state = ArenaState::new(session_id, seed, &config);
    let mut slap_cooldown = 0.0f32;

    let total_ticks = (DEMO_DURATION / FIXED_DT) as u32;
    for _ in 0..total_ticks {
        frame_tick(&mut state, &config, FIXED_DT);
        fixed_tick(&mut state, &config, FIXED_DT);
        integrate(&mut state, FIXED_DT);
        report_contacts(&mut state, &config);

        slap_cooldown -= FIXED_DT;
        if slap_cooldown <= 0.0 && scripted_slap(&mut state, &config) {
            slap_cooldown = SLAP_COOLDOWN;
        }
        collect_masks(&mut state, &config);

        drain_events(&mut state);

        if state.player.lives == 0 {
            info!("player out of lives, ending session");
            break;
        }
    }

    let summary = serde_json::json!({
        "session": session_uuid.to_string(),
        "seed": seed,
        "ticks": state.tick,
        "time": state.time,
        "score": state.score.current_score.round(),
        "multiplier": state.score.global_multiplier,
        "waves": state.wave.waves_spawned,
        "enemies_alive": state.enemies.len(),
        "lives_left": state.player.lives,
        "masks_held": state.player.masks.len(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

/// Stand-in physics: gravity, Euler integration, and a circular ground
/// plane at y = 0. Bodies past the rim keep falling.
fn integrate(state: &mut ArenaState, dt: f32) {
    for enemy in state.enemies.values_mut() {
        enemy.velocity.y -= GRAVITY * dt;
        enemy.position += enemy.velocity * dt;

        let on_disk = enemy.position.horizontal().length() <= GROUND_RADIUS;
        if on_disk && enemy.position.y < 0.0 {
            enemy.position.y = 0.0;
            enemy.velocity.y = 0.0;
        }
    }

    for pickup in state.masks.values_mut() {
        pickup.velocity.y -= GRAVITY * dt;
        pickup.position += pickup.velocity * dt;
        if pickup.position.horizontal().length() <= GROUND_RADIUS && pickup.position.y < 0.0 {
            pickup.position.y = 0.0;
            pickup.velocity = Vec3::ZERO;
        }
    }

    // The scripted player just stands at the origin
    state.player.grounded = state.player.position.y <= 0.0;
}

/// Report sphere overlaps between lunging enemies and other bodies.
fn report_contacts(state: &mut ArenaState, config: &SimConfig) {
    let player_pos = state.player.position;
    let bodies: Vec<(soul_arena::EnemyId, Vec3, bool)> = state
        .enemies
        .values()
        .map(|e| (e.id, e.position, e.is_lunging()))
        .collect();

    let mut reports = Vec::new();
    for &(id, pos, lunging) in &bodies {
        if !lunging {
            continue;
        }
        if pos.distance(player_pos) <= CONTACT_RANGE {
            reports.push(CollisionReport {
                enemy: id,
                other: CollisionOther::Player,
                other_position: player_pos,
            });
        }
        for &(other_id, other_pos, _) in &bodies {
            if other_id != id && pos.distance(other_pos) <= CONTACT_RANGE {
                reports.push(CollisionReport {
                    enemy: id,
                    other: CollisionOther::Enemy(other_id),
                    other_position: other_pos,
                });
            }
        }
    }

    for report in reports {
        combat::report_collision(state, config, report);
    }
}

/// Slap the nearest enemy in reach, aiming away from the player.
fn scripted_slap(state: &mut ArenaState, config: &SimConfig) -> bool {
    let player_pos = state.player.position;
    let target = state
        .enemies
        .values()
        .filter(|e| e.position.horizontal_distance(player_pos) <= SLAP_RANGE)
        .min_by(|a, b| {
            let da = a.position.horizontal_distance(player_pos);
            let db = b.position.horizontal_distance(player_pos);
            da.total_cmp(&db)
        })
        .map(|e| (e.id, e.position));

    match target {
        Some((id, pos)) => {
            let direction = (pos - player_pos).horizontal().normalize_or(Vec3::X);
            combat::slap_enemy(state, config, id, direction)
        }
        None => false,
    }
}

/// Collect any collectible mask pickup within reach.
fn collect_masks(state: &mut ArenaState, config: &SimConfig) {
    let player_pos = state.player.position;
    let in_reach: Vec<_> = state
        .masks
        .iter()
        .filter(|(_, p)| p.position.distance(player_pos) <= PICKUP_RANGE)
        .map(|(&id, _)| id)
        .collect();

    for id in in_reach {
        combat::try_pick_up_mask(state, config, id);
    }
}

/// Log this frame's events.
fn drain_events(state: &mut ArenaState) {
    for event in state.take_events() {
        match &event.data {
            GameEventData::WaveSpawned { wave, target_power, power_spent, enemies } => {
                info!(wave, target_power, power_spent, enemies, "wave spawned");
            }
            GameEventData::EnemyDied { id, cause, position } => {
                info!(?id, ?cause, %position, "enemy died");
            }
            GameEventData::PlayerDamaged { lives_left } => {
                info!(lives_left, "player damaged");
            }
            GameEventData::FloatingText { text, .. } => {
                info!(text = %text.replace('\n', " "), "feedback");
            }
            other => {
                debug!(tick = event.tick, ?other, "event");
            }
        }
    }
}
