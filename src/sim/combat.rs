//! Combat Interactions
//!
//! Slaps, damage, lunge collisions and the two death paths. Collision
//! detection itself is external; the integrator reports overlaps and this
//! module applies the gameplay consequences.
//!
//! Death is guarded by a per-enemy latch so the health path and the fall
//! path can both fire in one frame without double-scoring.

use serde::{Deserialize, Serialize};

use crate::core::vec3::Vec3;
use crate::sim::events::{DeathCause, GameEventData};
use crate::sim::score;
use crate::sim::state::{ArenaState, EnemyId, MaskId};
use crate::sim::tick::SimConfig;

/// What a lunging enemy collided with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionOther {
    /// The player body.
    Player,
    /// Another enemy.
    Enemy(EnemyId),
}

/// An overlap involving an enemy, reported by the external integrator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionReport {
    /// The enemy side of the overlap.
    pub enemy: EnemyId,
    /// The other body.
    pub other: CollisionOther,
    /// World position of the other body at contact time.
    pub other_position: Vec3,
}

/// Apply one player slap to an enemy. Returns whether the slap connected.
///
/// A masked enemy loses its mask instead of being staggered: the mask is
/// flung sideways off the face and becomes a pickup. An unmasked enemy is
/// knocked back along the slap direction and interrupted. Either outcome
/// counts toward the slap fury combo.
pub fn slap_enemy(
    state: &mut ArenaState,
    config: &SimConfig,
    id: EnemyId,
    direction: Vec3,
) -> bool {
    let rng = &mut state.rng;
    let Some(enemy) = state.enemies.get_mut(&id) else {
        return false;
    };
    if enemy.is_dead {
        return false;
    }

    let position = enemy.position;
    let mut knocked_off = None;

    if let Some(kind) = enemy.mask.take() {
        // The mask absorbs the hit; fling it off a random side of the face
        let side = rng.next_sign();
        let fling = (enemy.facing.horizontal_right() * side + Vec3::UP * 0.75)
            * config.mask.fling_speed;
        knocked_off = Some((kind, fling));
    } else {
        let dir = direction.horizontal().normalize_or(enemy.facing);
        enemy.velocity = dir * config.slap_knockback_speed;
        enemy.force_recover();
        enemy.stun_maneuver();
    }

    if let Some((kind, fling)) = knocked_off {
        state.spawn_mask_pickup(kind, position, fling);
    }
    score::register_slap_hit(state, &config.score, position);
    true
}

/// Apply damage to an enemy. Returns whether this hit killed it.
pub fn damage_enemy(state: &mut ArenaState, config: &SimConfig, id: EnemyId, amount: f32) -> bool {
    let Some(enemy) = state.enemies.get_mut(&id) else {
        return false;
    };
    if enemy.is_dead {
        return false;
    }

    enemy.health -= amount;
    if enemy.health <= 0.0 {
        kill_enemy(state, config, id, DeathCause::HealthDepleted);
        true
    } else {
        false
    }
}

/// Kill an enemy through either death path.
///
/// Idempotent: the latch is set before any effect, so a second call for the
/// same enemy in the same frame does nothing. The enemy's mask (if still
/// worn) drops as a pickup, score is awarded with the death-path bonus, and
/// the body is removed from the arena.
pub fn kill_enemy(state: &mut ArenaState, config: &SimConfig, id: EnemyId, cause: DeathCause) {
    let rng = &mut state.rng;
    let Some(enemy) = state.enemies.get_mut(&id) else {
        return;
    };
    if enemy.is_dead {
        return;
    }
    enemy.is_dead = true;

    let position = enemy.position;
    let base_value = enemy.stats.score_value;
    let dropped = enemy.mask.take().map(|kind| {
        let side = rng.next_sign();
        let fling = (enemy.facing.horizontal_right() * side + Vec3::UP * 0.75)
            * config.mask.fling_speed;
        (kind, fling)
    });

    state.push_event(GameEventData::EnemyDied { id, cause, position });
    state.push_event(GameEventData::Sound { name: "enemy-death".to_owned() });

    if let Some((kind, fling)) = dropped {
        state.spawn_mask_pickup(kind, position, fling);
    }

    let bonus = if cause == DeathCause::FatalFall {
        config.fatal_bonus_multiplier
    } else {
        1.0
    };
    let is_airborne = !state.player.grounded;
    score::add_score(state, &config.score, base_value, bonus, position, is_airborne);

    state.enemies.remove(&id);
}

/// Apply the consequences of a reported overlap.
///
/// Only a live, mid-lunge enemy does anything on contact: its own velocity
/// is halved and reversed, and the other body is shoved away along the
/// contact line with a slight upward tilt. Hitting the player also costs a
/// life and restarts the no-damage score window.
pub fn report_collision(state: &mut ArenaState, config: &SimConfig, report: CollisionReport) {
    let Some(enemy) = state.enemies.get_mut(&report.enemy) else {
        return;
    };
    if enemy.is_dead || !enemy.is_lunging() {
        return;
    }

    enemy.velocity = enemy.velocity * -0.5;
    let impulse = (report.other_position - enemy.position + Vec3::UP * 2.0)
        .normalize_or(Vec3::UP)
        * config.lunge_push_speed;

    match report.other {
        CollisionOther::Player => {
            state.player.velocity += impulse;
            state.player.lives = state.player.lives.saturating_sub(1);
            let lives_left = state.player.lives;
            state.push_event(GameEventData::PlayerDamaged { lives_left });
            score::reset_no_damage_timer(state);
        }
        CollisionOther::Enemy(other_id) => {
            if let Some(other) = state.enemies.get_mut(&other_id) {
                other.velocity += impulse;
            }
        }
    }
}

/// Attempt to collect a mask pickup for the player.
///
/// Fails while the pickup is still in its grace window (so a mask does not
/// snap back onto the player the instant it is slapped off) or when the
/// player is already carrying the limit.
pub fn try_pick_up_mask(state: &mut ArenaState, config: &SimConfig, id: MaskId) -> bool {
    let Some(pickup) = state.masks.get(&id) else {
        return false;
    };
    if pickup.age < config.mask.can_pick_up_after {
        return false;
    }
    if state.player.masks.len() >= config.mask.mask_limit {
        return false;
    }

    let kind = pickup.kind;
    state.masks.remove(&id);
    state.player.masks.push(kind);
    state.push_event(GameEventData::MaskPickedUp { kind });
    state.push_event(GameEventData::Sound { name: "pickup".to_owned() });
    true
}

/// Kill every live enemy that has fallen below the fatal height.
pub fn handle_fall_deaths(state: &mut ArenaState, config: &SimConfig) {
    let fallen: Vec<EnemyId> = state
        .enemies
        .iter()
        .filter(|(_, e)| !e.is_dead && e.position.y < config.fall_kill_height)
        .map(|(&id, _)| id)
        .collect();

    for id in fallen {
        kill_enemy(state, config, id, DeathCause::FatalFall);
    }
}

// =============================================================================
// TESTS
// =============================================================================
