//! Enemy Stats and Drive Logic
//!
//! Each enemy carries a static stats block chosen from the spawn pool and a
//! per-variant drive: chasers run a four-phase attack state machine, flyers
//! orbit the player on a maneuver timer and fire projectiles. Variants are
//! plain data selected by type tag, not trait objects.
//!
//! Steering contract: every fixed tick a drive computes a desired
//! *horizontal* velocity and an acceleration rate; the applied horizontal
//! velocity moves toward the desired one by at most `accel * dt`,
//! component-wise. The vertical component belongs to gravity and impulses
//! and is never written by steering (the one-shot lunge hop excepted).

use serde::{Deserialize, Serialize};

use crate::core::rng::DeterministicRng;
use crate::core::vec3::Vec3;
use crate::sim::events::{GameEvent, GameEventData};
use crate::sim::state::{EnemyId, MaskKind};

// =============================================================================
// STATIC STATS
// =============================================================================

/// Tunables for the chasing ground enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChaserParams {
    /// Chase speed (units/sec).
    pub move_speed: f32,
    /// Facing turn rate while chasing.
    pub turn_speed: f32,
    /// Acceleration while chasing.
    pub acceleration: f32,
    /// Acceleration during the wind-up creep.
    pub wind_up_acceleration: f32,
    /// Acceleration during the lunge burst.
    pub lunge_acceleration: f32,
    /// Braking acceleration while recovering.
    pub stop_acceleration: f32,
    /// Horizontal distance that triggers an attack.
    pub attack_range: f32,
    /// Seconds spent telegraphing before the lunge.
    pub wind_up_time: f32,
    /// Backward creep speed during wind-up.
    pub wind_up_retreat_speed: f32,
    /// Seconds the lunge lasts.
    pub lunge_duration: f32,
    /// Lunge burst speed.
    pub lunge_speed: f32,
    /// One-shot upward hop added on lunge entry.
    pub lunge_hop_velocity: f32,
    /// Seconds spent braking after a lunge (or a stagger).
    pub recovery_time: f32,
}

impl Default for ChaserParams {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            turn_speed: 10.0,
            acceleration: 20.0,
            wind_up_acceleration: 5.0,
            lunge_acceleration: 50.0,
            stop_acceleration: 10.0,
            attack_range: 1.5,
            wind_up_time: 0.5,
            wind_up_retreat_speed: 1.5,
            lunge_duration: 0.3,
            lunge_speed: 15.0,
            lunge_hop_velocity: 5.0,
            recovery_time: 1.0,
        }
    }
}

/// Tunables for the ranged flying enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlyerParams {
    /// Flight speed toward the current offset point.
    pub fly_speed: f32,
    /// Braking distance around the offset point.
    pub stop_distance: f32,
    /// Seconds between maneuvers; the flyer fires at the end of each.
    pub maneuver_period: f32,
    /// Radius of the horizontal offset disk around the player.
    pub offset_radius: f32,
    /// Base hover height above the player.
    pub height_offset: f32,
    /// Telegraph window before firing.
    pub charge_telegraph_time: f32,
}

impl Default for FlyerParams {
    fn default() -> Self {
        Self {
            fly_speed: 5.0,
            stop_distance: 2.0,
            maneuver_period: 3.0,
            offset_radius: 5.0,
            height_offset: 4.0,
            charge_telegraph_time: 1.0,
        }
    }
}

/// Per-variant tunables, selected by type tag.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Archetype {
    /// Ground enemy with the chase/wind-up/lunge/recover state machine.
    Chaser(ChaserParams),
    /// Flying enemy that orbits and fires projectiles.
    Flyer(FlyerParams),
}

/// Static stats for one enemy type, as configured in the spawn pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Display name, used in spawn events and logs.
    pub name: String,
    /// Budget price in the wave allocator.
    pub power_cost: i32,
    /// Starting health.
    pub max_health: f32,
    /// Base score awarded on death.
    pub score_value: i32,
    /// Mask the enemy spawns with, if any.
    pub mask: Option<MaskKind>,
    /// Variant tunables.
    pub archetype: Archetype,
}

impl EnemyStats {
    /// Baseline ground chaser.
    pub fn chaser() -> Self {
        Self {
            name: "chaser".to_owned(),
            power_cost: 5,
            max_health: 30.0,
            score_value: 100,
            mask: None,
            archetype: Archetype::Chaser(ChaserParams::default()),
        }
    }

    /// Chaser protected by a basic mask (one slap to strip).
    pub fn masked_chaser() -> Self {
        Self {
            name: "masked-chaser".to_owned(),
            power_cost: 10,
            max_health: 30.0,
            score_value: 150,
            mask: Some(MaskKind::Basic),
            archetype: Archetype::Chaser(ChaserParams::default()),
        }
    }

    /// Flying ranged enemy carrying a wind mask.
    pub fn flyer() -> Self {
        Self {
            name: "flyer".to_owned(),
            power_cost: 10,
            max_health: 20.0,
            score_value: 120,
            mask: Some(MaskKind::Wind),
            archetype: Archetype::Flyer(FlyerParams::default()),
        }
    }
}

// =============================================================================
// DRIVE STATE
// =============================================================================

/// Attack phase of the chaser state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyPhase {
    /// Closing horizontal distance to the player.
    #[default]
    Chasing,
    /// Telegraphing: slow backward creep, direction locked in.
    WindUp,
    /// Forward burst along the locked direction.
    Lunge,
    /// Braking to a stop before chasing again.
    Recovering,
}

/// Mutable chaser drive state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChaserDrive {
    /// Current phase.
    pub phase: EnemyPhase,
    /// Seconds elapsed since the last phase transition.
    pub phase_timer: f32,
    /// Horizontal unit direction snapshotted at wind-up entry.
    /// Never re-read from the player afterward: the lunge is non-homing.
    pub attack_direction: Vec3,
}

/// Mutable flyer drive state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlyerDrive {
    /// Current offset from the player being flown toward.
    pub target_offset: Vec3,
    /// Seconds into the current maneuver. Negative values act as a stun.
    pub maneuver_timer: f32,
    /// Whether the pre-fire telegraph is active.
    pub charging: bool,
}

/// Per-variant mutable drive, paired with the matching `Archetype`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DriveState {
    /// Chaser state machine.
    Chaser(ChaserDrive),
    /// Flyer maneuver state.
    Flyer(FlyerDrive),
}

// =============================================================================
// ENEMY STATE
// =============================================================================

/// One live enemy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnemyState {
    /// Unique identifier (monotonic per session).
    pub id: EnemyId,
    /// Static stats chosen from the spawn pool.
    pub stats: EnemyStats,
    /// World position (written back by the external integrator).
    pub position: Vec3,
    /// World velocity. Steering writes the horizontal components only.
    pub velocity: Vec3,
    /// Horizontal unit facing direction.
    pub facing: Vec3,
    /// Remaining health.
    pub health: f32,
    /// Currently held mask, if any.
    pub mask: Option<MaskKind>,
    /// Death latch: set exactly once, makes both death paths idempotent.
    pub is_dead: bool,
    /// Variant drive state.
    pub drive: DriveState,
}

impl EnemyState {
    /// Create a new enemy at a spawn position, facing `facing`.
    ///
    /// Flyers roll their first hover offset here so they do not all open
    /// by flying straight at the player.
    pub fn new(
        id: EnemyId,
        stats: EnemyStats,
        position: Vec3,
        facing: Vec3,
        rng: &mut DeterministicRng,
    ) -> Self {
        let drive = match stats.archetype {
            Archetype::Chaser(_) => DriveState::Chaser(ChaserDrive::default()),
            Archetype::Flyer(params) => DriveState::Flyer(FlyerDrive {
                target_offset: roll_flyer_offset(rng, params),
                ..FlyerDrive::default()
            }),
        };

        Self {
            id,
            health: stats.max_health,
            mask: stats.mask,
            stats,
            position,
            velocity: Vec3::ZERO,
            facing: facing.horizontal().normalize_or(Vec3::X),
            is_dead: false,
            drive,
        }
    }

    /// Current chaser phase, if this enemy is a chaser.
    pub fn phase(&self) -> Option<EnemyPhase> {
        match self.drive {
            DriveState::Chaser(drive) => Some(drive.phase),
            DriveState::Flyer(_) => None,
        }
    }

    /// Whether this enemy is mid-lunge (the only phase with collision rules).
    pub fn is_lunging(&self) -> bool {
        self.phase() == Some(EnemyPhase::Lunge)
    }

    /// Advance the drive by one fixed tick.
    ///
    /// Per-enemy updates are independent of each other; the caller may run
    /// them in any order within a tick.
    pub fn fixed_update(
        &mut self,
        player_pos: Vec3,
        dt: f32,
        rng: &mut DeterministicRng,
        events: &mut Vec<GameEvent>,
        tick: u64,
    ) {
        if self.is_dead {
            return;
        }
        match self.stats.archetype {
            Archetype::Chaser(params) => self.chaser_update(params, player_pos, dt),
            Archetype::Flyer(params) => self.flyer_update(params, player_pos, dt, rng, events, tick),
        }
    }

    /// Forced transition to `Recovering`, discarding any in-flight wind-up
    /// or lunge progress. Used by the stagger interrupt; no-op for flyers.
    pub fn force_recover(&mut self) {
        if let DriveState::Chaser(drive) = &mut self.drive {
            drive.phase = EnemyPhase::Recovering;
            drive.phase_timer = 0.0;
        }
    }

    /// Stun a flyer by rewinding its maneuver timer; no-op for chasers.
    pub fn stun_maneuver(&mut self) {
        if let DriveState::Flyer(drive) = &mut self.drive {
            drive.maneuver_timer = -1.0;
            drive.charging = false;
        }
    }

    // =========================================================================
    // Chaser
    // =========================================================================

    fn chaser_update(&mut self, p: ChaserParams, player_pos: Vec3, dt: f32) {
        let DriveState::Chaser(drive) = &mut self.drive else {
            return;
        };
        drive.phase_timer += dt;

        let desired;
        let accel;
        let mut next_phase = None;

        match drive.phase {
            EnemyPhase::Chasing => {
                accel = p.acceleration;
                let to_player = (player_pos - self.position).horizontal();
                if to_player.length() <= p.attack_range {
                    desired = Vec3::ZERO;
                    next_phase = Some(EnemyPhase::WindUp);
                } else {
                    let dir = to_player.normalize_or(self.facing);
                    self.facing = turn_towards(self.facing, dir, p.turn_speed * dt);
                    desired = dir * p.move_speed;
                }
            }
            EnemyPhase::WindUp => {
                // Slow backward creep along the locked direction
                accel = p.wind_up_acceleration;
                desired = -drive.attack_direction * p.wind_up_retreat_speed;
                if drive.phase_timer >= p.wind_up_time {
                    next_phase = Some(EnemyPhase::Lunge);
                }
            }
            EnemyPhase::Lunge => {
                accel = p.lunge_acceleration;
                desired = drive.attack_direction * p.lunge_speed;
                if drive.phase_timer >= p.lunge_duration {
                    next_phase = Some(EnemyPhase::Recovering);
                }
            }
            EnemyPhase::Recovering => {
                accel = p.stop_acceleration;
                desired = Vec3::ZERO;
                if drive.phase_timer >= p.recovery_time {
                    next_phase = Some(EnemyPhase::Chasing);
                }
            }
        }

        // Rate-limited horizontal blend; vertical velocity untouched
        let horizontal = self.velocity.horizontal().move_towards(desired, accel * dt);
        self.velocity = Vec3::new(horizontal.x, self.velocity.y, horizontal.z);

        if let Some(phase) = next_phase {
            self.enter_phase(phase, player_pos, p);
        }
    }

    fn enter_phase(&mut self, phase: EnemyPhase, player_pos: Vec3, p: ChaserParams) {
        let attack_dir = (player_pos - self.position).horizontal().normalize_or(self.facing);

        let DriveState::Chaser(drive) = &mut self.drive else {
            return;
        };
        drive.phase = phase;
        drive.phase_timer = 0.0;

        match phase {
            EnemyPhase::WindUp => {
                // Lock in the attack direction; the lunge will not re-aim
                drive.attack_direction = attack_dir;
                self.facing = attack_dir;
            }
            EnemyPhase::Lunge => {
                // One-shot hop to sell the attack
                self.velocity.y += p.lunge_hop_velocity;
            }
            EnemyPhase::Chasing | EnemyPhase::Recovering => {}
        }
    }

    // =========================================================================
    // Flyer
    // =========================================================================

    fn flyer_update(
        &mut self,
        p: FlyerParams,
        player_pos: Vec3,
        dt: f32,
        rng: &mut DeterministicRng,
        events: &mut Vec<GameEvent>,
        tick: u64,
    ) {
        let id = self.id;
        let position = self.position;
        let facing = self.facing;

        let DriveState::Flyer(drive) = &mut self.drive else {
            return;
        };
        drive.maneuver_timer += dt;

        let remaining = p.maneuver_period - drive.maneuver_timer;
        if remaining <= p.charge_telegraph_time && !drive.charging {
            drive.charging = true;
            events.push(GameEvent::new(tick, GameEventData::FlyerCharging { id }));
        }

        if drive.maneuver_timer >= p.maneuver_period {
            let direction = (player_pos - position).normalize_or(facing);
            events.push(GameEvent::projectile_fired(tick, id, position, direction));
            events.push(GameEvent::sound(tick, "mask-wind"));

            drive.target_offset = roll_flyer_offset(rng, p);
            drive.maneuver_timer = 0.0;
            drive.charging = false;
        }

        // Fly toward the player plus the current offset
        let target = player_pos + drive.target_offset;
        let to_target = target - self.position;
        if to_target.length() > p.stop_distance {
            let desired = to_target.normalize() * p.fly_speed;
            self.velocity = self.velocity.lerp(desired, (2.0 * dt).min(1.0));
        } else {
            // Light braking near the point to avoid jitter
            self.velocity = self.velocity * 0.95;
        }

        self.facing = (player_pos - self.position).horizontal().normalize_or(self.facing);
    }
}

/// Roll a fresh hover offset: a point in a horizontal disk around the
/// player, lifted by the flyer's height band.
pub(crate) fn roll_flyer_offset(rng: &mut DeterministicRng, p: FlyerParams) -> Vec3 {
    let angle = rng.next_angle();
    let radius = p.offset_radius * rng.next_f32().sqrt();
    Vec3::new(
        angle.cos() * radius,
        p.height_offset + rng.next_f32_range(-1.0, 3.0),
        angle.sin() * radius,
    )
}

/// Blend a horizontal facing toward a target direction.
fn turn_towards(facing: Vec3, dir: Vec3, t: f32) -> Vec3 {
    facing.lerp(dir, t.min(1.0)).horizontal().normalize_or(dir)
}

// =============================================================================
// TESTS
// =============================================================================
