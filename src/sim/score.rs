//! Score Engine
//!
//! Score is `base * global_multiplier * death_path_bonus`. The global
//! multiplier only ever grows: two independent passive timers (time alive,
//! time without taking damage), triple kills, airborne kills and the slap
//! fury combo all add to it permanently, and a kill that grows it is scored
//! with the grown value.
//!
//! All feedback (floating text, camera shake) is emitted as events; the
//! engine itself never formats anything for a specific renderer.

use serde::{Deserialize, Serialize};

use crate::core::vec3::Vec3;
use crate::sim::events::{GameEventData, TextColor};
use crate::sim::state::ArenaState;

/// Score engine tunables.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Global multiplier growth per passive window.
    pub multiplier_increment: f32,
    /// Seconds per time-alive window.
    pub game_time_interval: f32,
    /// Seconds per no-damage window.
    pub no_damage_interval: f32,
    /// Per-kill bonus for killing while the player is airborne.
    pub airborne_bonus: f32,
    /// Per-kill bonus for the third kill of a streak.
    pub multi_kill_bonus: f32,
    /// Seconds between kills that keep a streak alive.
    pub multi_kill_duration: f32,
    /// Slap count that triggers a fury.
    pub slap_target_count: u32,
    /// Seconds between slap hits that keep the combo alive.
    pub slap_combo_duration: f32,
    /// Global multiplier reward for a slap fury.
    pub slap_combo_bonus: f32,
    /// Camera shake duration for kills.
    pub shake_duration: f32,
    /// Camera shake duration for a slap fury.
    pub fury_shake_duration: f32,
    /// Shake intensity for ordinary kills.
    pub normal_shake: f32,
    /// Shake intensity for fatal falls and triple kills.
    pub big_shake: f32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            multiplier_increment: 0.1,
            game_time_interval: 5.0,
            no_damage_interval: 5.0,
            airborne_bonus: 0.05,
            multi_kill_bonus: 0.1,
            multi_kill_duration: 3.0,
            slap_target_count: 5,
            slap_combo_duration: 5.0,
            slap_combo_bonus: 0.5,
            shake_duration: 0.15,
            fury_shake_duration: 0.2,
            normal_shake: 0.1,
            big_shake: 0.4,
        }
    }
}

/// Mutable score and combo state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    /// Accumulated score.
    pub current_score: f32,
    /// Global multiplier. Starts at 1.0 and never decreases.
    pub global_multiplier: f32,
    /// Seconds into the current time-alive window.
    pub game_time_timer: f32,
    /// Seconds into the current no-damage window.
    pub no_damage_timer: f32,
    /// Kills in the current streak.
    pub kill_streak: u32,
    /// Session time of the last kill, if any.
    pub last_kill_time: Option<f32>,
    /// Slap hits in the current combo.
    pub slap_streak: u32,
    /// Session time of the last slap hit, if any.
    pub last_slap_time: Option<f32>,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            current_score: 0.0,
            global_multiplier: 1.0,
            game_time_timer: 0.0,
            no_damage_timer: 0.0,
            kill_streak: 0,
            last_kill_time: None,
            slap_streak: 0,
            last_slap_time: None,
        }
    }
}

/// Advance both passive multiplier windows and expire stale kill streaks.
///
/// The windows are independent: both can complete on the same frame and
/// each grants its own increment.
pub fn tick_score_timers(state: &mut ArenaState, config: &ScoreConfig, dt: f32) {
    let score = &mut state.score;

    score.game_time_timer += dt;
    if score.game_time_timer >= config.game_time_interval {
        score.game_time_timer = 0.0;
        score.global_multiplier += config.multiplier_increment;
    }

    score.no_damage_timer += dt;
    if score.no_damage_timer >= config.no_damage_interval {
        score.no_damage_timer = 0.0;
        score.global_multiplier += config.multiplier_increment;
    }

    if let Some(last) = score.last_kill_time {
        if state.time - last > config.multi_kill_duration {
            score.kill_streak = 0;
            score.last_kill_time = None;
        }
    }
}

/// Restart the no-damage window. Called whenever the player takes a hit.
pub fn reset_no_damage_timer(state: &mut ArenaState) {
    state.score.no_damage_timer = 0.0;
}

/// Award score for a kill.
///
/// `bonus` is the death-path multiplier (1.0 for health kills, higher for
/// fatal falls); a bonus above 1.5 marks the kill as fatal for labeling
/// and shake purposes. Triple kills and airborne kills each grow the
/// global multiplier permanently, and the grown value applies to this
/// kill too. Emits the floating text and camera shake feedback and
/// returns the points gained.
pub fn add_score(
    state: &mut ArenaState,
    config: &ScoreConfig,
    base_value: i32,
    bonus: f32,
    position: Vec3,
    is_airborne: bool,
) -> f32 {
    let is_fatal = bonus > 1.5;
    let time = state.time;
    let score = &mut state.score;

    // Streak bookkeeping: a kill inside the window extends the streak,
    // otherwise the streak restarts at this kill
    let in_window = score
        .last_kill_time
        .is_some_and(|last| time - last <= config.multi_kill_duration);
    score.kill_streak = if in_window { score.kill_streak + 1 } else { 1 };
    score.last_kill_time = Some(time);

    let is_triple = score.kill_streak >= 3;
    if is_triple {
        score.global_multiplier += config.multi_kill_bonus;
        score.kill_streak = 0;
    }
    if is_airborne {
        score.global_multiplier += config.airborne_bonus;
    }

    let final_multiplier = score.global_multiplier * bonus;
    let gain = base_value as f32 * final_multiplier;
    score.current_score += gain;

    // Feedback: one label at most, most dramatic first
    let label = if is_fatal {
        Some("FATAL!")
    } else if is_triple {
        Some("TRIPLE KILL!")
    } else if is_airborne {
        Some("AIRBORNE!")
    } else {
        None
    };

    let score_line = format!("{} (x{:.1})", gain.round() as i64, final_multiplier);
    let (text, color) = match label {
        Some(label) => {
            let color = if is_airborne && !is_fatal && !is_triple {
                TextColor::Cyan
            } else {
                TextColor::Magenta
            };
            (format!("{label}\n{score_line}"), Some(color))
        }
        None => (score_line, None),
    };

    let intensity = if is_fatal || is_triple {
        config.big_shake
    } else {
        config.normal_shake
    };

    state.push_event(GameEventData::FloatingText { position, text, color });
    state.push_event(GameEventData::CameraShake {
        duration: config.shake_duration,
        intensity,
    });

    gain
}

/// Record one successful slap hit for the fury combo.
///
/// A hit outside the combo window restarts the count. Reaching the target
/// count grants the fury bonus to the global multiplier and resets the
/// count to zero, so back-to-back furies each need a full set of slaps.
pub fn register_slap_hit(state: &mut ArenaState, config: &ScoreConfig, position: Vec3) {
    let time = state.time;
    let score = &mut state.score;

    if score
        .last_slap_time
        .is_some_and(|last| time - last > config.slap_combo_duration)
    {
        score.slap_streak = 0;
    }
    score.slap_streak += 1;
    score.last_slap_time = Some(time);

    if score.slap_streak >= config.slap_target_count {
        let count = score.slap_streak;
        score.global_multiplier += config.slap_combo_bonus;
        score.slap_streak = 0;
        score.last_slap_time = None;

        state.push_event(GameEventData::FloatingText {
            position,
            text: format!("{count}x SLAP FURY!"),
            color: Some(TextColor::Gold),
        });
        state.push_event(GameEventData::CameraShake {
            duration: config.fury_shake_duration,
            intensity: config.normal_shake,
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::GameEventData;
    use crate::sim::state::SessionId;
    use crate::sim::tick::SimConfig;
    use proptest::prelude::*;

    fn test_state() -> ArenaState {
        ArenaState::new(SessionId([1u8; 16]), 7, &SimConfig::default())
    }

    fn shake_intensity(state: &mut ArenaState) -> f32 {
        state
            .take_events()
            .iter()
            .find_map(|e| match e.data {
                GameEventData::CameraShake { intensity, .. } => Some(intensity),
                _ => None,
            })
            .expect("kill should emit a shake")
    }

    #[test]
    fn test_plain_kill_scoring() {
        let mut state = test_state();
        let config = ScoreConfig::default();

        let gain = add_score(&mut state, &config, 100, 1.0, Vec3::ZERO, false);

        // 100 * (1.0 global * 1.0 bonus)
        assert_eq!(gain, 100.0);
        assert_eq!(state.score.current_score, 100.0);
        assert_eq!(state.score.kill_streak, 1);

        let events = state.take_events();
        assert!(matches!(
            &events[0].data,
            GameEventData::FloatingText { text, color: None, .. } if text == "100 (x1.0)"
        ));
    }

    #[test]
    fn test_fatal_kill_label_and_big_shake() {
        let mut state = test_state();
        let config = ScoreConfig::default();

        // No streak, not airborne: the bonus alone must mark the kill fatal
        let gain = add_score(&mut state, &config, 100, 2.0, Vec3::ZERO, false);
        assert_eq!(gain, 200.0);
        assert_eq!(state.score.kill_streak, 1);

        let events = state.take_events();
        let GameEventData::FloatingText { text, color, .. } = &events[0].data else {
            panic!("expected floating text");
        };
        assert!(text.starts_with("FATAL!\n"));
        assert_eq!(*color, Some(TextColor::Magenta));

        let GameEventData::CameraShake { intensity, .. } = events[1].data else {
            panic!("expected shake");
        };
        assert_eq!(intensity, config.big_shake);
    }

    #[test]
    fn test_airborne_kill_adds_bonus() {
        let mut state = test_state();
        let config = ScoreConfig::default();

        let gain = add_score(&mut state, &config, 100, 1.0, Vec3::ZERO, true);
        assert!((gain - 105.0).abs() < 1e-3);
        // The airborne increment is permanent
        assert!((state.score.global_multiplier - 1.05).abs() < 1e-4);

        let events = state.take_events();
        let GameEventData::FloatingText { text, color, .. } = &events[0].data else {
            panic!("expected floating text");
        };
        assert!(text.starts_with("AIRBORNE!\n"));
        assert_eq!(*color, Some(TextColor::Cyan));
    }

    #[test]
    fn test_triple_kill_inside_window() {
        let mut state = test_state();
        let config = ScoreConfig::default();

        add_score(&mut state, &config, 100, 1.0, Vec3::ZERO, false);
        state.time += 1.0;
        add_score(&mut state, &config, 100, 1.0, Vec3::ZERO, false);
        state.time += 1.0;
        state.take_events();

        let gain = add_score(&mut state, &config, 100, 1.0, Vec3::ZERO, false);

        // Third kill scores with the freshly grown multiplier
        assert!((gain - 110.0).abs() < 1e-3);
        assert!((state.score.global_multiplier - 1.1).abs() < 1e-4);
        // Streak resets after the triple fires
        assert_eq!(state.score.kill_streak, 0);
        assert_eq!(shake_intensity(&mut state), config.big_shake);
    }

    #[test]
    fn test_kill_outside_window_restarts_streak() {
        let mut state = test_state();
        let config = ScoreConfig::default();

        add_score(&mut state, &config, 100, 1.0, Vec3::ZERO, false);
        add_score(&mut state, &config, 100, 1.0, Vec3::ZERO, false);
        assert_eq!(state.score.kill_streak, 2);

        // Past the window: next kill is a streak of one, not a triple
        state.time += 3.5;
        let gain = add_score(&mut state, &config, 100, 1.0, Vec3::ZERO, false);
        assert_eq!(gain, 100.0);
        assert_eq!(state.score.kill_streak, 1);
    }

    #[test]
    fn test_streak_expires_via_timer_tick() {
        let mut state = test_state();
        let config = ScoreConfig::default();

        add_score(&mut state, &config, 100, 1.0, Vec3::ZERO, false);
        state.time += 4.0;
        tick_score_timers(&mut state, &config, 0.016);

        assert_eq!(state.score.kill_streak, 0);
        assert_eq!(state.score.last_kill_time, None);
    }

    #[test]
    fn test_both_passive_windows_fire_same_frame() {
        let mut state = test_state();
        let config = ScoreConfig::default();

        // Both intervals are 5s; one big step completes both at once
        tick_score_timers(&mut state, &config, 5.0);

        assert!((state.score.global_multiplier - 1.2).abs() < 1e-4);
        assert_eq!(state.score.game_time_timer, 0.0);
        assert_eq!(state.score.no_damage_timer, 0.0);
    }

    #[test]
    fn test_damage_resets_only_the_no_damage_window() {
        let mut state = test_state();
        let config = ScoreConfig::default();

        tick_score_timers(&mut state, &config, 3.0);
        reset_no_damage_timer(&mut state);

        assert_eq!(state.score.no_damage_timer, 0.0);
        assert_eq!(state.score.game_time_timer, 3.0);
    }

    #[test]
    fn test_slap_fury_triggers_and_resets() {
        let mut state = test_state();
        let config = ScoreConfig::default();

        for i in 0..5 {
            state.time += 0.5;
            register_slap_hit(&mut state, &config, Vec3::ZERO);
            if i < 4 {
                assert!(state.take_events().is_empty());
            }
        }

        assert!((state.score.global_multiplier - 1.5).abs() < 1e-4);
        assert_eq!(state.score.slap_streak, 0);

        let events = state.take_events();
        assert!(matches!(
            &events[0].data,
            GameEventData::FloatingText { text, color: Some(TextColor::Gold), .. }
                if text == "5x SLAP FURY!"
        ));

        // A fresh fury needs a full new set of slaps
        state.time += 0.5;
        register_slap_hit(&mut state, &config, Vec3::ZERO);
        assert_eq!(state.score.slap_streak, 1);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_slap_combo_expires_between_hits() {
        let mut state = test_state();
        let config = ScoreConfig::default();

        for _ in 0..4 {
            state.time += 0.5;
            register_slap_hit(&mut state, &config, Vec3::ZERO);
        }
        assert_eq!(state.score.slap_streak, 4);

        // Stale gap: the next hit starts a new combo
        state.time += 6.0;
        register_slap_hit(&mut state, &config, Vec3::ZERO);
        assert_eq!(state.score.slap_streak, 1);
        assert!((state.score.global_multiplier - 1.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn test_global_multiplier_never_decreases(
            steps in proptest::collection::vec(0.0f32..2.0, 1..50)
        ) {
            let mut state = test_state();
            let config = ScoreConfig::default();
            let mut prev = state.score.global_multiplier;

            for dt in steps {
                state.time += dt;
                tick_score_timers(&mut state, &config, dt);
                prop_assert!(state.score.global_multiplier >= prev);
                prev = state.score.global_multiplier;
            }
        }
    }
}
