//! Data-driven game balance
//!
//! Two tuning records: `BalloonSpawnConfig` scales per level and feeds the
//! spawner, `DifficultyConfig` holds session-wide progression constants.

use serde::{Deserialize, Serialize};

/// Tunable spawn parameters for one difficulty level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalloonSpawnConfig {
    /// Balloons per second
    pub base_spawn_rate: f32,
    /// Spawn-rate increase per level
    pub spawn_rate_increase: f32,
    pub max_spawn_rate: f32,

    /// Vertical speed in units per second
    pub base_speed: f32,
    /// Speed increase per level
    pub speed_increase: f32,
    pub max_speed: f32,

    /// Balloon diameter
    pub base_size: f32,
    /// +/- spread applied around `base_size`
    pub size_variation: f32,

    pub base_points: u32,
    /// Seconds before an untouched balloon expires
    pub life_span: f64,

    // Special balloon probabilities (0.0 to 1.0). Consumed as a cumulative
    // scan in a fixed priority order, so relative order matters.
    pub speed_chance: f32,
    pub giant_chance: f32,
    pub bonus_chance: f32,
    pub multiplier_chance: f32,
    pub bomb_chance: f32,
    pub shield_chance: f32,
    pub time_freeze_chance: f32,
    pub double_points_chance: f32,
}

impl Default for BalloonSpawnConfig {
    fn default() -> Self {
        Self {
            base_spawn_rate: 1.0,
            spawn_rate_increase: 0.1,
            max_spawn_rate: 5.0,

            base_speed: 100.0,
            speed_increase: 10.0,
            max_speed: 400.0,

            base_size: 50.0,
            size_variation: 20.0,

            base_points: 10,
            life_span: 8.0,

            speed_chance: 0.1,
            giant_chance: 0.08,
            bonus_chance: 0.05,
            multiplier_chance: 0.03,
            bomb_chance: 0.02,
            shield_chance: 0.02,
            time_freeze_chance: 0.015,
            double_points_chance: 0.025,
        }
    }
}

impl BalloonSpawnConfig {
    /// Derive the scaled config for a level (1-based)
    ///
    /// Rates and speed ramp linearly and are capped; life span shrinks with
    /// a 3-second floor; every special chance ramps to its own cap.
    pub fn for_level(&self, level: u32) -> Self {
        let steps = level.saturating_sub(1) as f32;
        let level = level as f32;
        Self {
            base_spawn_rate: (self.base_spawn_rate + self.spawn_rate_increase * steps)
                .min(self.max_spawn_rate),
            spawn_rate_increase: self.spawn_rate_increase,
            max_spawn_rate: self.max_spawn_rate,

            base_speed: (self.base_speed + self.speed_increase * steps).min(self.max_speed),
            speed_increase: self.speed_increase,
            max_speed: self.max_speed,

            base_size: self.base_size,
            size_variation: self.size_variation,
            base_points: self.base_points,
            life_span: (self.life_span - f64::from(level) * 0.1).max(3.0),

            speed_chance: (self.speed_chance + level * 0.005).min(0.2),
            giant_chance: (self.giant_chance + level * 0.003).min(0.15),
            bonus_chance: (self.bonus_chance + level * 0.002).min(0.1),
            multiplier_chance: (self.multiplier_chance + level * 0.001).min(0.06),
            bomb_chance: (self.bomb_chance + level * 0.001).min(0.05),
            shield_chance: (self.shield_chance + level * 0.001).min(0.04),
            time_freeze_chance: (self.time_freeze_chance + level * 0.0005).min(0.03),
            double_points_chance: (self.double_points_chance + level * 0.001).min(0.05),
        }
    }
}

/// Session-wide difficulty progression constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Pops required to clear level 1; later levels add 2 per level
    pub balloons_to_advance_level: u32,
    pub max_level: u32,
    pub lives_lost_per_escape: i32,
    pub starting_lives: i32,
    /// Combo length where the combo bonus starts paying out
    pub combo_threshold: u32,
    pub max_combo_count: u32,

    // Power-up durations in seconds
    pub double_points_duration: f64,
    pub shield_duration: f64,
    pub time_freeze_duration: f64,
    pub slow_motion_duration: f64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            balloons_to_advance_level: 20,
            max_level: 50,
            lives_lost_per_escape: 1,
            starting_lives: 3,
            combo_threshold: 5,
            max_combo_count: 20,

            double_points_duration: 10.0,
            shield_duration: 8.0,
            time_freeze_duration: 5.0,
            slow_motion_duration: 7.0,
        }
    }
}

impl DifficultyConfig {
    /// Pops required to clear the given level (1-based)
    pub fn required_balloons_for_level(&self, level: u32) -> u32 {
        self.balloons_to_advance_level + level.saturating_sub(1) * 2
    }

    /// Score multiplier for the current combo count, capped at `max_combo_count`
    pub fn combo_multiplier_for_count(&self, combo_count: u32) -> f32 {
        1.0 + combo_count.min(self.max_combo_count) as f32 * 0.1
    }
}
