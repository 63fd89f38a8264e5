//! Difficulty progression
//!
//! Pure functions of the level: scaled spawn tuning, time/speed/rate
//! multipliers, and the escalation decision.

use crate::config::{BalloonSpawnConfig, DifficultyConfig};

use super::state::GameState;

/// Maps levels onto scaled tuning values
#[derive(Debug, Clone, Default)]
pub struct DifficultyManager {
    spawn_config: BalloonSpawnConfig,
    difficulty: DifficultyConfig,
}

impl DifficultyManager {
    pub fn new(spawn_config: BalloonSpawnConfig, difficulty: DifficultyConfig) -> Self {
        Self {
            spawn_config,
            difficulty,
        }
    }

    pub fn difficulty_config(&self) -> &DifficultyConfig {
        &self.difficulty
    }

    /// Spawn tuning scaled for a level (1-based)
    pub fn spawn_config_for_level(&self, level: u32) -> BalloonSpawnConfig {
        self.spawn_config.for_level(level)
    }

    /// True once the current level's pop quota is met and a next level exists
    pub fn should_increase_difficulty(&self, state: &GameState) -> bool {
        let required = self.difficulty.required_balloons_for_level(state.level);
        state.balloons_popped >= required && state.level < self.difficulty.max_level
    }

    /// Global time scale: +5% per level, capped at +50%
    pub fn time_scale_for_level(&self, level: u32) -> f32 {
        1.0 + (level as f32 * 0.05).min(0.5)
    }

    /// Level-scaled score: +10% per level past the first
    pub fn level_score(&self, level: u32, base_score: u32) -> u32 {
        let multiplier = 1.0 + level.saturating_sub(1) as f32 * 0.1;
        (base_score as f32 * multiplier).round() as u32
    }

    /// Balloon speed multiplier: +15% per level, capped at 2x
    pub fn speed_multiplier(&self, level: u32) -> f32 {
        (1.0 + level.saturating_sub(1) as f32 * 0.15).min(2.0)
    }

    /// Spawn rate multiplier: +10% per level, capped at 3x
    pub fn spawn_rate_multiplier(&self, level: u32) -> f32 {
        (1.0 + level.saturating_sub(1) as f32 * 0.1).min(3.0)
    }
}
