//! Scoring calculations
//!
//! Pure functions parameterized by `DifficultyConfig`: per-pop score,
//! combo/reaction/completion bonuses, accuracy, and the end-of-session rank.

use crate::config::DifficultyConfig;

use super::balloon::Balloon;
use super::state::GameState;

/// Score thresholds for ranks 1-7; below the first is unranked (0)
pub const RANK_THRESHOLDS: [u32; 7] = [1000, 5000, 15_000, 30_000, 50_000, 75_000, 100_000];

/// Target time per level; faster completion earns a bonus
const LEVEL_TARGET_SECS: f64 = 120.0;

/// Reaction times under this earn a speed bonus
const REACTION_WINDOW_SECS: f64 = 0.5;

/// Pure scoring functions
#[derive(Debug, Clone, Default)]
pub struct ScoringService {
    config: DifficultyConfig,
}

impl ScoringService {
    pub fn new(config: DifficultyConfig) -> Self {
        Self { config }
    }

    /// Full per-pop score: level, state, and combo multipliers, never below 1
    pub fn score(&self, balloon: &Balloon, state: &GameState) -> u32 {
        let level_multiplier = 1.0 + state.level.saturating_sub(1) as f32 * 0.1;
        let combo_multiplier = self.config.combo_multiplier_for_count(state.combo);

        let final_score =
            balloon.points as f32 * level_multiplier * state.score_multiplier * combo_multiplier;
        (final_score.round() as u32).max(1)
    }

    /// Bonus once a combo reaches the configured threshold
    pub fn combo_bonus(&self, combo_count: u32, base_score: u32) -> u32 {
        if combo_count < self.config.combo_threshold {
            return 0;
        }
        let multiplier = (combo_count - self.config.combo_threshold + 1) as f32 * 0.1;
        (base_score as f32 * multiplier).round() as u32
    }

    /// Bonus for popping within half a second of the spawn
    pub fn time_bonus(&self, reaction_time: f64, base_score: u32) -> u32 {
        if reaction_time > REACTION_WINDOW_SECS {
            return 0;
        }
        (base_score as f64 * (REACTION_WINDOW_SECS - reaction_time)).round() as u32
    }

    /// Bonus for finishing a level: flat level pay, remaining lives, and a
    /// speed bonus against the two-minute target
    pub fn level_completion_bonus(
        &self,
        level: u32,
        remaining_lives: i32,
        completion_time: f64,
    ) -> u32 {
        let base_bonus = level * 100;
        let lives_bonus = remaining_lives.max(0) as u32 * 50;

        let time_bonus = if completion_time < LEVEL_TARGET_SECS {
            let ratio = 1.0 - completion_time / LEVEL_TARGET_SECS;
            (f64::from(base_bonus) * ratio).round() as u32
        } else {
            0
        };

        base_bonus + lives_bonus + time_bonus
    }

    /// Fraction of balloons popped rather than escaped; 1.0 for an empty session
    pub fn accuracy(&self, balloons_popped: u32, balloons_escaped: u32) -> f64 {
        let total = balloons_popped + balloons_escaped;
        if total == 0 {
            return 1.0;
        }
        f64::from(balloons_popped) / f64::from(total)
    }

    /// Rank 1-7 for a final score, 0 if unranked
    pub fn rank(&self, score: u32) -> u32 {
        for (i, threshold) in RANK_THRESHOLDS.iter().enumerate().rev() {
            if score >= *threshold {
                return i as u32 + 1;
            }
        }
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::balloon::{BalloonColor, BalloonKind};
    use glam::Vec2;

    fn service() -> ScoringService {
        ScoringService::default()
    }

    fn balloon(points: u32) -> Balloon {
        Balloon::new(
            1,
            BalloonKind::Normal,
            BalloonColor::Green,
            points,
            50.0,
            Vec2::ZERO,
            100.0,
            0.0,
            8.0,
        )
    }

    #[test]
    fn test_score_applies_all_multipliers() {
        let s = service();
        let mut state = GameState::default();
        state.level = 5;
        state.score_multiplier = 2.0;
        state.combo = 10;
        // 10 * 1.4 * 2.0 * 2.0 = 56
        assert_eq!(s.score(&balloon(10), &state), 56);
    }

    #[test]
    fn test_score_never_below_one() {
        let s = service();
        let state = GameState::default();
        assert_eq!(s.score(&balloon(0), &state), 1);
    }

    #[test]
    fn test_combo_bonus_below_threshold() {
        let s = service();
        // Default threshold is 5
        assert_eq!(s.combo_bonus(4, 100), 0);
        assert_eq!(s.combo_bonus(5, 100), 10);
        assert_eq!(s.combo_bonus(9, 100), 50);
    }

    #[test]
    fn test_combo_bonus_custom_threshold() {
        let s = ScoringService::new(DifficultyConfig {
            combo_threshold: 3,
            ..DifficultyConfig::default()
        });
        // (5 - 3 + 1) * 0.1 * 100 = 30
        assert_eq!(s.combo_bonus(5, 100), 30);
    }

    #[test]
    fn test_time_bonus_window() {
        let s = service();
        assert_eq!(s.time_bonus(0.6, 100), 0);
        assert_eq!(s.time_bonus(0.5, 100), 0);
        assert_eq!(s.time_bonus(0.3, 100), 20);
        assert_eq!(s.time_bonus(0.0, 100), 50);
    }

    #[test]
    fn test_level_completion_bonus() {
        let s = service();
        // Slow clear: no time bonus
        assert_eq!(s.level_completion_bonus(3, 2, 180.0), 300 + 100);
        // 60s of 120s target: half the base again
        assert_eq!(s.level_completion_bonus(3, 2, 60.0), 300 + 100 + 150);
        // Lives never pay negative
        assert_eq!(s.level_completion_bonus(1, -1, 180.0), 100);
    }

    #[test]
    fn test_accuracy() {
        let s = service();
        assert_eq!(s.accuracy(80, 20), 0.8);
        assert_eq!(s.accuracy(0, 0), 1.0);
        assert_eq!(s.accuracy(0, 10), 0.0);
    }

    #[test]
    fn test_rank_thresholds() {
        let s = service();
        assert_eq!(s.rank(0), 0);
        assert_eq!(s.rank(999), 0);
        assert_eq!(s.rank(1000), 1);
        assert_eq!(s.rank(14_999), 2);
        assert_eq!(s.rank(15_000), 3);
        assert_eq!(s.rank(100_000), 7);
        assert_eq!(s.rank(u32::MAX), 7);
    }
}
