//! Outbound notifications
//!
//! Every payload is a value snapshot taken at emission time, never a live
//! reference, so a subscriber can hold events across ticks safely.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::balloon::Balloon;
use super::state::{GameState, PowerUpKind};

/// Discrete notification from the simulation core to its host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    /// A balloon entered the active set
    BalloonSpawned(Balloon),
    /// A balloon left the active set (popped, expired, or escaped)
    BalloonRemoved(Balloon),
    /// A tap popped a balloon
    BalloonPopped {
        balloon: Balloon,
        score_earned: u32,
        tap: Vec2,
    },
    /// A bomb balloon detonated
    BombExploded {
        bomb: Balloon,
        center: Vec2,
        radius: f32,
        popped: Vec<Balloon>,
        total_score: u32,
    },
    /// A special balloon granted a power-up
    PowerUpActivated {
        kind: PowerUpKind,
        source: Balloon,
        /// Game-clock second of activation
        at: f64,
    },
    /// Full session snapshot after a state transition
    StateChanged(GameState),
    ScoreChanged(u32),
    LevelChanged(u32),
    LivesChanged(i32),
    GameOver,
    LevelComplete,
}
