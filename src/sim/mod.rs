//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Game-clock timing only (no wall-clock reads)
//! - No rendering or platform dependencies

pub mod balloon;
pub mod difficulty;
pub mod engine;
pub mod event;
pub mod interact;
pub mod scoring;
pub mod spawn;
pub mod state;

pub use balloon::{Balloon, BalloonColor, BalloonKind};
pub use difficulty::DifficultyManager;
pub use engine::GameEngine;
pub use event::GameEvent;
pub use interact::{balloons_in_blast_radius, point_inside_balloon, process_bomb_explosion, try_pop};
pub use scoring::ScoringService;
pub use spawn::Spawner;
pub use state::{GameState, GameStateManager, GameStatus, PowerUpKind, SharedGameState};
