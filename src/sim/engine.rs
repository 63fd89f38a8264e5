//! Game engine orchestrator
//!
//! Thin glue over the sim components: owns the active balloon set, runs the
//! fixed-tick update, routes taps through the interaction resolver into the
//! state manager, and retunes the spawner as levels change. The host drives
//! it with frame deltas and drains notifications after each tick.

use glam::Vec2;

use crate::config::{BalloonSpawnConfig, DifficultyConfig};
use crate::consts::TIME_FREEZE_SCALE;

use super::balloon::{Balloon, BalloonKind};
use super::difficulty::DifficultyManager;
use super::event::GameEvent;
use super::interact::{point_inside_balloon, process_bomb_explosion, try_pop};
use super::scoring::ScoringService;
use super::spawn::Spawner;
use super::state::{GameState, GameStateManager, GameStatus, SharedGameState};

/// Orchestrates one game session
#[derive(Debug)]
pub struct GameEngine {
    balloons: Vec<Balloon>,
    spawner: Spawner,
    state: GameStateManager,
    difficulty: DifficultyManager,
    scoring: ScoringService,
    shared: SharedGameState,
    events: Vec<GameEvent>,
    area: Vec2,
    running: bool,
    /// Last level the spawner was tuned for
    current_level: u32,
    /// Game-clock second the current level began
    level_started_at: f64,
}

impl GameEngine {
    pub fn new(seed: u64) -> Self {
        Self::with_configs(seed, BalloonSpawnConfig::default(), DifficultyConfig::default())
    }

    pub fn with_configs(
        seed: u64,
        spawn_config: BalloonSpawnConfig,
        difficulty_config: DifficultyConfig,
    ) -> Self {
        Self {
            balloons: Vec::new(),
            spawner: Spawner::new(seed),
            state: GameStateManager::new(difficulty_config.clone()),
            difficulty: DifficultyManager::new(spawn_config, difficulty_config.clone()),
            scoring: ScoringService::new(difficulty_config),
            shared: SharedGameState::new(),
            events: Vec::new(),
            area: Vec2::ZERO,
            running: false,
            current_level: 1,
            level_started_at: 0.0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Authoritative session state
    pub fn state(&self) -> &GameState {
        self.state.state()
    }

    /// Balloons currently in play
    pub fn balloons(&self) -> &[Balloon] {
        &self.balloons
    }

    pub fn scoring(&self) -> &ScoringService {
        &self.scoring
    }

    /// Handle for a presentation layer polling snapshots from another thread
    pub fn shared_state(&self) -> SharedGameState {
        self.shared.clone()
    }

    /// Take every notification accumulated since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Record the play-area size; takes effect at the next session start
    pub fn set_game_area(&mut self, width: f32, height: f32) {
        self.area = Vec2::new(width, height);
    }

    /// Start a fresh session at level 1
    pub fn start_game(&mut self, width: f32, height: f32) {
        self.start_game_at_level(width, height, 1);
    }

    /// Start a fresh session at a chosen difficulty level
    pub fn start_game_at_level(&mut self, width: f32, height: f32, level: u32) {
        self.area = Vec2::new(width, height);
        self.balloons.clear();

        self.state.start_new_game(level, &mut self.events);
        let level = self.state.state().level;
        self.spawner
            .start_spawning(self.difficulty.spawn_config_for_level(level), self.area);

        self.current_level = level;
        self.level_started_at = 0.0;
        self.running = true;
        log::info!(
            "session started at level {level}, area {}x{}",
            self.area.x,
            self.area.y
        );
        self.shared.publish(self.state.state());
    }

    /// Pause; a no-op unless currently Playing
    pub fn pause_game(&mut self) {
        if !self.running {
            return;
        }
        self.state.pause_game(&mut self.events);
        if self.state.state().status == GameStatus::Paused {
            self.spawner.stop_spawning();
            self.shared.publish(self.state.state());
        }
    }

    /// Resume from pause; a no-op from any other status
    pub fn resume_game(&mut self) {
        if !self.running || self.state.state().status != GameStatus::Paused {
            return;
        }
        self.state.resume_game(&mut self.events);
        let level = self.state.state().level;
        self.spawner
            .start_spawning(self.difficulty.spawn_config_for_level(level), self.area);
        self.shared.publish(self.state.state());
    }

    /// Force the session over; idempotent
    pub fn end_game(&mut self) {
        self.state.end_game(&mut self.events);
        self.shutdown_session();
        self.shared.publish(self.state.state());
    }

    /// Resolve a tap against the topmost balloon under it
    pub fn process_tap(&mut self, tap: Vec2) {
        if !self.running || self.state.state().status != GameStatus::Playing {
            return;
        }
        let now = self.state.state().game_time;

        let Some(idx) = self
            .balloons
            .iter()
            .position(|b| !b.is_popped() && point_inside_balloon(tap, b))
        else {
            return;
        };

        if !try_pop(&mut self.balloons[idx], tap, now, &mut self.events) {
            return;
        }
        let (kind, base_points) = (self.balloons[idx].kind, self.balloons[idx].points);
        self.state.process_pop(kind, base_points, &mut self.events);

        if kind == BalloonKind::Bomb {
            let bomb = self.balloons[idx].clone();
            let victims = process_bomb_explosion(&bomb, &mut self.balloons, &mut self.events);
            for victim in victims {
                self.state
                    .process_pop(victim.kind, victim.points, &mut self.events);
            }
        }

        self.shared.publish(self.state.state());
    }

    /// Advance the session by one frame delta (seconds, clamped to >= 0)
    pub fn update(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        let dt = dt.max(0.0);

        self.state.update(dt, &mut self.events);

        if self.state.state().status == GameStatus::Playing {
            // Frozen time slows balloons to a crawl without stalling the clock
            let move_dt = if self.state.state().time_frozen {
                dt * TIME_FREEZE_SCALE
            } else {
                dt
            };
            for balloon in &mut self.balloons {
                if !balloon.is_popped() {
                    balloon.update(move_dt);
                }
            }

            let now = self.state.state().game_time;
            self.spawner
                .update(dt, now, &mut self.events, &mut self.balloons);

            self.remove_finished_balloons(now);
        }

        self.sync_level();

        if self.state.state().status == GameStatus::GameOver {
            self.shutdown_session();
        }

        self.shared.publish(self.state.state());
    }

    /// Drop every balloon whose time is up, reporting escapes exactly once
    fn remove_finished_balloons(&mut self, now: f64) {
        let mut i = 0;
        while i < self.balloons.len() {
            if self.balloons[i].should_be_removed(now) {
                let balloon = self.balloons.remove(i);
                if balloon.escaped() {
                    self.state.process_escape(&mut self.events);
                }
                self.events.push(GameEvent::BalloonRemoved(balloon));
            } else {
                i += 1;
            }
        }
    }

    /// React to a level change: pay the completion bonus and retune the spawner
    fn sync_level(&mut self) {
        let state = self.state.state();
        if state.level == self.current_level {
            return;
        }
        let completed = self.current_level;
        let completion_time = state.game_time - self.level_started_at;
        let lives = state.lives;
        let new_level = state.level;

        let bonus = self
            .scoring
            .level_completion_bonus(completed, lives, completion_time);
        self.state.add_bonus_score(bonus, &mut self.events);

        self.spawner
            .update_spawn_rate(self.difficulty.spawn_config_for_level(new_level));
        self.current_level = new_level;
        self.level_started_at = self.state.state().game_time;
        log::info!("level {completed} cleared in {completion_time:.1}s, bonus {bonus}");
    }

    fn shutdown_session(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.spawner.stop_spawning();
        self.balloons.clear();
        log::info!(
            "session over: score {}, max combo {}",
            self.state.state().score,
            self.state.state().max_combo
        );
    }
}
