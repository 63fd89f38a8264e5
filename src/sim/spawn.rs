//! Balloon spawning
//!
//! A seeded accumulator-driven spawner: the engine feeds it tick deltas and
//! it emits balloons at the configured cadence. All randomness comes from
//! the owned `Pcg32`, so a session replays exactly from its seed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::BalloonSpawnConfig;
use crate::consts::RAINBOW_CHANCE;

use super::balloon::{Balloon, BalloonColor, BalloonKind};
use super::event::GameEvent;

/// Weighted kind selection
///
/// Walks the special-kind probabilities in a fixed priority order,
/// accumulating a running total; the first kind whose cumulative threshold
/// exceeds `roll` wins. Rarer, more impactful kinds are checked first so
/// overlapping probability mass favors them. Falls through to Normal.
pub fn select_kind(config: &BalloonSpawnConfig, roll: f32) -> BalloonKind {
    let ordered = [
        (BalloonKind::TimeFreeze, config.time_freeze_chance),
        (BalloonKind::Bomb, config.bomb_chance),
        (BalloonKind::Shield, config.shield_chance),
        (BalloonKind::Multiplier, config.multiplier_chance),
        (BalloonKind::DoublePoints, config.double_points_chance),
        (BalloonKind::Bonus, config.bonus_chance),
        (BalloonKind::Giant, config.giant_chance),
        (BalloonKind::Speed, config.speed_chance),
    ];

    let mut cumulative = 0.0;
    for (kind, chance) in ordered {
        cumulative += chance;
        if roll < cumulative {
            return kind;
        }
    }
    BalloonKind::Normal
}

/// Point value for a kind: base points plus a fixed per-kind bonus
fn points_for(kind: BalloonKind, base_points: u32) -> u32 {
    match kind {
        BalloonKind::Normal => base_points,
        BalloonKind::Speed => base_points + 5,
        BalloonKind::Giant => base_points + 15,
        BalloonKind::Bonus => base_points * 2,
        BalloonKind::Multiplier => base_points + 20,
        BalloonKind::Bomb => base_points + 25,
        BalloonKind::Shield => base_points + 30,
        BalloonKind::TimeFreeze => base_points + 35,
        BalloonKind::DoublePoints => base_points + 20,
    }
}

/// Velocity multiplier per kind
fn velocity_scale(kind: BalloonKind) -> f32 {
    match kind {
        BalloonKind::Speed => 1.8,
        BalloonKind::Giant => 0.7,
        BalloonKind::Bomb => 1.2,
        _ => 1.0,
    }
}

/// Size multiplier per kind
fn size_scale(kind: BalloonKind) -> f32 {
    match kind {
        BalloonKind::Giant => 1.5,
        BalloonKind::Speed => 0.8,
        BalloonKind::Bomb => 1.2,
        _ => 1.0,
    }
}

/// Periodically creates balloons while active
#[derive(Debug)]
pub struct Spawner {
    rng: Pcg32,
    config: Option<BalloonSpawnConfig>,
    /// Play-area size; balloons enter just below `area.y`
    area: Vec2,
    spawn_interval: f32,
    accumulator: f32,
    next_id: u32,
    spawning: bool,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            config: None,
            area: Vec2::ZERO,
            spawn_interval: 0.0,
            accumulator: 0.0,
            next_id: 0,
            spawning: false,
        }
    }

    /// Begin emitting balloons at the config's cadence
    ///
    /// Panics if the config carries a non-positive spawn rate; a spawner
    /// without a usable cadence is a construction error, not a runtime state.
    pub fn start_spawning(&mut self, config: BalloonSpawnConfig, area: Vec2) {
        assert!(
            config.base_spawn_rate > 0.0,
            "spawn config requires a positive spawn rate"
        );
        self.spawn_interval = 1.0 / config.base_spawn_rate;
        self.config = Some(config);
        self.area = area;
        self.accumulator = 0.0;
        self.spawning = true;
    }

    /// Stop emitting; safe to call at any time
    pub fn stop_spawning(&mut self) {
        self.spawning = false;
        self.accumulator = 0.0;
    }

    /// Rewrite the cadence in place; a no-op unless currently spawning
    pub fn update_spawn_rate(&mut self, config: BalloonSpawnConfig) {
        if !self.spawning || config.base_spawn_rate <= 0.0 {
            return;
        }
        self.spawn_interval = 1.0 / config.base_spawn_rate;
        self.config = Some(config);
    }

    pub fn is_spawning(&self) -> bool {
        self.spawning
    }

    /// Advance the spawn accumulator and emit any balloons that are due
    ///
    /// `now` is the game clock, stamped onto each balloon for expiry.
    pub fn update(
        &mut self,
        dt: f32,
        now: f64,
        events: &mut Vec<GameEvent>,
        out: &mut Vec<Balloon>,
    ) {
        if !self.spawning || self.spawn_interval <= 0.0 {
            return;
        }
        let Some(config) = self.config.clone() else {
            return;
        };

        self.accumulator += dt;
        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            let balloon = self.create_balloon(&config, now);
            events.push(GameEvent::BalloonSpawned(balloon.clone()));
            out.push(balloon);
        }
    }

    fn create_balloon(&mut self, config: &BalloonSpawnConfig, now: f64) -> Balloon {
        self.next_id += 1;

        let kind = select_kind(config, self.rng.random::<f32>());
        let color = self.random_color();

        let velocity = {
            let jitter = (self.rng.random::<f32>() - 0.5) * (config.base_speed * 0.3);
            (config.base_speed + jitter) * velocity_scale(kind)
        };
        let size = {
            let jitter = (self.rng.random::<f32>() - 0.5) * config.size_variation;
            (config.base_size + jitter) * size_scale(kind)
        };

        let x = self.rng.random::<f32>() * (self.area.x - config.base_size);
        // Enter just below the visible area and rise into it
        let pos = Vec2::new(x, self.area.y + size);

        Balloon::new(
            self.next_id,
            kind,
            color,
            points_for(kind, config.base_points),
            size,
            pos,
            velocity,
            now,
            config.life_span,
        )
    }

    fn random_color(&mut self) -> BalloonColor {
        if self.rng.random::<f32>() < RAINBOW_CHANCE {
            return BalloonColor::Rainbow;
        }
        BalloonColor::COMMON[self.rng.random_range(0..BalloonColor::COMMON.len())]
    }
}
