//! Balloon entity and its kind/color tags

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::PowerUpKind;

/// Balloon behavior classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BalloonKind {
    #[default]
    Normal,
    /// Faster moving, smaller
    Speed,
    /// Larger and slower, more points
    Giant,
    /// Double the base points
    Bonus,
    /// Grants double points for a duration
    Multiplier,
    /// Destroys nearby balloons when popped
    Bomb,
    /// Temporary invincibility
    Shield,
    /// Slows the world down temporarily
    TimeFreeze,
    /// Doubles points for a duration
    DoublePoints,
}

impl BalloonKind {
    /// Power-up granted when a balloon of this kind is popped
    ///
    /// Bomb is absent on purpose: its blast is resolved by the interaction
    /// layer, not by a timed power-up.
    pub fn power_up(self) -> Option<PowerUpKind> {
        match self {
            BalloonKind::Multiplier | BalloonKind::DoublePoints => Some(PowerUpKind::DoublePoints),
            BalloonKind::Shield => Some(PowerUpKind::Shield),
            BalloonKind::TimeFreeze => Some(PowerUpKind::TimeFreeze),
            _ => None,
        }
    }
}

/// Cosmetic color tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalloonColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Pink,
    White,
    Black,
    /// Rare multicolor balloon
    Rainbow,
}

impl BalloonColor {
    /// Every color a regular spawn draws from (Rainbow is rolled separately)
    pub const COMMON: [BalloonColor; 9] = [
        BalloonColor::Red,
        BalloonColor::Blue,
        BalloonColor::Green,
        BalloonColor::Yellow,
        BalloonColor::Purple,
        BalloonColor::Orange,
        BalloonColor::Pink,
        BalloonColor::White,
        BalloonColor::Black,
    ];
}

/// A timed, positioned, single-use scoring target
///
/// Position is the top-left anchor of the balloon's bounding square; the
/// geometric center sits at `pos + size/2` on both axes. Balloons rise:
/// `y` decreases every tick and the balloon escapes once `y < -size`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balloon {
    pub id: u32,
    pub kind: BalloonKind,
    pub color: BalloonColor,
    pub points: u32,
    /// Diameter
    pub size: f32,
    pub pos: Vec2,
    pub velocity_y: f32,
    /// Cosmetic render scale
    pub scale: f32,
    /// Game-clock second this balloon spawned at
    pub spawned_at: f64,
    /// Seconds before an untouched balloon expires
    pub life_span: f64,
    popped: bool,
}

impl Balloon {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        kind: BalloonKind,
        color: BalloonColor,
        points: u32,
        size: f32,
        pos: Vec2,
        velocity_y: f32,
        spawned_at: f64,
        life_span: f64,
    ) -> Self {
        Self {
            id,
            kind,
            color,
            points,
            size,
            pos,
            velocity_y,
            scale: 1.0,
            spawned_at,
            life_span,
            popped: false,
        }
    }

    /// Advance position by one timestep (balloons drift upward)
    pub fn update(&mut self, dt: f32) {
        self.pos.y -= self.velocity_y * dt;
    }

    /// Pop the balloon and return the score earned
    ///
    /// Popping is terminal: every later call returns 0 with no side effects.
    pub fn pop(&mut self) -> u32 {
        if self.popped {
            return 0;
        }
        self.popped = true;
        self.points
    }

    pub fn is_popped(&self) -> bool {
        self.popped
    }

    /// Geometric center of the balloon
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Whether the balloon outlived its life span as of `now` (game-clock seconds)
    pub fn is_expired(&self, now: f64) -> bool {
        now - self.spawned_at > self.life_span
    }

    /// Whether the balloon left the visible area unpopped
    pub fn escaped(&self) -> bool {
        !self.popped && self.pos.y < -self.size
    }

    /// Popped, expired, or drifted past the top edge
    pub fn should_be_removed(&self, now: f64) -> bool {
        self.popped || self.is_expired(now) || self.pos.y < -self.size
    }
}
