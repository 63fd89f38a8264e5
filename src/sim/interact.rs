//! Tap resolution and bomb blasts
//!
//! Plain Euclidean geometry over balloon centers. The hit region is wider
//! than the visual radius by `TAP_TOLERANCE` so taps feel responsive.

use glam::Vec2;

use crate::consts::{BOMB_EXPLOSION_RADIUS, TAP_TOLERANCE};

use super::balloon::{Balloon, BalloonKind};
use super::event::GameEvent;

/// Whether a tap lands inside a balloon's forgiving hit circle
pub fn point_inside_balloon(point: Vec2, balloon: &Balloon) -> bool {
    let effective_radius = balloon.size / 2.0 + TAP_TOLERANCE;
    point.distance(balloon.center()) <= effective_radius
}

/// Resolve a tap against one balloon
///
/// Fails without mutation if the balloon is already popped or the tap is
/// outside its hit region. On success the balloon pops, a `BalloonPopped`
/// notification fires, and special kinds emit their `PowerUpActivated`
/// notification (the bomb's blast is resolved by `process_bomb_explosion`,
/// not here). `now` is the game clock, stamped onto the power-up event.
pub fn try_pop(balloon: &mut Balloon, tap: Vec2, now: f64, events: &mut Vec<GameEvent>) -> bool {
    if balloon.is_popped() || !point_inside_balloon(tap, balloon) {
        return false;
    }

    let score_earned = balloon.pop();
    events.push(GameEvent::BalloonPopped {
        balloon: balloon.clone(),
        score_earned,
        tap,
    });

    if let Some(kind) = balloon.kind.power_up() {
        events.push(GameEvent::PowerUpActivated {
            kind,
            source: balloon.clone(),
            at: now,
        });
    }

    true
}

/// Ids of unpopped balloons whose centers lie within `radius` of `center`
/// (boundary inclusive)
pub fn balloons_in_blast_radius(center: Vec2, radius: f32, balloons: &[Balloon]) -> Vec<u32> {
    balloons
        .iter()
        .filter(|b| !b.is_popped() && b.center().distance(center) <= radius)
        .map(|b| b.id)
        .collect()
}

/// Detonate a bomb balloon over the candidate set
///
/// No-op unless `bomb` really is a bomb. Every unpopped candidate within
/// the blast radius pops exactly once; one `BombExploded` notification
/// carries the victims and their summed point values. Returns the popped
/// victims so the caller can feed them through session scoring.
pub fn process_bomb_explosion(
    bomb: &Balloon,
    candidates: &mut [Balloon],
    events: &mut Vec<GameEvent>,
) -> Vec<Balloon> {
    if bomb.kind != BalloonKind::Bomb {
        return Vec::new();
    }

    let center = bomb.center();
    let radius = BOMB_EXPLOSION_RADIUS;
    let affected = balloons_in_blast_radius(center, radius, candidates);

    let mut popped = Vec::new();
    let mut total_score = 0;
    for balloon in candidates.iter_mut() {
        if balloon.id == bomb.id || !affected.contains(&balloon.id) {
            continue;
        }
        total_score += balloon.pop();
        popped.push(balloon.clone());
    }

    events.push(GameEvent::BombExploded {
        bomb: bomb.clone(),
        center,
        radius,
        popped: popped.clone(),
        total_score,
    });

    popped
}
