//! Headless demo driver
//!
//! Runs a scripted session against the simulation core at a fixed 60 Hz and
//! prints the final state as JSON. An optional argv seed makes runs
//! reproducible: `balloon-blitz [seed] [seconds]`.

use balloon_blitz::consts::SIM_DT;
use balloon_blitz::sim::{GameEngine, GameEvent, GameStatus};
use balloon_blitz::HighScores;

const AREA_WIDTH: f32 = 480.0;
const AREA_HEIGHT: f32 = 800.0;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xB1172);
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(90.0);

    let mut engine = GameEngine::new(seed);
    engine.start_game(AREA_WIDTH, AREA_HEIGHT);
    log::info!("demo session: seed {seed}, {seconds}s");

    let frames = (seconds / SIM_DT) as u64;
    for frame in 0..frames {
        engine.update(SIM_DT);

        // Scripted player: every few frames, tap the balloon closest to
        // escaping. Imperfect on purpose so escapes and combos both happen.
        if frame % 10 == 0 {
            let target = engine
                .balloons()
                .iter()
                .filter(|b| !b.is_popped())
                .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|b| b.center());
            if let Some(tap) = target {
                engine.process_tap(tap);
            }
        }

        for event in engine.drain_events() {
            match event {
                GameEvent::BalloonPopped {
                    balloon,
                    score_earned,
                    ..
                } => log::debug!(
                    "popped {:?} balloon #{} for {score_earned}",
                    balloon.kind,
                    balloon.id
                ),
                GameEvent::BombExploded {
                    popped,
                    total_score,
                    ..
                } => log::info!("bomb took {} balloons for {total_score}", popped.len()),
                GameEvent::PowerUpActivated { kind, .. } => {
                    log::info!("power-up {kind:?} active");
                }
                GameEvent::LevelChanged(level) => log::info!("reached level {level}"),
                GameEvent::LivesChanged(lives) => log::info!("lives: {lives}"),
                GameEvent::GameOver => log::info!("game over"),
                _ => {}
            }
        }

        if engine.state().status == GameStatus::GameOver {
            break;
        }
    }

    let state = engine.state().clone();
    let accuracy = engine
        .scoring()
        .accuracy(state.balloons_popped, state.balloons_escaped);
    let rank = engine.scoring().rank(state.score);

    let mut highscores = HighScores::new();
    if let Some(place) = highscores.add_score(state.score, state.level, accuracy) {
        log::info!("leaderboard place {place}");
    }

    match serde_json::to_string_pretty(&state) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to serialize final state: {err}"),
    }
    println!("rank: {rank}, accuracy: {accuracy:.2}");
}
