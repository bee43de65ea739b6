use std::{cell::Cell, rc::Rc};

use anyhow::Context;
use log::info;
use rand::prelude::*;

use vr_beats::{
    components::ScorePanel,
    resources::{GameSettings, TweenContext},
    ScoreManager, SliceJudgement,
};

/// Quest 2 refresh rate
const FRAME_TIME: f32 = 1. / 72.;
const BEAT_LENGTH: f32 = 0.5;
const FRAMES_TO_SIMULATE: u32 = 72 * 120;
/// How long the game over screen is shown before starting again
const RESTART_DELAY: f32 = 3.;
/// Chance that the player gets any given slice right
const ACCURACY: f64 = 0.85;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let game_settings = match std::env::args().nth(1) {
        Some(path) => GameSettings::load(&path)
            .with_context(|| format!("Unable to load game settings from {path}"))?,
        None => GameSettings::default(),
    };
    info!("Starting with {game_settings:?}");

    let panel = Rc::new(ScorePanel::default());
    let mut tween_context = TweenContext::default();
    let game_over_requested = Rc::new(Cell::new(false));
    let sink = game_over_requested.clone();
    let mut score_manager = ScoreManager::new(&game_settings, &panel, move || sink.set(true))?;

    let mut rng = thread_rng();
    let mut since_last_beat = 0.;
    let mut game_over_for: Option<f32> = None;
    let mut best_score = 0;

    for _ in 0..FRAMES_TO_SIMULATE {
        if game_over_requested.replace(false) {
            score_manager.on_game_over(&mut tween_context);
            best_score = best_score.max(score_manager.current_score());
            game_over_for = Some(0.);
        }

        match game_over_for {
            Some(elapsed) if elapsed >= RESTART_DELAY => {
                info!("Restarting");
                score_manager.on_game_restart(&mut tween_context);
                game_over_for = None;
            }
            Some(elapsed) => game_over_for = Some(elapsed + FRAME_TIME),
            None => {
                since_last_beat += FRAME_TIME;
                if since_last_beat >= BEAT_LENGTH {
                    since_last_beat -= BEAT_LENGTH;
                    let judgement = if rng.gen_bool(ACCURACY) {
                        SliceJudgement::Correct
                    } else {
                        SliceJudgement::Incorrect
                    };
                    score_manager.on_slice(judgement, &mut tween_context);
                }
            }
        }

        tween_context.update(FRAME_TIME);
        score_manager.update_ui();
    }

    best_score = best_score.max(score_manager.current_score());
    info!(
        "Finished. Panel shows score {} at x{}, best score was {best_score}",
        *panel.score_text(),
        *panel.multiplier_text()
    );

    Ok(())
}
