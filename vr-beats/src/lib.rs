#![deny(missing_docs)]

//! Scoring and presentation glue for a VR rhythm-action game.
//!
//! The heart of the crate is [`ScoreManager`], which turns a stream of slice judgements
//! into a score, a combo multiplier and a game-over signal. Anything that moves smoothly on
//! screen (the counting score, the multiplier loader, the panel fade) is handed off to a
//! [`tween::Tweener`], so the manager itself never has to know about frame timing.
//!
//! # Wiring it up
//! The host owns a [`components::ScorePanel`], a [`resources::TweenContext`] and whatever
//! judges slices. Each frame it should:
//! 1. forward judgements to [`ScoreManager::on_slice`]
//! 2. call [`resources::TweenContext::update`] with the frame's delta time
//! 3. call [`ScoreManager::update_ui`] so the panel shows the latest values

pub use score_manager::{GameOverSink, Lifecycle, ScoreManager, ScoreState, SliceJudgement};
pub use vr_beats_error::VrBeatsError;

/// Components are data attached to entities, or surfaces the host renders
pub mod components;
/// Resources are shared state the game reads from or drives each frame
pub mod resources;
mod score_manager;
/// Systems are functions called by the host to update the simulation
pub mod systems;
/// Time based value interpolation
pub mod tween;
mod vr_beats_error;

/// vr-beats result type
pub type VrBeatsResult<T> = std::result::Result<T, VrBeatsError>;
