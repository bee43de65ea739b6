use std::{
    cell::Cell,
    rc::{Rc, Weak},
};

use log::{debug, info, warn};

use crate::{
    components::ScorePanel,
    resources::GameSettings,
    tween::{Ease, TweenId, TweenOwner, Tweener, ValueTween},
    VrBeatsResult,
};

/// Seconds taken by the multiplier loader to reach a new fill value
const LOADER_FILL_TIME: f32 = 1.;
/// Seconds taken by the loader to empty after a multiplier increase
const LOADER_DRAIN_TIME: f32 = 0.5;
/// Seconds taken by the panel to fade in or out
const PANEL_FADE_TIME: f32 = 0.5;
/// Streak needed to leave multiplier 0
const BASE_MULTIPLIER_STREAK: u32 = 2;

/// Outcome of a slice, as decided by the beat judging system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceJudgement {
    /// Right saber, right direction, right time
    Correct,
    /// Anything else
    Incorrect,
}

/// Whether the manager may still be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Accepting events
    Active,
    /// Torn down - every operation is a no-op
    Disposed,
}

/// Receives the notification that the player made one mistake too many
pub trait GameOverSink {
    /// Called at most once between restarts
    fn on_game_over(&mut self);
}

impl<F: FnMut()> GameOverSink for F {
    fn on_game_over(&mut self) {
        self()
    }
}

/// The authoritative scoring counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreState {
    /// The real score
    pub current_score: u64,
    /// Factor applied to points per hit, minus one
    pub current_multiplier: u32,
    /// Correct slices since the multiplier last changed
    pub accumulated_correct_slices: u32,
    /// Streak needed to increase the multiplier
    pub to_next_multiplier_increase: u32,
    /// Incorrect slices since the last correct one
    pub accumulated_errors: u32,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            current_score: 0,
            current_multiplier: 0,
            accumulated_correct_slices: 0,
            to_next_multiplier_increase: BASE_MULTIPLIER_STREAK,
            accumulated_errors: 0,
        }
    }
}

/// Keeps score.
///
/// Correct slices add `score_per_hit * (1 + multiplier)` and build a streak; each completed
/// streak raises the multiplier (up to `max_multiplier`) and makes the next streak longer.
/// An incorrect slice drops the multiplier back to zero, and more than `error_limit`
/// incorrect slices in a row ends the game. After that the manager ignores judgements until
/// [`ScoreManager::on_game_restart`] is called.
///
/// Anything animated is handed to a [`Tweener`], and every callback given to it holds weak
/// references, so tearing down the [`ScorePanel`] mid-animation is safe.
pub struct ScoreManager {
    max_multiplier: u32,
    score_per_hit: u32,
    error_limit: u32,
    score_follow_time: f32,
    state: ScoreState,
    visual_score: Rc<Cell<f32>>,
    score_settled: Rc<Cell<bool>>,
    score_tween: Option<TweenId>,
    panel: Weak<ScorePanel>,
    panel_owner: TweenOwner,
    loader_owner: TweenOwner,
    game_over: bool,
    lifecycle: Lifecycle,
    game_over_sink: Box<dyn GameOverSink>,
}

impl ScoreManager {
    /// Create a manager that draws to `panel` and reports game over to `game_over_sink`.
    /// Fails if `game_settings` doesn't pass [`GameSettings::validate`].
    pub fn new(
        game_settings: &GameSettings,
        panel: &Rc<ScorePanel>,
        game_over_sink: impl GameOverSink + 'static,
    ) -> VrBeatsResult<Self> {
        game_settings.validate()?;
        panel.set_multiplier_loader(0.);

        Ok(Self {
            max_multiplier: game_settings.max_multiplier,
            score_per_hit: game_settings.score_per_hit,
            error_limit: game_settings.error_limit,
            score_follow_time: game_settings.score_follow_time,
            state: Default::default(),
            visual_score: Rc::new(Cell::new(0.)),
            score_settled: Rc::new(Cell::new(true)),
            score_tween: None,
            panel: Rc::downgrade(panel),
            panel_owner: TweenOwner::unique(),
            loader_owner: TweenOwner::unique(),
            game_over: false,
            lifecycle: Lifecycle::Active,
            game_over_sink: Box::new(game_over_sink),
        })
    }

    /// Forward a judgement to the matching handler
    pub fn on_slice(&mut self, judgement: SliceJudgement, tweener: &mut dyn Tweener) {
        match judgement {
            SliceJudgement::Correct => self.on_correct_slice(tweener),
            SliceJudgement::Incorrect => self.on_incorrect_slice(tweener),
        }
    }

    /// The player sliced a block correctly
    pub fn on_correct_slice(&mut self, tweener: &mut dyn Tweener) {
        if !self.accepts_judgements() {
            return;
        }

        let state = &mut self.state;
        state.accumulated_errors = 0;
        state.accumulated_correct_slices += 1;
        let points = u64::from(self.score_per_hit) * (1 + u64::from(state.current_multiplier));
        state.current_score = state.current_score.saturating_add(points);

        self.animate_visual_score(tweener);
        self.update_multiplier_loader(tweener);

        if self.state.accumulated_correct_slices >= self.state.to_next_multiplier_increase {
            self.increase_multiplier(tweener);
        }
    }

    /// The player missed, or sliced the wrong way
    pub fn on_incorrect_slice(&mut self, tweener: &mut dyn Tweener) {
        if !self.accepts_judgements() {
            return;
        }

        let state = &mut self.state;
        state.accumulated_errors += 1;
        state.accumulated_correct_slices = 0;
        state.current_multiplier = 0;
        state.to_next_multiplier_increase = BASE_MULTIPLIER_STREAK;

        self.update_multiplier_loader(tweener);

        if self.state.accumulated_errors > self.error_limit {
            info!(
                "[SCORE] {} errors in a row, game over with a score of {}",
                self.state.accumulated_errors, self.state.current_score
            );
            self.game_over = true;
            self.game_over_sink.on_game_over();
        }
    }

    /// Fade the panel out. The score is left untouched and keeps counting up to its final value.
    pub fn on_game_over(&mut self, tweener: &mut dyn Tweener) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }

        self.cancel_panel_tweens(tweener);
        self.fade_panel(0., tweener);
    }

    /// Reset every counter and fade the panel back in
    pub fn on_game_restart(&mut self, tweener: &mut dyn Tweener) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }

        self.cancel_all_tweens(tweener);
        self.state = Default::default();
        self.visual_score.set(0.);
        self.score_settled.set(true);
        self.game_over = false;
        if let Some(panel) = self.panel.upgrade() {
            panel.set_multiplier_loader(0.);
        }
        debug!("[SCORE] Restarted");

        self.fade_panel(1., tweener);
    }

    /// Publish the multiplier and the displayed score to the panel. Call once per frame.
    pub fn update_ui(&self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }

        if let Some(panel) = self.panel.upgrade() {
            panel.set_labels(self.state.current_multiplier, self.displayed_score());
        }
    }

    /// Stop all animations and refuse any further use
    pub fn dispose(&mut self, tweener: &mut dyn Tweener) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }

        self.cancel_all_tweens(tweener);
        self.lifecycle = Lifecycle::Disposed;
    }

    /// The real score
    pub fn current_score(&self) -> u64 {
        self.state.current_score
    }

    /// The current multiplier
    pub fn current_multiplier(&self) -> u32 {
        self.state.current_multiplier
    }

    /// Correct slices since the multiplier last changed
    pub fn accumulated_correct_slices(&self) -> u32 {
        self.state.accumulated_correct_slices
    }

    /// Streak needed to increase the multiplier
    pub fn to_next_multiplier_increase(&self) -> u32 {
        self.state.to_next_multiplier_increase
    }

    /// Incorrect slices since the last correct one
    pub fn accumulated_errors(&self) -> u32 {
        self.state.accumulated_errors
    }

    /// All counters at once
    pub fn state(&self) -> &ScoreState {
        &self.state
    }

    /// The animated score, catching up with `current_score`
    pub fn visual_score(&self) -> f32 {
        self.visual_score.get()
    }

    /// What the score label shows. Once the count-up has finished this is exactly `current_score`.
    pub fn displayed_score(&self) -> u64 {
        if self.score_settled.get() {
            return self.state.current_score;
        }
        let counting = self.visual_score.get().max(0.).ceil() as u64;
        counting.min(self.state.current_score)
    }

    /// Has the game over notification been sent since the last restart?
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Where the manager is in its lifecycle
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn accepts_judgements(&self) -> bool {
        self.lifecycle == Lifecycle::Active && !self.game_over
    }

    fn animate_visual_score(&mut self, tweener: &mut dyn Tweener) {
        if let Some(id) = self.score_tween.take() {
            tweener.cancel(id);
        }

        self.score_settled.set(false);
        let visual_score = Rc::downgrade(&self.visual_score);
        let score_settled = Rc::downgrade(&self.score_settled);
        let tween = ValueTween::new(
            self.visual_score.get(),
            self.state.current_score as f32,
            self.score_follow_time,
        )
        .with_ease(Ease::EaseOutExpo)
        .on_update(move |value| {
            if let Some(visual_score) = visual_score.upgrade() {
                visual_score.set(value);
            }
        })
        .on_complete(move |_| {
            // f32 can't hold every score, so the label snaps to the real one at the end
            if let Some(score_settled) = score_settled.upgrade() {
                score_settled.set(true);
            }
        });
        self.score_tween = Some(tweener.start(tween));
    }

    fn update_multiplier_loader(&mut self, tweener: &mut dyn Tweener) {
        let state = &self.state;
        let fill =
            state.accumulated_correct_slices as f32 / state.to_next_multiplier_increase as f32;
        self.animate_loader(fill, LOADER_FILL_TIME, tweener);
    }

    fn increase_multiplier(&mut self, tweener: &mut dyn Tweener) {
        let state = &mut self.state;
        state.accumulated_correct_slices = 0;
        state.current_multiplier = (state.current_multiplier + 1).min(self.max_multiplier);
        state.to_next_multiplier_increase = (state.current_multiplier + 1) * 2;
        debug!(
            "[SCORE] Multiplier is now {}, next increase after {} correct slices",
            state.current_multiplier, state.to_next_multiplier_increase
        );

        tweener.cancel_all_for_owner(self.loader_owner);
        let Some(panel) = self.panel.upgrade() else {
            warn!("[SCORE] Multiplier increased but the score panel is gone");
            return;
        };

        let loader_owner = self.loader_owner;
        let weak_panel = self.panel.clone();
        let pulse = ValueTween::new(panel.multiplier_loader(), 1., LOADER_FILL_TIME)
            .with_ease(Ease::EaseOutExpo)
            .with_owner(loader_owner)
            .on_update(loader_writer(self.panel.clone()))
            .on_complete(move |tweener| {
                // The panel may have been torn down while the pulse was playing
                let Some(panel) = weak_panel.upgrade() else {
                    return;
                };
                let drain = ValueTween::new(panel.multiplier_loader(), 0., LOADER_DRAIN_TIME)
                    .with_ease(Ease::EaseOutExpo)
                    .with_owner(loader_owner)
                    .on_update(loader_writer(weak_panel));
                tweener.start(drain);
            });
        tweener.start(pulse);
    }

    fn animate_loader(&mut self, fill: f32, duration: f32, tweener: &mut dyn Tweener) {
        tweener.cancel_all_for_owner(self.loader_owner);
        let Some(panel) = self.panel.upgrade() else {
            return;
        };

        let tween = ValueTween::new(panel.multiplier_loader(), fill, duration)
            .with_ease(Ease::EaseOutExpo)
            .with_owner(self.loader_owner)
            .on_update(loader_writer(self.panel.clone()));
        tweener.start(tween);
    }

    fn fade_panel(&mut self, opacity: f32, tweener: &mut dyn Tweener) {
        let Some(panel) = self.panel.upgrade() else {
            return;
        };

        let weak_panel = self.panel.clone();
        let tween = ValueTween::new(panel.opacity(), opacity, PANEL_FADE_TIME)
            .with_ease(Ease::EaseOutExpo)
            .with_owner(self.panel_owner)
            .on_update(move |value| {
                if let Some(panel) = weak_panel.upgrade() {
                    panel.set_opacity(value);
                }
            });
        tweener.start(tween);
    }

    fn cancel_all_tweens(&mut self, tweener: &mut dyn Tweener) {
        if let Some(id) = self.score_tween.take() {
            tweener.cancel(id);
        }
        self.cancel_panel_tweens(tweener);
    }

    fn cancel_panel_tweens(&mut self, tweener: &mut dyn Tweener) {
        tweener.cancel_all_for_owner(self.loader_owner);
        tweener.cancel_all_for_owner(self.panel_owner);
    }
}

impl std::fmt::Debug for ScoreManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreManager")
            .field("state", &self.state)
            .field("visual_score", &self.visual_score.get())
            .field("game_over", &self.game_over)
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}

fn loader_writer(panel: Weak<ScorePanel>) -> impl FnMut(f32) {
    move |value| {
        if let Some(panel) = panel.upgrade() {
            panel.set_multiplier_loader(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::resources::TweenContext;

    struct Fixture {
        score_manager: ScoreManager,
        tween_context: TweenContext,
        panel: Rc<ScorePanel>,
        game_overs: Rc<Cell<u32>>,
    }

    fn fixture(max_multiplier: u32, score_per_hit: u32, error_limit: u32) -> Fixture {
        fixture_with(&GameSettings {
            max_multiplier,
            score_per_hit,
            error_limit,
            ..Default::default()
        })
    }

    fn fixture_with(game_settings: &GameSettings) -> Fixture {
        let panel = Rc::new(ScorePanel::default());
        let game_overs = Rc::new(Cell::new(0));
        let counter = game_overs.clone();
        let score_manager = ScoreManager::new(game_settings, &panel, move || {
            counter.set(counter.get() + 1)
        })
        .unwrap();

        Fixture {
            score_manager,
            tween_context: TweenContext::default(),
            panel,
            game_overs,
        }
    }

    impl Fixture {
        fn correct(&mut self) {
            self.score_manager.on_correct_slice(&mut self.tween_context);
        }

        fn incorrect(&mut self) {
            self.score_manager.on_incorrect_slice(&mut self.tween_context);
        }

        fn settle(&mut self) {
            for _ in 0..10 {
                self.tween_context.update(0.5);
            }
        }
    }

    #[test]
    pub fn test_concrete_scenario() {
        let mut f = fixture(3, 100, 2);

        f.correct();
        assert_eq!(f.score_manager.current_score(), 100);
        assert_eq!(f.score_manager.accumulated_correct_slices(), 1);
        assert_eq!(f.score_manager.to_next_multiplier_increase(), 2);

        f.correct();
        assert_eq!(f.score_manager.current_score(), 200);
        assert_eq!(f.score_manager.current_multiplier(), 1);
        assert_eq!(f.score_manager.accumulated_correct_slices(), 0);
        assert_eq!(f.score_manager.to_next_multiplier_increase(), 4);

        f.correct();
        assert_eq!(f.score_manager.current_score(), 400);
        assert_eq!(f.score_manager.accumulated_correct_slices(), 1);

        f.correct();
        assert_eq!(f.score_manager.current_score(), 600);
        assert_eq!(f.score_manager.accumulated_correct_slices(), 2);

        f.incorrect();
        assert_eq!(f.score_manager.accumulated_errors(), 1);
        assert_eq!(f.score_manager.current_multiplier(), 0);
        assert_eq!(f.score_manager.to_next_multiplier_increase(), 2);

        f.incorrect();
        assert_eq!(f.score_manager.accumulated_errors(), 2);
        assert_eq!(f.game_overs.get(), 0);

        f.incorrect();
        assert_eq!(f.score_manager.accumulated_errors(), 3);
        assert_eq!(f.game_overs.get(), 1);
        assert!(f.score_manager.is_game_over());
        assert_eq!(f.score_manager.current_score(), 600);
    }

    #[test]
    pub fn test_score_uses_multiplier_before_each_slice() {
        let mut f = fixture(4, 7, 10);
        let mut expected = 0;
        for _ in 0..50 {
            let multiplier = u64::from(f.score_manager.current_multiplier());
            f.correct();
            expected += 7 * (1 + multiplier);
            assert_eq!(f.score_manager.current_score(), expected);
        }
    }

    #[test]
    pub fn test_multiplier_is_capped() {
        let mut f = fixture(2, 100, 10);
        for _ in 0..100 {
            f.correct();
            assert!(f.score_manager.current_multiplier() <= 2);
        }
        assert_eq!(f.score_manager.current_multiplier(), 2);
        // The threshold is recomputed from the clamped multiplier
        assert_eq!(f.score_manager.to_next_multiplier_increase(), 6);
    }

    #[test]
    pub fn test_zero_max_multiplier() {
        let mut f = fixture(0, 10, 10);
        for _ in 0..5 {
            f.correct();
        }
        assert_eq!(f.score_manager.current_multiplier(), 0);
        assert_eq!(f.score_manager.current_score(), 50);
        assert_eq!(f.score_manager.to_next_multiplier_increase(), 2);
    }

    #[test]
    pub fn test_incorrect_slice_resets_streak() {
        let mut f = fixture(8, 100, 10);
        for _ in 0..9 {
            f.correct();
        }
        assert_eq!(f.score_manager.current_multiplier(), 2);
        assert_eq!(f.score_manager.accumulated_correct_slices(), 3);

        f.incorrect();
        assert_eq!(f.score_manager.current_multiplier(), 0);
        assert_eq!(f.score_manager.accumulated_correct_slices(), 0);
        assert_eq!(f.score_manager.to_next_multiplier_increase(), 2);
    }

    #[test]
    pub fn test_correct_slice_clears_errors() {
        let mut f = fixture(8, 100, 10);
        for _ in 0..7 {
            f.incorrect();
        }
        assert_eq!(f.score_manager.accumulated_errors(), 7);
        f.correct();
        assert_eq!(f.score_manager.accumulated_errors(), 0);
    }

    #[test]
    pub fn test_game_over_fires_once() {
        let mut f = fixture(8, 100, 4);
        for _ in 0..4 {
            f.incorrect();
        }
        assert_eq!(f.game_overs.get(), 0);
        assert!(!f.score_manager.is_game_over());

        f.incorrect();
        assert_eq!(f.game_overs.get(), 1);

        // Frozen until restart
        for _ in 0..5 {
            f.incorrect();
            f.correct();
        }
        assert_eq!(f.game_overs.get(), 1);
        assert_eq!(f.score_manager.accumulated_errors(), 5);
        assert_eq!(f.score_manager.current_score(), 0);

        // ..and re-armed by a restart
        f.score_manager.on_game_restart(&mut f.tween_context);
        for _ in 0..5 {
            f.incorrect();
        }
        assert_eq!(f.game_overs.get(), 2);
    }

    #[test]
    pub fn test_errors_interrupted_by_correct_slice_do_not_end_game() {
        let mut f = fixture(8, 100, 2);
        for _ in 0..10 {
            f.incorrect();
            f.incorrect();
            f.correct();
        }
        assert_eq!(f.game_overs.get(), 0);
    }

    #[test]
    pub fn test_restart_returns_to_baseline() {
        use SliceJudgement::{Correct as C, Incorrect as I};

        let histories: [&[SliceJudgement]; 6] = [
            &[],
            &[C],
            &[C, C, C, C, C, C, C],
            &[C, C, C, C, C, C, C, I, C, C],
            &[C, C, I, I],
            // Ends in game over
            &[C, C, C, I, I, I, C],
        ];

        for (i, history) in histories.iter().enumerate() {
            let mut f = fixture(3, 100, 2);
            for judgement in history.iter() {
                f.score_manager.on_slice(*judgement, &mut f.tween_context);
            }
            if f.score_manager.is_game_over() {
                f.score_manager.on_game_over(&mut f.tween_context);
            }
            f.tween_context.update(0.3);
            f.score_manager.on_game_restart(&mut f.tween_context);

            assert_eq!(f.score_manager.state(), &ScoreState::default(), "history {i}");
            assert_eq!(f.score_manager.to_next_multiplier_increase(), 2);
            assert!(!f.score_manager.is_game_over());
            assert_relative_eq!(f.score_manager.visual_score(), 0.);
            assert_eq!(f.score_manager.displayed_score(), 0);
            assert_relative_eq!(f.panel.multiplier_loader(), 0.);

            // In-flight tweens must not drag anything back up
            f.settle();
            assert_relative_eq!(f.score_manager.visual_score(), 0.);
            assert_relative_eq!(f.panel.multiplier_loader(), 0.);
            assert_relative_eq!(f.panel.opacity(), 1.);

            // Scoring starts over from scratch
            f.correct();
            assert_eq!(f.score_manager.current_score(), 100, "history {i}");
        }
    }

    #[test]
    pub fn test_visual_score_follows_score() {
        let mut f = fixture(8, 100, 10);
        f.correct();
        assert_relative_eq!(f.score_manager.visual_score(), 0.);

        f.tween_context.update(0.1);
        let partway = f.score_manager.visual_score();
        assert!(partway > 0. && partway < 100.);

        f.score_manager.update_ui();
        assert_eq!(*f.panel.score_text(), partway.ceil().to_string());

        // A second hit replaces the first tween rather than racing it
        f.correct();
        assert_eq!(f.tween_context.active_count(), 2);
        f.settle();
        assert_relative_eq!(f.score_manager.visual_score(), 200.);

        f.score_manager.update_ui();
        assert_eq!(*f.panel.score_text(), "200");
        assert_eq!(*f.panel.multiplier_text(), "1");
    }

    #[test]
    pub fn test_loader_fills_toward_streak() {
        let mut f = fixture(8, 100, 10);
        f.correct();
        f.settle();
        assert_relative_eq!(f.panel.multiplier_loader(), 0.5);

        f.incorrect();
        f.settle();
        assert_relative_eq!(f.panel.multiplier_loader(), 0.);
    }

    #[test]
    pub fn test_multiplier_increase_pulses_loader() {
        let mut f = fixture(8, 100, 10);
        f.correct();
        f.correct();

        // Only the score tween and the pulse are left, the plain fill was replaced
        assert_eq!(f.tween_context.active_count(), 2);

        f.tween_context.update(1.);
        assert_relative_eq!(f.panel.multiplier_loader(), 1.);

        // The pulse completed and chained the drain
        assert_eq!(f.tween_context.active_count(), 1);
        f.tween_context.update(0.5);
        assert_relative_eq!(f.panel.multiplier_loader(), 0.);
        assert_eq!(f.tween_context.active_count(), 0);
    }

    #[test]
    pub fn test_pulse_survives_panel_teardown() {
        let mut f = fixture(8, 100, 10);
        f.correct();
        f.correct();
        f.tween_context.update(0.5);

        let Fixture {
            mut score_manager,
            mut tween_context,
            panel,
            ..
        } = f;
        drop(panel);

        // The pulse completes without a panel, so no drain is chained
        tween_context.update(1.);
        assert_eq!(tween_context.active_count(), 0);

        // Judgements keep counting even with nothing to draw on
        score_manager.on_correct_slice(&mut tween_context);
        score_manager.update_ui();
        assert_eq!(score_manager.current_score(), 400);
    }

    #[test]
    pub fn test_game_over_fades_panel() {
        let mut f = fixture(8, 100, 10);
        f.correct();
        f.correct();
        let state = f.score_manager.state().clone();

        f.score_manager.on_game_over(&mut f.tween_context);
        // The score keeps counting, the loader pulse stops and the fade starts
        assert_eq!(f.tween_context.active_count(), 2);
        assert_eq!(f.tween_context.active_for_owner(f.score_manager.loader_owner), 0);
        assert_eq!(f.tween_context.active_for_owner(f.score_manager.panel_owner), 1);
        assert_eq!(f.score_manager.state(), &state);

        f.tween_context.update(0.5);
        assert_relative_eq!(f.panel.opacity(), 0.);

        f.score_manager.on_game_restart(&mut f.tween_context);
        f.tween_context.update(0.5);
        assert_relative_eq!(f.panel.opacity(), 1.);
    }

    #[test]
    pub fn test_disposed_manager_ignores_everything() {
        let mut f = fixture(8, 100, 0);
        f.correct();
        f.score_manager.update_ui();
        f.score_manager.dispose(&mut f.tween_context);
        assert_eq!(f.score_manager.lifecycle(), Lifecycle::Disposed);
        assert_eq!(f.tween_context.active_count(), 0);

        f.correct();
        f.incorrect();
        f.score_manager.on_game_over(&mut f.tween_context);
        f.score_manager.on_game_restart(&mut f.tween_context);
        f.score_manager.update_ui();

        assert_eq!(f.score_manager.current_score(), 100);
        assert_eq!(f.game_overs.get(), 0);
        assert_eq!(f.tween_context.active_count(), 0);
        assert_eq!(*f.panel.score_text(), "0");
    }

    #[test]
    pub fn test_on_slice_dispatches() {
        let mut f = fixture(8, 100, 10);
        f.score_manager
            .on_slice(SliceJudgement::Correct, &mut f.tween_context);
        f.score_manager
            .on_slice(SliceJudgement::Incorrect, &mut f.tween_context);
        assert_eq!(f.score_manager.current_score(), 100);
        assert_eq!(f.score_manager.accumulated_errors(), 1);
    }

    #[test]
    pub fn test_score_finishes_counting_after_game_over() {
        let mut f = fixture(8, 100, 0);
        f.correct();
        f.tween_context.update(0.05);
        f.incorrect();
        assert!(f.score_manager.is_game_over());
        f.score_manager.on_game_over(&mut f.tween_context);

        f.settle();
        f.score_manager.update_ui();
        assert_relative_eq!(f.score_manager.visual_score(), 100.);
        assert_eq!(f.score_manager.displayed_score(), f.score_manager.current_score());
        assert_eq!(*f.panel.score_text(), "100");
        assert_relative_eq!(f.panel.opacity(), 0.);
    }

    #[test]
    pub fn test_large_scores_display_exactly() {
        // 2^24 + 1 is the first integer an f32 can't represent
        let mut f = fixture(8, 16_777_217, 10);
        f.correct();
        f.tween_context.update(0.1);
        assert!(f.score_manager.displayed_score() <= f.score_manager.current_score());

        f.settle();
        f.score_manager.update_ui();
        assert_eq!(f.score_manager.displayed_score(), 16_777_217);
        assert_eq!(*f.panel.score_text(), "16777217");
    }

    #[test]
    pub fn test_invalid_follow_time_is_rejected() {
        let panel = Rc::new(ScorePanel::default());
        for score_follow_time in [f32::NAN, f32::INFINITY, -1.] {
            let game_settings = GameSettings {
                score_follow_time,
                ..Default::default()
            };
            assert!(matches!(
                ScoreManager::new(&game_settings, &panel, || {}),
                Err(crate::VrBeatsError::InvalidSettings(_))
            ));
        }
    }

    #[test]
    pub fn test_slice_during_pulse_replaces_it() {
        for judgement in [SliceJudgement::Correct, SliceJudgement::Incorrect] {
            let mut f = fixture(8, 100, 10);
            let loader_owner = f.score_manager.loader_owner;
            f.correct();
            f.correct();
            f.tween_context.update(0.5);
            assert_eq!(f.tween_context.active_for_owner(loader_owner), 1);

            f.score_manager.on_slice(judgement, &mut f.tween_context);
            assert_eq!(f.tween_context.active_for_owner(loader_owner), 1);

            // The cancelled pulse never chains its drain
            f.settle();
            assert_eq!(f.tween_context.active_count(), 0);
            let expected = match judgement {
                SliceJudgement::Correct => 0.25,
                SliceJudgement::Incorrect => 0.,
            };
            assert_relative_eq!(f.panel.multiplier_loader(), expected);
        }
    }

    #[test]
    pub fn test_slice_during_drain_replaces_it() {
        for judgement in [SliceJudgement::Correct, SliceJudgement::Incorrect] {
            let mut f = fixture(8, 100, 10);
            let loader_owner = f.score_manager.loader_owner;
            f.correct();
            f.correct();
            f.tween_context.update(1.);
            assert_relative_eq!(f.panel.multiplier_loader(), 1.);
            assert_eq!(f.tween_context.active_for_owner(loader_owner), 1);

            f.tween_context.update(0.1);
            f.score_manager.on_slice(judgement, &mut f.tween_context);
            assert_eq!(f.tween_context.active_for_owner(loader_owner), 1);

            f.settle();
            let expected = match judgement {
                SliceJudgement::Correct => 0.25,
                SliceJudgement::Incorrect => 0.,
            };
            assert_relative_eq!(f.panel.multiplier_loader(), expected);
        }
    }
}
