use std::cell::{Cell, Ref, RefCell};

/// The surfaces the scoring UI is drawn from.
///
/// The host owns the panel (usually behind an `Rc`) and renders it each frame; the
/// `ScoreManager` and its tweens only ever hold weak references, so dropping the panel
/// is enough to stop anything else writing to it.
#[derive(Debug)]
pub struct ScorePanel {
    multiplier_text: RefCell<String>,
    score_text: RefCell<String>,
    multiplier_loader: Cell<f32>,
    opacity: Cell<f32>,
}

impl Default for ScorePanel {
    fn default() -> Self {
        Self {
            multiplier_text: RefCell::new("0".to_string()),
            score_text: RefCell::new("0".to_string()),
            multiplier_loader: Cell::new(0.),
            opacity: Cell::new(1.),
        }
    }
}

impl ScorePanel {
    /// Text of the multiplier label
    pub fn multiplier_text(&self) -> Ref<'_, String> {
        self.multiplier_text.borrow()
    }

    /// Text of the score label
    pub fn score_text(&self) -> Ref<'_, String> {
        self.score_text.borrow()
    }

    /// How full the multiplier progress loader is, from 0.0 to 1.0
    pub fn multiplier_loader(&self) -> f32 {
        self.multiplier_loader.get()
    }

    /// Opacity of the whole panel
    pub fn opacity(&self) -> f32 {
        self.opacity.get()
    }

    pub(crate) fn set_labels(&self, multiplier: u32, score: u64) {
        let mut multiplier_text = self.multiplier_text.borrow_mut();
        multiplier_text.clear();
        multiplier_text.push_str(&multiplier.to_string());

        let mut score_text = self.score_text.borrow_mut();
        score_text.clear();
        score_text.push_str(&score.to_string());
    }

    pub(crate) fn set_multiplier_loader(&self, fill: f32) {
        self.multiplier_loader.set(fill.clamp(0., 1.));
    }

    pub(crate) fn set_opacity(&self, opacity: f32) {
        self.opacity.set(opacity.clamp(0., 1.));
    }
}
