use std::path::Path;

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::{components::hand::Handedness, VrBeatsError, VrBeatsResult};

/// Static configuration for a play session, read once when the game starts.
/// Any field missing from the JSON falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// The highest the score multiplier can climb
    pub max_multiplier: u32,
    /// Points awarded for a correct slice before the multiplier is applied
    pub score_per_hit: u32,
    /// How many incorrect slices in a row are tolerated. One more and it's game over.
    pub error_limit: u32,
    /// How long the displayed score takes to catch up with the real one
    pub score_follow_time: f32,
    /// Colour of the left hand and its sabers
    pub left_hand_color: Vec4,
    /// Colour of the right hand and its sabers
    pub right_hand_color: Vec4,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            max_multiplier: 8,
            score_per_hit: 100,
            error_limit: 5,
            score_follow_time: 1.,
            left_hand_color: Vec4::new(1., 0.05, 0.05, 1.),
            right_hand_color: Vec4::new(0.05, 0.3, 1., 1.),
        }
    }
}

impl GameSettings {
    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> VrBeatsResult<Self> {
        let settings: GameSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file on disk
    pub fn load<P: AsRef<Path>>(path: P) -> VrBeatsResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values the game can't work with
    pub fn validate(&self) -> VrBeatsResult<()> {
        if !self.score_follow_time.is_finite() || self.score_follow_time < 0. {
            return Err(VrBeatsError::InvalidSettings(format!(
                "score_follow_time must be a non-negative number, got {}",
                self.score_follow_time
            )));
        }

        Ok(())
    }

    /// The colour assigned to a controller
    pub fn hand_color(&self, handedness: Handedness) -> Vec4 {
        match handedness {
            Handedness::Left => self.left_hand_color,
            Handedness::Right => self.right_hand_color,
        }
    }
}
