use glam::Vec4;

/// The parts of a hand's material that gameplay is allowed to touch
#[derive(Debug, Clone, PartialEq)]
pub struct HandMaterial {
    /// The color and intensity of the light being emitted by the material
    pub emissive_factor: Vec4,
    /// Should the renderer scale `emissive_factor` by its own intensity value?
    pub use_emissive_intensity: bool,
}

impl Default for HandMaterial {
    fn default() -> Self {
        Self {
            emissive_factor: Vec4::ZERO,
            use_emissive_intensity: true,
        }
    }
}

/// Added to a hand to request it be tinted with its controller's colour.
/// Removed by `hand_tint_system` once the tint has been applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandTint {
    /// Multiplier applied to the colour before it's written as emission
    pub emission_intensity: f32,
}

impl Default for HandTint {
    fn default() -> Self {
        Self {
            emission_intensity: 100.,
        }
    }
}
