/// Hand components
pub mod hand;
/// Materials and tint requests for hands
pub mod hand_material;
/// The scoring panel
pub mod score_panel;

pub use hand::Hand;
pub use hand_material::{HandMaterial, HandTint};
pub use score_panel::ScorePanel;
