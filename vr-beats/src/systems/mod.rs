/// Gives each hand its controller's colour
pub mod hand_tint;

pub use hand_tint::hand_tint_system;
