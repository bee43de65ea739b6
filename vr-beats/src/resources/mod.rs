/// Static configuration for a play session
pub mod game_settings;
/// The frame driven tween scheduler
pub mod tween_context;

pub use game_settings::GameSettings;
pub use tween_context::TweenContext;
