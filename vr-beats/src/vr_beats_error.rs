use thiserror::Error;

/// Everything that can go wrong at the fallible edges of the crate
#[derive(Error, Debug)]
pub enum VrBeatsError {
    /// The settings parsed, but hold values the game can't use
    #[error("Invalid game settings: {0}")]
    InvalidSettings(String),
    /// The settings file was not valid JSON
    #[error("Unable to parse game settings")]
    Json(#[from] serde_json::Error),
    /// Reading from disk failed
    #[error(transparent)]
    IO(#[from] std::io::Error),
}
