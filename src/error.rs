//! Error types for pocket-arcade

use thiserror::Error;

/// Invalid game configuration, rejected when an engine is built or reset
#[derive(Error, Debug)]
pub enum ConfigError {
    /// More balloon slots requested than the grid has cells
    #[error("{count} balloon slots requested but the grid only has {cells} cells")]
    TooManySlots { count: usize, cells: usize },

    /// Grid with zero rows or columns
    #[error("balloon grid must have at least one row and one column")]
    EmptyGrid,

    /// Viewport with a non-positive or non-finite dimension
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    /// Stacking board too short to have a ceiling above the first block
    #[error("stacking board needs at least {min} rows, got {rows}")]
    TooFewRows { rows: u32, min: u32 },

    /// Per-tick movement step that is zero, negative or non-finite
    #[error("{name} must be a positive number of pixels per tick, got {value}")]
    InvalidStep { name: &'static str, value: f32 },

    /// Settings file could not be read or written
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON for `Settings`
    #[error("settings parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Sound playback failure. Never allowed to affect game state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No audio device/context could be created
    #[error("audio output unavailable")]
    Unavailable,

    /// The asset failed to load or play
    #[error("playback failed: {0}")]
    Playback(String),
}
