//! Events raised by the engines for the shell (sound, logging, analytics)

use serde::{Deserialize, Serialize};

use super::matching::ShapeKind;

/// Something observable happened in a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    // === Balloon ===
    /// A balloon was popped and its explosion started
    BalloonPopped { slot: usize },
    /// A balloon's explosion animation finished
    ExplosionFinished { slot: usize },
    /// The last balloon of the round was popped (raised once per round)
    RoundCleared,
    /// The "You win!" message appeared
    WinShown,

    // === Stacking ===
    /// Block landed on the stack; `level` is the new stack height
    BlockStacked { level: u32 },
    /// Block missed the stack and started falling
    BlockMissed,
    /// A missed block fell off the board and a new one spawned
    BlockRespawned,
    /// Stack reached the top of the board
    TowerComplete,

    // === Matching ===
    /// Highlight moved to the option at `index`
    HighlightMoved { index: usize },
    /// Target started moving onto the option at `index`
    SelectionStarted { index: usize },
    /// Chosen option matched the target
    Matched { shape: ShapeKind },
    /// Chosen option was wrong and has been removed
    Mismatched { shape: ShapeKind },
    /// Cycling resumed after a wrong choice
    OptionsRestored,

    // === Shared ===
    /// A new round started
    RoundReset,
}
