//! Contract shared by every mini-game engine

use serde::{Deserialize, Serialize};

use super::event::GameEvent;

/// Which mini-game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Balloon,
    Stacking,
    Matching,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::Balloon, GameKind::Stacking, GameKind::Matching];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Balloon => "Balloon Pop",
            GameKind::Stacking => "Block Stack",
            GameKind::Matching => "Shape Match",
        }
    }

    /// Parse a short command-line name such as `balloon` or `stack`
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "balloon" | "balloons" => Some(GameKind::Balloon),
            "stacking" | "stack" | "block" | "blocks" => Some(GameKind::Stacking),
            "matching" | "match" | "shape" | "shapes" => Some(GameKind::Matching),
            _ => None,
        }
    }
}

/// A single-screen game driven by ticks and presses
///
/// Every state change goes through one of these entry points, so the
/// renderer only ever sees the snapshot between two calls.
pub trait MiniGame {
    /// Render-ready copy of the game state
    type Snapshot: Serialize;

    fn kind(&self) -> GameKind;

    /// Start a fresh round
    fn reset(&mut self);

    /// The "press anywhere" input (pop / drop / select)
    fn press(&mut self);

    /// Advance one fixed timestep: fire due transitions, step animations
    fn tick(&mut self);

    /// Navigation moved away: cancel every pending transition
    fn blur(&mut self);

    /// Navigation arrived: start over
    fn focus(&mut self) {
        self.reset();
    }

    fn snapshot(&self) -> Self::Snapshot;

    /// Take the events raised since the last drain
    fn drain_events(&mut self) -> Vec<GameEvent>;
}
