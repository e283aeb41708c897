//! Deterministic game engines
//!
//! All gameplay logic lives here. Engines must stay pure and deterministic:
//! - Fixed timestep only (one `tick` per frame)
//! - Seeded RNG only
//! - Delays go through the `Scheduler`, never wall-clock callbacks
//! - No rendering or platform dependencies

pub mod balloon;
pub mod event;
pub mod game;
pub mod geometry;
pub mod matching;
pub mod stacking;
pub mod timer;

pub use balloon::{BalloonEngine, BalloonSnapshot, Slot, SlotStatus, SlotVisual};
pub use event::GameEvent;
pub use game::{GameKind, MiniGame};
pub use geometry::{Grid, Rect, Viewport, span_overlap_ratio};
pub use matching::{MatchSnapshot, MatchingEngine, MoveAnimation, OptionView, ShapeColor, ShapeKind};
pub use stacking::{Block, BlockColors, BlockPhase, DropOutcome, StackSnapshot, StackingEngine};
pub use timer::{Scheduler, TimerId};
