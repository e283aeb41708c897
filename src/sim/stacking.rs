//! Block stacking: drop the sliding block onto the tower
//!
//! A block pans left and right across the bottom of the free space. Dropping
//! it lands it on the stack if it sits at least half over the block below,
//! otherwise it falls off the board and a new block takes its place. The
//! tower is complete once it reaches the ceiling.
//!
//! `y` is measured upward from the floor.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use super::game::{GameKind, MiniGame};
use super::geometry::{Viewport, span_overlap_ratio};
use super::timer::Scheduler;
use crate::consts::ms_to_ticks;
use crate::error::ConfigError;
use crate::settings::StackingSettings;

/// Minimum fraction of the block that must rest on the block below
pub const STACK_OVERLAP_THRESHOLD: f32 = 0.5;

/// Fewest rows that still leave room above the first block
pub const MIN_ROWS: u32 = 3;

/// Moving block fill/stroke
pub const PANNING_COLORS: BlockColors = BlockColors {
    fill: "#00E0FF",
    stroke: "#79A1DE",
};

/// Settled block fill/stroke
pub const SETTLED_COLORS: BlockColors = BlockColors {
    fill: "#00FF85",
    stroke: "#56C48F",
};

/// Block movement phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockPhase {
    /// Sliding horizontally, waiting for a drop
    Panning,
    /// Missed the stack, falling with no horizontal control
    Falling,
    /// Part of the tower
    Settled,
}

/// Fill and stroke colors for drawing a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockColors {
    pub fill: &'static str,
    pub stroke: &'static str,
}

/// A square block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Bottom-left corner relative to the floor's left edge
    pub offset: Vec2,
    /// Horizontal direction, -1.0 or 1.0
    pub direction: f32,
    pub size: f32,
    pub phase: BlockPhase,
}

impl Block {
    /// New panning block resting at `level`, at the left edge, moving right
    pub fn spawn(level: u32, size: f32) -> Self {
        Self {
            offset: Vec2::new(0.0, level as f32 * size),
            direction: 1.0,
            size,
            phase: BlockPhase::Panning,
        }
    }

    pub fn palette(&self) -> BlockColors {
        match self.phase {
            BlockPhase::Panning | BlockPhase::Falling => PANNING_COLORS,
            BlockPhase::Settled => SETTLED_COLORS,
        }
    }
}

/// Result of a drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Landed; the stack is now `level` blocks tall
    Stacked { level: u32 },
    /// Not enough overlap, the block is falling
    Missed,
    /// No panning block (falling or tower complete)
    Ignored,
}

/// Delayed stacking transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    ResetBoard,
}

/// Render-ready stacking state
#[derive(Debug, Clone, Serialize)]
pub struct StackSnapshot {
    /// Moving block, absent once the tower is complete
    pub current: Option<Block>,
    pub stack: Vec<Block>,
    pub level: u32,
    pub block_size: f32,
    pub game_over: bool,
    /// Fireworks showing
    pub celebrating: bool,
}

/// Block stacking engine
#[derive(Debug, Clone)]
pub struct StackingEngine {
    viewport: Viewport,
    rows: u32,
    block_size: f32,
    pan_step: f32,
    fall_step: f32,
    celebration_ticks: u32,
    current: Option<Block>,
    stack: Vec<Block>,
    level: u32,
    game_over: bool,
    celebrating: bool,
    timers: Scheduler<Transition>,
    events: Vec<GameEvent>,
}

impl StackingEngine {
    pub fn new(viewport: Viewport, settings: &StackingSettings) -> Result<Self, ConfigError> {
        viewport.validate()?;
        if settings.rows < MIN_ROWS {
            return Err(ConfigError::TooFewRows {
                rows: settings.rows,
                min: MIN_ROWS,
            });
        }
        for (name, value) in [("pan_step", settings.pan_step), ("fall_step", settings.fall_step)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidStep { name, value });
            }
        }
        let block_size = viewport.height / settings.rows as f32;
        let mut engine = Self {
            viewport,
            rows: settings.rows,
            block_size,
            pan_step: settings.pan_step,
            fall_step: settings.fall_step,
            celebration_ticks: ms_to_ticks(settings.celebration_ms),
            current: None,
            stack: Vec::new(),
            level: 0,
            game_over: false,
            celebrating: false,
            timers: Scheduler::new(),
            events: Vec::new(),
        };
        engine.reset();
        Ok(engine)
    }

    /// Stack height that completes the tower
    pub fn max_level(&self) -> u32 {
        self.rows - 2
    }

    /// Rightmost offset a panning block may reach
    fn max_x(&self) -> f32 {
        (self.viewport.width - self.block_size).max(0.0)
    }

    /// Drop the panning block
    ///
    /// Lands it if the stack is empty or at least half of it sits over the
    /// top block (exactly half counts). Otherwise it starts falling.
    pub fn drop_block(&mut self) -> DropOutcome {
        if self.game_over {
            return DropOutcome::Ignored;
        }
        let Some(block) = self.current.as_mut() else {
            return DropOutcome::Ignored;
        };
        if block.phase != BlockPhase::Panning {
            return DropOutcome::Ignored;
        }

        let overlap = match self.stack.last() {
            Some(top) => span_overlap_ratio(block.offset.x, top.offset.x, self.block_size),
            None => 1.0,
        };

        if overlap >= STACK_OVERLAP_THRESHOLD {
            self.stack_block()
        } else {
            block.phase = BlockPhase::Falling;
            self.events.push(GameEvent::BlockMissed);
            log::debug!("Block missed (overlap {:.2})", overlap);
            DropOutcome::Missed
        }
    }

    /// Freeze the current block onto the tower and spawn the next one
    fn stack_block(&mut self) -> DropOutcome {
        let Some(mut block) = self.current.take() else {
            return DropOutcome::Ignored;
        };
        block.phase = BlockPhase::Settled;
        block.offset.y = self.level as f32 * self.block_size;
        self.stack.push(block);
        self.level += 1;
        self.events.push(GameEvent::BlockStacked { level: self.level });
        log::debug!("Block stacked at x={:.1}, level {}", block.offset.x, self.level);

        if self.level >= self.max_level() {
            self.game_over = true;
            self.celebrating = true;
            self.events.push(GameEvent::TowerComplete);
            self.timers
                .schedule(self.celebration_ticks, Transition::ResetBoard);
            log::info!("Tower complete at level {}", self.level);
        } else {
            self.current = Some(Block::spawn(self.level, self.block_size));
        }
        DropOutcome::Stacked { level: self.level }
    }

    /// One animation frame for the moving block
    fn step_block(&mut self) {
        if self.game_over {
            return;
        }
        let max_x = self.max_x();
        let (level, size) = (self.level, self.block_size);
        let Some(block) = self.current.as_mut() else {
            return;
        };

        match block.phase {
            BlockPhase::Panning => {
                let x = block.offset.x + block.direction * self.pan_step;
                if x >= max_x {
                    block.offset.x = max_x;
                    block.direction = -1.0;
                } else if x <= 0.0 {
                    block.offset.x = 0.0;
                    block.direction = 1.0;
                } else {
                    block.offset.x = x;
                }
            }
            BlockPhase::Falling => {
                block.offset.y -= self.fall_step;
                // Fully below the floor: try again at the same level
                if block.offset.y <= -size {
                    *block = Block::spawn(level, size);
                    self.events.push(GameEvent::BlockRespawned);
                }
            }
            BlockPhase::Settled => {}
        }
    }

    pub fn current(&self) -> Option<&Block> {
        self.current.as_ref()
    }

    pub fn stack(&self) -> &[Block] {
        &self.stack
    }

    /// Blocks settled so far
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn block_size(&self) -> f32 {
        self.block_size
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebrating
    }
}

impl MiniGame for StackingEngine {
    type Snapshot = StackSnapshot;

    fn kind(&self) -> GameKind {
        GameKind::Stacking
    }

    /// Empty the board and spawn a panning block at level 0
    fn reset(&mut self) {
        self.timers.cancel_all();
        self.current = Some(Block::spawn(0, self.block_size));
        self.stack.clear();
        self.level = 0;
        self.game_over = false;
        self.celebrating = false;
        self.events.push(GameEvent::RoundReset);
        log::info!("Stacking board reset ({} rows)", self.rows);
    }

    fn press(&mut self) {
        self.drop_block();
    }

    fn tick(&mut self) {
        for transition in self.timers.advance() {
            match transition {
                Transition::ResetBoard => self.reset(),
            }
        }
        self.step_block();
    }

    fn blur(&mut self) {
        self.timers.cancel_all();
    }

    fn snapshot(&self) -> StackSnapshot {
        StackSnapshot {
            current: self.current,
            stack: self.stack.clone(),
            level: self.level,
            block_size: self.block_size,
            game_over: self.game_over,
            celebrating: self.celebrating,
        }
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// 7 rows of 100 px blocks on a 400 px wide screen
    fn engine() -> StackingEngine {
        StackingEngine::new(Viewport::new(400.0, 700.0), &StackingSettings::default())
            .expect("default settings are valid")
    }

    fn tick_n(engine: &mut StackingEngine, n: u32) {
        for _ in 0..n {
            engine.tick();
        }
    }

    #[test]
    fn test_reset_state() {
        let engine = engine();
        let block = engine.current().expect("panning block");
        assert_eq!(block.offset, Vec2::ZERO);
        assert_eq!(block.direction, 1.0);
        assert_eq!(block.phase, BlockPhase::Panning);
        assert_eq!(block.size, 100.0);
        assert_eq!(engine.level(), 0);
        assert!(engine.stack().is_empty());
    }

    #[test]
    fn test_too_few_rows() {
        let settings = StackingSettings {
            rows: 2,
            ..Default::default()
        };
        let err = StackingEngine::new(Viewport::default(), &settings).unwrap_err();
        assert!(matches!(err, ConfigError::TooFewRows { rows: 2, min: 3 }));
    }

    #[test]
    fn test_bad_steps_rejected() {
        for (pan_step, fall_step) in [(2.0, 0.0), (2.0, -8.0), (2.0, f32::NAN), (0.0, 8.0), (f32::INFINITY, 8.0)] {
            let settings = StackingSettings {
                pan_step,
                fall_step,
                ..Default::default()
            };
            let err = StackingEngine::new(Viewport::default(), &settings).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidStep { .. }), "{pan_step}/{fall_step}: {err}");
        }
    }

    #[test]
    fn test_first_drop_always_stacks() {
        let mut engine = engine();
        tick_n(&mut engine, 37);
        assert_eq!(engine.drop_block(), DropOutcome::Stacked { level: 1 });
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.stack()[0].phase, BlockPhase::Settled);
        assert_eq!(engine.stack()[0].offset, Vec2::new(74.0, 0.0));
        assert_eq!(engine.stack()[0].palette(), SETTLED_COLORS);

        let next = engine.current().expect("next block");
        assert_eq!(next.offset, Vec2::new(0.0, 100.0));
        assert_eq!(next.palette(), PANNING_COLORS);
    }

    #[test]
    fn test_half_overlap_is_inclusive() {
        let mut engine = engine();
        engine.drop_block();
        // 25 ticks * 2 px = 50 px off the block below: exactly half
        tick_n(&mut engine, 25);
        assert_eq!(engine.current().map(|b| b.offset.x), Some(50.0));
        assert_eq!(engine.drop_block(), DropOutcome::Stacked { level: 2 });
    }

    #[test]
    fn test_less_than_half_misses_and_respawns() {
        let mut engine = engine();
        engine.drop_block();
        tick_n(&mut engine, 26);
        assert_eq!(engine.drop_block(), DropOutcome::Missed);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.current().map(|b| b.phase), Some(BlockPhase::Falling));

        // No drops while falling
        assert_eq!(engine.drop_block(), DropOutcome::Ignored);

        // Falls straight down from y=100 to y<=-100 at 8 px per tick
        engine.tick();
        let block = *engine.current().expect("falling block");
        assert_eq!(block.offset, Vec2::new(52.0, 92.0));
        tick_n(&mut engine, 24);
        let block = *engine.current().expect("respawned block");
        assert_eq!(block.phase, BlockPhase::Panning);
        assert_eq!(block.offset, Vec2::new(0.0, 100.0));
        assert!(engine.drain_events().contains(&GameEvent::BlockRespawned));
        assert_eq!(engine.stack().len(), 1);
    }

    #[test]
    fn test_pan_bounces_off_edges() {
        let mut engine = engine();
        // max_x = 300, reached after 150 ticks
        tick_n(&mut engine, 150);
        let block = engine.current().expect("block");
        assert_eq!(block.offset.x, 300.0);
        assert_eq!(block.direction, -1.0);
        engine.tick();
        assert_eq!(engine.current().map(|b| b.offset.x), Some(298.0));
        tick_n(&mut engine, 149);
        let block = engine.current().expect("block");
        assert_eq!(block.offset.x, 0.0);
        assert_eq!(block.direction, 1.0);
    }

    #[test]
    fn test_tower_complete_after_rows_minus_two() {
        let mut engine = engine();
        for level in 1..=4 {
            assert_eq!(engine.drop_block(), DropOutcome::Stacked { level });
            assert!(!engine.is_game_over());
        }
        assert_eq!(engine.drop_block(), DropOutcome::Stacked { level: 5 });
        assert!(engine.is_game_over());
        assert!(engine.is_celebrating());
        assert!(engine.current().is_none());
        assert!(engine.drain_events().contains(&GameEvent::TowerComplete));

        // Terminal: drops and frames change nothing
        assert_eq!(engine.drop_block(), DropOutcome::Ignored);
        let before = engine.snapshot();
        engine.tick();
        let after = engine.snapshot();
        assert_eq!(before.stack, after.stack);
        assert_eq!(before.level, after.level);
        assert_eq!(before.current, after.current);

        // Only a reset leaves the terminal state
        engine.reset();
        assert!(!engine.is_game_over());
        assert_eq!(engine.level(), 0);
    }

    #[test]
    fn test_board_resets_after_celebration() {
        let mut engine = engine();
        for _ in 0..5 {
            engine.drop_block();
        }
        assert!(engine.is_game_over());
        tick_n(&mut engine, ms_to_ticks(3000) - 1);
        assert!(engine.is_game_over());
        engine.tick();
        assert!(!engine.is_game_over());
        assert!(engine.stack().is_empty());
    }

    #[test]
    fn test_blur_cancels_celebration_reset() {
        let mut engine = engine();
        for _ in 0..5 {
            engine.drop_block();
        }
        engine.blur();
        tick_n(&mut engine, ms_to_ticks(3000) * 2);
        assert!(engine.is_game_over());
        engine.focus();
        assert!(!engine.is_game_over());
    }

    proptest! {
        #[test]
        fn panning_stays_in_bounds(
            width in 50.0f32..2000.0,
            height in 100.0f32..2000.0,
            pan_step in 0.5f32..40.0,
            ticks in 0u32..2000,
        ) {
            let settings = StackingSettings { pan_step, ..Default::default() };
            let mut engine = StackingEngine::new(Viewport::new(width, height), &settings).expect("valid");
            let max_x = (width - engine.block_size()).max(0.0);
            for _ in 0..ticks {
                engine.tick();
                let block = engine.current().expect("panning block");
                prop_assert!(block.offset.x >= 0.0 && block.offset.x <= max_x);
                prop_assert!(block.direction == 1.0 || block.direction == -1.0);
            }
        }
    }
}
