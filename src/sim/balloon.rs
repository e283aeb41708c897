//! Balloon pop: tap anywhere and a random balloon bursts
//!
//! Balloons are spread over a grid with at most one balloon per cell, so a
//! layout can never overlap. Each pop starts a short explosion, and popping
//! the last balloon shows a win message and starts a fresh round.

use glam::Vec2;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use super::game::{GameKind, MiniGame};
use super::geometry::{Grid, Rect, Viewport};
use super::timer::Scheduler;
use crate::consts::ms_to_ticks;
use crate::error::ConfigError;
use crate::settings::BalloonSettings;

/// Whether a balloon is still up. Popping is permanent for the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotStatus {
    Intact,
    Popped,
}

/// What the renderer should draw for a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotVisual {
    /// Balloon image
    Balloon,
    /// Explosion animation (restart it when `animation_key` changes)
    Explosion,
    /// Idle "popped" mark
    PoppedMark,
}

/// One balloon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub id: usize,
    /// Grid cell this balloon was placed in
    pub cell: usize,
    /// Top-left corner as a percentage of the screen
    pub pos: Vec2,
    pub status: SlotStatus,
    /// Explosion still showing (layered on top of `Popped`)
    pub exploding: bool,
    /// Bumped on every pop so the explosion animation restarts
    pub animation_key: u32,
}

impl Slot {
    pub fn is_intact(&self) -> bool {
        self.status == SlotStatus::Intact
    }

    pub fn visual(&self) -> SlotVisual {
        match (self.status, self.exploding) {
            (_, true) => SlotVisual::Explosion,
            (SlotStatus::Intact, false) => SlotVisual::Balloon,
            (SlotStatus::Popped, false) => SlotVisual::PoppedMark,
        }
    }
}

/// Delayed balloon transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    ExplosionEnd { slot: usize },
    ShowWin,
    NewRound,
}

/// Render-ready balloon state
#[derive(Debug, Clone, Serialize)]
pub struct BalloonSnapshot {
    pub slots: Vec<Slot>,
    /// Pixel bounds per slot, same order as `slots`
    pub rects: Vec<Rect>,
    pub visuals: Vec<SlotVisual>,
    pub balloon_size: Vec2,
    pub show_win_message: bool,
}

/// Balloon pop engine
#[derive(Debug, Clone)]
pub struct BalloonEngine {
    viewport: Viewport,
    grid: Grid,
    padding: f32,
    count: usize,
    balloon_size: Vec2,
    explosion_ticks: u32,
    win_delay_ticks: u32,
    win_display_ticks: u32,
    rng: Pcg32,
    slots: Vec<Slot>,
    round_cleared: bool,
    show_win_message: bool,
    timers: Scheduler<Transition>,
    events: Vec<GameEvent>,
}

impl BalloonEngine {
    /// Build an engine and lay out its first round
    ///
    /// Fails if the viewport is invalid or there are more balloons than cells.
    pub fn new(viewport: Viewport, settings: &BalloonSettings, seed: u64) -> Result<Self, ConfigError> {
        let grid = Grid::new(viewport, settings.columns, settings.rows)?;
        let balloon_size = Vec2::new(
            (viewport.width / 6.0).min(settings.max_width),
            (viewport.height / 6.0).min(settings.max_height),
        );
        let mut engine = Self {
            viewport,
            grid,
            padding: settings.padding,
            count: settings.count,
            balloon_size,
            explosion_ticks: ms_to_ticks(settings.explosion_ms),
            win_delay_ticks: ms_to_ticks(settings.win_delay_ms),
            win_display_ticks: ms_to_ticks(settings.win_display_ms),
            rng: Pcg32::seed_from_u64(seed),
            slots: Vec::new(),
            round_cleared: false,
            show_win_message: false,
            timers: Scheduler::new(),
            events: Vec::new(),
        };
        engine.reset_round(settings.count)?;
        Ok(engine)
    }

    /// Start a round with `count` balloons at fresh positions, all intact
    ///
    /// Rejects `count` larger than the grid's cell count and leaves the
    /// current round untouched in that case.
    pub fn reset_round(&mut self, count: usize) -> Result<(), ConfigError> {
        let cells = self.grid.cell_count();
        if count > cells {
            return Err(ConfigError::TooManySlots { count, cells });
        }

        self.timers.cancel_all();
        self.count = count;
        self.slots = self.layout(count);
        self.round_cleared = false;
        self.show_win_message = false;
        self.events.push(GameEvent::RoundReset);
        log::info!("Balloon round started with {} balloons", count);
        Ok(())
    }

    /// Shuffle the cells, give each balloon the next one, and jitter it inside
    fn layout(&mut self, count: usize) -> Vec<Slot> {
        let mut cells: Vec<usize> = (0..self.grid.cell_count()).collect();
        cells.shuffle(&mut self.rng);

        let (inset, span) = self.grid.placement_range(self.balloon_size, self.padding);
        cells
            .into_iter()
            .take(count)
            .enumerate()
            .map(|(id, cell)| {
                let jitter = Vec2::new(
                    self.rng.random::<f32>() * span.x,
                    self.rng.random::<f32>() * span.y,
                );
                let px = self.grid.cell_rect(cell).min + inset + jitter;
                Slot {
                    id,
                    cell,
                    pos: self.viewport.px_to_percent(px),
                    status: SlotStatus::Intact,
                    exploding: false,
                    animation_key: 0,
                }
            })
            .collect()
    }

    /// Pop a random intact balloon
    ///
    /// Returns the popped slot, or `None` (and does nothing) if every
    /// balloon is already popped. Popping the last balloon raises
    /// `RoundCleared` and schedules the win message in the same step.
    pub fn pop(&mut self) -> Option<usize> {
        let intact: Vec<usize> = self
            .slots
            .iter()
            .filter(|s| s.is_intact())
            .map(|s| s.id)
            .collect();
        let slot = *intact.choose(&mut self.rng)?;

        let balloon = &mut self.slots[slot];
        balloon.status = SlotStatus::Popped;
        balloon.exploding = true;
        balloon.animation_key = balloon.animation_key.wrapping_add(1);
        self.timers
            .schedule(self.explosion_ticks, Transition::ExplosionEnd { slot });
        self.events.push(GameEvent::BalloonPopped { slot });
        log::debug!("Popped balloon {} ({} left)", slot, intact.len() - 1);

        if !self.round_cleared && self.slots.iter().all(|s| !s.is_intact()) {
            self.round_cleared = true;
            self.events.push(GameEvent::RoundCleared);
            self.timers.schedule(self.win_delay_ticks, Transition::ShowWin);
            log::info!("All {} balloons popped", self.slots.len());
        }

        Some(slot)
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::ExplosionEnd { slot } => {
                if let Some(balloon) = self.slots.get_mut(slot) {
                    balloon.exploding = false;
                    self.events.push(GameEvent::ExplosionFinished { slot });
                }
            }
            Transition::ShowWin => {
                self.show_win_message = true;
                self.events.push(GameEvent::WinShown);
                self.timers
                    .schedule(self.win_display_ticks, Transition::NewRound);
            }
            Transition::NewRound => {
                // Count was validated when it was set
                if let Err(e) = self.reset_round(self.count) {
                    log::error!("Balloon round reset failed: {}", e);
                }
            }
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// True once every balloon in the round is popped
    pub fn is_cleared(&self) -> bool {
        self.round_cleared
    }

    pub fn show_win_message(&self) -> bool {
        self.show_win_message
    }

    /// Drawn balloon size in pixels
    pub fn balloon_size(&self) -> Vec2 {
        self.balloon_size
    }

    /// Pixel bounds of a balloon
    pub fn slot_rect(&self, slot: &Slot) -> Rect {
        Rect::new(self.viewport.percent_to_px(slot.pos), self.balloon_size)
    }

    /// Pending delayed transitions (explosions, win message, reset)
    pub fn pending_transitions(&self) -> usize {
        self.timers.pending()
    }
}

impl MiniGame for BalloonEngine {
    type Snapshot = BalloonSnapshot;

    fn kind(&self) -> GameKind {
        GameKind::Balloon
    }

    fn reset(&mut self) {
        if let Err(e) = self.reset_round(self.count) {
            log::error!("Balloon round reset failed: {}", e);
        }
    }

    fn press(&mut self) {
        self.pop();
    }

    fn tick(&mut self) {
        for transition in self.timers.advance() {
            self.apply(transition);
        }
    }

    fn blur(&mut self) {
        self.timers.cancel_all();
    }

    fn snapshot(&self) -> BalloonSnapshot {
        BalloonSnapshot {
            slots: self.slots.clone(),
            rects: self.slots.iter().map(|s| self.slot_rect(s)).collect(),
            visuals: self.slots.iter().map(Slot::visual).collect(),
            balloon_size: self.balloon_size,
            show_win_message: self.show_win_message,
        }
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
