//! Shape matching: pick the option that matches the target shape
//!
//! Three option shapes sit along the bottom of the screen and a highlight
//! cycles between them. A press sends the target shape onto the highlighted
//! option. A match cheers and deals new shapes; a wrong pick removes that
//! option and cycling resumes among the rest.
//!
//! The target is never removed (picking it is a match), so the options can
//! never run out: after two wrong picks the target is the only one left.

use glam::Vec2;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use super::game::{GameKind, MiniGame};
use super::geometry::Viewport;
use super::timer::{Scheduler, TimerId};
use crate::audio::{AudioManager, SoundEffect};
use crate::consts::ms_to_ticks;
use crate::error::ConfigError;
use crate::lerp_point;
use crate::settings::MatchingSettings;

/// Options dealt per round
pub const OPTION_COUNT: usize = 3;

/// Gap between the option row and the bottom of the screen (px)
const OPTION_BOTTOM_MARGIN: f32 = 50.0;

/// Shape kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Triangle,
    Circle,
    Square,
}

impl ShapeKind {
    /// Full vocabulary shapes are drawn from
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Triangle, ShapeKind::Circle, ShapeKind::Square];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Triangle => "triangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
        }
    }
}

/// Outline color for a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeColor {
    /// Idle
    White,
    /// Highlighted candidate
    Red,
    /// Matched
    Green,
}

/// Target shape moving onto an option, linear over `duration` ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoveAnimation {
    pub from: Vec2,
    pub to: Vec2,
    /// Option index being tested
    pub option: usize,
    pub elapsed: u32,
    pub duration: u32,
}

impl MoveAnimation {
    /// 0.0 at start, 1.0 when done
    pub fn progress(&self) -> f32 {
        if self.duration == 0 {
            1.0
        } else {
            self.elapsed as f32 / self.duration as f32
        }
    }

    pub fn position(&self) -> Vec2 {
        lerp_point(self.from, self.to, self.progress())
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Delayed matching transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    /// Move the highlight to the next available option
    Cycle,
    /// Restore position and cycling; `full` also deals new shapes
    Restart { full: bool },
}

/// One option as the renderer needs it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptionView {
    pub shape: ShapeKind,
    pub center: Vec2,
    pub visible: bool,
    pub stroke: ShapeColor,
}

/// Render-ready matching state
#[derive(Debug, Clone, Serialize)]
pub struct MatchSnapshot {
    pub options: Vec<OptionView>,
    pub option_size: f32,
    pub target: ShapeKind,
    /// Top-left of the target shape
    pub target_position: Vec2,
    pub target_size: f32,
    pub target_color: ShapeColor,
    pub highlighted: usize,
    pub matched: bool,
    /// Highlight is stepping between options
    pub cycling: bool,
    pub animation: Option<MoveAnimation>,
}

/// Shape matching engine
#[derive(Debug)]
pub struct MatchingEngine {
    viewport: Viewport,
    target_size: f32,
    option_size: f32,
    cycle_ticks: u32,
    move_ticks: u32,
    match_delay_ticks: u32,
    mismatch_delay_ticks: u32,
    rng: Pcg32,
    shapes: [ShapeKind; OPTION_COUNT],
    target: ShapeKind,
    available: Vec<ShapeKind>,
    highlighted: usize,
    matched: bool,
    /// Cycling and selection suspended (animating or waiting to restart)
    frozen: bool,
    position: Vec2,
    animation: Option<MoveAnimation>,
    cycle_timer: Option<TimerId>,
    timers: Scheduler<Transition>,
    audio: AudioManager,
    events: Vec<GameEvent>,
}

impl MatchingEngine {
    pub fn new(viewport: Viewport, settings: &MatchingSettings, seed: u64) -> Result<Self, ConfigError> {
        viewport.validate()?;
        let mut engine = Self {
            viewport,
            target_size: settings.target_size,
            option_size: settings.option_size,
            cycle_ticks: ms_to_ticks(settings.cycle_ms),
            move_ticks: ms_to_ticks(settings.move_ms),
            match_delay_ticks: ms_to_ticks(settings.match_delay_ms),
            mismatch_delay_ticks: ms_to_ticks(settings.mismatch_delay_ms),
            rng: Pcg32::seed_from_u64(seed),
            shapes: ShapeKind::ALL,
            target: ShapeKind::ALL[0],
            available: Vec::new(),
            highlighted: 0,
            matched: false,
            frozen: false,
            position: Vec2::ZERO,
            animation: None,
            cycle_timer: None,
            timers: Scheduler::new(),
            audio: AudioManager::disabled(),
            events: Vec::new(),
        };
        engine.restart(true);
        Ok(engine)
    }

    /// Install the sink the success cheer goes to
    pub fn with_audio(mut self, audio: AudioManager) -> Self {
        self.audio = audio;
        self
    }

    /// Return the target home and resume cycling
    ///
    /// With `full_reshuffle`, first deal three new shapes, pick a new target
    /// and highlight the first option. Otherwise the shapes, target and
    /// remaining options are kept.
    pub fn restart(&mut self, full_reshuffle: bool) {
        self.timers.cancel_all();

        if full_reshuffle {
            let mut pool = ShapeKind::ALL.to_vec();
            pool.shuffle(&mut self.rng);
            self.shapes.copy_from_slice(&pool[..OPTION_COUNT]);
            self.target = *self.shapes.choose(&mut self.rng).unwrap_or(&self.shapes[0]);
            self.available = self.shapes.to_vec();
            self.highlighted = 0;
            self.events.push(GameEvent::RoundReset);
            log::info!(
                "Shapes dealt: {:?}, target {}",
                self.shapes.map(|s| s.as_str()),
                self.target.as_str()
            );
        } else {
            self.events.push(GameEvent::OptionsRestored);
        }

        self.position = self.home();
        self.animation = None;
        self.matched = false;
        self.frozen = false;
        self.cycle_timer = Some(self.timers.schedule(self.cycle_ticks, Transition::Cycle));
    }

    /// Send the target onto the highlighted option
    ///
    /// Returns false (and does nothing) while a previous selection is still
    /// animating or waiting for its restart.
    pub fn select(&mut self) -> bool {
        if self.frozen {
            return false;
        }
        self.frozen = true;
        if let Some(id) = self.cycle_timer.take() {
            self.timers.cancel(id);
        }

        let option = self.highlighted;
        let to = self.option_center(option) - Vec2::splat(self.target_size / 2.0);
        self.animation = Some(MoveAnimation {
            from: self.position,
            to,
            option,
            elapsed: 0,
            duration: self.move_ticks,
        });
        self.events.push(GameEvent::SelectionStarted { index: option });
        log::debug!("Selected option {} ({})", option, self.shapes[option].as_str());
        true
    }

    /// Completion callback for the move animation
    ///
    /// Called by `tick` when the tween ends. A shell that animates the move
    /// itself can call it directly. Does nothing if no move is in flight.
    pub fn finish_animation(&mut self) {
        let Some(animation) = self.animation.take() else {
            return;
        };
        self.position = animation.to;

        let chosen = self.shapes[animation.option];
        if chosen == self.target {
            self.matched = true;
            self.events.push(GameEvent::Matched { shape: chosen });
            self.audio.play(SoundEffect::Cheer);
            self.timers
                .schedule(self.match_delay_ticks, Transition::Restart { full: true });
            log::info!("Matched {}", chosen.as_str());
        } else {
            self.available.retain(|&s| s != chosen);
            self.highlighted = self.next_available_after(animation.option);
            debug_assert!(self.available.contains(&self.target));
            self.events.push(GameEvent::Mismatched { shape: chosen });
            self.timers
                .schedule(self.mismatch_delay_ticks, Transition::Restart { full: false });
            log::info!(
                "Wrong pick {} ({} options left)",
                chosen.as_str(),
                self.available.len()
            );
        }
    }

    /// Next option index after `index` whose shape is still available, wrapping
    fn next_available_after(&self, index: usize) -> usize {
        (1..=OPTION_COUNT)
            .map(|step| (index + step) % OPTION_COUNT)
            .find(|&i| self.available.contains(&self.shapes[i]))
            .unwrap_or(index)
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Cycle => {
                if self.frozen {
                    return;
                }
                let next = self.next_available_after(self.highlighted);
                if next != self.highlighted {
                    self.highlighted = next;
                    self.events.push(GameEvent::HighlightMoved { index: next });
                }
                self.cycle_timer = Some(self.timers.schedule(self.cycle_ticks, Transition::Cycle));
            }
            Transition::Restart { full } => self.restart(full),
        }
    }

    fn step_animation(&mut self) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        animation.elapsed += 1;
        self.position = animation.position();
        if animation.is_done() {
            self.finish_animation();
        }
    }

    /// Where the target shape rests between selections (top-left)
    pub fn home(&self) -> Vec2 {
        Vec2::new(
            self.viewport.width / 2.0 - self.target_size / 2.0,
            self.viewport.height / 3.0 - self.target_size,
        )
    }

    /// Center of the option at `index`
    pub fn option_center(&self, index: usize) -> Vec2 {
        let w = self.viewport.width;
        let x = match index {
            0 => w / 5.0,
            1 => w / 2.0,
            _ => 4.0 * w / 5.0,
        };
        Vec2::new(x, self.viewport.height - (self.option_size + OPTION_BOTTOM_MARGIN))
    }

    /// Outline color of the option at `index`
    pub fn stroke_for(&self, index: usize) -> ShapeColor {
        let shape = self.shapes[index];
        if self.matched && shape == self.target {
            ShapeColor::Green
        } else if index == self.highlighted && self.available.contains(&shape) {
            ShapeColor::Red
        } else {
            ShapeColor::White
        }
    }

    pub fn target_color(&self) -> ShapeColor {
        if self.matched {
            ShapeColor::Green
        } else {
            ShapeColor::White
        }
    }

    pub fn shapes(&self) -> &[ShapeKind; OPTION_COUNT] {
        &self.shapes
    }

    pub fn target(&self) -> ShapeKind {
        self.target
    }

    pub fn available(&self) -> &[ShapeKind] {
        &self.available
    }

    /// Index (into `shapes`) of the highlighted option
    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn highlighted_shape(&self) -> ShapeKind {
        self.shapes[self.highlighted]
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// True while the highlight timer is running
    pub fn is_cycling(&self) -> bool {
        self.cycle_timer.is_some_and(|id| self.timers.is_scheduled(id))
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Current top-left of the target shape
    pub fn target_position(&self) -> Vec2 {
        self.position
    }

    pub fn animation(&self) -> Option<&MoveAnimation> {
        self.animation.as_ref()
    }
}

impl MiniGame for MatchingEngine {
    type Snapshot = MatchSnapshot;

    fn kind(&self) -> GameKind {
        GameKind::Matching
    }

    fn reset(&mut self) {
        self.restart(true);
    }

    fn press(&mut self) {
        self.select();
    }

    fn tick(&mut self) {
        for transition in self.timers.advance() {
            self.apply(transition);
        }
        self.step_animation();
    }

    fn blur(&mut self) {
        self.timers.cancel_all();
        self.cycle_timer = None;
        self.animation = None;
    }

    fn snapshot(&self) -> MatchSnapshot {
        let options = self
            .shapes
            .iter()
            .enumerate()
            .map(|(i, &shape)| OptionView {
                shape,
                center: self.option_center(i),
                visible: self.available.contains(&shape),
                stroke: self.stroke_for(i),
            })
            .collect();
        MatchSnapshot {
            options,
            option_size: self.option_size,
            target: self.target,
            target_position: self.position,
            target_size: self.target_size,
            target_color: self.target_color(),
            highlighted: self.highlighted,
            matched: self.matched,
            cycling: self.is_cycling(),
            animation: self.animation,
        }
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
