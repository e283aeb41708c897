//! Arcade: the three games plus navigation focus
//!
//! Only the focused game receives presses and ticks. Leaving a game cancels
//! all of its pending transitions; entering one starts a fresh round.

use serde_json::Value;

use crate::audio::AudioManager;
use crate::error::ConfigError;
use crate::settings::Settings;
use crate::sim::{BalloonEngine, GameEvent, GameKind, MatchingEngine, MiniGame, StackingEngine};

/// All games, one of which may have focus
#[derive(Debug)]
pub struct Arcade {
    balloon: BalloonEngine,
    stacking: StackingEngine,
    matching: MatchingEngine,
    focused: Option<GameKind>,
}

impl Arcade {
    /// Build every game from settings. Each game gets its own RNG stream.
    pub fn new(settings: &Settings, seed: u64) -> Result<Self, ConfigError> {
        let balloon = BalloonEngine::new(settings.viewport, &settings.balloon, seed)?;
        let stacking = StackingEngine::new(settings.viewport, &settings.stacking)?;
        let matching = MatchingEngine::new(
            settings.viewport,
            &settings.matching,
            seed.wrapping_add(0x9E37_79B9_7F4A_7C15),
        )?;
        log::info!("Arcade ready ({}x{}, seed {})", settings.viewport.width, settings.viewport.height, seed);
        Ok(Self {
            balloon,
            stacking,
            matching,
            focused: None,
        })
    }

    /// Route the matching game's success cheer to `audio`
    pub fn with_audio(mut self, audio: AudioManager) -> Self {
        self.matching = self.matching.with_audio(audio);
        self
    }

    /// Navigate to a game: blur whatever had focus, then focus (reset) `kind`
    pub fn open(&mut self, kind: GameKind) {
        self.close();
        match kind {
            GameKind::Balloon => self.balloon.focus(),
            GameKind::Stacking => self.stacking.focus(),
            GameKind::Matching => self.matching.focus(),
        }
        self.focused = Some(kind);
        log::info!("Opened {}", kind.as_str());
    }

    /// Navigate back to the library, blurring the focused game
    pub fn close(&mut self) {
        let Some(kind) = self.focused.take() else {
            return;
        };
        match kind {
            GameKind::Balloon => self.balloon.blur(),
            GameKind::Stacking => self.stacking.blur(),
            GameKind::Matching => self.matching.blur(),
        }
        log::info!("Closed {}", kind.as_str());
    }

    pub fn focused(&self) -> Option<GameKind> {
        self.focused
    }

    /// Press anywhere in the focused game
    pub fn press(&mut self) {
        match self.focused {
            Some(GameKind::Balloon) => self.balloon.press(),
            Some(GameKind::Stacking) => self.stacking.press(),
            Some(GameKind::Matching) => self.matching.press(),
            None => {}
        }
    }

    /// Advance the focused game one fixed step
    pub fn tick(&mut self) {
        match self.focused {
            Some(GameKind::Balloon) => self.balloon.tick(),
            Some(GameKind::Stacking) => self.stacking.tick(),
            Some(GameKind::Matching) => self.matching.tick(),
            None => {}
        }
    }

    /// Events raised by every game since the last drain, tagged by game
    pub fn drain_events(&mut self) -> Vec<(GameKind, GameEvent)> {
        let tag = |kind: GameKind, events: Vec<GameEvent>| events.into_iter().map(move |e| (kind, e));
        tag(GameKind::Balloon, self.balloon.drain_events())
            .chain(tag(GameKind::Stacking, self.stacking.drain_events()))
            .chain(tag(GameKind::Matching, self.matching.drain_events()))
            .collect()
    }

    /// Focused game's snapshot as JSON, for renderers across an FFI/IPC boundary
    pub fn snapshot_json(&self) -> Result<Option<Value>, serde_json::Error> {
        let value = match self.focused {
            Some(GameKind::Balloon) => serde_json::to_value(self.balloon.snapshot())?,
            Some(GameKind::Stacking) => serde_json::to_value(self.stacking.snapshot())?,
            Some(GameKind::Matching) => serde_json::to_value(self.matching.snapshot())?,
            None => return Ok(None),
        };
        Ok(Some(value))
    }

    pub fn balloon(&self) -> &BalloonEngine {
        &self.balloon
    }

    pub fn stacking(&self) -> &StackingEngine {
        &self.stacking
    }

    pub fn matching(&self) -> &MatchingEngine {
        &self.matching
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arcade() -> Arcade {
        Arcade::new(&Settings::default(), 42).expect("default settings are valid")
    }

    #[test]
    fn test_press_goes_to_focused_game_only() {
        let mut arcade = arcade();
        arcade.press();
        assert!(arcade.balloon().slots().iter().all(|s| s.is_intact()));

        arcade.open(GameKind::Balloon);
        arcade.press();
        assert_eq!(arcade.balloon().slots().iter().filter(|s| !s.is_intact()).count(), 1);
        assert_eq!(arcade.stacking().level(), 0);
    }

    #[test]
    fn test_unfocused_games_do_not_tick() {
        let mut arcade = arcade();
        arcade.open(GameKind::Stacking);
        for _ in 0..10 {
            arcade.tick();
        }
        let x = arcade.stacking().current().map(|b| b.offset.x);
        assert_eq!(x, Some(20.0));

        arcade.open(GameKind::Matching);
        for _ in 0..10 {
            arcade.tick();
        }
        // Stacking was blurred: block did not move
        assert_eq!(arcade.stacking().current().map(|b| b.offset.x), x);
    }

    #[test]
    fn test_reopening_resets() {
        let mut arcade = arcade();
        arcade.open(GameKind::Stacking);
        arcade.press();
        assert_eq!(arcade.stacking().level(), 1);
        arcade.close();
        assert_eq!(arcade.focused(), None);
        arcade.open(GameKind::Stacking);
        assert_eq!(arcade.stacking().level(), 0);
    }

    #[test]
    fn test_events_are_tagged() {
        let mut arcade = arcade();
        arcade.drain_events();
        arcade.open(GameKind::Balloon);
        arcade.press();
        let events = arcade.drain_events();
        assert!(events.contains(&(GameKind::Balloon, GameEvent::RoundReset)));
        assert!(
            events
                .iter()
                .any(|(k, e)| *k == GameKind::Balloon && matches!(e, GameEvent::BalloonPopped { .. }))
        );
    }

    #[test]
    fn test_snapshot_json() {
        let mut arcade = arcade();
        assert!(arcade.snapshot_json().expect("serializable").is_none());
        arcade.open(GameKind::Stacking);
        let json = arcade.snapshot_json().expect("serializable").expect("focused");
        assert_eq!(json["level"], 0);
        assert_eq!(json["current"]["phase"], "Panning");
    }
}
