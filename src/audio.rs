//! Sound effect playback
//!
//! The engines never talk to an audio device. They hand a `SoundEffect` to an
//! `AudioManager`, which forwards it to whatever `AudioSink` the shell
//! installed. Playback failures are logged and swallowed.

use std::fmt;

use crate::error::AudioError;
use crate::settings::AudioSettings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Cheering after a correct shape match
    Cheer,
}

impl SoundEffect {
    /// Asset the shell should play for this effect
    pub fn asset(&self) -> &'static str {
        match self {
            SoundEffect::Cheer => "audio/success_audio.mp3",
        }
    }
}

/// Something that can play sound effects (provided by the app shell)
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
}

/// Sink that just logs what would have played
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
        log::info!("♪ {:?} ({}) at volume {:.2}", effect, effect.asset(), volume);
        Ok(())
    }
}

/// Audio manager for the games
pub struct AudioManager {
    sink: Option<Box<dyn AudioSink>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioManager")
            .field("has_sink", &self.sink.is_some())
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("muted", &self.muted)
            .finish()
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink: Some(sink),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// No output at all
    pub fn disabled() -> Self {
        Self {
            sink: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Apply volume and mute preferences
    pub fn with_settings(mut self, settings: &AudioSettings) -> Self {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
        self
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect. Failures are logged, never returned.
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        if let Err(e) = sink.play(effect, vol) {
            log::warn!("Failed to play {:?}: {}", effect, e);
        }
    }
}
