//! Pocket Arcade - state machines for three casual mini-games
//!
//! Core modules:
//! - `sim`: Deterministic game engines (balloon pop, block stacking, shape matching)
//! - `arcade`: Owns the engines and routes navigation focus, presses and ticks
//! - `audio`: Sound effect sink used for success cues
//! - `settings`: Data-driven tuning, loaded from JSON
//! - `error`: Configuration and audio errors

pub mod arcade;
pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;

pub use arcade::Arcade;
pub use error::{AudioError, ConfigError};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation tick rate (matches a 60 Hz animation frame)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Convert a millisecond duration to whole ticks (rounded up, never 0 for non-zero input)
    ///
    /// Saturates at `u32::MAX` ticks for durations too long to represent.
    #[inline]
    pub const fn ms_to_ticks(ms: u32) -> u32 {
        let ticks = (ms as u64 * TICK_RATE as u64).div_ceil(1000);
        if ticks > u32::MAX as u64 {
            u32::MAX
        } else {
            ticks as u32
        }
    }
}

/// Linear interpolation between two points, `t` clamped to [0, 1]
#[inline]
pub fn lerp_point(from: Vec2, to: Vec2, t: f32) -> Vec2 {
    from.lerp(to, t.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::consts::ms_to_ticks;
    use super::*;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(0), 0);
        assert_eq!(ms_to_ticks(1000), 60);
        assert_eq!(ms_to_ticks(600), 36);
        assert_eq!(ms_to_ticks(1500), 90);
        // Partial ticks round up
        assert_eq!(ms_to_ticks(1), 1);
        assert_eq!(ms_to_ticks(20), 2);
    }

    #[test]
    fn test_ms_to_ticks_long_durations() {
        // 80M ms is past the point where ms * 60 fits in a u32
        assert_eq!(ms_to_ticks(80_000_000), 4_800_000);
        assert_eq!(ms_to_ticks(u32::MAX), (u32::MAX as u64 * 60).div_ceil(1000) as u32);
    }

    #[test]
    fn test_lerp_point_clamps() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 20.0);
        assert_eq!(lerp_point(a, b, 0.5), Vec2::new(5.0, 10.0));
        assert_eq!(lerp_point(a, b, 2.0), b);
        assert_eq!(lerp_point(a, b, -1.0), a);
    }
}
