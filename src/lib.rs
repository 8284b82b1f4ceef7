//! Slice Beats - a swipe-to-slice rhythm arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, slicing, particles, game state)
//! - `render`: Draw-command list for a 2D canvas
//! - `driver`: Fixed timestep frame driver tying input, sim and render together
//! - `profile`: Named gameplay profiles (one per game variant)
//! - `settings`: Player preferences
//! - `highscores`: Leaderboard of finished runs

pub mod driver;
pub mod error;
pub mod highscores;
pub mod profile;
pub mod render;
pub mod settings;
pub mod sim;

pub use driver::FrameDriver;
pub use error::ProfileError;
pub use highscores::HighScores;
pub use profile::Profile;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Largest frame delta accepted before clamping (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Hard ceiling on live particles regardless of quality preset
    pub const MAX_PARTICLES: usize = 2000;

    /// Longest saber trail a profile may ask for
    pub const MAX_TRAIL_LENGTH: usize = 256;

    /// Points per slice, multiplied by the combo after the slice
    pub const SLICE_POINTS: u64 = 10;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation between two points
#[inline]
pub fn lerp_vec(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

/// Unit vector for a swipe displacement, or `None` if the pointer did not move
#[inline]
pub fn swipe_direction(displacement: Vec2) -> Option<Vec2> {
    let len = displacement.length();
    if len <= f32::EPSILON {
        None
    } else {
        Some(displacement / len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
    }

    #[test]
    fn test_swipe_direction_rejects_zero() {
        assert!(swipe_direction(Vec2::ZERO).is_none());
        let dir = swipe_direction(Vec2::new(3.0, 4.0)).unwrap();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((dir.x - 0.6).abs() < 1e-6);
    }
}
