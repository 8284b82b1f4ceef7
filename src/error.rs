//! Error types
//!
//! The simulation itself never fails; errors only come from configuration
//! that arrives from outside (profile names, JSON profiles).

use thiserror::Error;

/// Rejected gameplay profile
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("unknown profile '{0}'")]
    UnknownProfile(String),

    #[error("hit zone must satisfy 0 <= start < end (got {start}..{end})")]
    InvalidHitZone { start: f32, end: f32 },

    #[error("despawn depth {despawn} must lie beyond the hit zone start {hit_start}")]
    InvalidDespawn { despawn: f32, hit_start: f32 },

    #[error("block speed must be positive (got {0})")]
    InvalidSpeed(f32),

    #[error("perspective needs focal > 0 and depth >= 0 (got focal={focal}, depth={depth})")]
    InvalidProjection { focal: f32, depth: f32 },

    #[error("falling start must be finite (got {0})")]
    InvalidFallStart(f32),

    #[error("visibility threshold must be positive (got {0})")]
    InvalidVisibility(f32),

    #[error("minimum slice speed must be non-negative (got {0})")]
    InvalidSliceSpeed(f32),

    #[error("slice radius factor must be positive (got {0})")]
    InvalidSliceRadius(f32),

    #[error("particle drag must be in (0, 1] (got {0})")]
    InvalidParticleDrag(f32),

    #[error("grid needs an even column count of at least 2 and at least 1 row (got {cols}x{rows})")]
    InvalidGrid { cols: u32, rows: u32 },

    #[error("spawn interval must be at least one tick")]
    InvalidSpawnInterval,

    #[error("difficulty ramp invalid: every={every}, step={step}, floor={floor}, interval={interval}")]
    InvalidRamp {
        every: u32,
        step: u32,
        floor: u32,
        interval: u32,
    },

    #[error("direction alignment must be in [-1, 1] (got {0})")]
    InvalidAlignment(f32),

    #[error("miss limit must be at least 1")]
    InvalidMissLimit,

    #[error("trail length must be between 1 and {}", crate::consts::MAX_TRAIL_LENGTH)]
    InvalidTrail,

    #[error("fragment fade and max ticks must be positive")]
    InvalidFade,

    #[error("profile JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Malformed `#rrggbb` color string
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid color '{0}', expected #rrggbb")]
pub struct ColorError(pub String);
