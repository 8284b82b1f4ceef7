//! Gameplay profiles
//!
//! Each historical version of the game is a profile: the same engine with its
//! own hit zone, direction rule, difficulty ramp and win/loss thresholds.
//! Profiles are plain data so a custom one can be loaded from JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_TRAIL_LENGTH;
use crate::error::ProfileError;
use crate::render::color::Rgba;
use crate::sim::block::{Lane, Projection};

/// Names of the built-in profiles, oldest first
pub const BUILTIN_PROFILES: [&str; 5] = ["classic", "dot-notes", "arrows", "depth", "falling"];

/// Spawn grid centered in the arena; left half of the columns is the red lane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub cols: u32,
    pub rows: u32,
    pub spacing: f32,
}

impl GridLayout {
    /// Screen position of a cell center
    pub fn cell_center(&self, col: u32, row: u32, arena: Vec2) -> Vec2 {
        let offset_x = arena.x / 2.0 - (self.cols as f32 * self.spacing) / 2.0 + self.spacing / 2.0;
        let offset_y = arena.y / 2.0 - (self.rows as f32 * self.spacing) / 2.0 + self.spacing / 2.0;
        Vec2::new(
            offset_x + col as f32 * self.spacing,
            offset_y + row as f32 * self.spacing,
        )
    }

    /// Columns per lane
    pub fn lane_cols(&self) -> u32 {
        self.cols / 2
    }

    pub fn lane_of(&self, col: u32) -> Lane {
        if col < self.lane_cols() {
            Lane::Left
        } else {
            Lane::Right
        }
    }
}

/// Depth window in which a block can be sliced (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitZone {
    pub start: f32,
    pub end: f32,
}

impl HitZone {
    pub fn contains(&self, z: f32) -> bool {
        z >= self.start && z <= self.end
    }
}

/// Spawn faster every `every` slices by `step` ticks, never below `floor`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyRamp {
    pub every: u32,
    pub step: u32,
    pub floor: u32,
}

/// Whether blocks carry an arrow the swipe must follow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DirectionRule {
    /// Any fast swipe through the block counts
    Free,
    /// Swipe direction dot arrow direction must reach `alignment`
    Required { alignment: f32 },
}

/// Kinematics of the two halves of a sliced block (per tick units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FragmentTuning {
    pub gravity: f32,
    /// Horizontal velocity multiplier per tick
    pub drag: f32,
    /// Alpha lost per tick
    pub fade: f32,
    /// Ticks after which a sliced block is dropped even if still visible
    pub max_ticks: u32,
    /// Rotation per tick (radians)
    pub spin: f32,
    pub split_speed: f32,
    pub split_jitter: f32,
    pub lift: f32,
    pub lift_jitter: f32,
}

impl Default for FragmentTuning {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            drag: 0.96,
            fade: 0.02,
            max_ticks: 100,
            spin: 0.0,
            split_speed: 3.0,
            split_jitter: 2.0,
            lift: 4.0,
            lift_jitter: 2.0,
        }
    }
}

/// Complete gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub arena_width: f32,
    pub arena_height: f32,
    pub projection: Projection,
    pub grid: GridLayout,
    pub block_size: f32,
    /// Depth gained per tick
    pub block_speed: f32,
    /// Blocks shallower than this are not drawn
    pub visible_from: f32,
    pub hit_zone: HitZone,
    /// Unsliced blocks deeper than this are culled as misses
    pub despawn_depth: f32,
    /// Ticks between spawns at the start of a run
    pub spawn_interval: u32,
    pub ramp: Option<DifficultyRamp>,
    /// Minimum pointer travel between samples for a swipe to cut
    pub min_slice_speed: f32,
    /// Slice radius as a fraction of the projected block size
    pub slice_radius_factor: f32,
    pub direction: DirectionRule,
    /// Misses that end the run
    pub max_missed: u32,
    pub win_score: Option<u64>,
    pub particle_burst: usize,
    /// Particle velocity multiplier per tick (1.0 = no drag)
    pub particle_drag: f32,
    pub fragment: FragmentTuning,
    pub trail_length: usize,
    pub left_color: Rgba,
    pub right_color: Rgba,
}

impl Default for Profile {
    fn default() -> Self {
        Self::dot_notes()
    }
}

impl Profile {
    /// First version: forgiving hit zone, no ramp, no win condition
    pub fn classic() -> Self {
        Self {
            name: "classic".to_string(),
            hit_zone: HitZone {
                start: 0.6,
                end: 1.15,
            },
            ramp: None,
            win_score: None,
            slice_radius_factor: 1.0,
            particle_burst: 20,
            particle_drag: 1.0,
            fragment: FragmentTuning {
                spin: 0.1,
                ..FragmentTuning::default()
            },
            ..Self::dot_notes()
        }
    }

    /// Dot notes on a 4x3 grid, ramping difficulty, win at 10000
    pub fn dot_notes() -> Self {
        Self {
            name: "dot-notes".to_string(),
            arena_width: 1000.0,
            arena_height: 700.0,
            projection: Projection::GridLerp,
            grid: GridLayout {
                cols: 4,
                rows: 3,
                spacing: 120.0,
            },
            block_size: 50.0,
            block_speed: 0.008,
            visible_from: 0.1,
            hit_zone: HitZone {
                start: 0.7,
                end: 1.1,
            },
            despawn_depth: 1.2,
            spawn_interval: 60,
            ramp: Some(DifficultyRamp {
                every: 10,
                step: 3,
                floor: 25,
            }),
            min_slice_speed: 8.0,
            slice_radius_factor: 0.9,
            direction: DirectionRule::Free,
            max_missed: 10,
            win_score: Some(10_000),
            particle_burst: 25,
            particle_drag: 0.97,
            fragment: FragmentTuning::default(),
            trail_length: 10,
            left_color: Rgba::SABER_RED,
            right_color: Rgba::SABER_BLUE,
        }
    }

    /// Arrow blocks: the swipe has to follow the arrow
    pub fn arrows() -> Self {
        Self {
            name: "arrows".to_string(),
            direction: DirectionRule::Required { alignment: 0.7 },
            win_score: None,
            fragment: FragmentTuning {
                spin: 0.15,
                ..FragmentTuning::default()
            },
            ..Self::dot_notes()
        }
    }

    /// Perspective-projected arrows with a tighter hit zone and fewer lives
    pub fn depth() -> Self {
        Self {
            name: "depth".to_string(),
            projection: Projection::Perspective {
                focal: 1.0,
                depth: 4.0,
            },
            block_size: 60.0,
            block_speed: 0.007,
            hit_zone: HitZone {
                start: 0.8,
                end: 1.05,
            },
            despawn_depth: 1.15,
            ramp: Some(DifficultyRamp {
                every: 8,
                step: 4,
                floor: 20,
            }),
            direction: DirectionRule::Required { alignment: 0.7 },
            max_missed: 8,
            win_score: Some(20_000),
            ..Self::dot_notes()
        }
    }

    /// Blocks fall down the four columns instead of flying out of the screen
    pub fn falling() -> Self {
        Self {
            name: "falling".to_string(),
            projection: Projection::Falling { top: -50.0 },
            block_speed: 0.006,
            hit_zone: HitZone {
                start: 0.6,
                end: 0.95,
            },
            despawn_depth: 1.05,
            ramp: Some(DifficultyRamp {
                every: 10,
                step: 5,
                floor: 30,
            }),
            slice_radius_factor: 1.0,
            win_score: None,
            particle_drag: 0.95,
            ..Self::dot_notes()
        }
    }

    /// Look up a built-in profile
    pub fn by_name(name: &str) -> Result<Self, ProfileError> {
        match name.to_lowercase().as_str() {
            "classic" => Ok(Self::classic()),
            "dot-notes" | "dots" => Ok(Self::dot_notes()),
            "arrows" => Ok(Self::arrows()),
            "depth" => Ok(Self::depth()),
            "falling" => Ok(Self::falling()),
            _ => Err(ProfileError::UnknownProfile(name.to_string())),
        }
    }

    /// Parse and validate a profile; missing fields fall back to `dot-notes`
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let profile: Profile = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn arena(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    pub fn lane_color(&self, lane: Lane) -> Rgba {
        match lane {
            Lane::Left => self.left_color,
            Lane::Right => self.right_color,
        }
    }

    /// Lane owning a screen x coordinate (used to tint the saber)
    pub fn lane_at(&self, x: f32) -> Lane {
        if x < self.arena_width / 2.0 {
            Lane::Left
        } else {
            Lane::Right
        }
    }

    /// Check invariants the simulation relies on
    pub fn validate(&self) -> Result<(), ProfileError> {
        let zone = self.hit_zone;
        if !(zone.start >= 0.0 && zone.start < zone.end) {
            return Err(ProfileError::InvalidHitZone {
                start: zone.start,
                end: zone.end,
            });
        }
        if !(self.despawn_depth > zone.start) {
            return Err(ProfileError::InvalidDespawn {
                despawn: self.despawn_depth,
                hit_start: zone.start,
            });
        }
        if !(self.block_speed > 0.0 && self.block_speed.is_finite()) {
            return Err(ProfileError::InvalidSpeed(self.block_speed));
        }
        match self.projection {
            Projection::Perspective { focal, depth }
                if !(focal > 0.0 && focal.is_finite() && depth >= 0.0 && depth.is_finite()) =>
            {
                return Err(ProfileError::InvalidProjection { focal, depth });
            }
            Projection::Falling { top } if !top.is_finite() => {
                return Err(ProfileError::InvalidFallStart(top));
            }
            _ => {}
        }
        if !(self.visible_from > 0.0 && self.visible_from.is_finite()) {
            return Err(ProfileError::InvalidVisibility(self.visible_from));
        }
        if !(self.min_slice_speed >= 0.0 && self.min_slice_speed.is_finite()) {
            return Err(ProfileError::InvalidSliceSpeed(self.min_slice_speed));
        }
        if !(self.slice_radius_factor > 0.0 && self.slice_radius_factor.is_finite()) {
            return Err(ProfileError::InvalidSliceRadius(self.slice_radius_factor));
        }
        if !(self.particle_drag > 0.0 && self.particle_drag <= 1.0) {
            return Err(ProfileError::InvalidParticleDrag(self.particle_drag));
        }
        if self.grid.cols < 2 || self.grid.cols % 2 != 0 || self.grid.rows == 0 {
            return Err(ProfileError::InvalidGrid {
                cols: self.grid.cols,
                rows: self.grid.rows,
            });
        }
        if self.spawn_interval == 0 {
            return Err(ProfileError::InvalidSpawnInterval);
        }
        if let Some(ramp) = self.ramp {
            if ramp.every == 0 || ramp.step == 0 || ramp.floor == 0 || ramp.floor > self.spawn_interval
            {
                return Err(ProfileError::InvalidRamp {
                    every: ramp.every,
                    step: ramp.step,
                    floor: ramp.floor,
                    interval: self.spawn_interval,
                });
            }
        }
        if let DirectionRule::Required { alignment } = self.direction {
            if !(-1.0..=1.0).contains(&alignment) {
                return Err(ProfileError::InvalidAlignment(alignment));
            }
        }
        if self.max_missed == 0 {
            return Err(ProfileError::InvalidMissLimit);
        }
        if self.trail_length == 0 || self.trail_length > MAX_TRAIL_LENGTH {
            return Err(ProfileError::InvalidTrail);
        }
        if !(self.fragment.fade > 0.0) || self.fragment.max_ticks == 0 {
            return Err(ProfileError::InvalidFade);
        }
        Ok(())
    }
}
