//! Blocks, their projection onto the screen, and the fragments they break into

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::lerp_vec;
use crate::profile::{FragmentTuning, HitZone, Profile};

/// Which saber a block belongs to (left half red, right half blue)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    Left,
    Right,
}

/// Required swipe direction, screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Unit vector of the direction
    pub fn vector(self) -> Vec2 {
        let (dx, dy) = match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
            Direction::UpLeft => (-1.0, -1.0),
            Direction::UpRight => (1.0, -1.0),
            Direction::DownLeft => (-1.0, 1.0),
            Direction::DownRight => (1.0, 1.0),
        };
        Vec2::new(dx, dy).normalize()
    }

    /// Arrow drawn on the block face
    pub fn glyph(self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Left => "←",
            Direction::Right => "→",
            Direction::UpLeft => "↖",
            Direction::UpRight => "↗",
            Direction::DownLeft => "↙",
            Direction::DownRight => "↘",
        }
    }

    /// Dot product of a swipe with this direction, `None` for a zero-length swipe
    pub fn alignment(self, displacement: Vec2) -> Option<f32> {
        crate::swipe_direction(displacement).map(|dir| dir.dot(self.vector()))
    }
}

/// How a block's depth maps onto the screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Projection {
    /// Grow from 20% to full size while sliding from the arena center to the grid cell
    GridLerp,
    /// Pinhole camera: `focal / (focal + (1 - z) * depth)`
    Perspective { focal: f32, depth: f32 },
    /// Fixed size, falling down the column from `top` to the bottom edge
    Falling { top: f32 },
}

/// Screen-space placement of a block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub pos: Vec2,
    pub size: f32,
    pub scale: f32,
}

impl Projection {
    /// Size multiplier at depth `z`; non-decreasing in `z`
    pub fn scale(&self, z: f32) -> f32 {
        match *self {
            Projection::GridLerp => z * 0.8 + 0.2,
            Projection::Perspective { focal, depth } => {
                focal / (focal + (1.0 - z).max(0.0) * depth)
            }
            Projection::Falling { .. } => 1.0,
        }
    }

    pub fn project(&self, target: Vec2, z: f32, base_size: f32, arena: Vec2) -> Projected {
        let scale = self.scale(z);
        let center = arena * 0.5;
        let pos = match *self {
            Projection::GridLerp => lerp_vec(center, target, z),
            Projection::Perspective { .. } => lerp_vec(center, target, scale),
            Projection::Falling { top } => Vec2::new(target.x, crate::lerp(top, arena.y, z)),
        };
        Projected {
            pos,
            size: base_size * scale,
            scale,
        }
    }
}

/// One half of a sliced block, flying on its own
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub spin: f32,
    pub size: f32,
    pub alpha: f32,
}

impl Fragment {
    pub fn update(&mut self, tuning: &FragmentTuning) {
        self.pos += self.vel;
        self.vel.x *= tuning.drag;
        self.vel.y += tuning.gravity;
        self.rotation += self.spin;
        self.alpha = (self.alpha - tuning.fade).max(0.0);
    }

    pub fn is_faded(&self) -> bool {
        self.alpha <= 0.0
    }
}

/// Block lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum BlockState {
    /// Flying toward the player
    Incoming,
    /// Cut in two; the block no longer moves, only its fragments do
    Sliced { ticks: u32, fragments: [Fragment; 2] },
}

/// Why a block leaves the active set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Passed the player unsliced
    Missed,
    /// Fragments finished their animation
    Finished,
}

/// A target block
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: u32,
    pub lane: Lane,
    pub column: u32,
    pub row: u32,
    /// Grid cell center the block flies toward
    pub target: Vec2,
    /// Progress toward the player: 0 = spawned far away, 1 = at the player
    pub z: f32,
    pub speed: f32,
    pub base_size: f32,
    pub direction: Option<Direction>,
    pub state: BlockState,
}

impl Block {
    pub fn is_sliced(&self) -> bool {
        matches!(self.state, BlockState::Sliced { .. })
    }

    pub fn fragments(&self) -> Option<&[Fragment; 2]> {
        match &self.state {
            BlockState::Incoming => None,
            BlockState::Sliced { fragments, .. } => Some(fragments),
        }
    }

    /// Advance one tick: move closer while incoming, animate fragments once sliced
    pub fn advance(&mut self, tuning: &FragmentTuning) {
        match &mut self.state {
            BlockState::Incoming => self.z += self.speed,
            BlockState::Sliced { ticks, fragments } => {
                *ticks += 1;
                for fragment in fragments.iter_mut() {
                    fragment.update(tuning);
                }
            }
        }
    }

    pub fn project(&self, profile: &Profile) -> Projected {
        profile
            .projection
            .project(self.target, self.z, self.base_size, profile.arena())
    }

    pub fn in_hit_zone(&self, zone: &HitZone) -> bool {
        zone.contains(self.z)
    }

    pub fn is_visible(&self, visible_from: f32) -> bool {
        self.z >= visible_from
    }

    /// Whether the block should be culled this tick, and why
    pub fn expiry(&self, profile: &Profile) -> Option<Expiry> {
        match &self.state {
            BlockState::Incoming if self.z > profile.despawn_depth => Some(Expiry::Missed),
            BlockState::Incoming => None,
            BlockState::Sliced { ticks, fragments } => {
                let faded = fragments.iter().all(Fragment::is_faded);
                (faded || *ticks > profile.fragment.max_ticks).then_some(Expiry::Finished)
            }
        }
    }

    /// Cut the block at its projected placement. Fragments fly apart across the
    /// swipe and get an upward kick. Returns `false` if it was already sliced.
    pub fn slice<R: Rng>(
        &mut self,
        at: Projected,
        swipe: Option<Vec2>,
        tuning: &FragmentTuning,
        rng: &mut R,
    ) -> bool {
        if self.is_sliced() {
            return false;
        }

        // Split axis is perpendicular to the swipe; first half goes left
        let mut axis = swipe.map(Vec2::perp).unwrap_or(Vec2::X);
        if axis.x < 0.0 || (axis.x == 0.0 && axis.y > 0.0) {
            axis = -axis;
        }

        let mut half = |sign: f32| {
            let split = tuning.split_speed + rng.random::<f32>() * tuning.split_jitter;
            let lift = tuning.lift + rng.random::<f32>() * tuning.lift_jitter;
            Fragment {
                pos: at.pos + axis * sign * at.size * 0.25,
                vel: axis * sign * split - Vec2::Y * lift,
                rotation: 0.0,
                spin: tuning.spin * sign,
                size: at.size * 0.5,
                alpha: 1.0,
            }
        };
        let fragments = [half(-1.0), half(1.0)];

        self.state = BlockState::Sliced {
            ticks: 0,
            fragments,
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn block(z: f32) -> Block {
        Block {
            id: 1,
            lane: Lane::Left,
            column: 0,
            row: 0,
            target: Vec2::new(380.0, 230.0),
            z,
            speed: 0.008,
            base_size: 50.0,
            direction: None,
            state: BlockState::Incoming,
        }
    }

    #[test]
    fn test_direction_vectors_are_unit() {
        for dir in Direction::ALL {
            assert!((dir.vector().length() - 1.0).abs() < 1e-6, "{dir:?}");
        }
        assert_eq!(Direction::Up.vector(), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_alignment_zero_swipe_is_none() {
        assert_eq!(Direction::Right.alignment(Vec2::ZERO), None);
        let a = Direction::Right.alignment(Vec2::new(10.0, 0.0)).unwrap();
        assert!((a - 1.0).abs() < 1e-6);
        let a = Direction::Right.alignment(Vec2::new(-10.0, 0.0)).unwrap();
        assert!((a + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_grid_lerp_projection() {
        let arena = Vec2::new(1000.0, 700.0);
        let target = Vec2::new(380.0, 230.0);
        let far = Projection::GridLerp.project(target, 0.0, 50.0, arena);
        assert_eq!(far.pos, Vec2::new(500.0, 350.0));
        assert!((far.size - 10.0).abs() < 1e-4);

        let near = Projection::GridLerp.project(target, 1.0, 50.0, arena);
        assert!((near.pos - target).length() < 1e-4);
        assert!((near.size - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_projection_scale_monotonic() {
        let projections = [
            Projection::GridLerp,
            Projection::Perspective {
                focal: 1.0,
                depth: 4.0,
            },
            Projection::Falling { top: -50.0 },
        ];
        for projection in projections {
            let mut last = f32::MIN;
            for step in 0..=150 {
                let s = projection.scale(step as f32 * 0.01);
                assert!(s >= last, "{projection:?} shrank at step {step}");
                last = s;
            }
        }
    }

    #[test]
    fn test_falling_projection_moves_down_column() {
        let arena = Vec2::new(1000.0, 700.0);
        let p = Projection::Falling { top: -50.0 };
        let a = p.project(Vec2::new(200.0, 0.0), 0.0, 50.0, arena);
        let b = p.project(Vec2::new(200.0, 0.0), 1.0, 50.0, arena);
        assert_eq!(a.pos, Vec2::new(200.0, -50.0));
        assert_eq!(b.pos, Vec2::new(200.0, 700.0));
        assert_eq!(a.size, b.size);
    }

    #[test]
    fn test_slice_only_once() {
        let tuning = FragmentTuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut b = block(0.9);
        let at = Projected {
            pos: Vec2::new(400.0, 250.0),
            size: 46.0,
            scale: 0.92,
        };
        assert!(b.slice(at, Some(Vec2::X), &tuning, &mut rng));
        assert!(b.is_sliced());
        assert!(!b.slice(at, Some(Vec2::X), &tuning, &mut rng));

        let fragments = b.fragments().unwrap();
        assert!(fragments[0].vel.y < 0.0 && fragments[1].vel.y < 0.0);
        assert!((fragments[0].size - 23.0).abs() < 1e-4);
    }

    #[test]
    fn test_sliced_block_stops_advancing_and_fades() {
        let profile = Profile::dot_notes();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut b = block(0.9);
        let at = b.project(&profile);
        b.slice(at, None, &profile.fragment, &mut rng);

        let mut last_alpha = 1.0;
        let mut ticks = 0;
        while b.expiry(&profile).is_none() {
            b.advance(&profile.fragment);
            assert_eq!(b.z, 0.9);
            let alpha = b.fragments().unwrap()[0].alpha;
            assert!(alpha <= last_alpha);
            last_alpha = alpha;
            ticks += 1;
            assert!(ticks <= profile.fragment.max_ticks + 1);
        }
        assert_eq!(b.expiry(&profile), Some(Expiry::Finished));
    }

    #[test]
    fn test_unsliced_block_expires_as_miss() {
        let profile = Profile::dot_notes();
        let mut b = block(1.195);
        assert_eq!(b.expiry(&profile), None);
        b.advance(&profile.fragment);
        assert_eq!(b.expiry(&profile), Some(Expiry::Missed));
    }
}
