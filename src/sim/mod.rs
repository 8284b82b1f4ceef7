//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per call, all speeds in per-tick units
//! - Seeded RNG only
//! - Stable iteration order (blocks in spawn order)
//! - No rendering or platform dependencies

pub mod block;
pub mod particle;
pub mod pointer;
pub mod slice;
pub mod spawner;
pub mod state;
pub mod tick;

pub use block::{Block, BlockState, Direction, Fragment, Lane, Projected, Projection};
pub use particle::{Particle, ParticleField};
pub use pointer::{Pointer, TrailPoint};
pub use slice::{SliceCheck, check_slice, slice_pass};
pub use spawner::{Spawner, random_block};
pub use state::{GameEvent, GamePhase, GameState, Hud, Session, Summary};
pub use tick::{TickInput, tick};
