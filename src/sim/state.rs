//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in `GameState`; nothing is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::block::Block;
use super::particle::ParticleField;
use super::pointer::Pointer;
use super::spawner::Spawner;
use crate::consts::{MAX_PARTICLES, SLICE_POINTS};
use crate::profile::Profile;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start; only the saber is drawn
    Idle,
    /// Active gameplay
    Playing,
    /// Too many misses
    GameOver,
    /// Reached the profile's win score
    Won,
}

impl GamePhase {
    pub fn is_ended(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Won)
    }
}

/// Things that happened during a tick, for the shell to react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    BlockSpawned { id: u32 },
    BlockSliced { id: u32, combo: u32, points: u64 },
    BlockMissed { id: u32 },
    DifficultyIncreased { interval: u32 },
    GameOver,
    Won,
}

/// Score keeping for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub missed: u32,
    /// Successful slices this run (drives the difficulty ramp)
    pub sliced_total: u32,
}

impl Session {
    /// Count a slice; returns the points awarded
    pub fn register_slice(&mut self) -> u64 {
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        self.sliced_total += 1;
        let points = SLICE_POINTS * u64::from(self.combo);
        self.score += points;
        points
    }

    pub fn register_miss(&mut self) {
        self.missed += 1;
        self.combo = 0;
    }
}

/// Values the shell shows in its HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub missed: u32,
    pub max_missed: u32,
    pub phase: GamePhase,
}

/// Final result shown on the game over / win screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub score: u64,
    pub max_combo: u32,
    pub won: bool,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub profile: Profile,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub session: Session,
    pub spawner: Spawner,
    /// Active blocks in spawn (id) order
    pub blocks: Vec<Block>,
    pub particles: ParticleField,
    pub pointer: Pointer,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events emitted by the latest tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create an idle state. The profile is assumed valid (see `Profile::validate`).
    pub fn new(profile: Profile, seed: u64) -> Self {
        let center = profile.arena() * 0.5;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            session: Session::default(),
            spawner: Spawner::new(profile.spawn_interval),
            blocks: Vec::new(),
            particles: ParticleField::new(profile.particle_drag, MAX_PARTICLES),
            pointer: Pointer::new(center, profile.trail_length),
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
            profile,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Record a pointer sample from an input event
    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.pointer.move_to(pos);
    }

    /// Clear score, entities and difficulty for a fresh run. Pointer and RNG carry over.
    pub fn reset_session(&mut self) {
        self.session = Session::default();
        self.spawner = Spawner::new(self.profile.spawn_interval);
        self.blocks.clear();
        self.particles.clear();
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.session.score,
            combo: self.session.combo,
            max_combo: self.session.max_combo,
            missed: self.session.missed,
            max_missed: self.profile.max_missed,
            phase: self.phase,
        }
    }

    /// Final result, available once the run has ended
    pub fn summary(&self) -> Option<Summary> {
        self.phase.is_ended().then(|| Summary {
            score: self.session.score,
            max_combo: self.session.max_combo,
            won: self.phase == GamePhase::Won,
        })
    }
}
