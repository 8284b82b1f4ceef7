//! Timer-based block spawner with a difficulty ramp

use rand::Rng;

use super::block::{Block, BlockState, Direction, Lane};
use crate::profile::{DifficultyRamp, DirectionRule, Profile};

/// Counts ticks and decides when the next block appears
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spawner {
    /// Ticks since the last spawn
    pub timer: u32,
    /// Current ticks between spawns
    pub interval: u32,
}

impl Spawner {
    pub fn new(interval: u32) -> Self {
        Self { timer: 0, interval }
    }

    /// Advance one tick; returns true when a block is due
    pub fn tick(&mut self) -> bool {
        self.timer += 1;
        if self.timer >= self.interval {
            self.timer = 0;
            true
        } else {
            false
        }
    }

    /// Apply the ramp after a slice. Returns the new interval if it shrank.
    pub fn on_slice(&mut self, sliced_total: u32, ramp: Option<&DifficultyRamp>) -> Option<u32> {
        let ramp = ramp?;
        if sliced_total == 0 || sliced_total % ramp.every != 0 || self.interval <= ramp.floor {
            return None;
        }
        self.interval = self.interval.saturating_sub(ramp.step).max(ramp.floor);
        Some(self.interval)
    }
}

/// Build a block on a random grid cell of a random lane
pub fn random_block<R: Rng>(id: u32, profile: &Profile, rng: &mut R) -> Block {
    let lane = if rng.random_bool(0.5) {
        Lane::Left
    } else {
        Lane::Right
    };
    let lane_cols = profile.grid.lane_cols();
    let column = match lane {
        Lane::Left => rng.random_range(0..lane_cols),
        Lane::Right => lane_cols + rng.random_range(0..lane_cols),
    };
    let row = rng.random_range(0..profile.grid.rows);

    let direction = match profile.direction {
        DirectionRule::Free => None,
        DirectionRule::Required { .. } => {
            Some(Direction::ALL[rng.random_range(0..Direction::ALL.len())])
        }
    };

    Block {
        id,
        lane,
        column,
        row,
        target: profile.grid.cell_center(column, row, profile.arena()),
        z: 0.0,
        speed: profile.block_speed,
        base_size: profile.block_size,
        direction,
        state: BlockState::Incoming,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawns_every_interval() {
        let mut spawner = Spawner::new(60);
        let spawned: Vec<u32> = (1..=300).filter(|_| spawner.tick()).collect();
        assert_eq!(spawned.len(), 5);
        assert_eq!(spawner.timer, 0);
    }

    #[test]
    fn test_ramp_every_ten_slices_until_floor() {
        let ramp = DifficultyRamp {
            every: 10,
            step: 3,
            floor: 25,
        };
        let mut spawner = Spawner::new(60);
        assert_eq!(spawner.on_slice(9, Some(&ramp)), None);
        assert_eq!(spawner.on_slice(10, Some(&ramp)), Some(57));
        assert_eq!(spawner.on_slice(11, Some(&ramp)), None);

        for n in 2..=20 {
            spawner.on_slice(n * 10, Some(&ramp));
        }
        assert_eq!(spawner.interval, 25);
        assert_eq!(spawner.on_slice(300, Some(&ramp)), None);
        assert_eq!(spawner.on_slice(10, None), None);
    }

    #[test]
    fn test_random_block_respects_lanes() {
        let profile = Profile::arrows();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut seen_left = false;
        let mut seen_right = false;
        for id in 0..200 {
            let block = random_block(id, &profile, &mut rng);
            assert_eq!(profile.grid.lane_of(block.column), block.lane);
            assert!(block.row < profile.grid.rows);
            assert!(block.direction.is_some());
            assert_eq!(block.z, 0.0);
            seen_left |= block.lane == Lane::Left;
            seen_right |= block.lane == Lane::Right;
        }
        assert!(seen_left && seen_right);

        let dot = random_block(0, &Profile::dot_notes(), &mut rng);
        assert!(dot.direction.is_none());
    }
}
