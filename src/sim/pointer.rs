//! Pointer samples and the saber trail

use std::collections::VecDeque;

use glam::Vec2;

/// Trail point for saber rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub speed: f32,
}

/// Latest pointer state, fed by input events between ticks
#[derive(Debug, Clone)]
pub struct Pointer {
    pub pos: Vec2,
    pub last_pos: Vec2,
    /// Distance travelled between the last two samples
    pub velocity: f32,
    /// Recent samples, oldest first
    trail: VecDeque<TrailPoint>,
    capacity: usize,
}

impl Pointer {
    pub fn new(start: Vec2, capacity: usize) -> Self {
        Self {
            pos: start,
            last_pos: start,
            velocity: 0.0,
            trail: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Record a new sample
    pub fn move_to(&mut self, pos: Vec2) {
        self.last_pos = self.pos;
        self.pos = pos;
        self.velocity = self.displacement().length();

        self.trail.push_back(TrailPoint {
            pos,
            speed: self.velocity,
        });
        while self.trail.len() > self.capacity {
            self.trail.pop_front();
        }
    }

    /// Movement between the last two samples
    pub fn displacement(&self) -> Vec2 {
        self.pos - self.last_pos
    }

    pub fn trail(&self) -> &VecDeque<TrailPoint> {
        &self.trail
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_is_sample_distance() {
        let mut p = Pointer::new(Vec2::new(500.0, 350.0), 10);
        p.move_to(Vec2::new(503.0, 354.0));
        assert_eq!(p.velocity, 5.0);
        assert_eq!(p.displacement(), Vec2::new(3.0, 4.0));

        p.move_to(Vec2::new(503.0, 354.0));
        assert_eq!(p.velocity, 0.0);
        assert_eq!(p.displacement(), Vec2::ZERO);
    }

    #[test]
    fn test_trail_evicts_oldest() {
        let mut p = Pointer::new(Vec2::ZERO, 3);
        for i in 1..=5 {
            p.move_to(Vec2::new(i as f32, 0.0));
        }
        let xs: Vec<f32> = p.trail().iter().map(|t| t.pos.x).collect();
        assert_eq!(xs, vec![3.0, 4.0, 5.0]);
    }
}
